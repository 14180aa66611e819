//! HTTP-маршруты сервиса анализа.
//!
//! Единственная операция: `POST /analyze` с multipart-полем `file`.
//! Ответы повторяют контракт, на который завязаны клиенты:
//! - нет поля файла → 400 `{"error": "No file part"}`;
//! - пустое имя файла → 400 `{"error": "No selected file"}`;
//! - превышен лимит размера → 413 `{"error": "File too large"}`;
//! - успех → 200 с полным отчётом.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use resp_pipeline::RespPipeline;

/// Лимит тела запроса. Дефолтные 2 МБ axum отрезают уже минутную
/// WAV-запись 22.05 кГц; 50 МБ покрывает получасовую с запасом.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Пайплайн разделяется между запросами через мьютекс:
/// инференс требует `&mut`.
pub type SharedPipeline = Arc<Mutex<RespPipeline>>;

/// Собрать роутер сервиса.
pub fn router(pipeline: SharedPipeline) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(pipeline)
}

async fn analyze(State(pipeline): State<SharedPipeline>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return multipart_error(e),
        };
        if field.name() != Some("file") {
            continue;
        }
        // Поле без имени файла эквивалентно его отсутствию.
        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let bytes = match field.bytes().await {
            Ok(b) => b.to_vec(),
            Err(e) => return multipart_error(e),
        };
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = match upload {
        Some(u) => u,
        None => return error_response(StatusCode::BAD_REQUEST, "No file part"),
    };

    if filename.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No selected file");
    }

    info!("Analyzing upload '{}' ({} bytes)", filename, bytes.len());

    // Инференс синхронный и может занять сотни миллисекунд: уводим его
    // с tokio-реактора в blocking-пул.
    let result = tokio::task::spawn_blocking(move || {
        let mut guard = match pipeline.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.analyze_bytes(&bytes)
    })
    .await;

    match result {
        Ok(Ok(report)) => (StatusCode::OK, Json(report)).into_response(),
        Ok(Err(e)) => {
            error!("Analysis failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
        Err(e) => {
            error!("Analysis task panicked: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

/// Ошибки чтения multipart: переполнение лимита отличаем от битого тела,
/// чтобы клиент не получал "No file part" на валидную длинную запись.
fn multipart_error(e: MultipartError) -> Response {
    error!("Failed to read upload: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        error_response(StatusCode::PAYLOAD_TOO_LARGE, "File too large")
    } else {
        error_response(StatusCode::BAD_REQUEST, "Malformed upload")
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
