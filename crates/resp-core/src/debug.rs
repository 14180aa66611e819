//! Отладочный вывод сырых предсказаний.
//!
//! Клиентский контракт отдаёт только победивший класс; при подборе
//! порогов нужен весь вектор. Включается переменной `RESP_DEBUG`.

use std::sync::OnceLock;

use crate::labels::DISEASE_LABELS;
use crate::types::PredictionVector;

/// Возвращает `true`, если включен подробный отладочный вывод
/// (`RESP_DEBUG` установлена в любое непустое значение).
pub fn enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var_os("RESP_DEBUG").is_some())
}

/// Напечатать в stderr все классы с их сырыми оценками, по убыванию.
pub fn dump_scores(prediction: &PredictionVector) {
    let mut ranked: Vec<(usize, f32)> = prediction
        .scores()
        .iter()
        .copied()
        .enumerate()
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    eprintln!("[resp-debug] raw scores:");
    for (idx, score) in ranked {
        eprintln!("[resp-debug]   {:>14}: {:.6}", DISEASE_LABELS[idx], score);
    }
}
