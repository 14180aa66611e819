//! # resp-core
//!
//! Базовые типы, трейты и определения ошибок для RustResp —
//! сервиса классификации респираторных заболеваний по звуку дыхания.
//!
//! Этот крейт предоставляет фундаментальные абстракции для всех остальных
//! крейтов в workspace:
//!
//! - Общие типы данных (`AudioClip`, `FeatureImage`, `QualityScore`,
//!   `PredictionVector`, `ExtractedFeatures`)
//! - Конфигурационные структуры пайплайна и сервера
//! - Унифицированная обработка ошибок через `RespError`
//! - Trait [`Classifier`] — единый интерфейс для бэкендов модели
//! - Реестр моделей [`ModelType`] и таблица классов [`labels`]

pub mod config;
pub mod debug;
pub mod error;
pub mod labels;
pub mod model_files;
pub mod model_registry;
pub mod traits;
pub mod types;

pub use config::{FeatureConfig, ServerConfig};
pub use error::{RespError, RespResult};
pub use labels::{DISEASE_LABELS, NUM_CLASSES};
pub use model_registry::ModelType;
pub use traits::Classifier;
pub use types::{AudioClip, ExtractedFeatures, FeatureImage, PredictionVector, QualityScore};
