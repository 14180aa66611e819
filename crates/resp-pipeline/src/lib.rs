//! # resp-pipeline
//!
//! Высокоуровневый пайплайн анализа: сырые байты аудио → извлечение
//! признаков → классификация → итоговый отчёт с рекомендацией.

mod pipeline;
pub mod report;

pub use pipeline::RespPipeline;
pub use report::{AnalysisReport, AudioQuality, Diagnosis, RiskLevel};
