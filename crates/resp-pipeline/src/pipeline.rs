//! Пайплайн анализа: байты файла → отчёт.

use std::time::Instant;

use tracing::{debug, info};

use audio::extract_features;
use resp_core::{debug as dbg, FeatureConfig, RespResult};
use resp_engine::RespEngine;

use crate::report::{self, AnalysisReport};

/// Пайплайн анализа респираторного аудио.
///
/// Владеет движком классификации и конфигурацией извлечения признаков.
/// `analyze_bytes` требует `&mut self` (инференс мутирует состояние
/// бэкенда), разделяемый доступ — через внешний `Mutex`.
pub struct RespPipeline {
    engine: RespEngine,
    config: FeatureConfig,
}

impl RespPipeline {
    pub fn new(engine: RespEngine) -> Self {
        Self::with_config(engine, FeatureConfig::default())
    }

    pub fn with_config(engine: RespEngine, config: FeatureConfig) -> Self {
        Self { engine, config }
    }

    /// Имя активного бэкенда.
    pub fn model_name(&self) -> &str {
        self.engine.name()
    }

    /// Полный анализ загруженного аудиофайла.
    ///
    /// Деградировавшая экстракция (битый файл, тишина) не является
    /// ошибкой: классификация идёт по нулевому изображению, отчёт
    /// получает clarity=0 и background_noise=100.
    pub fn analyze_bytes(&mut self, bytes: &[u8]) -> RespResult<AnalysisReport> {
        let start = Instant::now();
        debug!("Analyzing {} bytes of audio", bytes.len());

        let features = extract_features(bytes, &self.config);
        if features.is_degenerate() {
            info!("Degenerate features, classifying zero image");
        }
        let (image, quality) = features.into_parts(self.config.img_size);

        let prediction = self.engine.classify(&image)?;

        if dbg::enabled() {
            dbg::dump_scores(&prediction);
        }

        let report = report::compose(&prediction, &quality);
        info!(
            "Analysis done in {:.1}ms: {} ({:.2}%, risk={:?})",
            start.elapsed().as_secs_f64() * 1000.0,
            report.prediction.disease,
            report.prediction.confidence,
            report.prediction.risk_level,
        );

        Ok(report)
    }
}
