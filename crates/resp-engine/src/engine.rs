//! Диспетчеризация по типу модели.
//!
//! `RespEngine` — единая точка входа для загрузки и использования
//! любого из поддерживаемых бэкендов классификации.

use std::path::Path;

use candle_core::Device;
use tracing::info;

use resp_core::{Classifier, FeatureImage, ModelType, PredictionVector, RespResult};

/// Единый движок классификации, абстрагирующий конкретный бэкенд.
///
/// Под капотом хранит `Box<dyn Classifier>` и делегирует вызовы.
pub struct RespEngine {
    /// Внутренняя модель.
    inner: Box<dyn Classifier>,
}

impl RespEngine {
    /// Загрузить модель по типу и пути к директории.
    ///
    /// # Аргументы
    /// * `model_type` — тип модели (Onnx, RespNet).
    /// * `model_dir` — путь к директории с файлами модели.
    /// * `device` — устройство (CPU, Metal, CUDA); ONNX-бэкенд его игнорирует.
    ///
    /// # Ошибки
    /// Возвращает ошибку, если:
    /// - Тип модели не скомпилирован (feature gate отключен).
    /// - Файлы модели не найдены или повреждены.
    pub fn load(
        model_type: ModelType,
        model_dir: impl AsRef<Path>,
        device: &Device,
    ) -> RespResult<Self> {
        let model_dir = model_dir.as_ref();
        info!("RespEngine: загрузка модели {} из {:?}", model_type, model_dir);

        let inner: Box<dyn Classifier> = match model_type {
            #[cfg(feature = "onnx")]
            ModelType::Onnx => {
                let _ = device;
                Box::new(model_onnx::OnnxClassifier::load(model_dir)?)
            }

            #[cfg(not(feature = "onnx"))]
            ModelType::Onnx => {
                return Err(resp_core::RespError::Model(
                    "ONNX-бэкенд не скомпилирован. Включите feature 'onnx' в resp-engine.".into(),
                ));
            }

            #[cfg(feature = "respnet")]
            ModelType::RespNet => {
                Box::new(model_respnet::RespNetModel::load(model_dir, device)?)
            }

            #[cfg(not(feature = "respnet"))]
            ModelType::RespNet => {
                return Err(resp_core::RespError::Model(
                    "RespNet не скомпилирован. Включите feature 'respnet' в resp-engine.".into(),
                ));
            }
        };

        info!("RespEngine: модель '{}' загружена", inner.name());
        Ok(Self { inner })
    }

    /// Создать движок из уже загруженной модели.
    pub fn from_classifier(model: Box<dyn Classifier>) -> Self {
        Self { inner: model }
    }

    // -----------------------------------------------------------------------
    // Делегация Classifier
    // -----------------------------------------------------------------------

    /// Имя загруженного бэкенда.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Тип модели.
    pub fn model_type(&self) -> ModelType {
        self.inner.model_type()
    }

    /// Ожидаемая форма входа (высота, ширина, каналы).
    pub fn input_shape(&self) -> (usize, usize, usize) {
        self.inner.input_shape()
    }

    /// Классификация изображения признаков.
    pub fn classify(&mut self, image: &FeatureImage) -> RespResult<PredictionVector> {
        self.inner.classify(image)
    }

    /// Список скомпилированных бэкендов.
    pub fn available_models() -> Vec<ModelType> {
        let mut models = Vec::new();

        #[cfg(feature = "onnx")]
        models.push(ModelType::Onnx);

        #[cfg(feature = "respnet")]
        models.push(ModelType::RespNet);

        models
    }
}
