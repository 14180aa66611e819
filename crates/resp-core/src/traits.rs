//! Унифицированный trait для бэкендов классификатора.
//!
//! Оба бэкенда (ONNX-интерпретатор и candle-CNN) реализуют
//! [`Classifier`], обеспечивая единый интерфейс для загрузки и инференса.

use crate::error::RespResult;
use crate::model_registry::ModelType;
use crate::types::{FeatureImage, PredictionVector};

/// Унифицированный trait для бэкендов классификатора.
///
/// # Пример
/// ```ignore
/// let mut model = OnnxClassifier::load("models/respnet-onnx")?;
/// let scores = model.classify(&image)?;
/// println!("{:?}", scores.argmax());
/// ```
pub trait Classifier: Send {
    /// Имя загруженной модели (например, "respnet-onnx").
    fn name(&self) -> &str;

    /// Тип модели для реестра.
    fn model_type(&self) -> ModelType;

    /// Ожидаемая форма входа (height, width, channels).
    fn input_shape(&self) -> (usize, usize, usize) {
        (128, 128, 1)
    }

    /// Классификация изображения признаков.
    ///
    /// # Аргументы
    /// * `image` — нормализованное изображение формы [`Self::input_shape()`].
    ///
    /// # Ошибки
    /// Несовпадение формы, которое бэкенд не может согласовать, — фатальная
    /// ошибка запроса (`RespError::Inference`), без повторов.
    ///
    /// Принимает `&mut self`: ONNX-сессия мутирует внутреннее состояние при
    /// прогоне, поэтому конкурентный доступ требует внешней сериализации.
    fn classify(&mut self, image: &FeatureImage) -> RespResult<PredictionVector>;
}
