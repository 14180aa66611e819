//! ONNX Runtime backend for respiratory sound classification.
//!
//! Оборачивает ort-сессию в реализацию [`resp_core::Classifier`].
//! Подходит для моделей, экспортированных из TensorFlow/Keras в ONNX
//! (интерпретаторный стиль: форма входа согласуется с самой моделью).

pub mod model;

pub use model::OnnxClassifier;
