//! Реестр поддерживаемых бэкендов классификатора.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Тип бэкенда модели.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    /// ONNX Runtime: фиксированный граф с согласованием формы входного
    /// тензора (interpreter-style).
    Onnx,
    /// RespNet на candle: safetensors-веса, фиксированный вход
    /// (1, 128, 128, 1) (estimator-style).
    RespNet,
}

impl ModelType {
    /// Все поддерживаемые типы моделей.
    pub fn all() -> &'static [ModelType] {
        &[ModelType::Onnx, ModelType::RespNet]
    }

    /// Строковый идентификатор для CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Onnx => "onnx",
            ModelType::RespNet => "respnet",
        }
    }

    /// Человекочитаемое название.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelType::Onnx => "RespNet (ONNX Runtime)",
            ModelType::RespNet => "RespNet (candle)",
        }
    }

    /// Бэкенд инференса.
    pub fn backend(&self) -> &'static str {
        match self {
            ModelType::Onnx => "ort",
            ModelType::RespNet => "candle",
        }
    }

    /// Парсинг из строки (CLI-совместимо).
    pub fn from_str_loose(s: &str) -> Option<ModelType> {
        match s.to_lowercase().as_str() {
            "onnx" | "ort" | "tflite" => Some(ModelType::Onnx),
            "respnet" | "candle" | "cnn" => Some(ModelType::RespNet),
            _ => None,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
