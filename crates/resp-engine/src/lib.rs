//! # resp-engine
//!
//! Единый фасад для всех классификаторов в RustResp.
//!
//! `RespEngine` загружает любой поддерживаемый бэкенд через единый
//! интерфейс, не привязываясь к конкретной реализации.
//!
//! # Пример
//!
//! ```ignore
//! use resp_engine::RespEngine;
//! use resp_core::ModelType;
//!
//! let mut engine = RespEngine::load(
//!     ModelType::Onnx,
//!     "models/respiratory",
//!     &candle_core::Device::Cpu,
//! )?;
//!
//! let prediction = engine.classify(&image)?;
//! ```

mod engine;

pub use engine::RespEngine;
