//! RespNet — свёрточный классификатор респираторных звуков на candle.
//!
//! Эталонная CNN: 4 свёрточных блока + 2 полносвязных слоя, веса в
//! safetensors. Реализует [`resp_core::Classifier`].

pub mod model;

pub use model::RespNetModel;
