//! # audio
//!
//! Audio processing module for RustResp.
//!
//! This crate handles:
//! - Decoding uploaded audio bytes (WAV fast path + symphonia probe)
//! - Log-power mel spectrogram extraction (128 mel bands)
//! - Harmonic-percussive source separation for quality heuristics
//! - Bilinear resize and min-max normalization to the 128×128×1 input

pub mod decode;
pub mod features;
pub mod hpss;
pub mod mel;
pub mod quality;
pub mod resize;
pub mod stft;

pub use decode::decode_bytes;
pub use features::extract_features;
