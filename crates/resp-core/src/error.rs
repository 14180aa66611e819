//! Error types for RustResp.
//!
//! Единый enum на все крейты workspace. Жёсткое правило пайплайна:
//! ошибки декодирования и извлечения признаков до HTTP-слоя не доходят
//! (они схлопываются в деградировавшие признаки), наружу пробиваются
//! только ошибки загрузки модели и инференса.

use thiserror::Error;

/// Main error type for analysis operations.
#[derive(Error, Debug)]
pub enum RespError {
    /// Decoding or feature-extraction failure. Recoverable: callers above
    /// the feature layer convert this into degenerate features.
    #[error("audio processing failed: {0}")]
    Audio(String),

    /// Model files missing, corrupt, or shape-incompatible at load time.
    #[error("model load failed: {0}")]
    Model(String),

    /// Backend inference failure, including runtime shape mismatches.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Invalid configuration.
    #[error("bad configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("tensor operation failed: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for analysis operations.
pub type RespResult<T> = Result<T, RespError>;

impl RespError {
    /// `true` для ошибок, которые пайплайн гасит деградацией признаков.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Audio(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_errors_are_recoverable() {
        assert!(RespError::Audio("bad wav".into()).is_recoverable());
        assert!(!RespError::Inference("shape".into()).is_recoverable());
        assert!(!RespError::Model("missing".into()).is_recoverable());
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: RespError = io.into();
        assert!(matches!(err, RespError::Io(_)));
    }
}
