//! Утилиты для поиска файлов модели (safetensors/onnx) на диске.

use std::path::{Path, PathBuf};

use crate::{RespError, RespResult};

/// Найти файл весов safetensors в директории модели.
///
/// Сначала пробуем каноничное `model.safetensors`, затем первый
/// `model*.safetensors` в директории.
pub fn resolve_safetensors_file(model_dir: impl AsRef<Path>) -> RespResult<PathBuf> {
    let model_dir = model_dir.as_ref();

    let single = model_dir.join("model.safetensors");
    if single.exists() {
        return Ok(single);
    }

    for entry in std::fs::read_dir(model_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "safetensors")
            && path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with("model"))
        {
            return Ok(path);
        }
    }

    Err(RespError::Model(format!(
        "В директории модели не найден model.safetensors: {}",
        model_dir.display()
    )))
}

/// Найти ONNX-граф в директории модели (`model.onnx`, иначе первый `*.onnx`).
pub fn resolve_onnx_file(model_dir: impl AsRef<Path>) -> RespResult<PathBuf> {
    let model_dir = model_dir.as_ref();

    let single = model_dir.join("model.onnx");
    if single.exists() {
        return Ok(single);
    }

    for entry in std::fs::read_dir(model_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "onnx") {
            return Ok(path);
        }
    }

    Err(RespError::Model(format!(
        "В директории модели не найден *.onnx: {}",
        model_dir.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dir_is_io_error() {
        let err = resolve_onnx_file("/nonexistent/model/dir").unwrap_err();
        assert!(matches!(err, RespError::Io(_)));
    }
}
