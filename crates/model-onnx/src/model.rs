//! Классификатор на базе ONNX Runtime.

use std::path::Path;

use ndarray::Array4;
use ort::session::Session;
use ort::value::{Tensor, ValueType};
use tracing::{debug, info};

use resp_core::{
    model_files, Classifier, FeatureImage, ModelType, PredictionVector, RespError, RespResult,
    NUM_CLASSES,
};

/// Классификатор респираторных звуков поверх ONNX Runtime.
///
/// `run()` требует `&mut self`, поэтому для разделяемого доступа модель
/// оборачивается в `Mutex` на уровне сервера.
pub struct OnnxClassifier {
    session: Session,
    input_name: String,
}

impl OnnxClassifier {
    /// Загрузить модель из каталога (model.onnx или единственный *.onnx).
    pub fn load(model_dir: &Path) -> RespResult<Self> {
        let model_path = model_files::resolve_onnx_file(model_dir)?;
        info!("Loading ONNX model from {:?}", model_path);

        let session = Session::builder()
            .and_then(|b| Ok(b.with_intra_threads(1)?))
            .and_then(|mut b| b.commit_from_file(&model_path))
            .map_err(|e| RespError::Model(format!("ONNX session init failed: {e}")))?;

        let input = session
            .inputs()
            .first()
            .ok_or_else(|| RespError::Model("ONNX model declares no inputs".to_string()))?;
        let input_name = input.name().to_string();

        // Согласование формы: динамические оси (-1) принимаем, фиксированные
        // обязаны совпасть с (1, 128, 128, 1).
        if let ValueType::Tensor { ref shape, .. } = *input.dtype() {
            let expected: [i64; 4] = [1, 128, 128, 1];
            let dims: Vec<i64> = shape.iter().copied().collect();
            if dims.len() != expected.len() {
                return Err(RespError::Model(format!(
                    "ONNX model expects rank-{} input, need rank-4 (1, 128, 128, 1)",
                    dims.len()
                )));
            }
            for (&actual, &want) in dims.iter().zip(expected.iter()) {
                if actual >= 0 && actual != want {
                    return Err(RespError::Model(format!(
                        "ONNX input shape mismatch: model declares {:?}, need (1, 128, 128, 1)",
                        dims
                    )));
                }
            }
        }

        debug!("ONNX model ready, input tensor '{}'", input_name);
        Ok(Self {
            session,
            input_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn model_type(&self) -> ModelType {
        ModelType::Onnx
    }

    fn classify(&mut self, image: &FeatureImage) -> RespResult<PredictionVector> {
        let (h, w, c) = image.shape();
        let input = Array4::from_shape_vec((1, h, w, c), image.as_slice().to_vec())
            .map_err(|e| RespError::Inference(format!("input tensor shape error: {e}")))?;

        let tensor = Tensor::from_array(input)
            .map_err(|e| RespError::Inference(format!("input tensor creation error: {e}")))?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| RespError::Inference(format!("ONNX inference failed: {e}")))?;

        let (_, value) = outputs
            .iter()
            .next()
            .ok_or_else(|| RespError::Inference("ONNX model produced no output".to_string()))?;

        let (_shape, data) = value
            .try_extract_tensor::<f32>()
            .map_err(|e| RespError::Inference(format!("output extraction error: {e}")))?;

        if data.len() < NUM_CLASSES {
            return Err(RespError::Inference(format!(
                "ONNX output has {} values, expected at least {}",
                data.len(),
                NUM_CLASSES
            )));
        }

        // Берём первые NUM_CLASSES значений первой строки батча.
        PredictionVector::new(data[..NUM_CLASSES].to_vec())
            .ok_or_else(|| RespError::Inference("prediction vector width mismatch".to_string()))
    }
}
