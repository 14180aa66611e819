//! RespNetModel — CNN-классификатор 128×128×1 спектрограмм.
//!
//! Архитектура фиксирована под вход (1, 128, 128, 1):
//! 4× [conv 3×3, ReLU, max-pool 2×2] с каналами 16→32→64→128,
//! затем flatten (8·8·128 = 8192) → fc1 (128, ReLU) → fc2 (8).

use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, Module, VarBuilder};
use tracing::{debug, info};

use resp_core::{
    model_files, Classifier, FeatureImage, ModelType, PredictionVector, RespError, RespResult,
    NUM_CLASSES,
};

/// Размерность flatten-слоя: 128 каналов на карте 8×8 после четырёх пулов.
const FLATTEN_DIM: usize = 8 * 8 * 128;

/// CNN-классификатор респираторных звуков.
pub struct RespNetModel {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    conv4: Conv2d,
    fc1: Linear,
    fc2: Linear,
    device: Device,
    #[allow(dead_code)]
    model_dir: PathBuf,
}

impl RespNetModel {
    /// Загрузить модель из директории с model.safetensors.
    pub fn load(model_dir: impl AsRef<Path>, device: &Device) -> RespResult<Self> {
        let model_dir = model_dir.as_ref().to_path_buf();
        let weights_path = model_files::resolve_safetensors_file(&model_dir)?;
        info!("RespNet: загрузка весов из {:?}", weights_path);

        let start = Instant::now();
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)?
        };

        let conv_cfg = Conv2dConfig {
            padding: 1,
            ..Default::default()
        };

        let conv1 = conv2d(1, 16, 3, conv_cfg, vb.pp("conv1"))?;
        let conv2 = conv2d(16, 32, 3, conv_cfg, vb.pp("conv2"))?;
        let conv3 = conv2d(32, 64, 3, conv_cfg, vb.pp("conv3"))?;
        let conv4 = conv2d(64, 128, 3, conv_cfg, vb.pp("conv4"))?;
        let fc1 = linear(FLATTEN_DIM, 128, vb.pp("fc1"))?;
        let fc2 = linear(128, NUM_CLASSES, vb.pp("fc2"))?;

        info!(
            "RespNet: модель загружена за {:.2}с",
            start.elapsed().as_secs_f64()
        );

        Ok(Self {
            conv1,
            conv2,
            conv3,
            conv4,
            fc1,
            fc2,
            device: device.clone(),
            model_dir,
        })
    }

    /// Прямой проход: (1, 1, 128, 128) NCHW → (1, NUM_CLASSES).
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        let x = self.conv1.forward(x)?.relu()?.max_pool2d(2)?;
        let x = self.conv2.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = self.conv3.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = self.conv4.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = x.flatten_from(1)?;
        let x = self.fc1.forward(&x)?.relu()?;
        self.fc2.forward(&x)
    }
}

impl Classifier for RespNetModel {
    fn name(&self) -> &str {
        "respnet"
    }

    fn model_type(&self) -> ModelType {
        ModelType::RespNet
    }

    fn classify(&mut self, image: &FeatureImage) -> RespResult<PredictionVector> {
        let (h, w, c) = image.shape();
        let start = Instant::now();

        // NHWC вход, как у экспортированной модели, переставляем в NCHW.
        let input = Tensor::from_slice(image.as_slice(), (1, h, w, c), &self.device)?
            .permute((0, 3, 1, 2))?;

        let logits = self.forward(&input)?;
        let scores: Vec<f32> = logits.squeeze(0)?.to_vec1()?;

        debug!(
            "RespNet: инференс за {:.1}мс",
            start.elapsed().as_secs_f64() * 1000.0
        );

        PredictionVector::new(scores)
            .ok_or_else(|| RespError::Inference("prediction vector width mismatch".to_string()))
    }
}
