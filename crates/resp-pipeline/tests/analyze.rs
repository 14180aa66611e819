//! Integration tests for the analysis pipeline.

use std::io::Cursor;
use std::path::PathBuf;

use resp_core::{
    Classifier, FeatureImage, ModelType, PredictionVector, RespResult, NUM_CLASSES,
};
use resp_engine::RespEngine;
use resp_pipeline::{RespPipeline, RiskLevel};

/// Заглушка: возвращает фиксированный вектор, проверяя вход.
struct StubClassifier {
    scores: Vec<f32>,
}

impl StubClassifier {
    fn returning(scores: [f32; NUM_CLASSES]) -> Self {
        Self {
            scores: scores.to_vec(),
        }
    }
}

impl Classifier for StubClassifier {
    fn name(&self) -> &str {
        "stub"
    }

    fn model_type(&self) -> ModelType {
        ModelType::RespNet
    }

    fn classify(&mut self, image: &FeatureImage) -> RespResult<PredictionVector> {
        assert_eq!(image.shape(), (128, 128, 1));
        assert!(image.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
        Ok(PredictionVector::new(self.scores.clone()).unwrap())
    }
}

fn wav_bytes(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer
                .write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn noisy_tone(seconds: f32, sr: u32) -> Vec<f32> {
    (0..(seconds * sr as f32) as usize)
        .map(|i| {
            let t = i as f32 / sr as f32;
            (2.0 * std::f32::consts::PI * 220.0 * t).sin() * 0.5 + (t * 7919.0).sin() * 0.03
        })
        .collect()
}

#[test]
fn test_analyze_valid_wav_produces_report() {
    let stub = StubClassifier::returning([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.92, 0.08]);
    let mut pipeline = RespPipeline::new(RespEngine::from_classifier(Box::new(stub)));

    let bytes = wav_bytes(&noisy_tone(2.0, 22050), 22050);
    let report = pipeline.analyze_bytes(&bytes).unwrap();

    assert_eq!(report.prediction.disease, "Pneumonia");
    assert_eq!(report.prediction.confidence, 92.0);
    assert_eq!(report.prediction.risk_level, RiskLevel::High);
    assert!(report.audio_quality.clarity > 0.0);
    assert!(report.audio_quality.background_noise <= 100.0);
    assert!(report.recommendation.contains("pneumonia"));
}

#[test]
fn test_analyze_corrupt_bytes_still_answers() {
    // Битый файл — не ошибка: нулевое изображение идёт в модель,
    // качество деградирует до clarity=0 / background_noise=100.
    let stub = StubClassifier::returning([0.0, 0.85, 0.0, 0.0, 0.0, 0.0, 0.0, 0.15]);
    let mut pipeline = RespPipeline::new(RespEngine::from_classifier(Box::new(stub)));

    let report = pipeline.analyze_bytes(b"not audio at all").unwrap();

    assert_eq!(report.prediction.disease, "Healthy");
    assert_eq!(report.prediction.risk_level, RiskLevel::Low);
    assert_eq!(report.audio_quality.clarity, 0.0);
    assert_eq!(report.audio_quality.background_noise, 100.0);
}

#[test]
fn test_classifier_receives_normalized_image() {
    // StubClassifier проверяет внутри classify, что вход 128×128×1 в [0, 1].
    let stub = StubClassifier::returning([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let mut pipeline = RespPipeline::new(RespEngine::from_classifier(Box::new(stub)));

    let bytes = wav_bytes(&noisy_tone(1.5, 16000), 16000);
    let a = pipeline.analyze_bytes(&bytes).unwrap();
    let b = pipeline.analyze_bytes(&bytes).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

fn get_model_path() -> Option<PathBuf> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.join("models").join("respiratory"))?;

    if path.join("model.safetensors").exists() {
        Some(path)
    } else {
        None
    }
}

#[test]
fn test_pipeline_with_real_model() {
    let model_path = match get_model_path() {
        Some(p) => p,
        None => {
            eprintln!("⚠️  Skipping test: model not found");
            return;
        }
    };

    let engine = RespEngine::load(ModelType::RespNet, &model_path, &candle_core::Device::Cpu)
        .expect("Failed to load model");
    let mut pipeline = RespPipeline::new(engine);

    let bytes = wav_bytes(&noisy_tone(3.0, 22050), 22050);
    let report = pipeline.analyze_bytes(&bytes).expect("analysis failed");

    assert!(resp_core::DISEASE_LABELS.contains(&report.prediction.disease.as_str()));
    assert!((0.0..=100.0).contains(&report.prediction.confidence));

    // Повторный прогон того же файла детерминирован.
    let again = pipeline.analyze_bytes(&bytes).expect("analysis failed");
    assert_eq!(report.prediction.disease, again.prediction.disease);
    assert_eq!(report.prediction.confidence, again.prediction.confidence);
}
