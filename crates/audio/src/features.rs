//! Полный пайплайн извлечения признаков.
//!
//! `extract(raw bytes) -> (FeatureImage, QualityScore) | Degenerate`:
//! декодирование → log-mel спектрограмма → билинейный ресайз 128×128 →
//! min-max нормализация, плюс HPSS-оценка качества. Любой сбой на любом
//! шаге превращается в помеченный деградировавший вариант, а не в ошибку:
//! сервис всегда отвечает каким-то результатом.

use tracing::{debug, warn};

use resp_core::{ExtractedFeatures, FeatureConfig, RespResult};

use crate::{decode, hpss, mel, quality, resize};

/// Извлечь признаки из сырых байтов аудиофайла.
///
/// Никогда не возвращает ошибку: все сбои декодирования/обработки дают
/// [`ExtractedFeatures::Degenerate`] (нулевое изображение, clarity=0,
/// background_noise=100).
pub fn extract_features(bytes: &[u8], config: &FeatureConfig) -> ExtractedFeatures {
    match try_extract(bytes, config) {
        Ok(features) => features,
        Err(e) => {
            warn!("Feature extraction failed, using degenerate fallback: {}", e);
            ExtractedFeatures::Degenerate
        }
    }
}

fn try_extract(bytes: &[u8], config: &FeatureConfig) -> RespResult<ExtractedFeatures> {
    let clip = decode::decode_bytes(bytes)?;
    debug!(
        "Decoded clip: {:.2}s at {} Hz ({} ch source)",
        clip.duration(),
        clip.sample_rate,
        clip.source_channels
    );

    let mel_db = mel::log_mel_spectrogram(&clip, config)?;
    let resized = resize::bilinear_resize(&mel_db, config.img_size, config.img_size);

    let image = match resize::min_max_normalize(resized, config.img_size) {
        Some(image) => image,
        None => {
            // Константная спектрограмма: min-max деление вырождается.
            warn!("Constant spectrogram, using degenerate fallback");
            return Ok(ExtractedFeatures::Degenerate);
        }
    };

    let harmonic = hpss::harmonic_component(&clip.samples, config)?;
    let quality = match quality::estimate(&clip.samples, &harmonic, config) {
        Some(q) => q,
        None => {
            warn!("Indeterminate HNR/SNR (silent clip), using degenerate fallback");
            return Ok(ExtractedFeatures::Degenerate);
        }
    };

    debug!(
        "Features extracted: clarity={:.1}%, background_noise={:.1}%",
        quality.clarity, quality.background_noise
    );

    Ok(ExtractedFeatures::Clean { image, quality })
}
