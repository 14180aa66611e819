//! Эвристики качества записи: clarity и background_noise.
//!
//! HNR = 10·log10(Σh²/Σn²), SNR = 10·log10(Σy²/Σn²), где n = y − harmonic.
//! Проценты получаются делением на фиксированный калибровочный потолок
//! (30 дБ, см. [`FeatureConfig::quality_ceiling_db`]) с ограничением
//! в [0, 100].

use resp_core::{FeatureConfig, QualityScore};

/// Оценить качество записи по гармоническому разложению.
///
/// Возвращает `None` только при NaN (тишина: 0/0) — вызывающая сторона
/// трактует это как деградацию экстракции. Бесконечные отношения
/// корректно ограничиваются: идеально чистый сигнал (нулевой шумовой
/// остаток) даёт clarity=100, нулевая гармоника при ненулевом шуме — 0.
pub fn estimate(
    samples: &[f32],
    harmonic: &[f32],
    config: &FeatureConfig,
) -> Option<QualityScore> {
    let mut signal_energy = 0.0f64;
    let mut harmonic_energy = 0.0f64;
    let mut noise_energy = 0.0f64;

    for (&y, &h) in samples.iter().zip(harmonic.iter()) {
        let n = (y - h) as f64;
        signal_energy += (y as f64) * (y as f64);
        harmonic_energy += (h as f64) * (h as f64);
        noise_energy += n * n;
    }

    let hnr = 10.0 * (harmonic_energy / noise_energy).log10();
    let snr = 10.0 * (signal_energy / noise_energy).log10();

    if hnr.is_nan() || snr.is_nan() {
        return None;
    }

    // ±inf проходят дальше: clamp в QualityScore срезает их в 100 и 0,
    // как min(max(x, 0), 100).
    let ceiling = config.quality_ceiling_db as f64;
    let clarity = (hnr / ceiling) * 100.0;
    let background_noise = (snr / ceiling) * 100.0;

    Some(QualityScore::clamped(clarity as f32, background_noise as f32))
}
