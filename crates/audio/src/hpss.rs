//! Harmonic-percussive source separation.
//!
//! Семантика librosa.effects.hpss: медианная фильтрация магнитудной
//! спектрограммы вдоль времени (гармоника) и вдоль частоты (перкуссия),
//! мягкие маски степени 2, обратный STFT гармонической части.
//!
//! Окна медианного фильтра на краях матрицы обрезаются (scipy использует
//! отражение; разница затрагивает только крайние kernel/2 фреймов и бинов).

use rustfft::num_complex::Complex;

use resp_core::{FeatureConfig, RespResult};

use crate::stft::{hann_window, istft, stft};

/// Выделить гармоническую составляющую сигнала.
///
/// Возвращает волну той же длины, что и вход; шумовая составляющая
/// вычисляется вызывающей стороной как `y - harmonic`.
pub fn harmonic_component(samples: &[f32], config: &FeatureConfig) -> RespResult<Vec<f32>> {
    let n_fft = config.n_fft;
    let hop = config.hop_length;
    let window = hann_window(n_fft);

    let frames = stft(samples, n_fft, hop, &window);
    let num_frames = frames.len();
    let n_freqs = n_fft / 2 + 1;

    // Магнитуды freq-major: [n_freqs][num_frames] — так медиана по времени
    // идёт по непрерывной строке.
    let mut mag = vec![vec![0.0f32; num_frames]; n_freqs];
    for (t, frame) in frames.iter().enumerate() {
        for (f, c) in frame.iter().enumerate() {
            mag[f][t] = c.norm();
        }
    }

    let half = config.hpss_kernel / 2;

    // Гармоническая оценка: медиана вдоль времени для каждого бина.
    let mut harm = vec![vec![0.0f32; num_frames]; n_freqs];
    let mut scratch: Vec<f32> = Vec::with_capacity(config.hpss_kernel);
    for f in 0..n_freqs {
        for t in 0..num_frames {
            let lo = t.saturating_sub(half);
            let hi = (t + half).min(num_frames - 1);
            scratch.clear();
            scratch.extend_from_slice(&mag[f][lo..=hi]);
            harm[f][t] = median(&mut scratch);
        }
    }

    // Перкуссивная оценка: медиана вдоль частоты для каждого фрейма.
    let mut perc = vec![vec![0.0f32; num_frames]; n_freqs];
    for t in 0..num_frames {
        for f in 0..n_freqs {
            let lo = f.saturating_sub(half);
            let hi = (f + half).min(n_freqs - 1);
            scratch.clear();
            for row in mag.iter().take(hi + 1).skip(lo) {
                scratch.push(row[t]);
            }
            perc[f][t] = median(&mut scratch);
        }
    }

    // Мягкая маска гармоники и применение к комплексному спектру.
    let p = config.hpss_power;
    let mut masked = frames;
    for (t, frame) in masked.iter_mut().enumerate() {
        for (f, c) in frame.iter_mut().enumerate() {
            let h = harm[f][t].powf(p);
            let pr = perc[f][t].powf(p);
            let denom = h + pr;
            let mask = if denom > 1e-20 { h / denom } else { 0.5 };
            *c = Complex::new(c.re * mask, c.im * mask);
        }
    }

    Ok(istft(&masked, n_fft, hop, &window, samples.len()))
}

/// Медиана среза (портит порядок элементов).
fn median(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mid = values.len() / 2;
    let (_, m, _) = values.select_nth_unstable_by(mid, |a, b| {
        a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
    });
    let upper = *m;
    if values.len() % 2 == 1 {
        upper
    } else {
        // Чётное окно: среднее двух центральных.
        let lower = values[..mid]
            .iter()
            .cloned()
            .fold(f32::NEG_INFINITY, f32::max);
        (lower + upper) / 2.0
    }
}
