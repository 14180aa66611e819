//! Short-time Fourier transform, прямой и обратный.
//!
//! Совместимость с librosa: `center=True`, паддинг по n_fft/2 отражением,
//! periodic Hann-окно, (len // hop) + 1 фреймов.

use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;

/// Create Hann window (periodic for STFT).
pub fn hann_window(length: usize) -> Vec<f32> {
    (0..length)
        .map(|n| 0.5 * (1.0 - (2.0 * PI * n as f32 / length as f32).cos()))
        .collect()
}

/// Комплексный STFT. Возвращает фреймы [num_frames][n_fft/2 + 1]
/// (только неотрицательные частоты).
pub fn stft(samples: &[f32], n_fft: usize, hop_length: usize, window: &[f32]) -> Vec<Vec<Complex<f32>>> {
    let num_frames = samples.len() / hop_length + 1;
    let pad = (n_fft / 2) as isize;

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);

    let n = samples.len() as isize;
    let mut frames = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        // center=True: окно центрируется на позиции frame_idx * hop_length.
        let start = frame_idx as isize * hop_length as isize - pad;

        let mut buffer: Vec<Complex<f32>> = (0..n_fft)
            .map(|i| {
                // pad_mode="reflect": значения за границами сигнала берутся
                // отражением; на сверх-краях коротких сигналов — 0.
                let mut idx = start + i as isize;
                if idx < 0 {
                    idx = -idx;
                }
                if idx >= n && n > 1 {
                    idx = 2 * n - idx - 2;
                }
                let sample = if idx >= 0 && idx < n {
                    samples[idx as usize] * window[i]
                } else {
                    0.0
                };
                Complex::new(sample, 0.0)
            })
            .collect();

        fft.process(&mut buffer);
        buffer.truncate(n_fft / 2 + 1);
        frames.push(buffer);
    }

    frames
}

/// Обратный STFT: перекрывающееся сложение с оконной нормализацией.
///
/// `frames` — спектры неотрицательных частот (n_fft/2 + 1); отрицательные
/// восстанавливаются эрмитовой симметрией. Результат обрезается до
/// `out_len` с учётом центрального паддинга n_fft/2.
pub fn istft(
    frames: &[Vec<Complex<f32>>],
    n_fft: usize,
    hop_length: usize,
    window: &[f32],
    out_len: usize,
) -> Vec<f32> {
    if frames.is_empty() {
        return vec![0.0; out_len];
    }

    let mut planner = FftPlanner::<f32>::new();
    let ifft = planner.plan_fft_inverse(n_fft);

    let padded_len = (frames.len() - 1) * hop_length + n_fft;
    let mut signal = vec![0.0f32; padded_len];
    let mut win_sum = vec![0.0f32; padded_len];

    let mut buffer = vec![Complex::new(0.0f32, 0.0f32); n_fft];

    for (frame_idx, spectrum) in frames.iter().enumerate() {
        let half = n_fft / 2 + 1;
        for k in 0..half {
            buffer[k] = spectrum[k];
        }
        for k in half..n_fft {
            buffer[k] = spectrum[n_fft - k].conj();
        }

        ifft.process(&mut buffer);

        let offset = frame_idx * hop_length;
        for i in 0..n_fft {
            // rustfft не нормализует inverse, делим на n_fft.
            let v = buffer[i].re / n_fft as f32;
            signal[offset + i] += v * window[i];
            win_sum[offset + i] += window[i] * window[i];
        }
    }

    // Убираем центральный паддинг и нормализуем на сумму квадратов окна.
    let pad = n_fft / 2;
    let mut out = vec![0.0f32; out_len];
    for i in 0..out_len {
        let j = i + pad;
        if j < padded_len && win_sum[j] > 1e-8 {
            out[i] = signal[j] / win_sum[j];
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let window = hann_window(400);
        assert_eq!(window.len(), 400);
        assert!(window[0].abs() < 1e-6); // starts at 0
        assert!((window[200] - 1.0).abs() < 0.01); // peak near center
    }

    #[test]
    fn test_stft_frame_count() {
        let samples = vec![0.1f32; 4096];
        let window = hann_window(1024);
        let frames = stft(&samples, 1024, 256, &window);
        assert_eq!(frames.len(), 4096 / 256 + 1);
        assert_eq!(frames[0].len(), 1024 / 2 + 1);
    }

    #[test]
    fn test_stft_istft_roundtrip() {
        // Синус восстанавливается почти без искажений.
        let sr = 8000.0;
        let samples: Vec<f32> = (0..8000)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / sr).sin() * 0.5)
            .collect();

        let n_fft = 1024;
        let hop = 256;
        let window = hann_window(n_fft);
        let frames = stft(&samples, n_fft, hop, &window);
        let rec = istft(&frames, n_fft, hop, &window, samples.len());

        assert_eq!(rec.len(), samples.len());
        // Края страдают от оконной нормализации, проверяем середину.
        let mut max_err = 0.0f32;
        for i in n_fft..samples.len() - n_fft {
            max_err = max_err.max((rec[i] - samples[i]).abs());
        }
        assert!(max_err < 1e-3, "max reconstruction error {}", max_err);
    }
}
