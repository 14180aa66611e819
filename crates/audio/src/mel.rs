//! Mel-спектрограмма в log-мощности (дБ).
//!
//! Конфигурация совместима с librosa.feature.melspectrogram с параметрами
//! по умолчанию: Slaney-шкала, Slaney-нормализация, power=2,
//! `power_to_db(ref=np.max, top_db=80)`.

use rustfft::num_complex::Complex;

use resp_core::{AudioClip, FeatureConfig, RespError, RespResult};

use crate::stft::{hann_window, stft};

/// Log-power mel-спектрограмма, mel-major: [n_mels][num_frames].
///
/// Фильтрбанк строится на каждый вызов: частота дискретизации у каждого
/// файла своя (ресемплинга в пайплайне нет).
pub fn log_mel_spectrogram(clip: &AudioClip, config: &FeatureConfig) -> RespResult<Vec<Vec<f32>>> {
    if clip.samples.is_empty() {
        return Err(RespError::Audio("Empty waveform".to_string()));
    }
    if clip.sample_rate == 0 {
        return Err(RespError::Audio("Invalid sample rate".to_string()));
    }

    let sr = clip.sample_rate as f32;
    let f_max = config.f_max.unwrap_or(sr / 2.0);
    let filterbank = create_mel_filterbank(config.n_mels, config.n_fft, sr, config.f_min, f_max);

    let window = hann_window(config.n_fft);
    let frames = stft(&clip.samples, config.n_fft, config.hop_length, &window);

    let mel_power = apply_mel_filters(&frames, &filterbank);
    Ok(power_to_db(mel_power, config.top_db))
}

/// Применить mel-фильтрбанк к спектру мощности каждого фрейма.
/// Результат mel-major: [n_mels][num_frames].
fn apply_mel_filters(frames: &[Vec<Complex<f32>>], filterbank: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let num_frames = frames.len();
    let mut mel = vec![vec![0.0f32; num_frames]; filterbank.len()];

    for (t, frame) in frames.iter().enumerate() {
        for (m, filter) in filterbank.iter().enumerate() {
            let mut acc = 0.0f32;
            for (c, &w) in frame.iter().zip(filter.iter()) {
                // Спектр мощности: |X|^2.
                acc += (c.re * c.re + c.im * c.im) * w;
            }
            mel[m][t] = acc;
        }
    }

    mel
}

/// Перевод мощности в децибелы относительно максимума спектрограммы.
///
/// Самый громкий бин всегда 0 дБ; динамический диапазон ограничен
/// `-top_db`. Константная нулевая спектрограмма даёт константный ноль —
/// деградацию ловит min-max нормализация ниже по пайплайну.
fn power_to_db(mel: Vec<Vec<f32>>, top_db: f32) -> Vec<Vec<f32>> {
    const AMIN: f32 = 1e-10;

    let reference = mel
        .iter()
        .flat_map(|row| row.iter())
        .cloned()
        .fold(0.0f32, f32::max)
        .max(AMIN);
    let ref_db = 10.0 * reference.log10();

    let mut out = mel;
    for row in out.iter_mut() {
        for v in row.iter_mut() {
            *v = 10.0 * v.max(AMIN).log10() - ref_db;
        }
    }

    // top_db-порог: max(S_db) = 0 по построению.
    let floor = -top_db;
    for row in out.iter_mut() {
        for v in row.iter_mut() {
            *v = v.max(floor);
        }
    }

    out
}

/// Convert frequency to Slaney Mel scale.
/// Slaney uses linear below 1000 Hz, log above.
fn hz_to_mel(hz: f32) -> f32 {
    let f_min = 0.0;
    let f_sp = 200.0 / 3.0; // ~66.67 Hz
    let min_log_hz = 1000.0;
    let min_log_mel = (min_log_hz - f_min) / f_sp;
    let logstep = (6.4f32).ln() / 27.0;

    if hz >= min_log_hz {
        min_log_mel + ((hz / min_log_hz).ln() / logstep)
    } else {
        (hz - f_min) / f_sp
    }
}

/// Convert Slaney Mel scale to frequency.
fn mel_to_hz(mel: f32) -> f32 {
    let f_min = 0.0;
    let f_sp = 200.0 / 3.0;
    let min_log_hz = 1000.0;
    let min_log_mel = (min_log_hz - f_min) / f_sp;
    let logstep = (6.4f32).ln() / 27.0;

    if mel >= min_log_mel {
        min_log_hz * (logstep * (mel - min_log_mel)).exp()
    } else {
        f_min + f_sp * mel
    }
}

/// Create Slaney-normalized Mel filterbank (matches librosa).
fn create_mel_filterbank(
    n_mels: usize,
    n_fft: usize,
    sample_rate: f32,
    f_min: f32,
    f_max: f32,
) -> Vec<Vec<f32>> {
    let n_freqs = n_fft / 2 + 1;

    let fft_freqs: Vec<f32> = (0..n_freqs)
        .map(|i| i as f32 * sample_rate / n_fft as f32)
        .collect();

    let mel_min = hz_to_mel(f_min);
    let mel_max = hz_to_mel(f_max);

    let mel_points: Vec<f32> = (0..=n_mels + 1)
        .map(|i| mel_min + i as f32 * (mel_max - mel_min) / (n_mels + 1) as f32)
        .collect();

    let hz_points: Vec<f32> = mel_points.iter().map(|&m| mel_to_hz(m)).collect();

    let mut filterbank = vec![vec![0.0_f32; n_freqs]; n_mels];

    for m in 0..n_mels {
        let f_left = hz_points[m];
        let f_center = hz_points[m + 1];
        let f_right = hz_points[m + 2];

        // Slaney normalization: 2 / (f_right - f_left)
        let enorm = 2.0 / (f_right - f_left);

        for (k, &freq) in fft_freqs.iter().enumerate() {
            if freq >= f_left && freq < f_center {
                filterbank[m][k] = enorm * (freq - f_left) / (f_center - f_left);
            } else if freq >= f_center && freq <= f_right {
                filterbank[m][k] = enorm * (f_right - freq) / (f_right - f_center);
            }
        }
    }

    filterbank
}
