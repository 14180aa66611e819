//! Конфигурационные структуры для пайплайна анализа дыхания.

use serde::{Deserialize, Serialize};

/// Конфигурация извлечения признаков (mel-спектрограмма + оценка качества).
///
/// Значения по умолчанию воспроизводят пайплайн, на котором обучалась
/// модель: 128 mel-бинов, изображение 128×128, librosa-совместимый STFT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Сторона итогового квадратного изображения признаков.
    pub img_size: usize,

    /// Количество mel-бинов.
    pub n_mels: usize,

    /// Размер окна FFT.
    pub n_fft: usize,

    /// Шаг между фреймами.
    pub hop_length: usize,

    /// Минимальная частота mel-фильтра.
    pub f_min: f32,

    /// Максимальная частота mel-фильтра. `None` — половина частоты
    /// дискретизации входного файла.
    pub f_max: Option<f32>,

    /// Порог динамического диапазона при переводе мощности в децибелы.
    pub top_db: f32,

    /// Размер медианного фильтра для HPSS-разложения.
    pub hpss_kernel: usize,

    /// Степень мягкой маски HPSS.
    pub hpss_power: f32,

    /// Калибровочный потолок HNR/SNR в децибелах для процентов
    /// clarity/background_noise.
    ///
    /// Значение 30 взято из обучающего пайплайна как «типичный потолок
    /// хорошей записи»; эмпирического обоснования у него нет, это
    /// настраиваемая константа, которую нельзя переосмысливать молча.
    pub quality_ceiling_db: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            img_size: 128,
            n_mels: 128,
            n_fft: 2048,
            hop_length: 512,
            f_min: 0.0,
            f_max: None,
            top_db: 80.0,
            hpss_kernel: 31,
            hpss_power: 2.0,
            quality_ceiling_db: 30.0,
        }
    }
}

impl FeatureConfig {
    /// Количество значений в итоговом изображении признаков (H×W×1).
    pub fn image_len(&self) -> usize {
        self.img_size * self.img_size
    }
}

/// Конфигурация HTTP-сервера.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Адрес для bind.
    pub host: String,

    /// Порт. Переопределяется переменной окружения `PORT`.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4567,
        }
    }
}
