//! Общие типы для пайплайна анализа.
//!
//! Все сущности живут в пределах одного запроса; процесс-глобальны только
//! таблица классов ([`crate::labels::DISEASE_LABELS`]) и загруженная модель.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Аудио-буфер
// ---------------------------------------------------------------------------

/// Декодированная аудиозапись.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Моно-сэмплы, нормализованные к [-1.0, 1.0].
    pub samples: Vec<f32>,

    /// Нативная частота дискретизации файла в Гц (ресемплинга нет).
    pub sample_rate: u32,

    /// Количество каналов исходного файла (до сведения в моно).
    pub source_channels: usize,
}

impl AudioClip {
    /// Создать новый клип.
    pub fn new(samples: Vec<f32>, sample_rate: u32, source_channels: usize) -> Self {
        Self {
            samples,
            sample_rate,
            source_channels,
        }
    }

    /// Длительность в секундах.
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// Изображение признаков
// ---------------------------------------------------------------------------

/// Квадратное изображение признаков фиксированной формы (H×W×1).
///
/// Инвариант: после min-max нормализации значения лежат в [0, 1];
/// fallback-вариант [`FeatureImage::zeros`] состоит из нулей.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImage {
    data: Vec<f32>,
    size: usize,
}

impl FeatureImage {
    /// Создать изображение из row-major данных длины `size * size`.
    pub fn new(data: Vec<f32>, size: usize) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Нулевое изображение — fallback для деградировавшей экстракции.
    pub fn zeros(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Сторона изображения.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Форма тензора (height, width, channels).
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.size, self.size, 1)
    }

    /// Row-major данные.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Значение пикселя (row, col).
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.size + col]
    }
}

// ---------------------------------------------------------------------------
// Оценка качества записи
// ---------------------------------------------------------------------------

/// Пара эвристик качества записи, обе в процентах [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// Чистота записи (по HNR).
    pub clarity: f32,

    /// Уровень фонового шума (по SNR).
    pub background_noise: f32,
}

impl QualityScore {
    /// Создать оценку с принудительным ограничением в [0, 100].
    pub fn clamped(clarity: f32, background_noise: f32) -> Self {
        Self {
            clarity: clarity.clamp(0.0, 100.0),
            background_noise: background_noise.clamp(0.0, 100.0),
        }
    }

    /// «Худший случай»: clarity=0, background_noise=100.
    ///
    /// Возвращается при деградировавшей экстракции — вызывающая сторона
    /// по этой паре может отличить тихий сбой декодирования от честного
    /// результата.
    pub fn degraded() -> Self {
        Self {
            clarity: 0.0,
            background_noise: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Вектор предсказаний
// ---------------------------------------------------------------------------

/// Вектор из 8 оценок классов, индексно выровненный с
/// [`crate::labels::DISEASE_LABELS`].
///
/// Softmax-нормализация НЕ выполняется: оценки трактуются как произвольные
/// неотрицательные числа, класс выбирает argmax.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionVector(Vec<f32>);

impl PredictionVector {
    /// Обернуть вектор оценок. Возвращает `None`, если ширина не равна
    /// количеству классов.
    pub fn new(scores: Vec<f32>) -> Option<Self> {
        if scores.len() != crate::labels::NUM_CLASSES {
            return None;
        }
        Some(Self(scores))
    }

    /// Оценки по классам.
    pub fn scores(&self) -> &[f32] {
        &self.0
    }

    /// Индекс максимальной оценки; при равенстве побеждает меньший индекс.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &v) in self.0.iter().enumerate() {
            // Строгое сравнение сохраняет первое вхождение максимума.
            if v > self.0[best] {
                best = i;
            }
        }
        best
    }

    /// Максимальная оценка.
    pub fn max_score(&self) -> f32 {
        self.0[self.argmax()]
    }
}

// ---------------------------------------------------------------------------
// Результат извлечения признаков
// ---------------------------------------------------------------------------

/// Результат извлечения признаков: валидная пара или помеченный
/// деградировавший вариант.
///
/// Деградация (ошибка декодирования, константная спектрограмма,
/// нефинитные HNR/SNR) — это данные, а не исключение: классификация и
/// формирование ответа обрабатывают оба варианта одинаково.
#[derive(Debug, Clone)]
pub enum ExtractedFeatures {
    /// Успешная экстракция.
    Clean {
        /// Нормализованное изображение признаков.
        image: FeatureImage,
        /// Оценка качества записи.
        quality: QualityScore,
    },
    /// Fallback: нулевое изображение, clarity=0, background_noise=100.
    Degenerate,
}

impl ExtractedFeatures {
    /// Деградировала ли экстракция.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate)
    }

    /// Развернуть в пару (изображение, качество); деградировавший вариант
    /// подставляет нулевое изображение заданного размера и худшую оценку.
    pub fn into_parts(self, img_size: usize) -> (FeatureImage, QualityScore) {
        match self {
            Self::Clean { image, quality } => (image, quality),
            Self::Degenerate => (FeatureImage::zeros(img_size), QualityScore::degraded()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_image_shape() {
        let img = FeatureImage::zeros(128);
        assert_eq!(img.shape(), (128, 128, 1));
        assert_eq!(img.as_slice().len(), 128 * 128);
        assert!(img.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_feature_image_rejects_wrong_len() {
        assert!(FeatureImage::new(vec![0.0; 100], 128).is_none());
    }

    #[test]
    fn test_quality_clamped() {
        let q = QualityScore::clamped(123.0, -5.0);
        assert_eq!(q.clarity, 100.0);
        assert_eq!(q.background_noise, 0.0);
    }

    #[test]
    fn test_argmax_tie_break_lowest_index() {
        // Классы 2 и 5 имеют одинаковый максимум — побеждает индекс 2.
        let p =
            PredictionVector::new(vec![0.1, 0.2, 0.9, 0.3, 0.0, 0.9, 0.1, 0.0]).unwrap();
        assert_eq!(p.argmax(), 2);
        assert_eq!(p.max_score(), 0.9);
    }

    #[test]
    fn test_prediction_vector_width() {
        assert!(PredictionVector::new(vec![0.0; 7]).is_none());
        assert!(PredictionVector::new(vec![0.0; 8]).is_some());
    }

    #[test]
    fn test_degenerate_into_parts() {
        let (img, q) = ExtractedFeatures::Degenerate.into_parts(128);
        assert!(img.as_slice().iter().all(|&v| v == 0.0));
        assert_eq!(q, QualityScore::degraded());
    }
}
