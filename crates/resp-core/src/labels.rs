//! Таблица классов респираторных заболеваний.
//!
//! Индексы жёстко привязаны к выходному слою обученной модели и
//! никогда не меняются в рантайме.

/// Метки классов, индекс = позиция в векторе предсказаний модели.
pub const DISEASE_LABELS: [&str; 8] = [
    "URTI",
    "Healthy",
    "Asthma",
    "COPD",
    "LRTI",
    "Bronchiectasis",
    "Pneumonia",
    "Bronchiolitis",
];

/// Количество классов (ширина вектора предсказаний).
pub const NUM_CLASSES: usize = DISEASE_LABELS.len();
