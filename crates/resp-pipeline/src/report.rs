//! Итоговый отчёт анализа и правила его составления.
//!
//! Формат сериализации стабилен: его читают мобильный и веб-клиенты.

use serde::{Deserialize, Serialize};

use resp_core::{PredictionVector, QualityScore, DISEASE_LABELS};

/// Диагноз: метка класса, уверенность в процентах, уровень риска.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    pub disease: String,
    pub confidence: f32,
    pub risk_level: RiskLevel,
}

/// Оценка качества записи в процентах.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioQuality {
    pub clarity: f32,
    pub background_noise: f32,
}

/// Уровень риска. Сериализуется в нижнем регистре.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Полный отчёт анализа одного аудиофайла.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub prediction: Diagnosis,
    pub audio_quality: AudioQuality,
    pub recommendation: String,
}

/// Рекомендация для каждой метки. Неизвестная метка получает дефолт —
/// таблица и метки живут отдельно, рассинхронизация не должна ронять ответ.
fn recommendation_for(disease: &str) -> &'static str {
    match disease {
        "Healthy" => "Your breathing pattern appears normal. Keep up the good work!",
        "COPD" => "Consult a pulmonologist. Early diagnosis helps in better treatment.",
        "Asthma" => "This may be asthma. Seek medical advice for a proper assessment.",
        "URTI" => "Upper respiratory signs detected. Monitor symptoms closely.",
        "LRTI" => "Lower respiratory signs detected. Professional check-up recommended.",
        "Bronchiectasis" => "Signs consistent with bronchiectasis. See a specialist.",
        "Pneumonia" => "Possible pneumonia detected. Seek immediate medical attention.",
        "Bronchiolitis" => "Possible bronchiolitis. Keep the airways clear and visit a doctor.",
        _ => "Consult a doctor for further assessment.",
    }
}

/// Округление до двух знаков, как в ответе API.
fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// Составить отчёт из вектора предсказаний и оценки качества.
///
/// Правила:
/// - метка — argmax (при равенстве побеждает первое вхождение);
/// - confidence = max × 100, два знака после запятой;
/// - risk_level: low для Healthy, иначе medium при confidence < 80, иначе high.
pub fn compose(prediction: &PredictionVector, quality: &QualityScore) -> AnalysisReport {
    let idx = prediction.argmax();
    let disease = DISEASE_LABELS[idx];
    let confidence = prediction.max_score() * 100.0;

    let risk_level = if disease == "Healthy" {
        RiskLevel::Low
    } else if confidence < 80.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    AnalysisReport {
        prediction: Diagnosis {
            disease: disease.to_string(),
            confidence: round2(confidence),
            risk_level,
        },
        audio_quality: AudioQuality {
            clarity: round2(quality.clarity),
            background_noise: round2(quality.background_noise),
        },
        recommendation: recommendation_for(disease).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [f32; 8]) -> PredictionVector {
        PredictionVector::new(values.to_vec()).unwrap()
    }

    fn quality() -> QualityScore {
        QualityScore::clamped(62.5, 81.25)
    }

    #[test]
    fn test_healthy_is_always_low_risk() {
        // Индекс 1 = Healthy; даже при 99% уверенности риск low.
        let report = compose(&scores([0.0, 0.99, 0.0, 0.0, 0.0, 0.0, 0.01, 0.0]), &quality());
        assert_eq!(report.prediction.disease, "Healthy");
        assert_eq!(report.prediction.risk_level, RiskLevel::Low);
        assert_eq!(report.prediction.confidence, 99.0);
    }

    #[test]
    fn test_disease_below_80_is_medium() {
        let report = compose(&scores([0.0, 0.0, 0.0, 0.79, 0.0, 0.0, 0.0, 0.0]), &quality());
        assert_eq!(report.prediction.disease, "COPD");
        assert_eq!(report.prediction.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_disease_at_or_above_80_is_high() {
        // Ровно 80 — уже high (условие строго "< 80" для medium).
        let report = compose(&scores([0.0, 0.0, 0.0, 0.80, 0.0, 0.0, 0.0, 0.0]), &quality());
        assert_eq!(report.prediction.risk_level, RiskLevel::High);

        let report = compose(&scores([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.95, 0.0]), &quality());
        assert_eq!(report.prediction.disease, "Pneumonia");
        assert_eq!(report.prediction.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_argmax_tie_keeps_first() {
        // Два одинаковых максимума: побеждает меньший индекс (Asthma, не
        // Bronchiectasis).
        let report = compose(&scores([0.1, 0.2, 0.9, 0.3, 0.0, 0.9, 0.1, 0.0]), &quality());
        assert_eq!(report.prediction.disease, "Asthma");
    }

    #[test]
    fn test_confidence_rounding() {
        let report = compose(
            &scores([0.0, 0.0, 0.0, 0.0, 0.123456, 0.0, 0.0, 0.0]),
            &quality(),
        );
        // 12.3456 → 12.35
        assert_eq!(report.prediction.confidence, 12.35);
    }

    #[test]
    fn test_quality_rounding() {
        let q = QualityScore::clamped(33.3333, 66.6666);
        let report = compose(&scores([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]), &q);
        assert_eq!(report.audio_quality.clarity, 33.33);
        assert_eq!(report.audio_quality.background_noise, 66.67);
    }

    #[test]
    fn test_every_label_has_nonempty_recommendation() {
        for (i, label) in DISEASE_LABELS.iter().enumerate() {
            let mut v = [0.0f32; 8];
            v[i] = 1.0;
            let report = compose(&scores(v), &quality());
            assert_eq!(&report.prediction.disease, label);
            assert!(!report.recommendation.is_empty());
        }
        // Неизвестная метка тоже получает дефолт.
        assert_eq!(
            super::recommendation_for("SomethingElse"),
            "Consult a doctor for further assessment."
        );
    }

    #[test]
    fn test_serialized_shape() {
        let report = compose(&scores([0.0, 0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]), &quality());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["prediction"]["disease"], "Healthy");
        assert_eq!(json["prediction"]["risk_level"], "low");
        assert!(json["audio_quality"]["clarity"].is_number());
        assert!(json["recommendation"].is_string());
    }
}
