use serde::{Deserialize, Serialize};

/// Predicted disease with its confidence percentage in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub disease: String,
    pub confidence: f64,
}

impl PredictionResult {
    pub fn new(disease: impl Into<String>, confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            disease: disease.into(),
            confidence,
        }
    }

    /// Two-decimal percentage, e.g. `87.50%`.
    pub fn confidence_label(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_clamped_on_construction() {
        assert_eq!(PredictionResult::new("Flu", 130.0).confidence, 100.0);
        assert_eq!(PredictionResult::new("Flu", -3.0).confidence, 0.0);
        assert_eq!(PredictionResult::new("Flu", f64::NAN).confidence, 0.0);
    }

    #[test]
    fn confidence_label_has_two_decimals() {
        assert_eq!(PredictionResult::new("Acne", 87.5).confidence_label(), "87.50%");
        assert_eq!(PredictionResult::new("Acne", 33.3333).confidence_label(), "33.33%");
    }
}
