//! Disease classifier seam.
//!
//! The pipeline only sees `dyn Predictor`. `LinearModel` is the shipped
//! implementation: a multinomial logistic regression whose coefficients are
//! read from `model.json`. Training happens elsewhere.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Artifact layout this build understands.
pub const MODEL_SCHEMA_VERSION: u32 = 1;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Classifier produced no output")]
    EmptyOutput,
}

/// Label and per-class probabilities for one input vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub probabilities: Vec<f64>,
}

impl Classification {
    /// Highest class probability as a percentage in [0, 100].
    pub fn confidence(&self) -> f64 {
        let max = self
            .probabilities
            .iter()
            .copied()
            .filter(|p| p.is_finite())
            .fold(0.0_f64, f64::max);
        (max * 100.0).clamp(0.0, 100.0)
    }
}

/// Anything that maps an indicator vector to class probabilities.
pub trait Predictor: Send + Sync {
    /// Class labels, index-aligned with `predict_proba` output.
    fn classes(&self) -> &[String];

    /// Expected input vector length.
    fn input_len(&self) -> usize;

    fn predict_proba(&self, input: &[f32]) -> Result<Vec<f64>, ClassifierError>;

    /// Argmax label plus the full distribution. Ties go to the lowest index.
    fn classify(&self, input: &[f32]) -> Result<Classification, ClassifierError> {
        let probabilities = self.predict_proba(input)?;

        let mut best: Option<(usize, f64)> = None;
        for (i, p) in probabilities.iter().copied().enumerate() {
            match best {
                Some((_, top)) if p <= top => {}
                _ => best = Some((i, p)),
            }
        }

        let (index, _) = best.ok_or(ClassifierError::EmptyOutput)?;
        let label = self
            .classes()
            .get(index)
            .cloned()
            .ok_or(ClassifierError::EmptyOutput)?;

        Ok(Classification {
            label,
            probabilities,
        })
    }
}

/// On-disk form of the model (`model.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    /// Feature order the weights were fitted against.
    pub symptoms: Vec<String>,
    pub classes: Vec<String>,
    /// One row per class, one column per symptom.
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    classes: Vec<String>,
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    input_len: usize,
}

impl LinearModel {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ClassifierError> {
        if artifact.schema_version != MODEL_SCHEMA_VERSION {
            return Err(ClassifierError::InvalidArtifact(format!(
                "unsupported schema version {} (expected {MODEL_SCHEMA_VERSION})",
                artifact.schema_version
            )));
        }
        if artifact.classes.is_empty() {
            return Err(ClassifierError::InvalidArtifact("no classes".into()));
        }
        if artifact.weights.len() != artifact.classes.len()
            || artifact.intercepts.len() != artifact.classes.len()
        {
            return Err(ClassifierError::InvalidArtifact(format!(
                "{} classes but {} weight rows and {} intercepts",
                artifact.classes.len(),
                artifact.weights.len(),
                artifact.intercepts.len()
            )));
        }

        let input_len = artifact.symptoms.len();
        if let Some((i, row)) = artifact
            .weights
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != input_len)
        {
            return Err(ClassifierError::InvalidArtifact(format!(
                "weight row {i} has {} columns, expected {input_len}",
                row.len()
            )));
        }

        Ok(Self {
            classes: artifact.classes,
            weights: artifact.weights,
            intercepts: artifact.intercepts,
            input_len,
        })
    }
}

impl Predictor for LinearModel {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn input_len(&self) -> usize {
        self.input_len
    }

    fn predict_proba(&self, input: &[f32]) -> Result<Vec<f64>, ClassifierError> {
        if input.len() != self.input_len {
            return Err(ClassifierError::InvalidInputShape {
                expected: self.input_len,
                actual: input.len(),
            });
        }

        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(row, bias)| {
                row.iter()
                    .zip(input)
                    .map(|(w, x)| w * f64::from(*x))
                    .sum::<f64>()
                    + bias
            })
            .collect();

        Ok(softmax(&logits))
    }
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            schema_version: 1,
            symptoms: vec!["cough".into(), "fever".into(), "rash".into()],
            classes: vec!["Flu".into(), "Acne".into()],
            weights: vec![vec![2.0, 2.0, -1.0], vec![-1.0, -1.0, 3.0]],
            intercepts: vec![0.0, 0.0],
        }
    }

    #[test]
    fn predicts_highest_scoring_class() {
        let model = LinearModel::from_artifact(artifact()).unwrap();
        let result = model.classify(&[1.0, 1.0, 0.0]).unwrap();
        assert_eq!(result.label, "Flu");
        assert!(result.confidence() > 90.0);

        let result = model.classify(&[0.0, 0.0, 1.0]).unwrap();
        assert_eq!(result.label, "Acne");
    }

    #[test]
    fn probabilities_sum_to_one() {
        let model = LinearModel::from_artifact(artifact()).unwrap();
        let probs = model.predict_proba(&[1.0, 0.0, 1.0]).unwrap();
        assert_eq!(probs.len(), 2);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wrong_length_rejected() {
        let model = LinearModel::from_artifact(artifact()).unwrap();
        let err = model.classify(&[1.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            ClassifierError::InvalidInputShape {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn ties_resolve_to_first_class() {
        let mut a = artifact();
        a.weights = vec![vec![0.0; 3], vec![0.0; 3]];
        let model = LinearModel::from_artifact(a).unwrap();
        let result = model.classify(&[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(result.label, "Flu");
        assert!((result.confidence() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_clamped() {
        let c = Classification {
            label: "X".into(),
            probabilities: vec![1.2, f64::NAN],
        };
        assert_eq!(c.confidence(), 100.0);

        let c = Classification {
            label: "X".into(),
            probabilities: vec![],
        };
        assert_eq!(c.confidence(), 0.0);
    }

    #[test]
    fn unsupported_schema_version_rejected() {
        let mut a = artifact();
        a.schema_version = 2;
        assert!(matches!(
            LinearModel::from_artifact(a),
            Err(ClassifierError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn ragged_weights_rejected() {
        let mut a = artifact();
        a.weights[1].pop();
        let err = LinearModel::from_artifact(a).unwrap_err();
        assert!(err.to_string().contains("weight row 1"));
    }

    #[test]
    fn intercept_count_must_match_classes() {
        let mut a = artifact();
        a.intercepts.push(0.5);
        assert!(LinearModel::from_artifact(a).is_err());
    }

    #[test]
    fn empty_classes_rejected() {
        let mut a = artifact();
        a.classes.clear();
        a.weights.clear();
        a.intercepts.clear();
        assert!(LinearModel::from_artifact(a).is_err());
    }
}
