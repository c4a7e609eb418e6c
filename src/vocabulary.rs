//! Symptom vocabulary and indicator encoding.
//!
//! The vocabulary order is the column order the classifier was trained on.
//! It comes from the vocabulary artifact and is never re-sorted; `sorted()`
//! exists only for display.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Symptoms selected for one request. Members must be vocabulary labels.
pub type SymptomSet = BTreeSet<String>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Unknown symptom: {0}")]
    UnknownSymptom(String),

    #[error("Duplicate symptom in vocabulary: {0}")]
    DuplicateSymptom(String),

    #[error("Vocabulary is empty")]
    EmptyVocabulary,
}

/// On-disk form of the vocabulary (`vocabulary.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyArtifact {
    pub schema_version: u32,
    pub symptoms: Vec<String>,
}

/// Fixed, ordered symptom vocabulary.
#[derive(Debug, Clone)]
pub struct SymptomVocabulary {
    symptoms: Vec<String>,
    index: HashMap<String, usize>,
}

impl SymptomVocabulary {
    pub fn new(symptoms: Vec<String>) -> Result<Self, EncodeError> {
        if symptoms.is_empty() {
            return Err(EncodeError::EmptyVocabulary);
        }
        let mut index = HashMap::with_capacity(symptoms.len());
        for (i, symptom) in symptoms.iter().enumerate() {
            if index.insert(symptom.clone(), i).is_some() {
                return Err(EncodeError::DuplicateSymptom(symptom.clone()));
            }
        }
        Ok(Self { symptoms, index })
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    /// Labels in training order.
    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    /// Labels in alphabetical order, for the selection form.
    pub fn sorted(&self) -> Vec<String> {
        let mut sorted = self.symptoms.clone();
        sorted.sort();
        sorted
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.index.contains_key(symptom.trim())
    }

    /// Encode a symptom set as a length-N indicator vector.
    pub fn encode(&self, symptoms: &SymptomSet) -> Result<Vec<f32>, EncodeError> {
        let mut vector = vec![0.0_f32; self.symptoms.len()];
        for symptom in symptoms {
            let position = self
                .index
                .get(symptom.trim())
                .ok_or_else(|| EncodeError::UnknownSymptom(symptom.clone()))?;
            vector[*position] = 1.0;
        }
        Ok(vector)
    }
}

/// Collect raw form labels into a set, dropping blanks.
pub fn symptom_set<I, S>(labels: I) -> SymptomSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
