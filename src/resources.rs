//! Startup artifacts: vocabulary, classifier and precaution table.
//!
//! All three are read once from the resources directory. The vocabulary and
//! the model must agree on schema version and on symptom order, otherwise the
//! classifier would be fed columns it was not trained on.

use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::classifier::{ClassifierError, LinearModel, ModelArtifact};
use crate::precautions::{PrecautionRow, PrecautionTable};
use crate::vocabulary::{EncodeError, SymptomVocabulary, VocabularyArtifact};

pub const VOCABULARY_FILE: &str = "vocabulary.json";
pub const MODEL_FILE: &str = "model.json";
pub const PRECAUTIONS_FILE: &str = "precautions.json";

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Failed to read {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse {0}: {1}")]
    Parse(String, String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] EncodeError),

    #[error("Model error: {0}")]
    Model(#[from] ClassifierError),

    #[error("Schema mismatch between vocabulary and model: {0}")]
    SchemaMismatch(String),
}

/// Loaded, cross-checked startup artifacts.
pub struct ResourceBundle {
    pub vocabulary: SymptomVocabulary,
    pub model: LinearModel,
    pub precautions: PrecautionTable,
}

impl ResourceBundle {
    /// Load every artifact from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ResourceError> {
        let vocabulary: VocabularyArtifact = read_json(&dir.join(VOCABULARY_FILE))?;
        let model: ModelArtifact = read_json(&dir.join(MODEL_FILE))?;
        let rows: Vec<PrecautionRow> = read_json(&dir.join(PRECAUTIONS_FILE))?;

        let bundle = Self::from_artifacts(vocabulary, model, rows)?;
        tracing::info!(
            symptoms = bundle.vocabulary.len(),
            precautions = bundle.precautions.len(),
            dir = %dir.display(),
            "Resources loaded"
        );
        Ok(bundle)
    }

    /// Validate and assemble artifacts already in memory.
    pub fn from_artifacts(
        vocabulary: VocabularyArtifact,
        model: ModelArtifact,
        precaution_rows: Vec<PrecautionRow>,
    ) -> Result<Self, ResourceError> {
        check_schema(&vocabulary, &model)?;

        Ok(Self {
            vocabulary: SymptomVocabulary::new(vocabulary.symptoms)?,
            model: LinearModel::from_artifact(model)?,
            precautions: PrecautionTable::from_rows(precaution_rows),
        })
    }
}

fn check_schema(vocabulary: &VocabularyArtifact, model: &ModelArtifact) -> Result<(), ResourceError> {
    if vocabulary.schema_version != model.schema_version {
        return Err(ResourceError::SchemaMismatch(format!(
            "vocabulary schema v{} but model schema v{}",
            vocabulary.schema_version, model.schema_version
        )));
    }
    if vocabulary.symptoms.len() != model.symptoms.len() {
        return Err(ResourceError::SchemaMismatch(format!(
            "vocabulary has {} symptoms, model expects {}",
            vocabulary.symptoms.len(),
            model.symptoms.len()
        )));
    }
    if let Some((i, (v, m))) = vocabulary
        .symptoms
        .iter()
        .zip(&model.symptoms)
        .enumerate()
        .find(|(_, (v, m))| v != m)
    {
        return Err(ResourceError::SchemaMismatch(format!(
            "symptom {i} is '{v}' in vocabulary but '{m}' in model"
        )));
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ResourceError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ResourceError::Load(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&raw)
        .map_err(|e| ResourceError::Parse(path.display().to_string(), e.to_string()))
}
