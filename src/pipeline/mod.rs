//! Prediction-to-report pipeline.
//!
//! encode → classify → resolve precautions and doctor → persist → report,
//! run synchronously once per submitted form.

pub mod orchestrator;
pub mod types;

pub use orchestrator::Orchestrator;
pub use types::*;

use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::report::ReportError;
use crate::vocabulary::EncodeError;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input rejected before any step ran.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("Report generation failed: {0}")]
    Report(#[from] ReportError),
}

impl PipelineError {
    /// State the request ended in.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::Validation(_) => PipelineStage::AwaitingInput,
            _ => PipelineStage::Error,
        }
    }
}
