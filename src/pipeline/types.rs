use serde::{Deserialize, Serialize};

use crate::models::{PatientInfo, PredictionResult};

/// Steps a request passes through, in order. `Error` is terminal and
/// reachable from any step after `AwaitingInput`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    AwaitingInput,
    Encoding,
    Classifying,
    Resolving,
    Persisting,
    Reporting,
    Done,
    Error,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingInput => "awaiting_input",
            Self::Encoding => "encoding",
            Self::Classifying => "classifying",
            Self::Resolving => "resolving",
            Self::Persisting => "persisting",
            Self::Reporting => "reporting",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

/// One form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub patient: PatientInfo,
    pub symptoms: Vec<String>,
}

/// Everything produced by a completed run.
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub prediction: PredictionResult,
    pub symptoms: Vec<String>,
    pub precautions: Vec<String>,
    pub doctor: String,
    /// Row id of the history record, if it was saved.
    pub history_id: Option<i64>,
    /// Set when the history record could not be saved. The report is still
    /// produced in that case.
    pub persistence_warning: Option<String>,
    pub report: Vec<u8>,
    pub stages: Vec<PipelineStage>,
}
