//! Prediction endpoints.
//!
//! - `POST /api/predict`: JSON result with the report inlined as base64
//! - `POST /api/report`: the PDF itself, as a download
//!
//! Both run the full pipeline, so both append a history record.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config::REPORT_FILENAME;
use crate::models::{Gender, PatientInfo, DEFAULT_AGE, MAX_AGE, MIN_AGE};
use crate::pipeline::{PredictionOutcome, PredictionRequest};

/// Form submission as posted by the page.
#[derive(Debug, Deserialize)]
pub struct PredictBody {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_age")]
    pub age: i64,
    pub gender: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

fn default_age() -> i64 {
    i64::from(DEFAULT_AGE)
}

impl PredictBody {
    pub fn into_request(self) -> Result<PredictionRequest, ApiError> {
        let gender: Gender = self
            .gender
            .trim()
            .parse()
            .map_err(|e: crate::models::InvalidEnum| ApiError::BadRequest(e.to_string()))?;
        let age = u8::try_from(self.age).map_err(|_| {
            ApiError::Validation(format!("Age must be between {MIN_AGE} and {MAX_AGE}."))
        })?;

        Ok(PredictionRequest {
            patient: PatientInfo {
                name: self.name,
                age,
                gender,
                city: self.city,
            },
            symptoms: self.symptoms,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ReportAttachment {
    pub filename: &'static str,
    pub content_base64: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub disease: String,
    pub confidence: f64,
    pub confidence_label: String,
    pub symptoms: Vec<String>,
    pub precautions: Vec<String>,
    pub doctor: String,
    pub history_id: Option<i64>,
    pub persistence_warning: Option<String>,
    pub report: ReportAttachment,
}

impl From<PredictionOutcome> for PredictResponse {
    fn from(outcome: PredictionOutcome) -> Self {
        let confidence_label = outcome.prediction.confidence_label();
        Self {
            disease: outcome.prediction.disease,
            confidence: outcome.prediction.confidence,
            confidence_label,
            symptoms: outcome.symptoms,
            precautions: outcome.precautions,
            doctor: outcome.doctor,
            history_id: outcome.history_id,
            persistence_warning: outcome.persistence_warning,
            report: ReportAttachment {
                filename: REPORT_FILENAME,
                content_base64: base64::engine::general_purpose::STANDARD.encode(&outcome.report),
            },
        }
    }
}

/// Run the blocking pipeline off the async runtime.
async fn run_pipeline(ctx: &ApiContext, body: PredictBody) -> Result<PredictionOutcome, ApiError> {
    let request = body.into_request()?;
    let orchestrator = ctx.orchestrator.clone();
    let outcome = tokio::task::spawn_blocking(move || orchestrator.run(&request)).await??;
    Ok(outcome)
}

/// `POST /api/predict`
pub async fn predict(
    State(ctx): State<ApiContext>,
    Json(body): Json<PredictBody>,
) -> Result<Json<PredictResponse>, ApiError> {
    let outcome = run_pipeline(&ctx, body).await?;
    Ok(Json(outcome.into()))
}

/// `POST /api/report`
pub async fn report(
    State(ctx): State<ApiContext>,
    Json(body): Json<PredictBody>,
) -> Result<Response, ApiError> {
    let outcome = run_pipeline(&ctx, body).await?;
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{REPORT_FILENAME}\""),
        ),
    ];
    Ok((headers, outcome.report).into_response())
}
