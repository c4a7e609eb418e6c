use std::sync::Arc;

use super::types::{PipelineStage, PredictionOutcome, PredictionRequest};
use super::PipelineError;
use crate::classifier::Predictor;
use crate::doctors::DoctorRecommender;
use crate::history::{HistoryStore, NewHistoryRecord};
use crate::models::PredictionResult;
use crate::precautions::PrecautionTable;
use crate::report::{ReportGenerator, ReportInput};
use crate::resources::ResourceBundle;
use crate::vocabulary::{symptom_set, SymptomVocabulary};

/// Runs the prediction pipeline.
///
/// Coordinates: validate → encode → classify → resolve → persist → report.
/// A failure before persistence leaves no history record and no report.
/// A persistence failure is reported but does not stop the report.
pub struct Orchestrator {
    vocabulary: SymptomVocabulary,
    predictor: Box<dyn Predictor>,
    precautions: PrecautionTable,
    doctors: DoctorRecommender,
    history: Arc<dyn HistoryStore>,
    reports: ReportGenerator,
}

impl Orchestrator {
    pub fn new(
        vocabulary: SymptomVocabulary,
        predictor: Box<dyn Predictor>,
        precautions: PrecautionTable,
        doctors: DoctorRecommender,
        history: Arc<dyn HistoryStore>,
        reports: ReportGenerator,
    ) -> Self {
        if predictor.input_len() != vocabulary.len() {
            tracing::warn!(
                vocabulary = vocabulary.len(),
                model = predictor.input_len(),
                "Predictor input length differs from vocabulary size"
            );
        }
        Self {
            vocabulary,
            predictor,
            precautions,
            doctors,
            history,
            reports,
        }
    }

    pub fn from_resources(
        resources: ResourceBundle,
        doctors: DoctorRecommender,
        history: Arc<dyn HistoryStore>,
        reports: ReportGenerator,
    ) -> Self {
        Self::new(
            resources.vocabulary,
            Box::new(resources.model),
            resources.precautions,
            doctors,
            history,
            reports,
        )
    }

    pub fn vocabulary(&self) -> &SymptomVocabulary {
        &self.vocabulary
    }

    pub fn doctors(&self) -> &DoctorRecommender {
        &self.doctors
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    pub fn run(&self, request: &PredictionRequest) -> Result<PredictionOutcome, PipelineError> {
        let mut stages = vec![PipelineStage::AwaitingInput];

        let patient = &request.patient;
        let symptoms = symptom_set(&request.symptoms);
        if patient.name.trim().is_empty() || symptoms.is_empty() {
            return Err(PipelineError::Validation(
                "Please enter your name and select symptoms.".into(),
            ));
        }
        if !patient.age_in_range() {
            return Err(PipelineError::Validation(format!(
                "Age must be between {} and {}.",
                crate::models::MIN_AGE,
                crate::models::MAX_AGE
            )));
        }

        stages.push(PipelineStage::Encoding);
        let input = self
            .vocabulary
            .encode(&symptoms)
            .map_err(|e| abort(PipelineStage::Encoding, e))?;

        stages.push(PipelineStage::Classifying);
        let classification = self
            .predictor
            .classify(&input)
            .map_err(|e| abort(PipelineStage::Classifying, e))?;
        let prediction =
            PredictionResult::new(classification.label.clone(), classification.confidence());
        tracing::info!(
            disease = %prediction.disease,
            confidence = prediction.confidence,
            symptoms = symptoms.len(),
            "Disease predicted"
        );

        stages.push(PipelineStage::Resolving);
        let precautions = self.precautions.resolve(&prediction.disease);
        let doctor = self.doctors.recommend(&prediction.disease, &patient.city);

        stages.push(PipelineStage::Persisting);
        let symptoms: Vec<String> = symptoms.into_iter().collect();
        let record = NewHistoryRecord::new_now(
            patient.name.trim(),
            patient.gender.as_str(),
            patient.city.trim(),
            &symptoms,
            &prediction.disease,
            &precautions,
            &doctor,
        );
        let (history_id, persistence_warning) = match self.history.append(&record) {
            Ok(id) => {
                tracing::info!(history_id = id, "Prediction recorded");
                (Some(id), None)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to record prediction history");
                (None, Some(format!("History could not be saved: {e}")))
            }
        };

        stages.push(PipelineStage::Reporting);
        let report = self
            .reports
            .render(&ReportInput {
                patient,
                prediction: &prediction,
                symptoms: &symptoms,
                precautions: &precautions,
                doctor: &doctor,
            })
            .map_err(|e| abort(PipelineStage::Reporting, e))?;

        stages.push(PipelineStage::Done);
        Ok(PredictionOutcome {
            prediction,
            symptoms,
            precautions,
            doctor,
            history_id,
            persistence_warning,
            report,
            stages,
        })
    }
}

fn abort<E>(stage: PipelineStage, err: E) -> PipelineError
where
    E: Into<PipelineError> + std::fmt::Display,
{
    tracing::warn!(stage = stage.as_str(), error = %err, "Prediction aborted");
    err.into()
}
