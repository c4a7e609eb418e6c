//! Form options: everything the input page needs to build its selects.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::models::{Gender, DEFAULT_AGE, MAX_AGE, MIN_AGE};

/// City entry that lets the user type a city outside the directory.
pub const OTHER_CITY: &str = "Other";

#[derive(Serialize)]
pub struct OptionsResponse {
    pub symptoms: Vec<String>,
    pub cities: Vec<String>,
    pub genders: Vec<&'static str>,
    pub min_age: u8,
    pub max_age: u8,
    pub default_age: u8,
}

/// `GET /api/options`: sorted symptoms, directory cities plus "Other", genders.
pub async fn list(State(ctx): State<ApiContext>) -> Json<OptionsResponse> {
    let mut cities = ctx.orchestrator.doctors().cities();
    cities.push(OTHER_CITY.to_string());

    Json(OptionsResponse {
        symptoms: ctx.orchestrator.vocabulary().sorted(),
        cities,
        genders: Gender::all().iter().map(Gender::as_str).collect(),
        min_age: MIN_AGE,
        max_age: MAX_AGE,
        default_age: DEFAULT_AGE,
    })
}
