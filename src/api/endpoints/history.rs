//! History endpoints.
//!
//! - `GET /api/history`: every record, newest first
//! - `GET /api/history/top-diseases`: most frequent predictions
//! - `GET /history`: the same list as an HTML table

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::page::render_history_html;
use crate::api::types::ApiContext;
use crate::history::{DiseaseCount, HistoryRecord};

pub const DEFAULT_TOP_DISEASES: usize = 10;

#[derive(Deserialize)]
pub struct TopDiseasesQuery {
    pub limit: Option<usize>,
}

/// `GET /api/history`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<HistoryRecord>>, ApiError> {
    Ok(Json(ctx.history().list_all()?))
}

/// `GET /api/history/top-diseases?limit=N`
pub async fn top_diseases(
    State(ctx): State<ApiContext>,
    Query(query): Query<TopDiseasesQuery>,
) -> Result<Json<Vec<DiseaseCount>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_DISEASES);
    if limit == 0 {
        return Err(ApiError::BadRequest("limit must be at least 1".into()));
    }
    Ok(Json(ctx.history().top_diseases(limit)?))
}

/// `GET /history`
pub async fn page(State(ctx): State<ApiContext>) -> Result<Html<String>, ApiError> {
    let records = ctx.history().list_all()?;
    Ok(Html(render_history_html(&records)))
}
