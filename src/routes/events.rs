//! Event routes: search, manual entry, and CSV export.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::event::{NewEvent, VolcanoEvent};
use crate::services::event as event_service;
use crate::services::query::classify;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Search results envelope.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub events: Vec<VolcanoEvent>,
}

/// Response for a successful manual entry.
#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    pub message: String,
}

/// GET /search?q= — year, year-range, or free-text search over events.
///
/// An absent or blank query yields an empty result set, not an error.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params.q.as_deref().unwrap_or_default();
    if query.trim().is_empty() {
        return Ok(Json(SearchResponse { events: Vec::new() }));
    }

    let filter = classify(query);
    let events = event_service::search(&state.db, &filter).await?;
    Ok(Json(SearchResponse { events }))
}

/// POST /events — manual entry of a single event (authenticated, no dedup check).
pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<NewEvent>,
) -> Result<Json<CreateEventResponse>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    event_service::insert(&state.db, &body).await?;
    Ok(Json(CreateEventResponse {
        message: "Volcano event data imported successfully".to_string(),
    }))
}

/// GET /events/export — download the full collection as CSV.
pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let events = event_service::fetch_all(&state.db).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for event in &events {
        writer
            .serialize(event)
            .map_err(|e| AppError::Internal(format!("CSV serialization failed: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"volcano-events.csv\"",
            ),
        ],
        bytes,
    ))
}
