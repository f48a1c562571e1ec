//! Statistics route: the aggregated dashboard snapshot.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::services::stats::{self, Statistics};
use crate::AppState;

/// GET /statistics — aggregated collection statistics for the dashboard.
pub async fn statistics(State(state): State<AppState>) -> Result<Json<Statistics>, AppError> {
    let stats = stats::get_stats(&state.db).await?;
    Ok(Json(stats))
}
