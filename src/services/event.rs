//! Event persistence: filtered search, manual entry, and export reads.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::event::{NewEvent, VolcanoEvent};
use crate::services::query::{escape_like, SearchFilter};

/// Result cap for the search endpoint.
const SEARCH_LIMIT: i64 = 20;

/// Find events matching a classified filter, capped at [`SEARCH_LIMIT`].
///
/// No ordering is imposed beyond the store's default.
pub async fn search(pool: &PgPool, filter: &SearchFilter) -> Result<Vec<VolcanoEvent>, AppError> {
    let events = match filter {
        SearchFilter::ExactYear(year) => {
            sqlx::query_as::<_, VolcanoEvent>(
                "SELECT * FROM volcano_events WHERE year = $1 LIMIT $2",
            )
            .bind(year)
            .bind(SEARCH_LIMIT)
            .fetch_all(pool)
            .await?
        }
        SearchFilter::YearRange { from, to } => {
            sqlx::query_as::<_, VolcanoEvent>(
                "SELECT * FROM volcano_events WHERE year >= $1 AND year <= $2 LIMIT $3",
            )
            .bind(from)
            .bind(to)
            .bind(SEARCH_LIMIT)
            .fetch_all(pool)
            .await?
        }
        SearchFilter::FreeText(term) => {
            let pattern = format!("%{}%", escape_like(term));
            sqlx::query_as::<_, VolcanoEvent>(
                r#"
                SELECT * FROM volcano_events
                WHERE name ILIKE $1
                   OR location ILIKE $1
                   OR country ILIKE $1
                   OR volcano_type ILIKE $1
                LIMIT $2
                "#,
            )
            .bind(&pattern)
            .bind(SEARCH_LIMIT)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(events)
}

/// Insert a single manually entered event. No dedup check.
pub async fn insert(pool: &PgPool, event: &NewEvent) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO volcano_events (
            year, month, day, name, location, country,
            latitude, longitude, elevation_m, volcano_type, vei, agent, deaths
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(event.year)
    .bind(event.month)
    .bind(event.day)
    .bind(&event.name)
    .bind(&event.location)
    .bind(&event.country)
    .bind(event.latitude)
    .bind(event.longitude)
    .bind(event.elevation_m)
    .bind(&event.volcano_type)
    .bind(event.vei)
    .bind(&event.agent)
    .bind(event.deaths)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch the whole collection for the CSV export, in insertion order.
pub async fn fetch_all(pool: &PgPool) -> Result<Vec<VolcanoEvent>, AppError> {
    let events = sqlx::query_as::<_, VolcanoEvent>("SELECT * FROM volcano_events ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(events)
}
