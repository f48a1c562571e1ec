//! Dashboard statistics aggregation.
//!
//! Ten independent read-only queries over the whole collection, issued
//! concurrently and assembled into one snapshot. The combined request is
//! all-or-nothing: a failure in any read fails the whole response.

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;

/// Elevation bucket width in meters.
const ELEVATION_STEP: i32 = 1000;

/// Lower bound of the open-ended overflow bucket.
const ELEVATION_OVERFLOW: i32 = 7000;

/// Fixed short month names, independent of process locale.
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Aggregated collection statistics for the visualization dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_events: i64,
    #[serde(rename = "averageVEI")]
    pub average_vei: f64,
    pub vei_distribution: Vec<VeiCount>,
    pub type_distribution: Vec<TypeCount>,
    pub events_by_time: Vec<CenturyCount>,
    pub total_deaths: i64,
    pub elevation_distribution: Vec<ElevationRangeCount>,
    pub deadliest_events: Vec<DeadliestEvent>,
    pub region_distribution: Vec<CountryCount>,
    pub monthly_distribution: Vec<MonthCount>,
}

/// Event count for a single VEI value.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct VeiCount {
    pub vei: i32,
    pub count: i64,
}

/// Event count for a single volcano morphology.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub volcano_type: String,
    pub count: i64,
}

/// Event count for one century bucket.
#[derive(Debug, Serialize)]
pub struct CenturyCount {
    pub century: i32,
    pub count: i64,
}

/// Event count for one elevation band.
#[derive(Debug, Serialize)]
pub struct ElevationRangeCount {
    pub range: String,
    pub count: i64,
}

/// Projection of a deadly event for the top-10 list.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DeadliestEvent {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Year")]
    pub year: Option<i32>,
    #[serde(rename = "Deaths")]
    pub deaths: i32,
    #[serde(rename = "Location")]
    pub location: String,
}

/// Event count for a single country.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CountryCount {
    pub country: String,
    pub count: i64,
}

/// Event count for one calendar month.
#[derive(Debug, Serialize)]
pub struct MonthCount {
    pub month: &'static str,
    pub count: i64,
}

/// Fetch all dashboard statistics in concurrent queries.
pub async fn get_stats(pool: &PgPool) -> Result<Statistics, AppError> {
    let (
        total_events,
        average_vei,
        vei_distribution,
        type_distribution,
        events_by_time,
        total_deaths,
        elevation_distribution,
        deadliest_events,
        region_distribution,
        monthly_distribution,
    ) = tokio::try_join!(
        fetch_total_events(pool),
        fetch_average_vei(pool),
        fetch_vei_distribution(pool),
        fetch_type_distribution(pool),
        fetch_events_by_century(pool),
        fetch_total_deaths(pool),
        fetch_elevation_distribution(pool),
        fetch_deadliest_events(pool),
        fetch_region_distribution(pool),
        fetch_monthly_distribution(pool),
    )?;

    Ok(Statistics {
        total_events,
        average_vei,
        vei_distribution,
        type_distribution,
        events_by_time,
        total_deaths,
        elevation_distribution,
        deadliest_events,
        region_distribution,
        monthly_distribution,
    })
}

/// Unconditional count of all events.
async fn fetch_total_events(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM volcano_events")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Mean VEI over events that report one; 0 when none do.
async fn fetch_average_vei(pool: &PgPool) -> Result<f64, AppError> {
    let avg = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(AVG(vei), 0)::float8 FROM volcano_events WHERE vei IS NOT NULL",
    )
    .fetch_one(pool)
    .await?;
    Ok(avg)
}

/// Event counts per distinct VEI value, ascending by VEI.
async fn fetch_vei_distribution(pool: &PgPool) -> Result<Vec<VeiCount>, AppError> {
    let rows = sqlx::query_as::<_, VeiCount>(
        r#"
        SELECT vei, COUNT(*) AS count
        FROM volcano_events
        WHERE vei IS NOT NULL
        GROUP BY vei
        ORDER BY vei
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Top 10 volcano morphologies by event count.
async fn fetch_type_distribution(pool: &PgPool) -> Result<Vec<TypeCount>, AppError> {
    let rows = sqlx::query_as::<_, TypeCount>(
        r#"
        SELECT volcano_type, COUNT(*) AS count
        FROM volcano_events
        GROUP BY volcano_type
        ORDER BY count DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Sum of reported death tolls; 0 when none are reported.
async fn fetch_total_deaths(pool: &PgPool) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(deaths), 0) FROM volcano_events WHERE deaths IS NOT NULL",
    )
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Event counts bucketed by century, ascending by bucket index.
async fn fetch_events_by_century(pool: &PgPool) -> Result<Vec<CenturyCount>, AppError> {
    let years =
        sqlx::query_scalar::<_, i32>("SELECT year FROM volcano_events WHERE year IS NOT NULL")
            .fetch_all(pool)
            .await?;

    let mut buckets: BTreeMap<i32, i64> = BTreeMap::new();
    for year in years {
        *buckets.entry(century_bucket(year)).or_insert(0) += 1;
    }

    Ok(buckets
        .into_iter()
        .map(|(century, count)| CenturyCount { century, count })
        .collect())
}

/// Event counts in fixed thousand-meter elevation bands plus the overflow
/// bucket, ascending by lower bound with the overflow last.
async fn fetch_elevation_distribution(pool: &PgPool) -> Result<Vec<ElevationRangeCount>, AppError> {
    let elevations = sqlx::query_scalar::<_, i32>(
        "SELECT elevation_m FROM volcano_events WHERE elevation_m IS NOT NULL",
    )
    .fetch_all(pool)
    .await?;

    let mut buckets: BTreeMap<i32, i64> = BTreeMap::new();
    for elevation in elevations {
        *buckets.entry(elevation_bucket(elevation)).or_insert(0) += 1;
    }

    Ok(buckets
        .into_iter()
        .map(|(lower, count)| ElevationRangeCount {
            range: elevation_range_label(lower),
            count,
        })
        .collect())
}

/// The 10 events with the highest reported death tolls.
async fn fetch_deadliest_events(pool: &PgPool) -> Result<Vec<DeadliestEvent>, AppError> {
    let rows = sqlx::query_as::<_, DeadliestEvent>(
        r#"
        SELECT name, year, deaths, location
        FROM volcano_events
        WHERE deaths IS NOT NULL AND deaths > 0
        ORDER BY deaths DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Top 15 countries by event count.
async fn fetch_region_distribution(pool: &PgPool) -> Result<Vec<CountryCount>, AppError> {
    let rows = sqlx::query_as::<_, CountryCount>(
        r#"
        SELECT country, COUNT(*) AS count
        FROM volcano_events
        GROUP BY country
        ORDER BY count DESC
        LIMIT 15
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Event counts per calendar month, ascending by month number, rendered
/// with fixed short month names.
async fn fetch_monthly_distribution(pool: &PgPool) -> Result<Vec<MonthCount>, AppError> {
    let rows = sqlx::query_as::<_, (i32, i64)>(
        r#"
        SELECT month, COUNT(*) AS count
        FROM volcano_events
        WHERE month IS NOT NULL
        GROUP BY month
        ORDER BY month
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(month, count)| month_name(month).map(|month| MonthCount { month, count }))
        .collect())
}

/// Century index for a year: truncation toward zero, shifted down one for
/// BCE years so they bucket toward the preceding century (-150 → -2).
fn century_bucket(year: i32) -> i32 {
    let mut century = year / 100;
    if year < 0 {
        century -= 1;
    }
    century
}

/// Bucket key (lower bound) for an elevation. Values in `[0, 7000)` land in
/// thousand-meter bands; everything else, including below-sea-level vents,
/// goes to the overflow bucket, matching the dataset's original grouping.
fn elevation_bucket(elevation: i32) -> i32 {
    if (0..ELEVATION_OVERFLOW).contains(&elevation) {
        (elevation / ELEVATION_STEP) * ELEVATION_STEP
    } else {
        ELEVATION_OVERFLOW
    }
}

/// Human-readable label for an elevation bucket key.
fn elevation_range_label(lower: i32) -> String {
    if lower >= ELEVATION_OVERFLOW {
        "7000+".to_string()
    } else {
        format!("{}-{}", lower, lower + ELEVATION_STEP - 1)
    }
}

/// Short calendar name for a 1-based month number.
fn month_name(month: i32) -> Option<&'static str> {
    usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|i| MONTH_NAMES.get(i))
        .copied()
}
