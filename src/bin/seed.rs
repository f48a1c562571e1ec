//! Bulk CSV import — replaces the whole volcano_events collection.
//!
//! Usage: `cargo run --bin seed`
//!
//! Reads the CSV file at `EVENTS_CSV_PATH` (default `./data/volcano-events.csv`),
//! deletes all existing events, inserts every parsed record, and creates the
//! search indexes. The delete + insert sequence is not transactional: a crash
//! mid-run can leave the collection empty, and the job must be re-run from
//! scratch.
//!
//! Requires `DATABASE_URL` (reads .env).

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use sqlx::{PgPool, QueryBuilder};

use tephra::models::event::NewEvent;

/// Rows per batched INSERT.
const INSERT_CHUNK: usize = 500;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let csv_path = std::env::var("EVENTS_CSV_PATH")
        .unwrap_or_else(|_| "./data/volcano-events.csv".to_string());

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== Volcano events import ===");

    let events = read_events_csv(Path::new(&csv_path))?;
    println!("[done] Parsed {} events from {csv_path}", events.len());

    sqlx::query("DELETE FROM volcano_events").execute(&pool).await?;
    println!("[done] Cleared existing data");

    let inserted = insert_events(&pool, &events).await?;
    println!("[done] Imported {inserted} volcano events");

    create_indexes(&pool).await?;
    println!("[done] Created indexes");

    Ok(())
}

/// Parse the events CSV. Empty numeric fields become NULL, never zero.
fn read_events_csv(path: &Path) -> anyhow::Result<Vec<NewEvent>> {
    let file = File::open(path)
        .with_context(|| format!("cannot open events CSV at {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut events = Vec::new();
    for (index, record) in reader.deserialize::<NewEvent>().enumerate() {
        // +2: one for the header row, one for 1-based line numbers
        let event = record.with_context(|| format!("malformed CSV record at line {}", index + 2))?;
        events.push(event);
    }
    Ok(events)
}

/// Batch-insert events. Not atomic with the preceding delete.
async fn insert_events(pool: &PgPool, events: &[NewEvent]) -> anyhow::Result<usize> {
    let mut inserted = 0usize;
    for chunk in events.chunks(INSERT_CHUNK) {
        let mut builder = QueryBuilder::new(
            "INSERT INTO volcano_events (year, month, day, name, location, country, \
             latitude, longitude, elevation_m, volcano_type, vei, agent, deaths) ",
        );
        builder.push_values(chunk, |mut row, event| {
            row.push_bind(event.year)
                .push_bind(event.month)
                .push_bind(event.day)
                .push_bind(&event.name)
                .push_bind(&event.location)
                .push_bind(&event.country)
                .push_bind(event.latitude)
                .push_bind(event.longitude)
                .push_bind(event.elevation_m)
                .push_bind(&event.volcano_type)
                .push_bind(event.vei)
                .push_bind(&event.agent)
                .push_bind(event.deaths);
        });
        builder.build().execute(pool).await?;
        inserted += chunk.len();
    }
    Ok(inserted)
}

/// Create the search indexes the portal queries rely on. Idempotent.
async fn create_indexes(pool: &PgPool) -> anyhow::Result<()> {
    for ddl in [
        "CREATE INDEX IF NOT EXISTS idx_volcano_events_year ON volcano_events (year)",
        "CREATE INDEX IF NOT EXISTS idx_volcano_events_location ON volcano_events (location)",
        "CREATE INDEX IF NOT EXISTS idx_volcano_events_country ON volcano_events (country)",
        "CREATE INDEX IF NOT EXISTS idx_volcano_events_vei ON volcano_events (vei)",
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Year,Month,Day,Name,Location,Country,Latitude,Longitude,Elevation (m),Type,VEI,Agent,Deaths
1883,8,27,Krakatau,Indonesia,Indonesia,-6.102,105.423,813,Caldera,6,\"P,T,W\",36417
79,10,24,Vesuvius,Italy,Italy,40.821,14.426,1281,Complex volcano,5,P,16000
,,,Etna,Sicily,Italy,37.734,15.004,3329,Stratovolcano,,,
";

    #[test]
    fn parses_fixture_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let events = read_events_csv(file.path()).unwrap();
        assert_eq!(events.len(), 3);

        assert_eq!(events[0].name, "Krakatau");
        assert_eq!(events[0].year, Some(1883));
        assert_eq!(events[0].agent.as_deref(), Some("P,T,W"));
        assert_eq!(events[0].deaths, Some(36417));

        assert_eq!(events[1].year, Some(79));
        assert_eq!(events[1].vei, Some(5));

        // Empty numeric fields import as NULL, not zero
        assert_eq!(events[2].name, "Etna");
        assert_eq!(events[2].year, None);
        assert_eq!(events[2].vei, None);
        assert_eq!(events[2].deaths, None);
        assert_eq!(events[2].elevation_m, Some(3329));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_events_csv(Path::new("/nonexistent/volcano-events.csv")).unwrap_err();
        assert!(err.to_string().contains("cannot open events CSV"));
    }

    #[test]
    fn malformed_record_names_the_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"Year,Month,Day,Name,Location,Country,Latitude,Longitude,Elevation (m),Type,VEI,Agent,Deaths\n\
              notayear,,,Etna,Sicily,Italy,,,,Stratovolcano,,,\n",
        )
        .unwrap();

        let err = read_events_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
