//! Volcanic eruption event records and the manual-entry payload.
//!
//! The wire format (JSON and CSV alike) keeps the dataset's original
//! PascalCase column names, including the literal `Elevation (m)` header.
//! Optional measurements stay NULL/absent when unknown, never zero.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// One historical eruption, as stored in `volcano_events`.
///
/// Field order matches the dataset's CSV column order, so serializing a
/// sequence of these through `csv::Writer` reproduces the export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VolcanoEvent {
    #[serde(rename = "Year")]
    pub year: Option<i32>,
    #[serde(rename = "Month")]
    pub month: Option<i32>,
    #[serde(rename = "Day")]
    pub day: Option<i32>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "Elevation (m)")]
    pub elevation_m: Option<i32>,
    #[serde(rename = "Type")]
    pub volcano_type: String,
    #[serde(rename = "VEI")]
    pub vei: Option<i32>,
    #[serde(rename = "Agent")]
    pub agent: Option<String>,
    #[serde(rename = "Deaths")]
    pub deaths: Option<i32>,
}

/// Payload for manual data entry and seed-import rows.
///
/// Field names mirror the CSV headers, so the same serde mapping drives both
/// the JSON entry form and the bulk CSV reader (where empty numeric fields
/// deserialize to `None`). Inserted as-is, with no dedup check.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewEvent {
    #[serde(rename = "Year")]
    pub year: Option<i32>,
    #[serde(rename = "Month")]
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: Option<i32>,
    #[serde(rename = "Day")]
    #[validate(range(min = 1, max = 31, message = "Day must be between 1 and 31"))]
    pub day: Option<i32>,
    #[serde(rename = "Name")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(rename = "Location")]
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[serde(rename = "Country")]
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[serde(rename = "Latitude")]
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be within [-90, 90]"))]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be within [-180, 180]"))]
    pub longitude: Option<f64>,
    #[serde(rename = "Elevation (m)")]
    pub elevation_m: Option<i32>,
    #[serde(rename = "Type")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub volcano_type: String,
    #[serde(rename = "VEI")]
    #[validate(range(min = 0, max = 8, message = "VEI must be between 0 and 8"))]
    pub vei: Option<i32>,
    #[serde(rename = "Agent")]
    pub agent: Option<String>,
    #[serde(rename = "Deaths")]
    #[validate(range(min = 0, message = "Deaths cannot be negative"))]
    pub deaths: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn krakatau() -> VolcanoEvent {
        VolcanoEvent {
            year: Some(1883),
            month: Some(8),
            day: Some(27),
            name: "Krakatau".to_string(),
            location: "Indonesia".to_string(),
            country: "Indonesia".to_string(),
            latitude: Some(-6.102),
            longitude: Some(105.423),
            elevation_m: Some(813),
            volcano_type: "Caldera".to_string(),
            vei: Some(6),
            agent: Some("P,T,W".to_string()),
            deaths: Some(36417),
        }
    }

    #[test]
    fn json_uses_original_column_names() {
        let json = serde_json::to_value(krakatau()).unwrap();
        assert_eq!(json["Name"], "Krakatau");
        assert_eq!(json["Year"], 1883);
        assert_eq!(json["Elevation (m)"], 813);
        assert_eq!(json["Type"], "Caldera");
        assert_eq!(json["VEI"], 6);
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let mut event = krakatau();
        event.vei = None;
        event.deaths = None;
        let json = serde_json::to_value(event).unwrap();
        assert!(json["VEI"].is_null());
        assert!(json["Deaths"].is_null());
    }

    #[test]
    fn csv_round_trip_preserves_headers() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(krakatau()).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "Year,Month,Day,Name,Location,Country,Latitude,Longitude,Elevation (m),Type,VEI,Agent,Deaths"
        );
    }

    #[test]
    fn csv_empty_numeric_fields_become_none() {
        let csv_data = "Year,Month,Day,Name,Location,Country,Latitude,Longitude,Elevation (m),Type,VEI,Agent,Deaths\n\
                        ,,,Etna,Sicily,Italy,,,3329,Stratovolcano,,,\n";
        let mut reader = csv::Reader::from_reader(csv_data.as_bytes());
        let event: NewEvent = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(event.name, "Etna");
        assert_eq!(event.year, None);
        assert_eq!(event.elevation_m, Some(3329));
        assert_eq!(event.vei, None);
        assert_eq!(event.agent, None);
        assert_eq!(event.deaths, None);
    }

    #[test]
    fn entry_validation_rejects_out_of_range_fields() {
        let mut event = NewEvent {
            year: Some(1883),
            month: Some(8),
            day: Some(27),
            name: "Krakatau".to_string(),
            location: "Indonesia".to_string(),
            country: "Indonesia".to_string(),
            latitude: None,
            longitude: None,
            elevation_m: None,
            volcano_type: "Caldera".to_string(),
            vei: Some(6),
            agent: None,
            deaths: Some(36417),
        };
        assert!(event.validate().is_ok());

        event.month = Some(13);
        assert!(event.validate().is_err());
        event.month = Some(8);

        event.vei = Some(9);
        assert!(event.validate().is_err());
        event.vei = Some(6);

        event.deaths = Some(-1);
        assert!(event.validate().is_err());
        event.deaths = None;

        event.latitude = Some(91.0);
        assert!(event.validate().is_err());
    }
}
