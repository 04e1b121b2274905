// observation.rs - Raw observation rows and checklist metadata

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Sentinel used by eBird for "present, count unknown"
pub const PRESENT_SENTINEL: &str = "X";

/// One row of the observation table, as read from disk
#[derive(Debug, Clone, Default)]
pub struct RawObservation {
    pub checklist_id: String,
    pub common_name: String,
    pub count: String,
    pub category: String,
    pub locality_id: String,
    pub locality: Option<String>,
    pub observation_date: String,
    pub protocol_type: String,
    pub all_species_reported: String,
    pub effort_distance_km: Option<f64>,
    pub effort_area_ha: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub group_identifier: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Distance or duration text that is present but not a number, e.g. "distance=25 km"
    pub invalid_effort: Option<String>,
    /// 1-based line in the source file (header is line 1)
    pub line: usize,
}

/// Parsed observation count
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObservationCount {
    Count(f64),
    /// The "X" sentinel
    Present,
}

impl ObservationCount {
    /// Parse a raw count cell. Returns None for malformed values.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = raw.trim();
        if cleaned.eq_ignore_ascii_case(PRESENT_SENTINEL) {
            return Some(ObservationCount::Present);
        }
        match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Some(ObservationCount::Count(value)),
            _ => None,
        }
    }
}

/// Taxonomic category of an observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Species,
    /// Identifiable sub-specific group, folded into its species
    Issf,
    Other(String),
}

impl Category {
    pub fn parse(raw: &str) -> Self {
        let cleaned = raw.trim();
        if cleaned.eq_ignore_ascii_case("species") {
            Category::Species
        } else if cleaned.eq_ignore_ascii_case("issf") {
            Category::Issf
        } else {
            Category::Other(cleaned.to_lowercase())
        }
    }

    pub fn is_retained(&self) -> bool {
        matches!(self, Category::Species | Category::Issf)
    }
}

/// One birding event with its effort metadata
#[derive(Debug, Clone, Serialize)]
pub struct Checklist {
    pub id: String,
    pub locality_id: String,
    pub locality: Option<String>,
    pub date: NaiveDate,
    pub year: i32,
    pub protocol_type: String,
    pub complete: bool,
    pub effort_distance_km: Option<f64>,
    pub effort_area_ha: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub group_identifier: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Checklist {
    /// Build checklist metadata from the first row seen for it
    pub fn from_row(row: &RawObservation, date: NaiveDate) -> Self {
        Self {
            id: row.checklist_id.clone(),
            locality_id: row.locality_id.clone(),
            locality: row.locality.clone(),
            date,
            year: date.year(),
            protocol_type: row.protocol_type.trim().to_string(),
            complete: parse_flag(&row.all_species_reported),
            effort_distance_km: row.effort_distance_km,
            effort_area_ha: row.effort_area_ha,
            duration_minutes: row.duration_minutes,
            group_identifier: row
                .group_identifier
                .as_ref()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty()),
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

/// Parse an observation date in ISO or US notation
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim();
    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(cleaned, "%m/%d/%Y"))
        .ok()
}

/// Completeness flag: 1/true/yes
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "t" | "yes" | "y"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(ObservationCount::parse("3"), Some(ObservationCount::Count(3.0)));
        assert_eq!(ObservationCount::parse(" X "), Some(ObservationCount::Present));
        assert_eq!(ObservationCount::parse("x"), Some(ObservationCount::Present));
        assert_eq!(ObservationCount::parse("many"), None);
        assert_eq!(ObservationCount::parse("-2"), None);
        assert_eq!(ObservationCount::parse(""), None);
    }

    #[test]
    fn test_category() {
        assert!(Category::parse("species").is_retained());
        assert!(Category::parse("ISSF").is_retained());
        assert!(!Category::parse("spuh").is_retained());
        assert_eq!(Category::parse("Slash"), Category::Other("slash".to_string()));
    }

    #[test]
    fn test_parse_date_and_flag() {
        let date = parse_date("2019-05-04").unwrap();
        assert_eq!(date.year(), 2019);
        assert_eq!(parse_date("05/04/2019"), Some(date));
        assert!(parse_date("May 4").is_none());

        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_checklist_blank_group_is_none() {
        let row = RawObservation {
            checklist_id: "S1".to_string(),
            group_identifier: Some("  ".to_string()),
            all_species_reported: "1".to_string(),
            ..Default::default()
        };
        let checklist = Checklist::from_row(&row, parse_date("2020-01-01").unwrap());
        assert!(checklist.group_identifier.is_none());
        assert!(checklist.complete);
        assert_eq!(checklist.year, 2020);
    }
}
