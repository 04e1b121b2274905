// columns.rs - Configurable header names for the observation table

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Header naming conventions found in eBird exports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStyle {
    /// `sampling_event_identifier`, `common_name`, ...
    Underscore,
    /// `SAMPLING.EVENT.IDENTIFIER`, `COMMON.NAME`, ...
    Dotted,
}

impl FromStr for ColumnStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "underscore" | "snake" => Ok(ColumnStyle::Underscore),
            "dotted" | "period" | "dot" => Ok(ColumnStyle::Dotted),
            _ => Err(format!(
                "Invalid column style '{}'. Use: underscore, dotted",
                s
            )),
        }
    }
}

/// Header override table, as found under `[columns]` in the config file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ColumnOverrides {
    pub checklist_id: Option<String>,
    pub common_name: Option<String>,
    pub count: Option<String>,
    pub category: Option<String>,
    pub locality_id: Option<String>,
    pub locality: Option<String>,
    pub observation_date: Option<String>,
    pub protocol_type: Option<String>,
    pub all_species_reported: Option<String>,
    pub effort_distance_km: Option<String>,
    pub effort_area_ha: Option<String>,
    pub duration_minutes: Option<String>,
    pub group_identifier: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Header name for each logical column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub checklist_id: String,
    pub common_name: String,
    pub count: String,
    pub category: String,
    pub locality_id: String,
    pub locality: String,
    pub observation_date: String,
    pub protocol_type: String,
    pub all_species_reported: String,
    pub effort_distance_km: String,
    pub effort_area_ha: String,
    pub duration_minutes: String,
    pub group_identifier: String,
    pub latitude: String,
    pub longitude: String,
}

const LOGICAL_COLUMNS: [&str; 15] = [
    "sampling_event_identifier",
    "common_name",
    "observation_count",
    "category",
    "locality_id",
    "locality",
    "observation_date",
    "protocol_type",
    "all_species_reported",
    "effort_distance_km",
    "effort_area_ha",
    "duration_minutes",
    "group_identifier",
    "latitude",
    "longitude",
];

impl ColumnMap {
    pub fn for_style(style: ColumnStyle) -> Self {
        let name = |i: usize| -> String {
            match style {
                ColumnStyle::Underscore => LOGICAL_COLUMNS[i].to_string(),
                ColumnStyle::Dotted => LOGICAL_COLUMNS[i].replace('_', ".").to_uppercase(),
            }
        };
        Self {
            checklist_id: name(0),
            common_name: name(1),
            count: name(2),
            category: name(3),
            locality_id: name(4),
            locality: name(5),
            observation_date: name(6),
            protocol_type: name(7),
            all_species_reported: name(8),
            effort_distance_km: name(9),
            effort_area_ha: name(10),
            duration_minutes: name(11),
            group_identifier: name(12),
            latitude: name(13),
            longitude: name(14),
        }
    }

    /// Apply header overrides on top of a preset
    pub fn with_overrides(mut self, overrides: &ColumnOverrides) -> Self {
        fn apply(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        apply(&mut self.checklist_id, &overrides.checklist_id);
        apply(&mut self.common_name, &overrides.common_name);
        apply(&mut self.count, &overrides.count);
        apply(&mut self.category, &overrides.category);
        apply(&mut self.locality_id, &overrides.locality_id);
        apply(&mut self.locality, &overrides.locality);
        apply(&mut self.observation_date, &overrides.observation_date);
        apply(&mut self.protocol_type, &overrides.protocol_type);
        apply(&mut self.all_species_reported, &overrides.all_species_reported);
        apply(&mut self.effort_distance_km, &overrides.effort_distance_km);
        apply(&mut self.effort_area_ha, &overrides.effort_area_ha);
        apply(&mut self.duration_minutes, &overrides.duration_minutes);
        apply(&mut self.group_identifier, &overrides.group_identifier);
        apply(&mut self.latitude, &overrides.latitude);
        apply(&mut self.longitude, &overrides.longitude);
        self
    }
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self::for_style(ColumnStyle::Underscore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let underscore = ColumnMap::for_style(ColumnStyle::Underscore);
        assert_eq!(underscore.checklist_id, "sampling_event_identifier");
        assert_eq!(underscore.effort_distance_km, "effort_distance_km");

        let dotted = ColumnMap::for_style(ColumnStyle::Dotted);
        assert_eq!(dotted.checklist_id, "SAMPLING.EVENT.IDENTIFIER");
        assert_eq!(dotted.count, "OBSERVATION.COUNT");
    }

    #[test]
    fn test_overrides() {
        let overrides = ColumnOverrides {
            checklist_id: Some("checklist_id".to_string()),
            ..Default::default()
        };
        let map = ColumnMap::default().with_overrides(&overrides);
        assert_eq!(map.checklist_id, "checklist_id");
        assert_eq!(map.common_name, "common_name");
    }

    #[test]
    fn test_style_parse() {
        assert_eq!("DOTTED".parse::<ColumnStyle>(), Ok(ColumnStyle::Dotted));
        assert!("camel".parse::<ColumnStyle>().is_err());
    }
}
