// delimited.rs - CSV/TSV loader for eBird observation tables

use crate::data::loaders::columns::ColumnMap;
use crate::data::observation::RawObservation;
use crate::error::{AnalysisError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;

/// Pick the field delimiter from the file extension (`.csv` → comma, otherwise tab)
pub fn delimiter_for_path(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("csv") => b',',
        _ => b'\t',
    }
}

/// Resolved header positions
struct ColumnIndex {
    checklist_id: usize,
    common_name: usize,
    count: usize,
    category: usize,
    locality_id: usize,
    locality: Option<usize>,
    observation_date: usize,
    protocol_type: usize,
    all_species_reported: usize,
    effort_distance_km: usize,
    effort_area_ha: Option<usize>,
    duration_minutes: usize,
    group_identifier: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, columns: &ColumnMap, path: &Path) -> Result<Self> {
        let find = |header: &str| -> Option<usize> {
            headers
                .iter()
                .position(|h| h.trim().trim_matches('"').eq_ignore_ascii_case(header.trim()))
        };
        let require = |column: &'static str, header: &str| -> Result<usize> {
            find(header).ok_or_else(|| AnalysisError::MissingColumn {
                column,
                header: header.to_string(),
                path: path.display().to_string(),
            })
        };

        Ok(Self {
            checklist_id: require("checklist_id", &columns.checklist_id)?,
            common_name: require("common_name", &columns.common_name)?,
            count: require("count", &columns.count)?,
            category: require("category", &columns.category)?,
            locality_id: require("locality_id", &columns.locality_id)?,
            locality: find(&columns.locality),
            observation_date: require("observation_date", &columns.observation_date)?,
            protocol_type: require("protocol_type", &columns.protocol_type)?,
            all_species_reported: require("all_species_reported", &columns.all_species_reported)?,
            effort_distance_km: require("effort_distance_km", &columns.effort_distance_km)?,
            effort_area_ha: find(&columns.effort_area_ha),
            duration_minutes: require("duration_minutes", &columns.duration_minutes)?,
            group_identifier: find(&columns.group_identifier),
            latitude: find(&columns.latitude),
            longitude: find(&columns.longitude),
        })
    }
}

fn text(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").to_string()
}

fn optional_text(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("NA"))
        .map(|s| s.to_string())
}

fn optional_number(record: &StringRecord, idx: Option<usize>) -> Option<f64> {
    optional_text(record, idx).and_then(|s| s.parse::<f64>().ok())
}

/// Blank and NA are Ok(None); any other non-numeric text comes back as Err
fn effort_number(record: &StringRecord, idx: usize) -> std::result::Result<Option<f64>, String> {
    match optional_text(record, Some(idx)) {
        None => Ok(None),
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(raw),
        },
    }
}

/// Load every observation row of a delimited file
pub fn load_observations(
    path: &Path,
    columns: &ColumnMap,
    delimiter: Option<u8>,
) -> Result<Vec<RawObservation>> {
    let delimiter = delimiter.unwrap_or_else(|| delimiter_for_path(path));
    println!(
        "📊 Loading observations ({}-delimited): {}",
        if delimiter == b',' { "comma" } else { "tab" },
        path.display()
    );

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers, columns, path)?;

    let mut rows = Vec::new();
    for (row_num, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(row_num + 2);

        let distance = effort_number(&record, index.effort_distance_km);
        let duration = effort_number(&record, index.duration_minutes);
        let invalid_effort = match (&distance, &duration) {
            (Err(raw), _) => Some(format!("distance={}", raw)),
            (_, Err(raw)) => Some(format!("duration={}", raw)),
            _ => None,
        };

        rows.push(RawObservation {
            checklist_id: text(&record, index.checklist_id),
            common_name: text(&record, index.common_name),
            count: text(&record, index.count),
            category: text(&record, index.category),
            locality_id: text(&record, index.locality_id),
            locality: optional_text(&record, index.locality),
            observation_date: text(&record, index.observation_date),
            protocol_type: text(&record, index.protocol_type),
            all_species_reported: text(&record, index.all_species_reported),
            effort_distance_km: distance.unwrap_or(None),
            effort_area_ha: optional_number(&record, index.effort_area_ha),
            duration_minutes: duration.unwrap_or(None),
            group_identifier: optional_text(&record, index.group_identifier),
            latitude: optional_number(&record, index.latitude),
            longitude: optional_number(&record, index.longitude),
            invalid_effort,
            line,
        });
    }

    let checklists: std::collections::HashSet<&str> =
        rows.iter().map(|r| r.checklist_id.as_str()).collect();
    println!(
        "✅ Observations loaded: {} rows, {} checklists",
        rows.len(),
        checklists.len()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loaders::columns::ColumnStyle;
    use std::io::Write;

    const UNDERSCORE_HEADER: &str = "sampling_event_identifier,common_name,observation_count,category,locality_id,locality,observation_date,protocol_type,all_species_reported,effort_distance_km,effort_area_ha,duration_minutes,group_identifier,latitude,longitude";

    fn write_fixture(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_underscore_csv() {
        let content = format!(
            "{}\nS1,Mallard,3,species,L1,Park,2019-04-01,Traveling,1,1.2,,45,,40.1,-75.2\nS1,Blue Jay,X,species,L1,Park,2019-04-01,Traveling,1,1.2,,45,G7,NA,NA\n",
            UNDERSCORE_HEADER
        );
        let file = write_fixture(".csv", &content);
        let rows = load_observations(file.path(), &ColumnMap::default(), None).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].checklist_id, "S1");
        assert_eq!(rows[0].count, "3");
        assert_eq!(rows[0].effort_distance_km, Some(1.2));
        assert_eq!(rows[0].effort_area_ha, None);
        assert_eq!(rows[0].duration_minutes, Some(45.0));
        assert_eq!(rows[0].group_identifier, None);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].group_identifier.as_deref(), Some("G7"));
        assert_eq!(rows[1].latitude, None);
    }

    #[test]
    fn test_load_dotted_tsv_without_optional_columns() {
        let header = "SAMPLING.EVENT.IDENTIFIER\tCOMMON.NAME\tOBSERVATION.COUNT\tCATEGORY\tLOCALITY.ID\tOBSERVATION.DATE\tPROTOCOL.TYPE\tALL.SPECIES.REPORTED\tEFFORT.DISTANCE.KM\tDURATION.MINUTES";
        let content = format!(
            "{}\nS9\tMallard\t2\tspecies\tL1\t2020-06-01\tStationary\t1\t\t30\n",
            header
        );
        let file = write_fixture(".txt", &content);
        let columns = ColumnMap::for_style(ColumnStyle::Dotted);
        let rows = load_observations(file.path(), &columns, None).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].protocol_type, "Stationary");
        assert_eq!(rows[0].effort_distance_km, None);
        assert!(rows[0].locality.is_none());
    }

    #[test]
    fn test_unparseable_effort_kept_apart_from_missing() {
        let content = format!(
            "{}\nS1,Mallard,1,species,L1,Park,2019-04-01,Traveling,1,25 km,,45,,,\nS2,Mallard,1,species,L1,Park,2019-04-01,Traveling,1,NA,,1 hr,,,\nS3,Mallard,1,species,L1,Park,2019-04-01,Stationary,1,,,30,,,\n",
            UNDERSCORE_HEADER
        );
        let file = write_fixture(".csv", &content);
        let rows = load_observations(file.path(), &ColumnMap::default(), None).unwrap();

        assert_eq!(rows[0].effort_distance_km, None);
        assert_eq!(rows[0].invalid_effort.as_deref(), Some("distance=25 km"));
        assert_eq!(rows[0].duration_minutes, Some(45.0));
        assert_eq!(rows[1].invalid_effort.as_deref(), Some("duration=1 hr"));
        assert_eq!(rows[2].effort_distance_km, None);
        assert!(rows[2].invalid_effort.is_none());
    }

    #[test]
    fn test_missing_required_column() {
        let file = write_fixture(".csv", "sampling_event_identifier,common_name\nS1,Mallard\n");
        let err = load_observations(file.path(), &ColumnMap::default(), None).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn { column: "count", .. }));
    }

    #[test]
    fn test_delimiter_for_path() {
        assert_eq!(delimiter_for_path(Path::new("a.CSV")), b',');
        assert_eq!(delimiter_for_path(Path::new("ebd.txt")), b'\t');
        assert_eq!(delimiter_for_path(Path::new("ebd")), b'\t');
    }
}
