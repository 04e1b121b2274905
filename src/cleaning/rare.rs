// rare.rs - Per-locality rare species trimming

use crate::data::Checklist;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, Serialize)]
pub struct RareTrimSummary {
    /// (locality, species) pairs removed
    pub removed_species: usize,
    /// Checklists left with no species after trimming
    pub removed_checklists: usize,
}

/// True when a species seen on `present` of `total` checklists is kept at `trim_pct`.
///
/// Kept when present / total × 100 ≥ trim_pct. Cross-multiplied so that an exact
/// boundary (e.g. 1 of 20 at 5%) is not lost to rounding.
pub fn is_frequent(present: usize, total: usize, trim_pct: f64) -> bool {
    total > 0 && (present as f64) * 100.0 >= trim_pct * total as f64
}

/// Remove species occurring on fewer than `trim_pct` percent of the checklists at
/// their locality, then drop checklists left empty.
pub fn trim_rare_species(
    counts: &mut BTreeMap<String, BTreeMap<String, f64>>,
    checklists: &BTreeMap<String, Checklist>,
    trim_pct: f64,
) -> RareTrimSummary {
    let locality_of = |id: &str| -> &str {
        checklists
            .get(id)
            .map(|c| c.locality_id.as_str())
            .unwrap_or("")
    };

    let mut totals: HashMap<String, usize> = HashMap::new();
    let mut frequency: HashMap<(String, String), usize> = HashMap::new();
    for (id, row) in counts.iter() {
        let locality = locality_of(id).to_string();
        *totals.entry(locality.clone()).or_default() += 1;
        for species in row.keys() {
            *frequency
                .entry((locality.clone(), species.clone()))
                .or_default() += 1;
        }
    }

    let mut summary = RareTrimSummary {
        removed_species: frequency
            .iter()
            .filter(|(key, present)| !is_frequent(**present, totals[&key.0], trim_pct))
            .count(),
        ..Default::default()
    };

    for (id, row) in counts.iter_mut() {
        let locality = locality_of(id).to_string();
        let total = totals[&locality];
        row.retain(|species, _| {
            let present = frequency[&(locality.clone(), species.clone())];
            is_frequent(present, total, trim_pct)
        });
    }

    let before = counts.len();
    counts.retain(|_, row| !row.is_empty());
    summary.removed_checklists = before - counts.len();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::observation::{parse_date, RawObservation};

    fn checklists_at(locality: &str, n: usize) -> BTreeMap<String, Checklist> {
        (0..n)
            .map(|i| {
                let row = RawObservation {
                    checklist_id: format!("{}-{:02}", locality, i),
                    locality_id: locality.to_string(),
                    ..Default::default()
                };
                let c = Checklist::from_row(&row, parse_date("2021-01-01").unwrap());
                (c.id.clone(), c)
            })
            .collect()
    }

    fn counts_with_singleton(checklists: &BTreeMap<String, Checklist>) -> BTreeMap<String, BTreeMap<String, f64>> {
        checklists
            .keys()
            .enumerate()
            .map(|(i, id)| {
                let mut row = BTreeMap::from([("Mallard".to_string(), 2.0)]);
                if i == 0 {
                    row.insert("Snowy Owl".to_string(), 1.0);
                }
                (id.clone(), row)
            })
            .collect()
    }

    #[test]
    fn test_boundary_is_inclusive() {
        assert!(is_frequent(1, 20, 5.0));
        assert!(!is_frequent(1, 21, 5.0));
        assert!(!is_frequent(0, 20, 5.0));
        assert!(!is_frequent(0, 0, 5.0));
    }

    #[test]
    fn test_one_of_twenty_retained() {
        let checklists = checklists_at("L1", 20);
        let mut counts = counts_with_singleton(&checklists);
        let summary = trim_rare_species(&mut counts, &checklists, 5.0);

        assert_eq!(summary.removed_species, 0);
        assert!(counts.values().any(|row| row.contains_key("Snowy Owl")));
    }

    #[test]
    fn test_one_of_twenty_one_removed() {
        let checklists = checklists_at("L1", 21);
        let mut counts = counts_with_singleton(&checklists);
        let summary = trim_rare_species(&mut counts, &checklists, 5.0);

        assert_eq!(summary.removed_species, 1);
        assert_eq!(summary.removed_checklists, 0);
        assert!(counts.values().all(|row| !row.contains_key("Snowy Owl")));
        assert_eq!(counts.len(), 21);
    }

    #[test]
    fn test_frequency_is_per_locality() {
        let mut checklists = checklists_at("L1", 21);
        checklists.extend(checklists_at("L2", 2));
        let mut counts = counts_with_singleton(&checklists);
        // Only the L2 checklists carry Snowy Owl here
        for row in counts.values_mut() {
            row.remove("Snowy Owl");
        }
        counts.get_mut("L2-00").unwrap().insert("Snowy Owl".to_string(), 1.0);

        trim_rare_species(&mut counts, &checklists, 5.0);
        assert!(counts["L2-00"].contains_key("Snowy Owl"));
    }

    #[test]
    fn test_empty_checklists_dropped() {
        let checklists = checklists_at("L1", 21);
        let mut counts = counts_with_singleton(&checklists);
        counts.insert(
            "L1-00".to_string(),
            BTreeMap::from([("Snowy Owl".to_string(), 1.0)]),
        );
        let summary = trim_rare_species(&mut counts, &checklists, 5.0);
        assert_eq!(summary.removed_checklists, 1);
        assert!(!counts.contains_key("L1-00"));
    }
}
