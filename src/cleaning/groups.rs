// groups.rs - Shared-checklist deduplication

use crate::data::Checklist;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one deduplication pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupSummary {
    pub groups: usize,
    pub removed_duplicates: usize,
    /// Group ids that did not match the configured pattern (treated as ungrouped)
    pub unmatched_ids: usize,
}

/// Keep one uniformly chosen checklist per group identifier.
///
/// Members are visited in checklist-id order so a given RNG state always picks the
/// same representative. Checklists without a group id are left untouched. When
/// `pattern` is set, only ids matching it are treated as groups.
pub fn deduplicate_groups<R: Rng + ?Sized>(
    checklists: &mut BTreeMap<String, Checklist>,
    pattern: Option<&Regex>,
    rng: &mut R,
) -> GroupSummary {
    let mut summary = GroupSummary::default();
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (id, checklist) in checklists.iter() {
        if let Some(group) = checklist.group_identifier.as_deref() {
            if pattern.map_or(true, |p| p.is_match(group)) {
                groups.entry(group).or_default().push(id.as_str());
            } else {
                summary.unmatched_ids += 1;
            }
        }
    }
    summary.groups = groups.len();

    let mut drop: Vec<String> = Vec::new();
    for members in groups.values() {
        if let Some(keep) = members.choose(rng) {
            drop.extend(
                members
                    .iter()
                    .filter(|id| *id != keep)
                    .map(|id| id.to_string()),
            );
        }
    }

    summary.removed_duplicates = drop.len();
    for id in drop {
        checklists.remove(&id);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::observation::{parse_date, RawObservation};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn checklist(id: &str, group: Option<&str>) -> Checklist {
        let row = RawObservation {
            checklist_id: id.to_string(),
            group_identifier: group.map(|g| g.to_string()),
            ..Default::default()
        };
        Checklist::from_row(&row, parse_date("2021-01-01").unwrap())
    }

    fn fixture() -> BTreeMap<String, Checklist> {
        [
            checklist("S1", Some("G1")),
            checklist("S2", Some("G1")),
            checklist("S3", Some("G1")),
            checklist("S4", Some("G2")),
            checklist("S5", Some("G2")),
            checklist("S6", None),
            checklist("S7", None),
        ]
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect()
    }

    #[test]
    fn test_one_checklist_per_group() {
        for seed in 0..20 {
            let mut checklists = fixture();
            let mut rng = SmallRng::seed_from_u64(seed);
            let summary = deduplicate_groups(&mut checklists, None, &mut rng);

            assert_eq!(summary.groups, 2);
            assert_eq!(summary.removed_duplicates, 3);
            for group in ["G1", "G2"] {
                let kept = checklists
                    .values()
                    .filter(|c| c.group_identifier.as_deref() == Some(group))
                    .count();
                assert_eq!(kept, 1);
            }
            assert!(checklists.contains_key("S6"));
            assert!(checklists.contains_key("S7"));
            assert_eq!(checklists.len(), 4);
        }
    }

    #[test]
    fn test_same_seed_same_choice() {
        let mut a = fixture();
        let mut b = fixture();
        deduplicate_groups(&mut a, None, &mut SmallRng::seed_from_u64(9));
        deduplicate_groups(&mut b, None, &mut SmallRng::seed_from_u64(9));
        let ids_a: Vec<_> = a.keys().collect();
        let ids_b: Vec<_> = b.keys().collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_pattern_excludes_non_matching_ids() {
        let mut checklists = fixture();
        checklists.insert("S8".to_string(), checklist("S8", Some("shared-1")));
        checklists.insert("S9".to_string(), checklist("S9", Some("shared-1")));
        let pattern = Regex::new(r"^G\d+$").unwrap();
        let summary =
            deduplicate_groups(&mut checklists, Some(&pattern), &mut SmallRng::seed_from_u64(1));

        assert_eq!(summary.groups, 2);
        assert_eq!(summary.unmatched_ids, 2);
        assert!(checklists.contains_key("S8"));
        assert!(checklists.contains_key("S9"));
    }
}
