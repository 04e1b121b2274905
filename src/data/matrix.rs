// matrix.rs - Checklist × species community matrix

use crate::error::{AnalysisError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Dense checklist × species count matrix with explicit zero fill
#[derive(Debug, Clone)]
pub struct CommunityMatrix {
    pub checklist_ids: Vec<String>,
    /// Locality of each row, parallel to `checklist_ids`
    pub localities: Vec<String>,
    pub species: Vec<String>,
    pub counts: Vec<Vec<f64>>,
}

impl CommunityMatrix {
    /// Build from per-checklist species sums.
    ///
    /// Rows follow the key order of `counts`; species columns are sorted by name.
    /// Absent (checklist, species) pairs are filled with 0.
    pub fn from_counts(
        counts: &BTreeMap<String, BTreeMap<String, f64>>,
        localities: &HashMap<String, String>,
    ) -> Self {
        let species: Vec<String> = counts
            .values()
            .flat_map(|row| row.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let column: HashMap<&str, usize> = species
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut checklist_ids = Vec::with_capacity(counts.len());
        let mut row_localities = Vec::with_capacity(counts.len());
        let mut rows = Vec::with_capacity(counts.len());
        for (checklist_id, row) in counts {
            let mut values = vec![0.0; species.len()];
            for (name, count) in row {
                values[column[name.as_str()]] += *count;
            }
            checklist_ids.push(checklist_id.clone());
            row_localities.push(localities.get(checklist_id).cloned().unwrap_or_default());
            rows.push(values);
        }

        Self {
            checklist_ids,
            localities: row_localities,
            species,
            counts: rows,
        }
    }

    pub fn n_checklists(&self) -> usize {
        self.checklist_ids.len()
    }

    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    /// Total observed abundance per checklist
    pub fn row_totals(&self) -> Vec<f64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    /// Number of checklists on which each species was recorded
    pub fn incidence(&self) -> Vec<usize> {
        let mut freq = vec![0usize; self.species.len()];
        for row in &self.counts {
            for (j, &value) in row.iter().enumerate() {
                if value > 0.0 {
                    freq[j] += 1;
                }
            }
        }
        freq
    }

    /// Species recorded on at least one checklist
    pub fn richness(&self) -> usize {
        self.incidence().iter().filter(|&&f| f > 0).count()
    }

    /// Column indices of species present on each checklist
    pub fn presence_lists(&self) -> Vec<Vec<usize>> {
        self.counts
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, &value)| value > 0.0)
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect()
    }

    /// Sum the given rows into one pooled abundance vector
    pub fn pooled<I: IntoIterator<Item = usize>>(&self, rows: I) -> Vec<f64> {
        let mut pooled = vec![0.0; self.species.len()];
        for i in rows {
            for (acc, value) in pooled.iter_mut().zip(&self.counts[i]) {
                *acc += value;
            }
        }
        pooled
    }

    /// Distinct localities present in the matrix
    pub fn locality_ids(&self) -> BTreeSet<&str> {
        self.localities.iter().map(|s| s.as_str()).collect()
    }

    /// Sub-matrix restricted to one locality; species absent there are dropped
    pub fn for_locality(&self, locality_id: &str) -> Result<Self> {
        let rows: Vec<usize> = (0..self.n_checklists())
            .filter(|&i| self.localities[i] == locality_id)
            .collect();
        if rows.is_empty() {
            return Err(AnalysisError::UnknownLocality(locality_id.to_string()));
        }

        let keep: Vec<usize> = (0..self.n_species())
            .filter(|&j| rows.iter().any(|&i| self.counts[i][j] > 0.0))
            .collect();

        Ok(Self {
            checklist_ids: rows.iter().map(|&i| self.checklist_ids[i].clone()).collect(),
            localities: rows.iter().map(|&i| self.localities[i].clone()).collect(),
            species: keep.iter().map(|&j| self.species[j].clone()).collect(),
            counts: rows
                .iter()
                .map(|&i| keep.iter().map(|&j| self.counts[i][j]).collect())
                .collect(),
        })
    }
}
