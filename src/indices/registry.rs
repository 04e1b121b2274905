// registry.rs - Index registry for managing available indices

use super::traits::{DissimilarityIndex, DiversityIndex};
use super::{BrayCurtis, InverseSimpson, Jaccard, Shannon, Simpson};
use crate::error::{AnalysisError, Result};
use std::collections::BTreeMap;

/// Registry for available diversity and dissimilarity indices
pub struct IndexRegistry {
    diversity: BTreeMap<String, Box<dyn DiversityIndex>>,
    dissimilarity: BTreeMap<String, Box<dyn DissimilarityIndex>>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            diversity: BTreeMap::new(),
            dissimilarity: BTreeMap::new(),
        };

        // Register built-in indices
        registry.register_diversity(Box::new(Shannon));
        registry.register_diversity(Box::new(Simpson));
        registry.register_diversity(Box::new(InverseSimpson));
        registry.register_dissimilarity(Box::new(BrayCurtis));
        registry.register_dissimilarity(Box::new(Jaccard));

        registry
    }

    /// Register a diversity index under its own name
    pub fn register_diversity(&mut self, index: Box<dyn DiversityIndex>) {
        self.diversity.insert(index.name().to_string(), index);
    }

    /// Register a dissimilarity index under its own name
    pub fn register_dissimilarity(&mut self, index: Box<dyn DissimilarityIndex>) {
        self.dissimilarity.insert(index.name().to_string(), index);
    }

    pub fn diversity(&self, name: &str) -> Result<&dyn DiversityIndex> {
        self.diversity
            .get(&name.to_lowercase())
            .map(|i| i.as_ref())
            .ok_or_else(|| AnalysisError::UnknownIndex {
                kind: "diversity",
                name: name.to_string(),
                available: self.diversity_names().join(", "),
            })
    }

    pub fn dissimilarity(&self, name: &str) -> Result<&dyn DissimilarityIndex> {
        self.dissimilarity
            .get(&name.to_lowercase())
            .map(|i| i.as_ref())
            .ok_or_else(|| AnalysisError::UnknownIndex {
                kind: "dissimilarity",
                name: name.to_string(),
                available: self.dissimilarity_names().join(", "),
            })
    }

    pub fn diversity_names(&self) -> Vec<&str> {
        self.diversity.keys().map(|s| s.as_str()).collect()
    }

    pub fn dissimilarity_names(&self) -> Vec<&str> {
        self.dissimilarity.keys().map(|s| s.as_str()).collect()
    }

    /// List all indices as (kind, name, description)
    pub fn list_indices(&self) -> Vec<(&'static str, &str, &str)> {
        let diversity = self
            .diversity
            .values()
            .map(|i| ("diversity", i.name(), i.description()));
        let dissimilarity = self
            .dissimilarity
            .values()
            .map(|i| ("dissimilarity", i.name(), i.description()));
        diversity.chain(dissimilarity).collect()
    }
}

impl Default for IndexRegistry {
    fn default() -> Self {
        Self::new()
    }
}
