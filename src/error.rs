// error.rs - Library error type

use std::io;
use thiserror::Error;

/// Errors surfaced to the analyst by the loading, cleaning and metric stages
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{column}' (header '{header}') not found in {path}")]
    MissingColumn {
        column: &'static str,
        header: String,
        path: String,
    },

    #[error("No checklists remain after {stage}")]
    EmptyAfterFiltering { stage: String },

    #[error("Locality '{0}' not found in the observation data")]
    UnknownLocality(String),

    #[error("Data spans {0} localities; set --locality to choose one")]
    AmbiguousLocality(usize),

    #[error("{engine} needs at least {required} checklists, found {found}")]
    InsufficientChecklists {
        engine: &'static str,
        required: usize,
        found: usize,
    },

    #[error("Unknown {kind} index '{name}'. Available: {available}")]
    UnknownIndex {
        kind: &'static str,
        name: String,
        available: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
