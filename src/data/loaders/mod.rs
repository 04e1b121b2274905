// mod.rs - Observation table loaders

pub mod columns;
pub mod delimited;

pub use columns::{ColumnMap, ColumnOverrides, ColumnStyle};
pub use delimited::{delimiter_for_path, load_observations};
