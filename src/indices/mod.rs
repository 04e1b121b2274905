// mod.rs - Community index module root

pub mod bray_curtis;
pub mod jaccard;
pub mod registry;
pub mod shannon;
pub mod simpson;
pub mod traits;

// Re-export main types for convenience
pub use bray_curtis::BrayCurtis;
pub use jaccard::Jaccard;
pub use registry::IndexRegistry;
pub use shannon::Shannon;
pub use simpson::{InverseSimpson, Simpson};
pub use traits::{DissimilarityIndex, DiversityIndex};
