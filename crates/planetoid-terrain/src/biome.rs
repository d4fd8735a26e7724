//! Biome classification and per-biome generation parameters.
//!
//! One [`BiomeTable`] is built per terrain generator and shared read-only with
//! everything that needs it.

mod classifier;
mod def;
mod table;

pub use classifier::{BiomeClassifier, HIGHLAND_HEIGHT, RIFT_HEIGHT};
pub use def::{BiomeKind, BiomeParams};
pub use table::BiomeTable;
