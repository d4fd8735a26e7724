//! Procedural terrain generation: seeded noise, biome classification, ordered
//! feature generators, temperature, and a tiered per-position cache that only
//! ever appends finer detail.

mod cache;
mod error;
mod generator;
mod heightmap;
mod noise_source;
mod record;
mod temperature;
mod tiers;

pub mod biome;
pub mod feature;

pub use biome::{BiomeClassifier, BiomeKind, BiomeParams, BiomeTable};
pub use cache::{BucketKey, TerrainCache};
pub use error::TerrainError;
pub use feature::{
    FeatureAccumulator, FeatureContext, FeatureGenerator, FeatureKind, FeatureLabel,
    FeatureOutcome, FeatureSet,
};
pub use generator::TerrainGenerator;
pub use heightmap::{FbmParams, fbm};
pub use noise_source::NoiseSource;
pub use record::{TerrainRecord, TerrainSample};
pub use temperature::{solar_incidence, temperature};
pub use tiers::TierSchedule;
