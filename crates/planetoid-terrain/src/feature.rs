//! Terrain feature generators: seventeen noise-driven features with ordered
//! compatibility rules, plus the secondary labels the valley generator emits.
//!
//! Generators within a tier run alphabetically by name so results never depend
//! on registration order.

mod accumulator;
mod generator;
mod kind;
mod rules;

pub use accumulator::FeatureAccumulator;
pub use generator::{FeatureContext, FeatureGenerator, FeatureOutcome, FeatureSet};
pub use kind::{FeatureKind, FeatureLabel};
pub use rules::FeatureRule;
