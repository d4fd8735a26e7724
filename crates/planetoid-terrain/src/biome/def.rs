//! Biome categories and the generation parameters each one carries.

use std::fmt;

use hashbrown::HashMap;

use crate::FeatureKind;

/// Coarse climate/terrain category of a surface position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BiomeKind {
    Polar,
    Equatorial,
    Temperate,
    Highland,
    Rift,
}

impl BiomeKind {
    /// Every biome, in table order.
    pub const ALL: [BiomeKind; 5] = [
        BiomeKind::Polar,
        BiomeKind::Equatorial,
        BiomeKind::Temperate,
        BiomeKind::Highland,
        BiomeKind::Rift,
    ];

    /// Position in [`BiomeKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            BiomeKind::Polar => 0,
            BiomeKind::Equatorial => 1,
            BiomeKind::Temperate => 2,
            BiomeKind::Highland => 3,
            BiomeKind::Rift => 4,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            BiomeKind::Polar => "polar",
            BiomeKind::Equatorial => "equatorial",
            BiomeKind::Temperate => "temperate",
            BiomeKind::Highland => "highland",
            BiomeKind::Rift => "rift",
        }
    }
}

impl fmt::Display for BiomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generation parameters for one biome.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeParams {
    /// Multiplier on the planetary noise amplitude.
    pub amplitude_scale: f64,
    /// Multiplier on the planetary noise frequency.
    pub frequency_scale: f64,
    /// Planetary octave count, capped by the configured octave count.
    pub octaves: u32,
    /// Per-feature probability modifiers. A modifier above 1 makes the feature
    /// more likely, below 1 less likely, 0 suppresses it.
    pub feature_modifiers: HashMap<FeatureKind, f64>,
}

impl BiomeParams {
    /// Parameters with no feature modifiers.
    pub fn new(amplitude_scale: f64, frequency_scale: f64, octaves: u32) -> Self {
        Self {
            amplitude_scale,
            frequency_scale,
            octaves,
            feature_modifiers: HashMap::new(),
        }
    }

    /// Builder-style modifier override.
    pub fn with_modifier(mut self, kind: FeatureKind, modifier: f64) -> Self {
        self.feature_modifiers.insert(kind, modifier);
        self
    }

    /// Probability modifier for a feature; 1.0 when unspecified.
    pub fn modifier(&self, kind: FeatureKind) -> f64 {
        self.feature_modifiers.get(&kind).copied().unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, kind) in BiomeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i, "{kind} out of order");
        }
    }

    #[test]
    fn test_modifier_defaults_to_one() {
        let params = BiomeParams::new(1.0, 1.0, 5).with_modifier(FeatureKind::Reef, 0.0);
        assert_eq!(params.modifier(FeatureKind::Reef), 0.0);
        assert_eq!(params.modifier(FeatureKind::Crater), 1.0);
    }
}
