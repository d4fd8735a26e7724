//! The shared, read-only biome parameter table.

use super::{BiomeKind, BiomeParams};
use crate::FeatureKind;

/// Generation parameters for every [`BiomeKind`].
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeTable {
    params: [BiomeParams; 5],
}

impl BiomeTable {
    /// Build a table from explicit per-biome parameters, in [`BiomeKind::ALL`] order.
    pub fn from_params(params: [BiomeParams; 5]) -> Self {
        Self { params }
    }

    /// Parameters for a biome.
    pub fn get(&self, biome: BiomeKind) -> &BiomeParams {
        &self.params[biome.index()]
    }

    /// Probability modifier of `kind` in `biome`.
    pub fn modifier(&self, biome: BiomeKind, kind: FeatureKind) -> f64 {
        self.get(biome).modifier(kind)
    }

    /// Largest amplitude scale over all biomes, used for height bounds.
    pub fn max_amplitude_scale(&self) -> f64 {
        self.params
            .iter()
            .map(|p| p.amplitude_scale)
            .fold(0.0, f64::max)
    }

    /// Largest feature modifier over all biomes and kinds.
    pub fn max_modifier(&self) -> f64 {
        self.params
            .iter()
            .flat_map(|p| p.feature_modifiers.values().copied())
            .fold(1.0, f64::max)
    }
}

impl Default for BiomeTable {
    fn default() -> Self {
        use FeatureKind::*;

        let polar = BiomeParams::new(0.7, 0.9, 4)
            .with_modifier(Glacier, 2.5)
            .with_modifier(Fjord, 2.0)
            .with_modifier(Dune, 0.1)
            .with_modifier(Reef, 0.0)
            .with_modifier(Wetland, 0.5)
            .with_modifier(Volcano, 0.8);

        let equatorial = BiomeParams::new(1.0, 1.1, 5)
            .with_modifier(Reef, 2.0)
            .with_modifier(Dune, 1.8)
            .with_modifier(Wetland, 1.5)
            .with_modifier(Glacier, 0.1)
            .with_modifier(Fjord, 0.2);

        let temperate = BiomeParams::new(1.0, 1.0, 5)
            .with_modifier(Valley, 1.4)
            .with_modifier(Lake, 1.3)
            .with_modifier(Hills, 1.5)
            .with_modifier(Karst, 1.2);

        let highland = BiomeParams::new(1.5, 1.2, 6)
            .with_modifier(Mountain, 2.0)
            .with_modifier(Volcano, 1.5)
            .with_modifier(Plateau, 1.6)
            .with_modifier(Mesa, 1.4)
            .with_modifier(Glacier, 1.5)
            .with_modifier(Reef, 0.1)
            .with_modifier(Wetland, 0.3);

        let rift = BiomeParams::new(1.3, 1.4, 6)
            .with_modifier(Canyon, 2.0)
            .with_modifier(Volcano, 1.8)
            .with_modifier(Geyser, 2.0)
            .with_modifier(TectonicPlate, 1.5)
            .with_modifier(Lake, 1.3);

        Self::from_params([polar, equatorial, temperate, highland, rift])
    }
}
