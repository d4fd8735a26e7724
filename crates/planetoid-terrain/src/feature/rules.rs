//! Static generation rules for each feature kind.

use super::{FeatureKind, FeatureLabel};

const CANYON: FeatureLabel = FeatureLabel::Feature(FeatureKind::Canyon);
const CRATER: FeatureLabel = FeatureLabel::Feature(FeatureKind::Crater);
const DUNE: FeatureLabel = FeatureLabel::Feature(FeatureKind::Dune);
const FJORD: FeatureLabel = FeatureLabel::Feature(FeatureKind::Fjord);
const GEYSER: FeatureLabel = FeatureLabel::Feature(FeatureKind::Geyser);
const GLACIER: FeatureLabel = FeatureLabel::Feature(FeatureKind::Glacier);
const HILLS: FeatureLabel = FeatureLabel::Feature(FeatureKind::Hills);
const LAKE: FeatureLabel = FeatureLabel::Feature(FeatureKind::Lake);
const MESA: FeatureLabel = FeatureLabel::Feature(FeatureKind::Mesa);
const MOUNTAIN: FeatureLabel = FeatureLabel::Feature(FeatureKind::Mountain);
const PLATEAU: FeatureLabel = FeatureLabel::Feature(FeatureKind::Plateau);
const TECTONIC: FeatureLabel = FeatureLabel::Feature(FeatureKind::TectonicPlate);
const VALLEY: FeatureLabel = FeatureLabel::Feature(FeatureKind::Valley);
const VOLCANO: FeatureLabel = FeatureLabel::Feature(FeatureKind::Volcano);
const WETLAND: FeatureLabel = FeatureLabel::Feature(FeatureKind::Wetland);
const RIVER: FeatureLabel = FeatureLabel::River;
const TRIBUTARY: FeatureLabel = FeatureLabel::Tributary;
const MOUTH: FeatureLabel = FeatureLabel::Mouth;
const UNDERWATER: FeatureLabel = FeatureLabel::Underwater;

/// Fixed parameters of one feature generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureRule {
    /// Detail tier the generator runs in (1 = coarsest feature tier).
    pub tier: u8,
    /// Frequency of the generator's noise channel on the unit sphere.
    pub frequency: f64,
    /// Additive coordinate offset decorrelating the channel.
    pub salt: f64,
    /// `[0, 1]` noise value the channel must exceed, before biome scaling.
    pub threshold: f64,
    /// Peak height change, as a fraction of the radius.
    pub amplitude: f64,
    /// Every existing label must be in this list.
    pub allowed_with: &'static [FeatureLabel],
    /// No existing label may be in this list.
    pub prohibited_with: &'static [FeatureLabel],
}

impl FeatureKind {
    /// The generation rule for this kind.
    pub fn rule(self) -> FeatureRule {
        match self {
            // Tier 1: continental scale.
            FeatureKind::Crater => FeatureRule {
                tier: 1,
                frequency: 3.1,
                salt: 11.3,
                threshold: 0.72,
                amplitude: 0.015,
                allowed_with: &[TECTONIC, MOUNTAIN, PLATEAU, UNDERWATER],
                prohibited_with: &[VOLCANO],
            },
            FeatureKind::Mountain => FeatureRule {
                tier: 1,
                frequency: 2.3,
                salt: 23.9,
                threshold: 0.64,
                amplitude: 0.03,
                allowed_with: &[CRATER, TECTONIC, VOLCANO, PLATEAU],
                prohibited_with: &[UNDERWATER, LAKE],
            },
            FeatureKind::Plateau => FeatureRule {
                tier: 1,
                frequency: 1.9,
                salt: 37.1,
                threshold: 0.68,
                amplitude: 0.012,
                allowed_with: &[CRATER, MOUNTAIN, TECTONIC],
                prohibited_with: &[VOLCANO, UNDERWATER],
            },
            FeatureKind::TectonicPlate => FeatureRule {
                tier: 1,
                frequency: 1.3,
                salt: 52.7,
                threshold: 0.6,
                amplitude: 0.01,
                allowed_with: &[CRATER, MOUNTAIN, PLATEAU, VOLCANO, UNDERWATER],
                prohibited_with: &[],
            },
            FeatureKind::Volcano => FeatureRule {
                tier: 1,
                frequency: 4.7,
                salt: 68.3,
                threshold: 0.76,
                amplitude: 0.025,
                allowed_with: &[TECTONIC, MOUNTAIN, UNDERWATER],
                prohibited_with: &[CRATER, PLATEAU, GLACIER],
            },

            // Tier 2: regional scale.
            FeatureKind::Canyon => FeatureRule {
                tier: 2,
                frequency: 6.1,
                salt: 81.7,
                threshold: 0.7,
                amplitude: 0.012,
                allowed_with: &[TECTONIC, PLATEAU, MESA, CRATER, MOUNTAIN],
                prohibited_with: &[UNDERWATER, GLACIER, LAKE],
            },
            FeatureKind::Fjord => FeatureRule {
                tier: 2,
                frequency: 7.3,
                salt: 97.1,
                threshold: 0.66,
                amplitude: 0.01,
                allowed_with: &[MOUNTAIN, GLACIER, TECTONIC, UNDERWATER, VALLEY, PLATEAU],
                prohibited_with: &[VOLCANO, DUNE],
            },
            FeatureKind::Glacier => FeatureRule {
                tier: 2,
                frequency: 5.3,
                salt: 113.9,
                threshold: 0.55,
                amplitude: 0.004,
                allowed_with: &[MOUNTAIN, PLATEAU, TECTONIC, CRATER, CANYON, FJORD, VALLEY],
                prohibited_with: &[VOLCANO, UNDERWATER, GEYSER],
            },
            FeatureKind::Lake => FeatureRule {
                tier: 2,
                frequency: 8.9,
                salt: 127.3,
                threshold: 0.7,
                amplitude: 0.006,
                allowed_with: &[CRATER, TECTONIC, PLATEAU, VALLEY, GLACIER, CANYON],
                prohibited_with: &[UNDERWATER, VOLCANO, MOUNTAIN],
            },
            FeatureKind::Mesa => FeatureRule {
                tier: 2,
                frequency: 9.7,
                salt: 141.1,
                threshold: 0.72,
                amplitude: 0.01,
                allowed_with: &[PLATEAU, TECTONIC, CANYON, CRATER],
                prohibited_with: &[UNDERWATER, GLACIER, LAKE, MOUNTAIN],
            },
            FeatureKind::Valley => FeatureRule {
                tier: 2,
                frequency: 5.9,
                salt: 157.9,
                threshold: 0.62,
                amplitude: 0.008,
                allowed_with: &[
                    MOUNTAIN, TECTONIC, PLATEAU, CRATER, CANYON, GLACIER, FJORD, LAKE, MESA,
                ],
                prohibited_with: &[UNDERWATER, VOLCANO],
            },

            // Tier 3: local scale.
            FeatureKind::Dune => FeatureRule {
                tier: 3,
                frequency: 21.0,
                salt: 171.7,
                threshold: 0.6,
                amplitude: 0.003,
                allowed_with: &[TECTONIC, PLATEAU, CRATER, MESA, CANYON],
                prohibited_with: &[UNDERWATER, GLACIER, LAKE, WETLAND, RIVER],
            },
            FeatureKind::Geyser => FeatureRule {
                tier: 3,
                frequency: 29.0,
                salt: 187.3,
                threshold: 0.8,
                amplitude: 0.001,
                allowed_with: &[VOLCANO, TECTONIC, MOUNTAIN, PLATEAU, CRATER, VALLEY, RIVER],
                prohibited_with: &[UNDERWATER, LAKE, GLACIER],
            },
            FeatureKind::Hills => FeatureRule {
                tier: 3,
                frequency: 14.0,
                salt: 199.1,
                threshold: 0.62,
                amplitude: 0.004,
                allowed_with: &[
                    TECTONIC, PLATEAU, CRATER, VALLEY, RIVER, TRIBUTARY, DUNE, GEYSER, CANYON,
                    MESA, MOUNTAIN,
                ],
                prohibited_with: &[UNDERWATER, LAKE, GLACIER],
            },
            FeatureKind::Karst => FeatureRule {
                tier: 3,
                frequency: 17.0,
                salt: 211.9,
                threshold: 0.7,
                amplitude: 0.003,
                allowed_with: &[TECTONIC, PLATEAU, MESA, CANYON, HILLS, VALLEY, RIVER, TRIBUTARY],
                prohibited_with: &[UNDERWATER, VOLCANO, GLACIER, DUNE],
            },
            FeatureKind::Reef => FeatureRule {
                tier: 3,
                frequency: 19.0,
                salt: 227.3,
                threshold: 0.58,
                amplitude: 0.004,
                allowed_with: &[UNDERWATER, TECTONIC, CRATER, VOLCANO],
                prohibited_with: &[GLACIER, LAKE],
            },
            FeatureKind::Wetland => FeatureRule {
                tier: 3,
                frequency: 12.0,
                salt: 239.9,
                threshold: 0.6,
                amplitude: 0.002,
                allowed_with: &[
                    VALLEY, RIVER, TRIBUTARY, MOUTH, LAKE, TECTONIC, PLATEAU, HILLS, CRATER,
                ],
                prohibited_with: &[UNDERWATER, DUNE, GLACIER, VOLCANO, MESA],
            },
        }
    }
}
