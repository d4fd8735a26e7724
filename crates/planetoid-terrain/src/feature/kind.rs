//! Feature kinds and the labels stored on terrain records.

use std::fmt;

/// One of the feature generators.
///
/// Variants are declared in alphabetical order of their names, so the derived
/// `Ord` is the evaluation order within a tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
    Canyon,
    Crater,
    Dune,
    Fjord,
    Geyser,
    Glacier,
    Hills,
    Karst,
    Lake,
    Mesa,
    Mountain,
    Plateau,
    Reef,
    TectonicPlate,
    Valley,
    Volcano,
    Wetland,
}

impl FeatureKind {
    /// Every generator kind, alphabetically.
    pub const ALL: [FeatureKind; 17] = [
        FeatureKind::Canyon,
        FeatureKind::Crater,
        FeatureKind::Dune,
        FeatureKind::Fjord,
        FeatureKind::Geyser,
        FeatureKind::Glacier,
        FeatureKind::Hills,
        FeatureKind::Karst,
        FeatureKind::Lake,
        FeatureKind::Mesa,
        FeatureKind::Mountain,
        FeatureKind::Plateau,
        FeatureKind::Reef,
        FeatureKind::TectonicPlate,
        FeatureKind::Valley,
        FeatureKind::Volcano,
        FeatureKind::Wetland,
    ];

    /// Identity name used for ordering, toggles and configuration.
    pub fn name(self) -> &'static str {
        match self {
            FeatureKind::Canyon => "canyon",
            FeatureKind::Crater => "crater",
            FeatureKind::Dune => "dune",
            FeatureKind::Fjord => "fjord",
            FeatureKind::Geyser => "geyser",
            FeatureKind::Glacier => "glacier",
            FeatureKind::Hills => "hills",
            FeatureKind::Karst => "karst",
            FeatureKind::Lake => "lake",
            FeatureKind::Mesa => "mesa",
            FeatureKind::Mountain => "mountain",
            FeatureKind::Plateau => "plateau",
            FeatureKind::Reef => "reef",
            FeatureKind::TectonicPlate => "tectonic_plate",
            FeatureKind::Valley => "valley",
            FeatureKind::Volcano => "volcano",
            FeatureKind::Wetland => "wetland",
        }
    }

    /// Look a generator up by its identity name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A label attached to a terrain record.
///
/// Most labels come from a generator; `River`, `Tributary` and `Mouth` are
/// secondary labels pushed by the valley generator, and `Underwater` is kept
/// in sync with the water level by the terrain pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureLabel {
    Feature(FeatureKind),
    River,
    Tributary,
    Mouth,
    Underwater,
}

impl FeatureLabel {
    /// Label name as used in configuration (`age_multipliers`).
    pub fn name(self) -> &'static str {
        match self {
            FeatureLabel::Feature(kind) => kind.name(),
            FeatureLabel::River => "river",
            FeatureLabel::Tributary => "tributary",
            FeatureLabel::Mouth => "mouth",
            FeatureLabel::Underwater => "underwater",
        }
    }

    /// Parse a label name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "river" => Some(FeatureLabel::River),
            "tributary" => Some(FeatureLabel::Tributary),
            "mouth" => Some(FeatureLabel::Mouth),
            "underwater" => Some(FeatureLabel::Underwater),
            other => FeatureKind::from_name(other).map(FeatureLabel::Feature),
        }
    }

    /// The generator kind, if this label came from one directly.
    pub fn kind(self) -> Option<FeatureKind> {
        match self {
            FeatureLabel::Feature(kind) => Some(kind),
            _ => None,
        }
    }
}

impl From<FeatureKind> for FeatureLabel {
    fn from(kind: FeatureKind) -> Self {
        FeatureLabel::Feature(kind)
    }
}

impl fmt::Display for FeatureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
