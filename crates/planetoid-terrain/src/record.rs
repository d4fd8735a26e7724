//! Cached per-position terrain state and the snapshot handed to callers.

use crate::{BiomeKind, FeatureLabel};

/// Incrementally refined terrain state of one position.
///
/// `tier_heights[t]` is the committed contribution of tier `t`; once pushed it
/// is never rewritten, so refining a record only appends.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainRecord {
    /// Surface height after water blending, as a fraction of the radius.
    pub height: f64,
    /// Labels in application order; the first is the primary feature.
    pub features: Vec<FeatureLabel>,
    /// Temperature in degrees.
    pub temperature: f64,
    /// Biome classified from the current raw height.
    pub biome: BiomeKind,
    /// Committed per-tier height contributions.
    pub tier_heights: Vec<f64>,
}

impl TerrainRecord {
    /// Finest tier computed so far, `None` before tier 0.
    pub fn highest_tier(&self) -> Option<u8> {
        self.tier_heights.len().checked_sub(1).map(|t| t as u8)
    }

    /// Sum of every committed tier, before water blending.
    pub fn raw_height(&self) -> f64 {
        self.tier_heights.iter().sum()
    }

    /// First-applied label.
    pub fn primary_feature(&self) -> Option<FeatureLabel> {
        self.features.first().copied()
    }

    /// Second-applied label.
    pub fn secondary_feature(&self) -> Option<FeatureLabel> {
        self.features.get(1).copied()
    }

    /// Whether the position sits below the water level.
    pub fn is_underwater(&self) -> bool {
        self.features.contains(&FeatureLabel::Underwater)
    }

    /// Whether a label is present.
    pub fn has_feature(&self, label: FeatureLabel) -> bool {
        self.features.contains(&label)
    }
}

/// Read-only result of a terrain query.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainSample {
    /// Surface height after water blending.
    pub height: f64,
    /// Labels in application order.
    pub features: Vec<FeatureLabel>,
    /// Temperature in degrees.
    pub temperature: f64,
    /// Biome label.
    pub biome: BiomeKind,
    /// Finest tier the record holds.
    pub tier: u8,
    /// Camera distance the query was made with.
    pub distance: f64,
}

impl TerrainSample {
    /// Snapshot a record for a query made at `distance`.
    pub fn from_record(record: &TerrainRecord, distance: f64) -> Self {
        Self {
            height: record.height,
            features: record.features.clone(),
            temperature: record.temperature,
            biome: record.biome,
            tier: record.highest_tier().unwrap_or(0),
            distance,
        }
    }

    /// First-applied label.
    pub fn primary_feature(&self) -> Option<FeatureLabel> {
        self.features.first().copied()
    }

    /// Second-applied label.
    pub fn secondary_feature(&self) -> Option<FeatureLabel> {
        self.features.get(1).copied()
    }

    /// Whether the position sits below the water level.
    pub fn is_underwater(&self) -> bool {
        self.features.contains(&FeatureLabel::Underwater)
    }
}
