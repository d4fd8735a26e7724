//! Distance-gated terrain detail tiers.

use crate::TerrainError;

/// Maps camera distance to the finest terrain tier that must be computed.
///
/// With `n` ascending distances there are tiers `0..=n`: tier 0 is the
/// planetary base, always computed; a distance below `distances[i]` requires
/// tier `n - i`, so the nearest band gets the finest tier.
#[derive(Clone, Debug, PartialEq)]
pub struct TierSchedule {
    distances: Vec<f64>,
}

impl TierSchedule {
    /// Validate and build a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidTierDistances`] if the list is empty or
    /// longer than 255 entries, or if any distance is non-positive, non-finite,
    /// or not strictly above the last.
    pub fn try_new(distances: Vec<f64>) -> Result<Self, TerrainError> {
        let positive = distances.iter().all(|d| d.is_finite() && *d > 0.0);
        let ascending = distances.windows(2).all(|w| w[0] < w[1]);
        let len_ok = (1..=u8::MAX as usize).contains(&distances.len());
        if !len_ok || !positive || !ascending {
            return Err(TerrainError::InvalidTierDistances(distances));
        }
        Ok(Self { distances })
    }

    /// The finest tier.
    pub fn finest_tier(&self) -> u8 {
        self.distances.len() as u8
    }

    /// Distance thresholds, nearest first.
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Tier required at a camera distance. NaN and distances beyond the
    /// farthest threshold need only tier 0.
    pub fn required_tier(&self, distance: f64) -> u8 {
        let finest = self.finest_tier();
        self.distances
            .iter()
            .position(|&threshold| distance < threshold)
            .map_or(0, |i| finest - i as u8)
    }

    /// Fine-detail amplitude scale for tier `tier` (`>= 1`): the ratio of the
    /// nearest distance to the distance that unlocks the tier, so the
    /// nearest tier gets full amplitude.
    pub fn detail_scale(&self, tier: u8) -> f64 {
        let finest = self.finest_tier();
        if tier == 0 || tier > finest {
            return 0.0;
        }
        let gate = self.distances[(finest - tier) as usize];
        self.distances[0] / gate
    }
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self {
            distances: vec![3.0, 8.0, 20.0],
        }
    }
}
