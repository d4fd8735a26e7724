//! Distance-banded subdivision level selection.

use crate::LodError;

/// Deepest level node identities can address.
pub const MAX_LEVEL: u8 = 30;

/// Ascending camera distance thresholds and the level range they map onto.
#[derive(Clone, Debug, PartialEq)]
pub struct LodThresholds {
    /// `thresholds[i]` bounds band `i`; band 0 is nearest.
    thresholds: Vec<f64>,
    min_level: u8,
}

impl LodThresholds {
    /// Validate thresholds and build the selector.
    ///
    /// The threshold count is the maximum level. `min_level` is clamped to it.
    ///
    /// # Errors
    ///
    /// Fails if the list is empty, longer than [`MAX_LEVEL`], or not made of
    /// positive, strictly increasing distances.
    pub fn try_new(thresholds: Vec<f64>, min_level: u8) -> Result<Self, LodError> {
        if thresholds.is_empty() {
            return Err(LodError::EmptyThresholds);
        }
        if thresholds.len() > MAX_LEVEL as usize {
            return Err(LodError::TooManyLevels {
                count: thresholds.len(),
                max: MAX_LEVEL,
            });
        }
        for (index, &value) in thresholds.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(LodError::NonPositiveThreshold { index, value });
            }
            if index > 0 && value <= thresholds[index - 1] {
                return Err(LodError::NonIncreasingThresholds {
                    index,
                    previous: thresholds[index - 1],
                    value,
                });
            }
        }

        let max_level = thresholds.len() as u8;
        Ok(Self {
            thresholds,
            min_level: min_level.min(max_level),
        })
    }

    /// Finest level (the threshold count).
    pub fn max_level(&self) -> u8 {
        self.thresholds.len() as u8
    }

    /// Coarsest level any leaf may have.
    pub fn min_level(&self) -> u8 {
        self.min_level
    }

    /// The distance thresholds, nearest band first.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Level a patch at `distance` from the camera should reach.
    ///
    /// Band `i` (the first threshold the distance is below) maps to
    /// `max_level - i`, clamped to `[min_level, max_level]`. Distances beyond
    /// every threshold, and NaN, map to `min_level`.
    pub fn desired_level(&self, distance: f64) -> u8 {
        let max = self.max_level();
        self.thresholds
            .iter()
            .position(|&threshold| distance < threshold)
            .map_or(self.min_level, |band| (max - band as u8).max(self.min_level))
    }
}
