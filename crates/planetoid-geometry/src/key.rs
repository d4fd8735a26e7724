//! Canonical vertex keys for deduplicating mesh corners.

use std::f64::consts::{PI, TAU};

use crate::ParamCoord;

/// Rounding grid for vertex keys, in radians.
pub const KEY_PRECISION: f64 = 1e-8;

/// Hashable identity of a surface position.
///
/// Pole positions collapse phi to zero, phi ≈ 2π folds onto zero, and both
/// angles are rounded to [`KEY_PRECISION`] so float noise from different
/// subdivision paths merges into one vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey {
    theta: i64,
    phi: i64,
}

impl VertexKey {
    /// Canonical key for a parameter coordinate.
    pub fn new(coord: ParamCoord) -> Self {
        let theta = coord.theta.clamp(0.0, PI);
        let at_pole = theta < KEY_PRECISION || PI - theta < KEY_PRECISION;

        let phi = if at_pole {
            0.0
        } else {
            let wrapped = coord.phi.rem_euclid(TAU);
            if TAU - wrapped < KEY_PRECISION {
                0.0
            } else {
                wrapped
            }
        };

        let theta = if theta < KEY_PRECISION {
            0.0
        } else if PI - theta < KEY_PRECISION {
            PI
        } else {
            theta
        };

        Self {
            theta: quantize(theta),
            phi: quantize(phi),
        }
    }

    /// The canonical coordinate this key stands for.
    pub fn coord(&self) -> ParamCoord {
        ParamCoord::new(
            self.theta as f64 * KEY_PRECISION,
            self.phi as f64 * KEY_PRECISION,
        )
    }

    /// Whether the key sits on either pole.
    pub fn is_pole(&self) -> bool {
        self.theta == 0 || self.theta == quantize(PI)
    }
}

fn quantize(v: f64) -> i64 {
    (v / KEY_PRECISION).round() as i64
}
