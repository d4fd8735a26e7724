//! Spherical parameter coordinates on the ellipsoid surface.

use std::f64::consts::{PI, TAU};

use glam::DVec3;

/// A position in the (theta, phi) parameter domain.
///
/// `theta` is the polar angle in `[0, π]` measured from the +Z pole.
/// `phi` is the azimuth in `[0, 2π]`; `2π` is accepted so that patch corners on
/// the wrap edge can be addressed, and is equivalent to `0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamCoord {
    /// Polar angle in radians.
    pub theta: f64,
    /// Azimuthal angle in radians.
    pub phi: f64,
}

impl ParamCoord {
    /// Create a coordinate without normalization.
    pub const fn new(theta: f64, phi: f64) -> Self {
        Self { theta, phi }
    }

    /// Clamp theta into `[0, π]` and wrap phi into `[0, 2π)`.
    pub fn normalized(self) -> Self {
        let theta = self.theta.clamp(0.0, PI);
        let mut phi = self.phi.rem_euclid(TAU);
        if phi >= TAU {
            phi = 0.0;
        }
        Self { theta, phi }
    }

    /// Unit direction for this coordinate on the unit sphere.
    ///
    /// Uses `libm` so the result is identical across platforms.
    pub fn unit_direction(self) -> DVec3 {
        let (sin_t, cos_t) = (libm::sin(self.theta), libm::cos(self.theta));
        let (sin_p, cos_p) = (libm::sin(self.phi), libm::cos(self.phi));
        DVec3::new(sin_t * cos_p, sin_t * sin_p, cos_t)
    }

    /// Recover the parameter coordinate of a direction (need not be unit length).
    pub fn from_direction(dir: DVec3) -> Self {
        let len = dir.length();
        if len == 0.0 || !len.is_finite() {
            return Self::new(0.0, 0.0);
        }
        let theta = libm::acos((dir.z / len).clamp(-1.0, 1.0));
        let phi = libm::atan2(dir.y, dir.x).rem_euclid(TAU);
        Self::new(theta, phi).normalized()
    }
}

/// Latitude in degrees (`-90..=90`) of a surface normal relative to a rotation axis.
///
/// Zero on the plane perpendicular to the axis, +90 along the axis.
pub fn latitude_degrees(normal: DVec3, axis: DVec3) -> f64 {
    let n = normal.normalize_or_zero();
    let a = axis.normalize_or_zero();
    if n == DVec3::ZERO || a == DVec3::ZERO {
        return 0.0;
    }
    let angle = libm::acos(n.dot(a).clamp(-1.0, 1.0));
    90.0 - angle.to_degrees()
}
