//! Ellipsoid definition: the base shape every terrain height displaces.

use glam::DVec3;

use crate::ParamCoord;

/// Errors raised while validating an ellipsoid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// A semi-axis is zero or negative.
    #[error("semi-axis {axis} must be positive, got {value}")]
    NonPositiveSemiAxis {
        /// Axis name (`a`, `b` or `c`).
        axis: char,
        /// Offending value.
        value: f64,
    },
    /// A semi-axis is NaN or infinite.
    #[error("semi-axis {axis} must be finite, got {value}")]
    NonFiniteSemiAxis {
        /// Axis name (`a`, `b` or `c`).
        axis: char,
        /// Offending value.
        value: f64,
    },
}

/// An axis-aligned ellipsoid centred on the origin.
///
/// Construction validates the semi-axes, so every instance has three finite,
/// positive semi-axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    semi_axes: DVec3,
}

impl Ellipsoid {
    /// Create an ellipsoid from its semi-axes along x, y and z.
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self, GeometryError> {
        for (axis, value) in [('a', a), ('b', b), ('c', c)] {
            if !value.is_finite() {
                return Err(GeometryError::NonFiniteSemiAxis { axis, value });
            }
            if value <= 0.0 {
                return Err(GeometryError::NonPositiveSemiAxis { axis, value });
            }
        }
        Ok(Self {
            semi_axes: DVec3::new(a, b, c),
        })
    }

    /// A sphere of the given radius.
    pub fn sphere(radius: f64) -> Result<Self, GeometryError> {
        Self::new(radius, radius, radius)
    }

    /// Build from a `[a, b, c]` array, as stored in configuration.
    pub fn from_array(axes: [f64; 3]) -> Result<Self, GeometryError> {
        Self::new(axes[0], axes[1], axes[2])
    }

    /// The semi-axes as a vector.
    pub fn semi_axes(&self) -> DVec3 {
        self.semi_axes
    }

    /// Smallest semi-axis.
    pub fn min_radius(&self) -> f64 {
        self.semi_axes.min_element()
    }

    /// Largest semi-axis.
    pub fn max_radius(&self) -> f64 {
        self.semi_axes.max_element()
    }

    /// Arithmetic mean of the semi-axes.
    pub fn mean_radius(&self) -> f64 {
        (self.semi_axes.x + self.semi_axes.y + self.semi_axes.z) / 3.0
    }

    /// Point on the ellipsoid surface for a parameter coordinate.
    pub fn surface_point(&self, coord: ParamCoord) -> DVec3 {
        coord.unit_direction() * self.semi_axes
    }

    /// Surface point displaced by a relative height: `surface_point * (1 + height)`.
    pub fn displaced_point(&self, coord: ParamCoord, height: f64) -> DVec3 {
        self.surface_point(coord) * (1.0 + height)
    }

    /// Outward unit normal at a parameter coordinate.
    pub fn normal(&self, coord: ParamCoord) -> DVec3 {
        let p = self.surface_point(coord);
        let inv_sq = DVec3::ONE / (self.semi_axes * self.semi_axes);
        (p * inv_sq).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_rejects_non_positive_axis() {
        assert_eq!(
            Ellipsoid::new(1.0, 0.0, 1.0),
            Err(GeometryError::NonPositiveSemiAxis {
                axis: 'b',
                value: 0.0
            })
        );
        assert!(Ellipsoid::new(-2.0, 1.0, 1.0).is_err());
        assert!(Ellipsoid::new(1.0, 1.0, -0.5).is_err());
    }

    #[test]
    fn test_rejects_non_finite_axis() {
        assert!(matches!(
            Ellipsoid::new(f64::NAN, 1.0, 1.0),
            Err(GeometryError::NonFiniteSemiAxis { axis: 'a', .. })
        ));
        assert!(Ellipsoid::new(1.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_sphere_points_at_radius() {
        let e = Ellipsoid::sphere(10.0).unwrap();
        for i in 0..=10 {
            for j in 0..20 {
                let coord = ParamCoord::new(PI * i as f64 / 10.0, PI * j as f64 / 10.0);
                let len = e.surface_point(coord).length();
                assert!((len - 10.0).abs() < 1e-9, "length {len} at {coord:?}");
            }
        }
    }

    #[test]
    fn test_ellipsoid_axes_reached() {
        let e = Ellipsoid::new(3.0, 2.0, 1.0).unwrap();
        let px = e.surface_point(ParamCoord::new(PI / 2.0, 0.0));
        let py = e.surface_point(ParamCoord::new(PI / 2.0, PI / 2.0));
        let pz = e.surface_point(ParamCoord::new(0.0, 0.0));
        assert!((px - DVec3::new(3.0, 0.0, 0.0)).length() < 1e-12);
        assert!((py - DVec3::new(0.0, 2.0, 0.0)).length() < 1e-12);
        assert!((pz - DVec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
        assert_eq!(e.min_radius(), 1.0);
        assert_eq!(e.max_radius(), 3.0);
        assert!((e.mean_radius() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_displaced_point_scales_by_height() {
        let e = Ellipsoid::sphere(10.0).unwrap();
        let coord = ParamCoord::new(1.0, 2.0);
        let p = e.displaced_point(coord, 0.05);
        assert!((p.length() - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_normal_is_unit_and_outward() {
        let e = Ellipsoid::new(4.0, 2.0, 1.0).unwrap();
        let coord = ParamCoord::new(0.7, 0.4);
        let n = e.normal(coord);
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!(n.dot(e.surface_point(coord)) > 0.0);
    }
}
