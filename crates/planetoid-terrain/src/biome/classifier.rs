//! Maps a surface position and its height to a [`BiomeKind`].

use glam::DVec3;
use planetoid_geometry::latitude_degrees;

use super::BiomeKind;

/// Heights above this are highland regardless of latitude.
pub const HIGHLAND_HEIGHT: f64 = 0.03;
/// Heights below this are rift regardless of latitude.
pub const RIFT_HEIGHT: f64 = -0.03;

const POLAR_LATITUDE: f64 = 60.0;
const EQUATORIAL_LATITUDE: f64 = 30.0;

/// Classifies positions by height first, then by latitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeClassifier {
    rotation_axis: DVec3,
}

impl BiomeClassifier {
    /// Create a classifier measuring latitude against `rotation_axis`.
    pub fn new(rotation_axis: DVec3) -> Self {
        Self { rotation_axis }
    }

    /// The rotation axis latitude is measured against.
    pub fn rotation_axis(&self) -> DVec3 {
        self.rotation_axis
    }

    /// Latitude in degrees of a surface normal.
    pub fn latitude(&self, normal: DVec3) -> f64 {
        latitude_degrees(normal, self.rotation_axis)
    }

    /// Classify a position given its surface normal and relative height.
    pub fn classify(&self, normal: DVec3, height: f64) -> BiomeKind {
        if height > HIGHLAND_HEIGHT {
            return BiomeKind::Highland;
        }
        if height < RIFT_HEIGHT {
            return BiomeKind::Rift;
        }

        let latitude = self.latitude(normal).abs();
        if latitude > POLAR_LATITUDE {
            BiomeKind::Polar
        } else if latitude < EQUATORIAL_LATITUDE {
            BiomeKind::Equatorial
        } else {
            BiomeKind::Temperate
        }
    }
}

impl Default for BiomeClassifier {
    fn default() -> Self {
        Self::new(DVec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_latitude(degrees: f64) -> DVec3 {
        let r = degrees.to_radians();
        DVec3::new(r.cos(), 0.0, r.sin())
    }

    #[test]
    fn test_height_checked_before_latitude() {
        let c = BiomeClassifier::default();
        assert_eq!(c.classify(DVec3::Z, 0.05), BiomeKind::Highland);
        assert_eq!(c.classify(DVec3::X, -0.05), BiomeKind::Rift);
    }

    #[test]
    fn test_latitude_bands() {
        let c = BiomeClassifier::default();
        assert_eq!(c.classify(at_latitude(75.0), 0.0), BiomeKind::Polar);
        assert_eq!(c.classify(at_latitude(-75.0), 0.0), BiomeKind::Polar);
        assert_eq!(c.classify(at_latitude(10.0), 0.0), BiomeKind::Equatorial);
        assert_eq!(c.classify(at_latitude(45.0), 0.0), BiomeKind::Temperate);
        assert_eq!(c.classify(at_latitude(-45.0), 0.01), BiomeKind::Temperate);
    }

    #[test]
    fn test_custom_rotation_axis() {
        let c = BiomeClassifier::new(DVec3::X);
        assert_eq!(c.classify(DVec3::X, 0.0), BiomeKind::Polar);
        assert_eq!(c.classify(DVec3::Z, 0.0), BiomeKind::Equatorial);
    }
}
