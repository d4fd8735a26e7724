//! Surface temperature from latitude, sun angle, altitude and primary feature.

use glam::DVec3;

use crate::{FeatureKind, FeatureLabel};

/// Temperature at the equator, at sea level, with the sun on the horizon.
const BASE_TEMPERATURE: f64 = 30.0;
/// Cooling per degree of latitude.
const LATITUDE_LAPSE: f64 = 0.6;
/// Warming at full solar incidence.
const SOLAR_GAIN: f64 = 12.0;
/// Cooling per unit of relative height above zero.
const ALTITUDE_LAPSE: f64 = 400.0;

/// Cosine of the angle between a surface normal and the sun direction,
/// clamped to `[0, 1]` (night side is 0).
pub fn solar_incidence(normal: DVec3, incident: DVec3) -> f64 {
    let n = normal.normalize_or_zero();
    let s = incident.normalize_or_zero();
    n.dot(s).clamp(0.0, 1.0)
}

/// Temperature in degrees for a position.
///
/// `primary` is the first label on the record; it shifts the result by a
/// fixed per-feature offset.
pub fn temperature(
    height: f64,
    latitude_degrees: f64,
    incidence: f64,
    primary: Option<FeatureLabel>,
) -> f64 {
    BASE_TEMPERATURE - LATITUDE_LAPSE * latitude_degrees.abs() + SOLAR_GAIN * incidence
        - ALTITUDE_LAPSE * height.max(0.0)
        + primary.map_or(0.0, feature_offset)
}

fn feature_offset(label: FeatureLabel) -> f64 {
    match label {
        FeatureLabel::Feature(FeatureKind::Volcano) => 15.0,
        FeatureLabel::Feature(FeatureKind::Geyser) => 8.0,
        FeatureLabel::Feature(FeatureKind::Dune) => 6.0,
        FeatureLabel::Feature(FeatureKind::Reef) => 2.0,
        FeatureLabel::Feature(FeatureKind::Wetland) => 1.0,
        FeatureLabel::Feature(FeatureKind::Lake) => -1.0,
        FeatureLabel::Feature(FeatureKind::Fjord) => -4.0,
        FeatureLabel::Feature(FeatureKind::Glacier) => -12.0,
        FeatureLabel::Underwater => 4.0,
        FeatureLabel::River => -1.0,
        _ => 0.0,
    }
}
