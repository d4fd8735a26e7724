//! Rectangular patches of the (theta, phi) parameter domain.

use std::f64::consts::{PI, TAU};

use crate::ParamCoord;

/// Tolerance for comparing patch boundaries.
pub const BOUNDARY_EPSILON: f64 = 1e-6;

/// One of the four children produced by splitting a patch at its midpoint.
///
/// North is towards smaller theta, west towards smaller phi.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Small theta, small phi.
    NorthWest,
    /// Small theta, large phi.
    NorthEast,
    /// Large theta, small phi.
    SouthWest,
    /// Large theta, large phi.
    SouthEast,
}

impl Quadrant {
    /// All quadrants in traversal order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Position of this quadrant in [`Quadrant::ALL`].
    pub fn index(self) -> usize {
        match self {
            Quadrant::NorthWest => 0,
            Quadrant::NorthEast => 1,
            Quadrant::SouthWest => 2,
            Quadrant::SouthEast => 3,
        }
    }
}

/// Angular extent of a quadtree patch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngularBounds {
    /// Smallest polar angle.
    pub theta_min: f64,
    /// Largest polar angle.
    pub theta_max: f64,
    /// Smallest azimuth.
    pub phi_min: f64,
    /// Largest azimuth.
    pub phi_max: f64,
}

impl AngularBounds {
    /// Create bounds from explicit ranges.
    pub const fn new(theta_min: f64, theta_max: f64, phi_min: f64, phi_max: f64) -> Self {
        Self {
            theta_min,
            theta_max,
            phi_min,
            phi_max,
        }
    }

    /// The whole parameter domain: theta `[0, π]`, phi `[0, 2π]`.
    pub const fn full() -> Self {
        Self::new(0.0, PI, 0.0, TAU)
    }

    /// Extent along theta.
    pub fn theta_span(&self) -> f64 {
        self.theta_max - self.theta_min
    }

    /// Extent along phi.
    pub fn phi_span(&self) -> f64 {
        self.phi_max - self.phi_min
    }

    /// Midpoint of the patch.
    pub fn center(&self) -> ParamCoord {
        ParamCoord::new(
            (self.theta_min + self.theta_max) * 0.5,
            (self.phi_min + self.phi_max) * 0.5,
        )
    }

    /// Split at the midpoint into four children ordered as [`Quadrant::ALL`].
    ///
    /// The children partition the parent exactly: shared edges use the same
    /// midpoint values and the outer edges are copied from the parent.
    pub fn split(&self) -> [AngularBounds; 4] {
        let mid = self.center();
        [
            Self::new(self.theta_min, mid.theta, self.phi_min, mid.phi),
            Self::new(self.theta_min, mid.theta, mid.phi, self.phi_max),
            Self::new(mid.theta, self.theta_max, self.phi_min, mid.phi),
            Self::new(mid.theta, self.theta_max, mid.phi, self.phi_max),
        ]
    }

    /// Which child quadrant a coordinate falls into.
    pub fn quadrant_of(&self, coord: ParamCoord) -> Quadrant {
        let mid = self.center();
        match (coord.theta >= mid.theta, coord.phi >= mid.phi) {
            (false, false) => Quadrant::NorthWest,
            (false, true) => Quadrant::NorthEast,
            (true, false) => Quadrant::SouthWest,
            (true, true) => Quadrant::SouthEast,
        }
    }

    /// Whether a coordinate lies inside the patch (edges inclusive).
    pub fn contains(&self, coord: ParamCoord) -> bool {
        coord.theta >= self.theta_min - BOUNDARY_EPSILON
            && coord.theta <= self.theta_max + BOUNDARY_EPSILON
            && coord.phi >= self.phi_min - BOUNDARY_EPSILON
            && coord.phi <= self.phi_max + BOUNDARY_EPSILON
    }

    /// Corners in mesh winding order: bottom-left, bottom-right, top-right, top-left.
    ///
    /// "Bottom" is the large-theta edge and "left" the small-phi edge.
    pub fn corners(&self) -> [ParamCoord; 4] {
        [
            ParamCoord::new(self.theta_max, self.phi_min),
            ParamCoord::new(self.theta_max, self.phi_max),
            ParamCoord::new(self.theta_min, self.phi_max),
            ParamCoord::new(self.theta_min, self.phi_min),
        ]
    }

    /// Whether the patch touches the north pole (theta = 0).
    pub fn touches_north_pole(&self) -> bool {
        self.theta_min.abs() < BOUNDARY_EPSILON
    }

    /// Whether the patch touches the south pole (theta = π).
    pub fn touches_south_pole(&self) -> bool {
        (self.theta_max - PI).abs() < BOUNDARY_EPSILON
    }

    /// Whether two patches share a boundary edge.
    ///
    /// Patches are adjacent when they share a theta edge with overlapping phi
    /// ranges, share a phi edge with overlapping theta ranges (including the
    /// seam between phi = 2π and phi = 0), or both touch the same pole. A patch
    /// is never adjacent to itself.
    pub fn is_adjacent(&self, other: &AngularBounds) -> bool {
        if self == other {
            return false;
        }

        if (self.touches_north_pole() && other.touches_north_pole())
            || (self.touches_south_pole() && other.touches_south_pole())
        {
            return true;
        }

        let shares_theta_edge = near(self.theta_max, other.theta_min)
            || near(other.theta_max, self.theta_min);
        if shares_theta_edge
            && overlaps(self.phi_min, self.phi_max, other.phi_min, other.phi_max)
        {
            return true;
        }

        let shares_phi_edge = near(self.phi_max, other.phi_min)
            || near(other.phi_max, self.phi_min)
            || (near(self.phi_max, TAU) && near(other.phi_min, 0.0))
            || (near(other.phi_max, TAU) && near(self.phi_min, 0.0));
        shares_phi_edge
            && overlaps(
                self.theta_min,
                self.theta_max,
                other.theta_min,
                other.theta_max,
            )
    }
}

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < BOUNDARY_EPSILON
}

/// Open-interval overlap with tolerance: touching at a single point does not count.
fn overlaps(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> bool {
    a_min < b_max - BOUNDARY_EPSILON && b_min < a_max - BOUNDARY_EPSILON
}
