//! Ellipsoid geometry: (theta, phi) parameterization, angular patch bounds, and
//! canonical vertex keys that merge pole and longitude-wrap duplicates.

mod bounds;
mod coord;
mod ellipsoid;
mod key;

pub use bounds::{AngularBounds, BOUNDARY_EPSILON, Quadrant};
pub use coord::{ParamCoord, latitude_degrees};
pub use ellipsoid::{Ellipsoid, GeometryError};
pub use key::{KEY_PRECISION, VertexKey};
