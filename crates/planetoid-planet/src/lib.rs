//! Planet facade: ties the quadtree, the terrain generator and the color
//! manager together into a renderable, deduplicated mesh.
//!
//! One [`Planet`] owns every cache it uses. Rebuilds are synchronous and
//! driven by the caller, optionally through a [`RebuildThrottle`].

mod color;
mod error;
mod mesh;
mod planet;
mod throttle;
mod vertex;

#[cfg(test)]
mod scenario_tests;

pub use color::{ColorManager, Rgb, blend_colors};
pub use error::PlanetError;
pub use mesh::{MeshAssembler, MeshStats, PlanetMesh};
pub use planet::Planet;
pub use throttle::RebuildThrottle;
pub use vertex::VertexCache;
