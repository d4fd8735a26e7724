//! Planet construction and rebuild errors.

use planetoid_geometry::GeometryError;
use planetoid_lod::LodError;
use planetoid_terrain::TerrainError;

/// Errors surfaced by [`crate::Planet`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanetError {
    /// The ellipsoid configuration is invalid.
    #[error("invalid planet shape: {0}")]
    Geometry(#[from] GeometryError),

    /// The LOD configuration is invalid, or balancing did not settle.
    #[error("quadtree error: {0}")]
    Lod(#[from] LodError),

    /// The terrain configuration is invalid.
    #[error("terrain error: {0}")]
    Terrain(#[from] TerrainError),
}
