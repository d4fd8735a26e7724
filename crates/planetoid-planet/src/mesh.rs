//! Mesh assembly from quadtree leaves.

use glam::DVec3;
use planetoid_geometry::{Ellipsoid, ParamCoord, VertexKey};
use planetoid_lod::QuadNode;
use planetoid_terrain::TerrainGenerator;
use tracing::warn;

use crate::{ColorManager, VertexCache};

/// Summary of one assembled mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    /// Leaves meshed.
    pub leaves: usize,
    /// Distinct vertices.
    pub vertices: usize,
    /// Triangles emitted, two per leaf.
    pub triangles: usize,
    /// Deepest leaf level.
    pub max_level: u8,
    /// Shallowest leaf level.
    pub min_level: u8,
}

/// Renderable planet mesh.
///
/// `positions` and `colors` are parallel; `indices` holds three entries per
/// triangle.
#[derive(Clone, Debug, Default)]
pub struct PlanetMesh {
    /// Displaced vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Vertex colors with channels in `0..=1`.
    pub colors: Vec<[f32; 3]>,
    /// Triangle indices.
    pub indices: Vec<u32>,
    radii: Vec<f64>,
    stats: MeshStats,
}

impl PlanetMesh {
    /// Positions as a flat `x, y, z, x, y, z, ...` slice.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as a flat `r, g, b, r, g, b, ...` slice.
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if the mesh has no vertices.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Distance from the planet center of a vertex, at full precision.
    pub fn radius(&self, index: u32) -> Option<f64> {
        self.radii.get(index as usize).copied()
    }

    /// Radius of the vertex nearest to `point`.
    pub fn nearest_vertex_radius(&self, point: DVec3) -> Option<f64> {
        self.positions
            .iter()
            .zip(&self.radii)
            .map(|(p, r)| (DVec3::from(p.map(f64::from)).distance_squared(point), *r))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, r)| r)
    }

    /// Statistics of the pass that built this mesh.
    pub fn stats(&self) -> MeshStats {
        self.stats
    }
}

/// Builds meshes from leaves, deduplicating shared corners.
///
/// The vertex cache is reset at the start of each pass and kept afterwards
/// so corner lookups can be answered until the next pass.
#[derive(Debug, Default)]
pub struct MeshAssembler {
    vertices: VertexCache,
}

impl MeshAssembler {
    /// Creates an assembler with an empty vertex cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mesh every leaf for a camera at `camera`.
    ///
    /// The first request of a corner samples terrain at the corner's camera
    /// distance and appends the vertex; later requests reuse its index. Each
    /// leaf emits two triangles wound bottom-left, bottom-right, top-right and
    /// bottom-left, top-right, top-left, which faces outward.
    pub fn assemble(
        &mut self,
        leaves: &[&QuadNode],
        camera: DVec3,
        terrain: &mut TerrainGenerator,
        colors: &ColorManager,
    ) -> PlanetMesh {
        self.vertices.clear();
        let mut mesh = PlanetMesh {
            indices: Vec::with_capacity(leaves.len() * 6),
            ..PlanetMesh::default()
        };

        for leaf in leaves {
            let mut corner_indices = [0u32; 4];
            for (slot, corner) in corner_indices.iter_mut().zip(leaf.bounds().corners()) {
                let key = VertexKey::new(corner);
                *slot = self.vertices.get_or_insert_with(key, || {
                    push_vertex(&mut mesh, key, camera, terrain, colors)
                });
            }
            let [bl, br, tr, tl] = corner_indices;
            mesh.indices.extend_from_slice(&[bl, br, tr, bl, tr, tl]);
        }

        mesh.stats = MeshStats {
            leaves: leaves.len(),
            vertices: mesh.positions.len(),
            triangles: mesh.indices.len() / 3,
            max_level: leaves.iter().map(|l| l.level()).max().unwrap_or(0),
            min_level: leaves.iter().map(|l| l.level()).min().unwrap_or(0),
        };
        mesh
    }

    /// Index of the vertex at a position in the last assembled mesh.
    pub fn vertex_index(&self, coord: ParamCoord) -> Option<u32> {
        self.vertices.get(coord)
    }

    /// Forget the vertices of the last pass.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

fn push_vertex(
    mesh: &mut PlanetMesh,
    key: VertexKey,
    camera: DVec3,
    terrain: &mut TerrainGenerator,
    colors: &ColorManager,
) -> u32 {
    let coord = key.coord();
    let ellipsoid = *terrain.ellipsoid();
    let distance = ellipsoid.surface_point(coord).distance(camera);
    let sample = terrain.sample(coord, distance);
    let position = vertex_position(&ellipsoid, coord, sample.height);
    let color = colors.color(&sample, key, terrain.latitude_at(coord));

    let index = mesh.positions.len() as u32;
    mesh.positions.push(position.as_vec3().to_array());
    mesh.colors.push(color.map(|c| (c / 255.0) as f32));
    mesh.radii.push(position.length());
    index
}

/// Displaced position, or the undisplaced surface point if displacement
/// produced a non-finite result.
fn vertex_position(ellipsoid: &Ellipsoid, coord: ParamCoord, height: f64) -> DVec3 {
    let position = ellipsoid.displaced_point(coord, height);
    if position.is_finite() {
        return position;
    }
    warn!(
        theta = coord.theta,
        phi = coord.phi,
        height,
        "Non-finite vertex position, using the undisplaced surface point"
    );
    ellipsoid.surface_point(coord)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use planetoid_config::{ColorConfig, TerrainConfig};
    use planetoid_lod::{LodThresholds, Quadtree};

    use super::*;

    fn setup() -> (Quadtree, TerrainGenerator, ColorManager) {
        let ellipsoid = Ellipsoid::new(10.0, 9.0, 8.0).unwrap();
        let terrain = TerrainGenerator::new(&TerrainConfig::default(), "mesh", ellipsoid).unwrap();
        let colors = ColorManager::new(&ColorConfig::default(), terrain.noise().clone());
        let thresholds = LodThresholds::try_new(vec![12.0, 20.0, 30.0], 1).unwrap();
        (Quadtree::new(ellipsoid, thresholds, None), terrain, colors)
    }

    fn assemble(camera: DVec3) -> (Quadtree, PlanetMesh, MeshAssembler) {
        let (mut tree, mut terrain, colors) = setup();
        tree.rebuild(camera, &mut |c: ParamCoord| terrain.coarse_height(c))
            .unwrap();
        let mut assembler = MeshAssembler::new();
        let mesh = assembler.assemble(&tree.leaves(), camera, &mut terrain, &colors);
        (tree, mesh, assembler)
    }

    #[test]
    fn test_vertices_match_distinct_corner_keys() {
        let camera = DVec3::new(11.0, 0.0, 2.0);
        let (tree, mesh, assembler) = assemble(camera);
        let leaves = tree.leaves();

        let keys: HashSet<VertexKey> = leaves
            .iter()
            .flat_map(|l| l.bounds().corners())
            .map(VertexKey::new)
            .collect();
        assert_eq!(mesh.vertex_count(), keys.len());
        assert_eq!(mesh.indices.len(), 6 * leaves.len());
        assert_eq!(mesh.colors.len(), mesh.positions.len());
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));

        for leaf in &leaves {
            for corner in leaf.bounds().corners() {
                assert!(assembler.vertex_index(corner).is_some(), "corner {corner:?} unresolved");
            }
        }

        let stats = mesh.stats();
        assert_eq!(stats.leaves, leaves.len());
        assert_eq!(stats.vertices, keys.len());
        assert_eq!(stats.triangles, 2 * leaves.len());
        assert!(stats.max_level >= stats.min_level);
    }

    #[test]
    fn test_triangles_face_outward() {
        let (_, mesh, _) = assemble(DVec3::new(0.0, 12.0, 3.0));
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| {
                DVec3::from(mesh.positions[i as usize].map(f64::from))
            });
            let normal = (b - a).cross(c - a);
            if normal.length() < 1e-9 {
                // Collapsed pole triangle.
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn test_flat_views_and_color_range() {
        let (_, mesh, _) = assemble(DVec3::new(30.0, 0.0, 0.0));
        assert_eq!(mesh.positions_flat().len(), 3 * mesh.vertex_count());
        assert_eq!(mesh.colors_flat().len(), 3 * mesh.vertex_count());
        assert_eq!(mesh.positions_flat()[..3], mesh.positions[0]);
        assert!(mesh.colors_flat().iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn test_nearest_vertex_radius() {
        let (_, mesh, _) = assemble(DVec3::new(30.0, 0.0, 0.0));
        let r = mesh.nearest_vertex_radius(DVec3::new(100.0, 0.0, 0.0)).unwrap();
        assert!((r - 10.0).abs() < 1.0, "vertex nearest +x should sit near a=10, got {r}");
        assert_eq!(PlanetMesh::default().nearest_vertex_radius(DVec3::X), None);
    }

    #[test]
    fn test_non_finite_height_falls_back_to_surface() {
        let ellipsoid = Ellipsoid::sphere(10.0).unwrap();
        let coord = ParamCoord::new(1.0, 2.0);
        let p = vertex_position(&ellipsoid, coord, f64::NAN);
        assert_eq!(p, ellipsoid.surface_point(coord));
        let p = vertex_position(&ellipsoid, coord, 0.1);
        assert!((p.length() - 11.0).abs() < 1e-9);
    }
}
