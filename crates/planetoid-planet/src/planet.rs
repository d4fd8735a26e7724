//! The planet facade.

use glam::DVec3;
use planetoid_config::Config;
use planetoid_geometry::{Ellipsoid, ParamCoord};
use planetoid_lod::{LodThresholds, Quadtree};
use planetoid_terrain::{FeatureKind, TerrainError, TerrainGenerator, TerrainSample};
use tracing::{debug, info};

use crate::{ColorManager, MeshAssembler, MeshStats, PlanetError, PlanetMesh};

/// One ellipsoid planet with its quadtree, terrain, colors and mesh.
///
/// Every cache is owned by the planet and mutated only through `&mut self`,
/// so one rebuild always completes before the next starts.
#[derive(Debug)]
pub struct Planet {
    ellipsoid: Ellipsoid,
    terrain: TerrainGenerator,
    tree: Quadtree,
    colors: ColorManager,
    assembler: MeshAssembler,
    mesh: PlanetMesh,
    min_distance_buffer: f64,
}

impl Planet {
    /// Build a planet from configuration.
    ///
    /// # Errors
    ///
    /// Fails on a non-positive or non-finite semi-axis, invalid LOD
    /// thresholds, or invalid terrain settings.
    pub fn new(config: &Config) -> Result<Self, PlanetError> {
        let ellipsoid = Ellipsoid::from_array(config.planet.semi_axes)?;
        let thresholds = LodThresholds::try_new(
            config.lod.distance_thresholds.clone(),
            config.lod.min_level,
        )?;
        let terrain = TerrainGenerator::new(&config.terrain, &config.planet.seed, ellipsoid)?;
        let colors = ColorManager::new(&config.color, terrain.noise().clone());
        let tree = Quadtree::new(ellipsoid, thresholds, config.lod.balance_iteration_cap);

        info!(
            semi_axes = ?config.planet.semi_axes,
            max_level = tree.thresholds().max_level(),
            min_level = tree.thresholds().min_level(),
            "Planet created"
        );

        Ok(Self {
            ellipsoid,
            terrain,
            tree,
            colors,
            assembler: MeshAssembler::new(),
            mesh: PlanetMesh::default(),
            min_distance_buffer: config.planet.min_distance_buffer,
        })
    }

    /// Rebuild the quadtree for `camera` and assemble a new mesh.
    ///
    /// # Errors
    ///
    /// Returns [`PlanetError::Lod`] if balancing exceeds its iteration cap.
    /// The previous mesh is kept in that case.
    pub fn generate_geometry(&mut self, camera: DVec3) -> Result<MeshStats, PlanetError> {
        let terrain = &mut self.terrain;
        let build = self
            .tree
            .rebuild(camera, &mut |coord: ParamCoord| terrain.coarse_height(coord))?;

        self.mesh = self.assembler.assemble(
            &self.tree.leaves(),
            camera,
            &mut self.terrain,
            &self.colors,
        );

        let stats = self.mesh.stats();
        info!(
            leaves = stats.leaves,
            vertices = stats.vertices,
            triangles = stats.triangles,
            forced_splits = build.forced_splits,
            min_level = stats.min_level,
            max_level = stats.max_level,
            cached_records = self.terrain.cache_len(),
            "Planet geometry generated"
        );
        Ok(stats)
    }

    /// Drop every cached terrain record and base height. The next
    /// [`Planet::generate_geometry`] recomputes everything from the same seed.
    pub fn regenerate_terrain(&mut self) {
        let records = self.terrain.cache_len();
        self.terrain.clear_cache();
        self.tree.clear_base_heights();
        info!(records, "Terrain caches cleared");
    }

    /// Enable or disable a feature generator by name, then clear the terrain
    /// caches so the change shows on the next rebuild.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::UnknownFeature`] for names that match no generator.
    pub fn set_feature_enabled(&mut self, name: &str, enabled: bool) -> Result<(), PlanetError> {
        let kind = FeatureKind::from_name(name)
            .ok_or_else(|| TerrainError::UnknownFeature(name.to_string()))?;
        if self.terrain.is_feature_enabled(kind) != enabled {
            self.terrain.set_feature_enabled(kind, enabled);
            info!(feature = name, enabled, "Feature toggled");
        }
        self.regenerate_terrain();
        Ok(())
    }

    /// Whether a feature generator is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::UnknownFeature`] for names that match no generator.
    pub fn is_feature_enabled(&self, name: &str) -> Result<bool, PlanetError> {
        let kind = FeatureKind::from_name(name)
            .ok_or_else(|| TerrainError::UnknownFeature(name.to_string()))?;
        Ok(self.terrain.is_feature_enabled(kind))
    }

    /// Surface radius at a parameter position.
    ///
    /// Bilinearly interpolates the radii of the four corner vertices of the
    /// leaf containing the position. Without a meshed leaf there, the coarse
    /// terrain height is sampled directly instead.
    pub fn surface_height_at(&mut self, theta: f64, phi: f64) -> f64 {
        let coord = ParamCoord::new(theta, phi).normalized();
        if let Some(radius) = self.interpolated_radius(coord) {
            return radius;
        }
        debug!(theta, phi, "No meshed leaf at query point, sampling coarse height");
        let height = self.terrain.coarse_height(coord);
        self.ellipsoid.displaced_point(coord, height).length()
    }

    fn interpolated_radius(&self, coord: ParamCoord) -> Option<f64> {
        let leaf = self.tree.find_leaf(coord)?;
        let bounds = leaf.bounds();
        let [bl, br, tr, tl] = bounds.corners().map(|corner| {
            self.assembler
                .vertex_index(corner)
                .and_then(|index| self.mesh.radius(index))
        });
        let (bl, br, tr, tl) = (bl?, br?, tr?, tl?);

        let u = ((coord.phi - bounds.phi_min) / bounds.phi_span()).clamp(0.0, 1.0);
        let v = ((coord.theta - bounds.theta_min) / bounds.theta_span()).clamp(0.0, 1.0);
        let top = tl + (tr - tl) * u;
        let bottom = bl + (br - bl) * u;
        Some(top + (bottom - top) * v)
    }

    /// Radius of the mesh vertex nearest to the camera plus the safety buffer.
    pub fn min_distance(&self, camera: DVec3) -> f64 {
        let radius = self.mesh.nearest_vertex_radius(camera).unwrap_or_else(|| {
            debug!("No mesh yet, using the ellipsoid radius under the camera");
            self.ellipsoid
                .surface_point(ParamCoord::from_direction(camera))
                .length()
        });
        radius + self.min_distance_buffer
    }

    /// Terrain at a position for a camera `distance` away.
    pub fn sample(&mut self, theta: f64, phi: f64, distance: f64) -> TerrainSample {
        self.terrain.sample(ParamCoord::new(theta, phi), distance)
    }

    /// The current mesh.
    pub fn mesh(&self) -> &PlanetMesh {
        &self.mesh
    }

    /// The quadtree of the last rebuild.
    pub fn tree(&self) -> &Quadtree {
        &self.tree
    }

    /// The terrain generator.
    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    /// The base ellipsoid.
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}
