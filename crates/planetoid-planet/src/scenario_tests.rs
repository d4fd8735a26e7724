//! End-to-end scenarios across the quadtree, terrain and mesh stages.

use std::collections::{HashMap, HashSet};

use glam::DVec3;
use planetoid_config::Config;
use planetoid_geometry::VertexKey;
use planetoid_terrain::FeatureKind;

use crate::Planet;

fn reference_config() -> Config {
    let mut config = Config::default();
    config.planet.semi_axes = [10.0, 10.0, 10.0];
    config.planet.seed = "testSeed123".to_string();
    config.lod.distance_thresholds = vec![15.0, 30.0, 45.0, 60.0];
    config
}

fn camera() -> DVec3 {
    DVec3::new(10.0, 0.0, 0.0)
}

#[test]
fn test_reference_planet_mesh_is_index_aligned_and_bounded() {
    let mut planet = Planet::new(&reference_config()).unwrap();
    let stats = planet.generate_geometry(camera()).unwrap();
    let mesh = planet.mesh();

    assert!(!mesh.is_empty());
    assert!(stats.leaves > 0);
    assert_eq!(mesh.indices.len(), 3 * stats.triangles);
    assert_eq!(mesh.indices.len(), 6 * stats.leaves);
    assert_eq!(stats.max_level, 4);

    let bound = planet.terrain().max_abs_height();
    for (i, p) in mesh.positions.iter().enumerate() {
        let r = DVec3::from(p.map(f64::from)).length();
        assert!(
            (r - 10.0).abs() <= 10.0 * bound + 1e-4,
            "vertex {i} radius {r} outside 10 ± {}",
            10.0 * bound
        );
    }
}

#[test]
fn test_mesh_is_watertight() {
    let mut planet = Planet::new(&reference_config()).unwrap();
    planet.generate_geometry(DVec3::new(0.0, -11.0, 4.0)).unwrap();

    let leaves = planet.tree().leaves();
    let keys: HashSet<VertexKey> = leaves
        .iter()
        .flat_map(|leaf| leaf.bounds().corners())
        .map(VertexKey::new)
        .collect();
    assert_eq!(planet.mesh().vertex_count(), keys.len());

    let mut seen = HashSet::new();
    for p in &planet.mesh().positions {
        let bits = p.map(f32::to_bits);
        assert!(seen.insert(bits), "duplicate vertex position {p:?}");
    }
}

#[test]
fn test_tree_is_balanced_for_reference_cameras() {
    let mut planet = Planet::new(&reference_config()).unwrap();
    for camera in [
        DVec3::new(10.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 10.5),
        DVec3::new(-7.0, 7.0, 0.5),
        DVec3::new(0.0, 0.0, -25.0),
        DVec3::new(40.0, 40.0, 40.0),
    ] {
        planet.generate_geometry(camera).unwrap();
        assert!(planet.tree().is_balanced(), "unbalanced tree for camera {camera}");
    }
}

#[test]
fn test_regenerate_reproduces_mesh() {
    let mut planet = Planet::new(&reference_config()).unwrap();
    planet.generate_geometry(camera()).unwrap();
    let before = planet.mesh().clone();

    planet.regenerate_terrain();
    assert_eq!(planet.terrain().cache_len(), 0);
    planet.generate_geometry(camera()).unwrap();
    let after = planet.mesh();

    assert_eq!(before.vertex_count(), after.vertex_count());
    assert_eq!(before.positions, after.positions);
    assert_eq!(before.colors, after.colors);
    assert_eq!(before.indices, after.indices);
}

#[test]
fn test_approaching_camera_matches_fresh_build() {
    // Every camera lies on one ray, so each vertex only ever gets nearer.
    let near = DVec3::new(11.0, 1.1, 0.55);

    let mut approached = Planet::new(&reference_config()).unwrap();
    approached.generate_geometry(near * 5.0).unwrap();
    approached.generate_geometry(near * 2.0).unwrap();
    approached.generate_geometry(near).unwrap();

    let mut fresh = Planet::new(&reference_config()).unwrap();
    fresh.generate_geometry(near).unwrap();

    assert_eq!(approached.mesh().indices, fresh.mesh().indices);
    assert_eq!(approached.mesh().positions, fresh.mesh().positions);
    assert_eq!(approached.mesh().colors, fresh.mesh().colors);
}

#[test]
fn test_disabling_a_feature_removes_its_label() {
    let mut planet = Planet::new(&reference_config()).unwrap();
    planet.generate_geometry(camera()).unwrap();

    let corners: Vec<_> = planet
        .tree()
        .leaves()
        .iter()
        .flat_map(|leaf| leaf.bounds().corners())
        .collect();

    let mut counts: HashMap<FeatureKind, usize> = HashMap::new();
    for corner in &corners {
        if let Some(record) = planet.terrain().cached(*corner) {
            for kind in record.features.iter().filter_map(|l| l.kind()) {
                *counts.entry(kind).or_default() += 1;
            }
        }
    }
    let (&kind, _) = counts
        .iter()
        .max_by_key(|(kind, count)| (**count, std::cmp::Reverse(**kind)))
        .expect("the reference planet should carry at least one feature");

    planet.set_feature_enabled(kind.name(), false).unwrap();
    planet.generate_geometry(camera()).unwrap();

    for corner in &corners {
        if let Some(record) = planet.terrain().cached(*corner) {
            assert!(
                !record.has_feature(kind.into()),
                "{kind} still present at {corner:?} after disabling it"
            );
        }
    }

    planet.set_feature_enabled(kind.name(), true).unwrap();
    planet.generate_geometry(camera()).unwrap();
    let restored = corners
        .iter()
        .filter_map(|corner| planet.terrain().cached(*corner))
        .any(|record| record.has_feature(kind.into()));
    assert!(restored, "{kind} should reappear once re-enabled");
}

#[test]
fn test_distinct_seeds_differ() {
    let mut a = Planet::new(&reference_config()).unwrap();
    let mut config = reference_config();
    config.planet.seed = "anotherSeed".to_string();
    let mut b = Planet::new(&config).unwrap();

    a.generate_geometry(camera()).unwrap();
    b.generate_geometry(camera()).unwrap();
    assert_ne!(a.mesh().positions, b.mesh().positions);
}
