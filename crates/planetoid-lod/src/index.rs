//! Grid index over leaf bounds for neighbor lookup during balancing.

use std::f64::consts::{PI, TAU};

use hashbrown::HashMap;
use planetoid_geometry::{AngularBounds, BOUNDARY_EPSILON};

use crate::NodeId;

/// Finest grid used regardless of tree depth.
const MAX_GRID_LEVEL: u8 = 6;

#[derive(Clone, Debug)]
struct Entry {
    bounds: AngularBounds,
    level: u8,
    cells: Vec<usize>,
}

/// Leaves bucketed into a coarse angular grid.
///
/// A leaf is filed in every cell its (epsilon-grown) bounds overlap, so any
/// two leaves sharing an edge share at least one cell. Pole-touching leaves
/// are additionally listed per pole, since they all meet at a single point.
#[derive(Debug)]
pub(crate) struct LeafIndex {
    theta_cells: usize,
    phi_cells: usize,
    cells: Vec<Vec<NodeId>>,
    entries: HashMap<NodeId, Entry>,
    north: Vec<NodeId>,
    south: Vec<NodeId>,
}

impl LeafIndex {
    /// Empty index sized for a tree `max_level` deep.
    pub(crate) fn new(max_level: u8) -> Self {
        let theta_cells = 1usize << max_level.min(MAX_GRID_LEVEL);
        let phi_cells = theta_cells * 2;
        Self {
            theta_cells,
            phi_cells,
            cells: vec![Vec::new(); theta_cells * phi_cells],
            entries: HashMap::new(),
            north: Vec::new(),
            south: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, id: NodeId, bounds: AngularBounds, level: u8) {
        let cells = self.cells_for(&bounds);
        for &cell in &cells {
            self.cells[cell].push(id);
        }
        if bounds.touches_north_pole() {
            self.north.push(id);
        }
        if bounds.touches_south_pole() {
            self.south.push(id);
        }
        self.entries.insert(
            id,
            Entry {
                bounds,
                level,
                cells,
            },
        );
    }

    pub(crate) fn remove(&mut self, id: NodeId) {
        let Some(entry) = self.entries.remove(&id) else {
            return;
        };
        for cell in entry.cells {
            self.cells[cell].retain(|other| *other != id);
        }
        if entry.bounds.touches_north_pole() {
            self.north.retain(|other| *other != id);
        }
        if entry.bounds.touches_south_pole() {
            self.south.retain(|other| *other != id);
        }
    }

    /// Level of an indexed leaf.
    pub(crate) fn level(&self, id: NodeId) -> Option<u8> {
        self.entries.get(&id).map(|e| e.level)
    }

    /// Adjacent leaves of `id` with their levels, ordered by identity.
    pub(crate) fn neighbors(&self, id: NodeId) -> Vec<(NodeId, u8)> {
        let Some(entry) = self.entries.get(&id) else {
            return Vec::new();
        };

        let mut candidates: Vec<NodeId> = entry
            .cells
            .iter()
            .flat_map(|&cell| self.cells[cell].iter().copied())
            .collect();
        if entry.bounds.touches_north_pole() {
            candidates.extend_from_slice(&self.north);
        }
        if entry.bounds.touches_south_pole() {
            candidates.extend_from_slice(&self.south);
        }
        candidates.sort_unstable();
        candidates.dedup();

        candidates
            .into_iter()
            .filter(|other| *other != id)
            .filter_map(|other| {
                let e = self.entries.get(&other)?;
                entry.bounds.is_adjacent(&e.bounds).then_some((other, e.level))
            })
            .collect()
    }

    /// Indexed leaf identities, ordered.
    pub(crate) fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<_> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn cells_for(&self, bounds: &AngularBounds) -> Vec<usize> {
        let d_theta = PI / self.theta_cells as f64;
        let d_phi = TAU / self.phi_cells as f64;
        let clamp_theta = |v: f64| ((v / d_theta).floor().max(0.0) as usize).min(self.theta_cells - 1);
        let clamp_phi = |v: f64| ((v / d_phi).floor().max(0.0) as usize).min(self.phi_cells - 1);

        let theta_lo = clamp_theta(bounds.theta_min - BOUNDARY_EPSILON);
        let theta_hi = clamp_theta(bounds.theta_max + BOUNDARY_EPSILON);
        let mut phi_cols: Vec<usize> = (clamp_phi(bounds.phi_min - BOUNDARY_EPSILON)
            ..=clamp_phi(bounds.phi_max + BOUNDARY_EPSILON))
            .collect();
        // Edges on the phi seam also touch the column across it.
        if bounds.phi_min - BOUNDARY_EPSILON <= 0.0 {
            phi_cols.push(self.phi_cells - 1);
        }
        if bounds.phi_max + BOUNDARY_EPSILON >= TAU {
            phi_cols.push(0);
        }
        phi_cols.sort_unstable();
        phi_cols.dedup();

        let mut cells = Vec::with_capacity((theta_hi - theta_lo + 1) * phi_cols.len());
        for t in theta_lo..=theta_hi {
            for &p in &phi_cols {
                cells.push(t * self.phi_cells + p);
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetoid_geometry::Quadrant;

    fn id(n: u64) -> NodeId {
        NodeId(n)
    }

    #[test]
    fn test_finds_edge_and_seam_neighbors() {
        let mut index = LeafIndex::new(3);
        let q = PI / 4.0;
        let p = TAU / 8.0;
        index.insert(id(10), AngularBounds::new(q, 2.0 * q, 0.0, p), 3);
        index.insert(id(11), AngularBounds::new(q, 2.0 * q, p, 2.0 * p), 3);
        index.insert(id(12), AngularBounds::new(q, 2.0 * q, TAU - p, TAU), 1);
        index.insert(id(13), AngularBounds::new(2.0 * q, 3.0 * q, 0.0, p), 2);
        index.insert(id(14), AngularBounds::new(q, 2.0 * q, 3.0 * p, 4.0 * p), 2);

        let neighbors = index.neighbors(id(10));
        assert_eq!(neighbors, vec![(id(11), 3), (id(12), 1), (id(13), 2)]);
    }

    #[test]
    fn test_pole_leaves_are_mutual_neighbors() {
        let mut index = LeafIndex::new(2);
        index.insert(id(20), AngularBounds::new(0.0, 0.5, 0.0, 0.5), 2);
        index.insert(id(21), AngularBounds::new(0.0, 0.5, 3.0, 3.5), 2);
        index.insert(id(22), AngularBounds::new(PI - 0.5, PI, 3.0, 3.5), 2);

        assert_eq!(index.neighbors(id(20)), vec![(id(21), 2)]);
        assert_eq!(index.neighbors(id(22)), Vec::new());
    }

    #[test]
    fn test_remove() {
        let mut index = LeafIndex::new(2);
        let root = NodeId::ROOT;
        let full = AngularBounds::full();
        for (quadrant, bounds) in Quadrant::ALL.iter().zip(full.split()) {
            index.insert(root.child(*quadrant), bounds, 1);
        }
        let nw = root.child(Quadrant::NorthWest);
        let se = root.child(Quadrant::SouthEast);
        assert_eq!(index.neighbors(nw).len(), 2);
        assert!(index.neighbors(nw).iter().all(|(other, _)| *other != se));

        index.remove(root.child(Quadrant::NorthEast));
        assert_eq!(index.level(root.child(Quadrant::NorthEast)), None);
        assert_eq!(index.neighbors(nw), vec![(root.child(Quadrant::SouthWest), 1)]);
        assert_eq!(index.ids().len(), 3);
    }
}
