//! Camera-driven quadtree rebuild and balancing.

use std::collections::VecDeque;

use glam::DVec3;
use hashbrown::{HashMap, HashSet};
use planetoid_geometry::{Ellipsoid, ParamCoord};
use tracing::{debug, error};

use crate::index::LeafIndex;
use crate::{CoarseHeight, LodError, LodThresholds, NodeId, QuadNode};

/// Summary of one rebuild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Leaves after balancing.
    pub leaves: usize,
    /// Splits forced by the balance pass.
    pub forced_splits: usize,
    /// Shallowest leaf level.
    pub min_level: u8,
    /// Deepest leaf level.
    pub max_level: u8,
}

/// Spherical quadtree over one ellipsoid.
///
/// Each rebuild starts from a fresh root, subdivides top-down by camera
/// distance, then balances. Coarse base heights are remembered by node
/// identity, so re-splitting the same patch in a later rebuild does not query
/// the terrain again.
#[derive(Debug)]
pub struct Quadtree {
    root: QuadNode,
    ellipsoid: Ellipsoid,
    thresholds: LodThresholds,
    balance_cap: usize,
    base_heights: HashMap<NodeId, f64>,
}

impl Quadtree {
    /// Create a tree holding only the root.
    ///
    /// `balance_cap` bounds the forced splits of one balance pass; `None`
    /// uses the number of nodes a full tree of the maximum level would have.
    pub fn new(ellipsoid: Ellipsoid, thresholds: LodThresholds, balance_cap: Option<usize>) -> Self {
        let balance_cap = balance_cap.unwrap_or_else(|| full_tree_nodes(thresholds.max_level()));
        Self {
            root: QuadNode::root(),
            ellipsoid,
            thresholds,
            balance_cap,
            base_heights: HashMap::new(),
        }
    }

    /// The root node.
    pub fn root(&self) -> &QuadNode {
        &self.root
    }

    /// The level thresholds.
    pub fn thresholds(&self) -> &LodThresholds {
        &self.thresholds
    }

    /// The ellipsoid node distances are measured on.
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Discard the tree and build it again for `camera`, then balance.
    ///
    /// # Errors
    ///
    /// Returns [`LodError::BalanceIterationCapExceeded`] if balancing does
    /// not settle within the cap.
    pub fn rebuild<S: CoarseHeight + ?Sized>(
        &mut self,
        camera: DVec3,
        source: &mut S,
    ) -> Result<BuildStats, LodError> {
        self.root = QuadNode::root();
        self.build(camera, source);
        let forced_splits = self.balance(source)?;

        let leaves = self.root.leaves();
        let stats = BuildStats {
            leaves: leaves.len(),
            forced_splits,
            min_level: leaves.iter().map(|l| l.level()).min().unwrap_or(0),
            max_level: leaves.iter().map(|l| l.level()).max().unwrap_or(0),
        };
        debug!(
            leaves = stats.leaves,
            forced_splits,
            min_level = stats.min_level,
            max_level = stats.max_level,
            "Quadtree rebuilt"
        );
        Ok(stats)
    }

    /// Top-down subdivision pass. Nodes only split, never merge.
    pub fn build<S: CoarseHeight + ?Sized>(&mut self, camera: DVec3, source: &mut S) {
        Self::build_node(
            &mut self.root,
            camera,
            &self.ellipsoid,
            &self.thresholds,
            source,
            &mut self.base_heights,
        );
    }

    fn build_node<S: CoarseHeight + ?Sized>(
        node: &mut QuadNode,
        camera: DVec3,
        ellipsoid: &Ellipsoid,
        thresholds: &LodThresholds,
        source: &mut S,
        base_heights: &mut HashMap<NodeId, f64>,
    ) {
        let center = ellipsoid.displaced_point(node.center(), node.estimated_height());
        let desired = thresholds.desired_level(center.distance(camera));

        if node.level() >= desired || node.level() >= thresholds.max_level() {
            return;
        }
        split(node, source, base_heights);
        if let Some(children) = node.children_mut() {
            for child in children.iter_mut() {
                Self::build_node(child, camera, ellipsoid, thresholds, source, base_heights);
            }
        }
    }

    /// Force-split leaves until adjacent leaves differ by at most one level.
    /// Returns the number of forced splits.
    ///
    /// # Errors
    ///
    /// Returns [`LodError::BalanceIterationCapExceeded`] once more splits than
    /// the cap would be needed; the tree is left partially balanced.
    pub fn balance<S: CoarseHeight + ?Sized>(&mut self, source: &mut S) -> Result<usize, LodError> {
        let mut index = LeafIndex::new(self.thresholds.max_level());
        let leaves: Vec<NodeId> = self
            .root
            .leaves()
            .into_iter()
            .map(|leaf| {
                index.insert(leaf.id(), *leaf.bounds(), leaf.level());
                leaf.id()
            })
            .collect();

        let mut queue = VecDeque::new();
        let mut queued = HashSet::new();
        for id in leaves {
            enqueue_violations(&index, id, &mut queue, &mut queued);
        }

        let mut splits = 0;
        while let Some(id) = queue.pop_front() {
            queued.remove(&id);
            if index.level(id).is_none() {
                continue;
            }
            if splits >= self.balance_cap {
                error!(
                    cap = self.balance_cap,
                    pending = queue.len() + 1,
                    "Quadtree balancing did not settle"
                );
                return Err(LodError::BalanceIterationCapExceeded {
                    cap: self.balance_cap,
                    pending: queue.len() + 1,
                });
            }

            let Some(node) = self.root.find_mut(id) else {
                continue;
            };
            if !split(node, source, &mut self.base_heights) {
                continue;
            }
            splits += 1;

            let children: Vec<_> = node
                .children()
                .map(|c| c.iter().map(|c| (c.id(), *c.bounds(), c.level())).collect())
                .unwrap_or_default();
            index.remove(id);
            for &(child, bounds, level) in &children {
                index.insert(child, bounds, level);
            }
            for &(child, _, _) in &children {
                enqueue_violations(&index, child, &mut queue, &mut queued);
            }
        }

        Ok(splits)
    }

    /// Whether every pair of adjacent leaves is within one level.
    pub fn is_balanced(&self) -> bool {
        let mut index = LeafIndex::new(self.thresholds.max_level());
        for leaf in self.root.leaves() {
            index.insert(leaf.id(), *leaf.bounds(), leaf.level());
        }
        index.ids().into_iter().all(|id| {
            let level = index.level(id).unwrap_or(0);
            index
                .neighbors(id)
                .iter()
                .all(|&(_, other)| level.abs_diff(other) <= 1)
        })
    }

    /// Leaves in pre-order (NW, NE, SW, SE).
    pub fn leaves(&self) -> Vec<&QuadNode> {
        self.root.leaves()
    }

    /// Leaf containing a coordinate.
    pub fn find_leaf(&self, coord: ParamCoord) -> Option<&QuadNode> {
        self.root.find_leaf(coord.normalized())
    }

    /// Forget remembered base heights (after terrain changes).
    pub fn clear_base_heights(&mut self) {
        self.base_heights.clear();
    }

    /// Number of remembered base heights.
    pub fn base_height_count(&self) -> usize {
        self.base_heights.len()
    }
}

/// Split a leaf, reusing a remembered base height for its identity.
fn split<S: CoarseHeight + ?Sized>(
    node: &mut QuadNode,
    source: &mut S,
    base_heights: &mut HashMap<NodeId, f64>,
) -> bool {
    node.subdivide(|id, center| {
        *base_heights
            .entry(id)
            .or_insert_with(|| source.coarse_height(center))
    })
}

/// Queue coarse neighbors of `id`, or `id` itself when a neighbor is
/// two or more levels finer.
fn enqueue_violations(
    index: &LeafIndex,
    id: NodeId,
    queue: &mut VecDeque<NodeId>,
    queued: &mut HashSet<NodeId>,
) {
    let Some(level) = index.level(id) else {
        return;
    };
    for (other, other_level) in index.neighbors(id) {
        if other_level + 1 < level && queued.insert(other) {
            queue.push_back(other);
        }
        if level + 1 < other_level && queued.insert(id) {
            queue.push_back(id);
        }
    }
}

/// Node count of a complete tree `max_level` deep, saturating.
fn full_tree_nodes(max_level: u8) -> usize {
    (0..=u32::from(max_level))
        .map(|l| 4usize.saturating_pow(l))
        .fold(0, usize::saturating_add)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::f64::consts::{PI, TAU};

    use planetoid_geometry::Quadrant;

    use super::*;

    fn tree(thresholds: Vec<f64>, min_level: u8) -> Quadtree {
        Quadtree::new(
            Ellipsoid::sphere(10.0).unwrap(),
            LodThresholds::try_new(thresholds, min_level).unwrap(),
            None,
        )
    }

    fn flat() -> impl FnMut(ParamCoord) -> f64 {
        |_| 0.0
    }

    /// Exhaustive pairwise check, independent of the grid index.
    fn brute_force_balanced(tree: &Quadtree) -> bool {
        let leaves = tree.leaves();
        leaves.iter().all(|a| {
            leaves.iter().all(|b| {
                !a.bounds().is_adjacent(b.bounds()) || a.level().abs_diff(b.level()) <= 1
            })
        })
    }

    /// Split a chain of nodes down the NW quadrant's south-east corner.
    fn unbalance(tree: &mut Quadtree, depth: u8) {
        let mut source = flat();
        tree.root.subdivide(|_, _| 0.0);
        let mut id = NodeId::ROOT.child(Quadrant::NorthWest);
        for _ in 1..depth {
            let node = tree.root.find_mut(id).unwrap();
            split(node, &mut source, &mut tree.base_heights);
            id = id.child(Quadrant::SouthEast);
        }
    }

    #[test]
    fn test_far_camera_stops_at_min_level() {
        let mut t = tree(vec![15.0, 30.0, 45.0, 60.0], 2);
        let stats = t.rebuild(DVec3::new(1_000.0, 0.0, 0.0), &mut flat()).unwrap();
        assert_eq!(stats.leaves, 16);
        assert_eq!(stats.min_level, 2);
        assert_eq!(stats.max_level, 2);
    }

    #[test]
    fn test_near_camera_refines_nearby_patches() {
        let mut t = tree(vec![15.0, 30.0, 45.0, 60.0], 2);
        let camera = DVec3::new(10.0, 0.0, 0.0);
        let stats = t.rebuild(camera, &mut flat()).unwrap();
        assert_eq!(stats.max_level, 4);
        assert!(stats.leaves > 16);

        let below = t.find_leaf(ParamCoord::new(PI / 2.0, 0.01)).unwrap();
        let opposite = t.find_leaf(ParamCoord::new(PI / 2.0, PI)).unwrap();
        assert!(
            below.level() > opposite.level(),
            "patch under the camera ({}) should be finer than the far side ({})",
            below.level(),
            opposite.level()
        );
    }

    #[test]
    fn test_leaves_partition_domain() {
        let mut t = tree(vec![15.0, 30.0, 45.0, 60.0], 1);
        t.rebuild(DVec3::new(0.0, 8.0, 8.0), &mut flat()).unwrap();
        let area: f64 = t
            .leaves()
            .iter()
            .map(|l| l.bounds().theta_span() * l.bounds().phi_span())
            .sum();
        assert!((area - PI * TAU).abs() < 1e-9, "leaf area {area}");
    }

    #[test]
    fn test_balanced_for_many_cameras() {
        let cameras = [
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 10.5),
            DVec3::new(0.0, 0.0, -11.0),
            DVec3::new(-7.0, 7.0, 0.5),
            DVec3::new(10.01, -0.01, 0.0),
            DVec3::new(3.0, 4.0, 9.0),
        ];
        let configs = [
            vec![15.0, 30.0, 45.0, 60.0],
            vec![11.0, 25.0],
            vec![10.5, 11.0, 12.0, 14.0, 18.0, 26.0],
        ];
        for thresholds in &configs {
            for &camera in &cameras {
                let mut t = tree(thresholds.clone(), 0);
                t.rebuild(camera, &mut flat()).unwrap();
                assert!(t.is_balanced(), "unbalanced for {camera:?} / {thresholds:?}");
                assert!(
                    brute_force_balanced(&t),
                    "index disagrees with brute force for {camera:?} / {thresholds:?}"
                );
            }
        }
    }

    #[test]
    fn test_balance_repairs_manual_imbalance() {
        let mut t = tree(vec![10.0, 20.0, 30.0, 40.0, 50.0], 0);
        unbalance(&mut t, 5);
        assert!(!t.is_balanced());
        assert!(!brute_force_balanced(&t));

        let splits = t.balance(&mut flat()).unwrap();
        assert!(splits > 0);
        assert!(t.is_balanced());
        assert!(brute_force_balanced(&t));
    }

    #[test]
    fn test_balance_cap_is_reported() {
        let mut t = Quadtree::new(
            Ellipsoid::sphere(10.0).unwrap(),
            LodThresholds::try_new(vec![10.0, 20.0, 30.0, 40.0, 50.0], 0).unwrap(),
            Some(1),
        );
        unbalance(&mut t, 5);
        let err = t.balance(&mut flat()).unwrap_err();
        assert!(
            matches!(err, LodError::BalanceIterationCapExceeded { cap: 1, pending } if pending > 0),
            "unexpected error {err:?}"
        );
    }

    #[test]
    fn test_base_heights_reused_across_rebuilds() {
        let mut t = tree(vec![15.0, 30.0, 45.0, 60.0], 2);
        let camera = DVec3::new(10.0, 0.0, 0.0);
        let calls = Cell::new(0);
        let mut counting = |_: ParamCoord| {
            calls.set(calls.get() + 1);
            0.0
        };
        t.rebuild(camera, &mut counting).unwrap();
        let first = calls.get();
        assert!(first > 0);
        assert_eq!(t.base_height_count(), first);

        t.rebuild(camera, &mut counting).unwrap();
        assert_eq!(calls.get(), first, "second rebuild should reuse base heights");

        t.clear_base_heights();
        t.rebuild(camera, &mut counting).unwrap();
        assert_eq!(calls.get(), 2 * first);
    }

    #[test]
    fn test_base_height_shifts_distance_estimate() {
        // Camera straight above the center of a level-2 patch.
        let above = ParamCoord::new(3.0 * PI / 8.0, PI / 4.0).unit_direction() * 14.0;
        let mut low = tree(vec![2.0, 5.0, 8.0], 2);
        let mut high = tree(vec![2.0, 5.0, 8.0], 2);
        let flat_stats = low.rebuild(above, &mut flat()).unwrap();
        let tall_stats = high.rebuild(above, &mut |_: ParamCoord| 0.3).unwrap();
        assert_eq!(flat_stats.leaves, 16);
        assert!(
            tall_stats.leaves > flat_stats.leaves,
            "raised terrain is nearer the camera: {} vs {}",
            tall_stats.leaves,
            flat_stats.leaves
        );
    }

    #[test]
    fn test_preorder_is_deterministic() {
        let camera = DVec3::new(6.0, 6.0, 5.0);
        let mut a = tree(vec![15.0, 30.0, 45.0, 60.0], 2);
        let mut b = tree(vec![15.0, 30.0, 45.0, 60.0], 2);
        a.rebuild(camera, &mut flat()).unwrap();
        b.rebuild(camera, &mut flat()).unwrap();
        let ids_a: Vec<_> = a.leaves().iter().map(|l| l.id()).collect();
        let ids_b: Vec<_> = b.leaves().iter().map(|l| l.id()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_full_tree_nodes() {
        assert_eq!(full_tree_nodes(0), 1);
        assert_eq!(full_tree_nodes(2), 21);
        assert_eq!(full_tree_nodes(40), usize::MAX);
    }
}
