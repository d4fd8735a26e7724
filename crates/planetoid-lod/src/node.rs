//! Quadtree nodes over the (theta, phi) parameter domain.

use planetoid_geometry::{AngularBounds, ParamCoord, Quadrant};

/// Source of coarse (planetary tier) terrain heights for distance estimates.
pub trait CoarseHeight {
    /// Relative height at a parameter coordinate.
    fn coarse_height(&mut self, coord: ParamCoord) -> f64;
}

impl<F: FnMut(ParamCoord) -> f64> CoarseHeight for F {
    fn coarse_height(&mut self, coord: ParamCoord) -> f64 {
        self(coord)
    }
}

/// Path-derived node identity.
///
/// The root is `1` and child `q` of node `n` is `4n + q`, so an identity is
/// stable across rebuilds: the same patch always gets the same id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Identity of the root.
    pub const ROOT: NodeId = NodeId(1);

    /// Identity of a child.
    pub fn child(self, quadrant: Quadrant) -> NodeId {
        NodeId(self.0 * 4 + quadrant.index() as u64)
    }

    /// Depth encoded in the identity.
    pub fn level(self) -> u8 {
        ((63 - self.0.leading_zeros()) / 2) as u8
    }

    /// Child indices from the root down to this node.
    pub fn path(self) -> impl Iterator<Item = usize> {
        let level = self.level();
        (0..level)
            .rev()
            .map(move |l| ((self.0 >> (2 * u32::from(l))) & 3) as usize)
    }
}

/// A rectangular patch of the parameter domain. A node without children is a leaf.
#[derive(Clone, Debug)]
pub struct QuadNode {
    bounds: AngularBounds,
    level: u8,
    id: NodeId,
    base_height: Option<f64>,
    seed_height: Option<f64>,
    children: Option<Box<[QuadNode; 4]>>,
}

impl QuadNode {
    /// The root covering the whole domain.
    pub fn root() -> Self {
        Self {
            bounds: AngularBounds::full(),
            level: 0,
            id: NodeId::ROOT,
            base_height: None,
            seed_height: None,
            children: None,
        }
    }

    /// Angular extent.
    pub fn bounds(&self) -> &AngularBounds {
        &self.bounds
    }

    /// Depth from the root.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Identity token.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Coarse height at the center, once computed.
    pub fn base_height(&self) -> Option<f64> {
        self.base_height
    }

    /// Height used for distance estimates: the node's own base height, else
    /// the one inherited from its parent, else zero.
    pub fn estimated_height(&self) -> f64 {
        self.base_height.or(self.seed_height).unwrap_or(0.0)
    }

    /// Center of the patch.
    pub fn center(&self) -> ParamCoord {
        self.bounds.center()
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The four children, in [`Quadrant::ALL`] order.
    pub fn children(&self) -> Option<&[QuadNode; 4]> {
        self.children.as_deref()
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut [QuadNode; 4]> {
        self.children.as_deref_mut()
    }

    /// Split a leaf into four children.
    ///
    /// The base height is computed with `base_height` at the center if not
    /// known yet, and seeds every child. Returns `false` for non-leaves.
    pub fn subdivide(&mut self, base_height: impl FnOnce(NodeId, ParamCoord) -> f64) -> bool {
        if !self.is_leaf() {
            return false;
        }
        let base = match self.base_height {
            Some(h) => h,
            None => {
                let h = base_height(self.id, self.center());
                self.base_height = Some(h);
                h
            }
        };

        let quads = self.bounds.split();
        let children = Quadrant::ALL.map(|quadrant| QuadNode {
            bounds: quads[quadrant.index()],
            level: self.level + 1,
            id: self.id.child(quadrant),
            base_height: None,
            seed_height: Some(base),
            children: None,
        });
        self.children = Some(Box::new(children));
        true
    }

    /// Node with the given identity, if it exists in this subtree.
    pub fn find(&self, id: NodeId) -> Option<&QuadNode> {
        if id.level() < self.level {
            return None;
        }
        let mut node = self;
        for index in id.path().skip(self.level as usize) {
            node = &node.children.as_ref()?[index];
        }
        (node.id == id).then_some(node)
    }

    /// Mutable access to the node with the given identity.
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut QuadNode> {
        if id.level() < self.level {
            return None;
        }
        let mut node = self;
        for index in id.path().skip(node.level as usize) {
            node = &mut node.children.as_mut()?[index];
        }
        (node.id == id).then_some(node)
    }

    /// Leaf containing a coordinate. Boundaries resolve toward the south-east child.
    pub fn find_leaf(&self, coord: ParamCoord) -> Option<&QuadNode> {
        if !self.bounds.contains(coord) {
            return None;
        }
        let mut node = self;
        while let Some(children) = &node.children {
            node = &children[node.bounds.quadrant_of(coord).index()];
        }
        Some(node)
    }

    /// Append every leaf in pre-order, children visited NW, NE, SW, SE.
    pub fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a QuadNode>) {
        match &self.children {
            None => out.push(self),
            Some(children) => {
                for child in children.iter() {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Every leaf, in pre-order.
    pub fn leaves(&self) -> Vec<&QuadNode> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        match &self.children {
            None => 1,
            Some(children) => children.iter().map(QuadNode::leaf_count).sum(),
        }
    }
}
