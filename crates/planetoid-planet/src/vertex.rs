//! Deduplicating vertex map for one mesh-generation pass.

use hashbrown::HashMap;
use planetoid_geometry::{ParamCoord, VertexKey};

/// Maps canonical position keys to vertex indices.
///
/// Corners shared by neighboring leaves, pole corners at any phi, and seam
/// corners at phi = 0 and 2π all resolve to a single index.
#[derive(Debug, Default, Clone)]
pub struct VertexCache {
    indices: HashMap<VertexKey, u32>,
}

impl VertexCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index already assigned to a position, if any.
    pub fn get(&self, coord: ParamCoord) -> Option<u32> {
        self.indices.get(&VertexKey::new(coord)).copied()
    }

    /// Index of `key`, creating it with `create` on first request.
    ///
    /// `create` runs at most once per key and must return the index the new
    /// vertex was written at.
    pub fn get_or_insert_with(&mut self, key: VertexKey, create: impl FnOnce() -> u32) -> u32 {
        *self.indices.entry(key).or_insert_with(create)
    }

    /// Number of distinct vertices.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no vertex has been assigned.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Forget every vertex.
    pub fn clear(&mut self) {
        self.indices.clear();
    }
}
