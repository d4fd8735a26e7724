//! Spherical quadtree level of detail: distance-banded subdivision of the
//! (theta, phi) domain and a balance pass keeping adjacent leaves within one
//! level of each other.

mod error;
mod index;
mod node;
mod quadtree;
mod selector;

pub use error::LodError;
pub use node::{CoarseHeight, NodeId, QuadNode};
pub use quadtree::{BuildStats, Quadtree};
pub use selector::{LodThresholds, MAX_LEVEL};
