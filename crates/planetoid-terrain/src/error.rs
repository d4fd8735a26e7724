//! Terrain construction errors.

/// Errors raised while building a terrain generator from configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// A feature name in the configuration does not match any generator or label.
    #[error("unknown feature name: {0}")]
    UnknownFeature(String),

    /// Tier distances must be positive, finite and strictly increasing, with
    /// at most 255 entries.
    #[error("tier distances must be 1..=255 positive, strictly increasing values, got {0:?}")]
    InvalidTierDistances(Vec<f64>),

    /// The cache bucket size must be a positive angle.
    #[error("cache bucket size must be positive, got {0}")]
    InvalidBucketSize(f64),

    /// The bucket limit is below the number of cells in the angular grid.
    #[error("cache bucket limit {max_buckets} is below the {required} grid cells")]
    BucketLimitTooSmall {
        /// Configured limit.
        max_buckets: usize,
        /// Cells the grid can hold.
        required: f64,
    },
}
