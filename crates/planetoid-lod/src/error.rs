//! LOD configuration and balancing errors.

/// Errors raised by threshold validation and tree balancing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LodError {
    /// At least one distance threshold is required.
    #[error("at least one LOD distance threshold is required")]
    EmptyThresholds,

    /// Thresholds must be finite and positive.
    #[error("LOD threshold {index} must be positive and finite, got {value}")]
    NonPositiveThreshold {
        /// Position in the threshold list.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// Thresholds must be strictly increasing.
    #[error("LOD threshold {index} ({value}) must exceed the previous one ({previous})")]
    NonIncreasingThresholds {
        /// Position in the threshold list.
        index: usize,
        /// Previous threshold.
        previous: f64,
        /// Offending value.
        value: f64,
    },

    /// More thresholds than node identities can address.
    #[error("{count} LOD thresholds exceed the maximum level {max}")]
    TooManyLevels {
        /// Number of thresholds given.
        count: usize,
        /// Largest supported level.
        max: u8,
    },

    /// The balance pass kept forcing splits past its bound.
    #[error("tree balancing exceeded {cap} forced splits with {pending} still queued")]
    BalanceIterationCapExceeded {
        /// Configured bound on forced splits.
        cap: usize,
        /// Splits still waiting when the bound was hit.
        pending: usize,
    },
}
