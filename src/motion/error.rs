//! Errors surfaced by estimation, compensation and differencing.

use thiserror::Error;

/// Motion analysis errors.
///
/// All variants are terminal for the call that produced them: the
/// computation is deterministic, so retrying with the same inputs
/// yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("dimension mismatch: {expected:?} vs {found:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("no in-bounds search candidate for block ({row}, {col})")]
    NoValidCandidate { row: usize, col: usize },
}
