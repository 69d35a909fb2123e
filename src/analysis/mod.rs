//! Diagnostic statistics.
//!
//! This module summarizes difference and residual images so the effect
//! of motion compensation can be judged numerically as well as visually.

mod statistics;
mod summary;

pub use statistics::{CompensationGain, ImageStatistics};
pub use summary::PairStatistics;
