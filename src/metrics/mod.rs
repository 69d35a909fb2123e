//! Prometheus metrics for motion analysis.
//!
//! # Metrics Exposed
//!
//! ## Search Totals
//! - `block_motion_pairs_total` - Frame pairs analyzed
//! - `block_motion_blocks_total` - Blocks searched
//! - `block_motion_candidates_scored_total` - In-bounds candidates scored
//!
//! ## Latest Pair
//! - `block_motion_nonzero_vectors` - Blocks with a non-zero vector
//! - `block_motion_mean_vector_magnitude` - Mean vector length
//! - `block_motion_difference_energy` - Naive difference energy
//! - `block_motion_residual_energy` - Compensated residual energy
//! - `block_motion_compensation_gain_db` - Energy reduction in dB
//!
//! # Example
//!
//! ```no_run
//! use block_motion::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     blocks: 99,
//!     candidates_scored: 95_000,
//!     nonzero_vectors: 12,
//!     mean_vector_magnitude: 0.8,
//!     difference_energy: 1_200_000,
//!     residual_energy: 90_000,
//!     gain_db: Some(11.2),
//! };
//!
//! registry.record(&snapshot);
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
