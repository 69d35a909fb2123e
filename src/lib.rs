//! Block Motion Library
//!
//! Block-matching motion estimation and compensation between two
//! grayscale video frames, with a naive frame difference as baseline.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! source → motion (match → field → compensate) → output
//!             ↓                ↓
//!         difference      analysis / metrics
//! ```
//!
//! # Design Principles
//!
//! - **Exhaustive search**: every displacement in the window is scored by SSD
//! - **Deterministic**: ties resolve to the earliest candidate in scan order
//! - **Whole blocks only**: frame margins are excluded and stay zero in outputs
//! - **No shared state**: blocks are searched independently and may run in parallel
//!
//! # Example
//!
//! ```no_run
//! use block_motion::{
//!     analysis::PairStatistics,
//!     motion::{PairAnalyzer, SearchParams},
//!     source::{FrameSource, SyntheticSource},
//! };
//!
//! let mut source = SyntheticSource::new(352, 288, 7).unwrap().with_motion(1, 2);
//! let reference = source.frame_at(0).unwrap();
//! let current = source.frame_at(1).unwrap();
//!
//! let analyzer = PairAnalyzer::new(SearchParams::default()).unwrap();
//! let analysis = analyzer.analyze(&current, &reference).unwrap();
//!
//! let stats = PairStatistics::from_analysis(&analysis);
//! println!("residual energy {} vs difference {}", stats.residual.energy, stats.difference.energy);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod metrics;
pub mod motion;
pub mod output;
pub mod source;

// Re-export commonly used types at crate root
pub use analysis::{CompensationGain, ImageStatistics, PairStatistics};
pub use config::FileConfig;
pub use motion::{
    compensate, difference, estimate, BlockCoord, BlockMatcher, MotionError, MotionField, MotionVector,
    PairAnalysis, PairAnalyzer, SearchParams,
};
pub use source::{ChromaFormat, Frame, FrameSource, Plane, SyntheticSource, YuvReader};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
