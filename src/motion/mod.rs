//! Block-based motion estimation and compensation.
//!
//! This module turns a pair of frames into the four diagnostic outputs:
//! the naive difference image, the motion field, the motion-compensated
//! prediction and the residual left after compensation.

mod compensate;
mod difference;
mod error;
mod field;
mod matcher;

pub use compensate::{compensate, Compensation};
pub use difference::difference;
pub use error::MotionError;
pub use field::{block_coords, BlockCoord, BlockMatch, MotionField, MotionVector};
pub use matcher::{block_ssd, candidates, estimate, BlockMatcher, SearchParams};

use crate::source::{CompensatedFrame, DifferenceImage, Frame, ResidualImage};

/// Everything derived from one `(current, reference)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairAnalysis {
    /// Index of the current frame.
    pub current_index: u64,
    /// Index of the reference frame.
    pub reference_index: u64,
    /// `|current - reference|`, full frame.
    pub difference: DifferenceImage,
    /// Per-block motion vectors.
    pub field: MotionField,
    /// Motion-compensated prediction of the current frame.
    pub compensated: CompensatedFrame,
    /// `current - compensated`, signed.
    pub residual: ResidualImage,
}

/// Runs difference, estimation and compensation over frame pairs.
///
/// Used either on explicit pairs via [`analyze`](Self::analyze) or on a
/// stream via [`process`](Self::process), where each frame is compared
/// against its predecessor.
pub struct PairAnalyzer {
    matcher: BlockMatcher,
    parallel: bool,
    previous: Option<Frame>,
}

impl PairAnalyzer {
    /// Creates an analyzer with the given search parameters.
    pub fn new(params: SearchParams) -> Result<Self, MotionError> {
        Ok(Self {
            matcher: BlockMatcher::new(params)?,
            parallel: false,
            previous: None,
        })
    }

    /// Enables or disables block-parallel search.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the search parameters.
    pub fn params(&self) -> SearchParams {
        self.matcher.params()
    }

    /// Analyzes `current` against `reference`.
    pub fn analyze(&self, current: &Frame, reference: &Frame) -> Result<PairAnalysis, MotionError> {
        let difference = difference(current, reference)?;

        let field = if self.parallel {
            self.matcher.estimate_par(current, reference)?
        } else {
            self.matcher.estimate(current, reference)?
        };

        let Compensation { compensated, residual } = compensate(current, reference, &field)?;

        Ok(PairAnalysis {
            current_index: current.index(),
            reference_index: reference.index(),
            difference,
            field,
            compensated,
            residual,
        })
    }

    /// Analyzes `frame` against the previously processed frame.
    ///
    /// Returns `None` on the first frame (no reference yet).
    pub fn process(&mut self, frame: &Frame) -> Option<Result<PairAnalysis, MotionError>> {
        let result = self.previous.as_ref().map(|prev| self.analyze(frame, prev));

        // Store current as reference for the next call
        self.previous = Some(frame.clone());

        result
    }

    /// Forgets the stored reference frame.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Returns true if a reference frame is stored.
    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }
}
