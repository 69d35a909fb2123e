//! Exhaustive block-matching motion search.
//!
//! Each whole `B x B` block of the current frame is compared against every
//! in-bounds displacement of a `(2S + 1)^2` window in the reference frame, scored by
//! sum of squared differences. Blocks are searched independently, so the
//! search fans out across threads without shared mutable state.

use super::field::{block_coords, BlockCoord, BlockMatch, MotionField, MotionVector};
use super::MotionError;
use crate::source::Frame;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Block size and search radius for a motion search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Edge length of a square block in pixels.
    pub block_size: i32,
    /// Maximum displacement in each axis.
    pub search_radius: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            block_size: 32,
            search_radius: 16,
        }
    }
}

impl SearchParams {
    /// Creates parameters from `(block_size, search_radius)`.
    pub fn new(block_size: i32, search_radius: i32) -> Self {
        Self {
            block_size,
            search_radius,
        }
    }

    /// Checks `block_size > 0` and `search_radius >= 0`.
    pub fn validate(&self) -> Result<(), MotionError> {
        if self.block_size <= 0 {
            return Err(MotionError::InvalidParameters(format!(
                "block size must be positive, got {}",
                self.block_size
            )));
        }
        if self.search_radius < 0 {
            return Err(MotionError::InvalidParameters(format!(
                "search radius must be non-negative, got {}",
                self.search_radius
            )));
        }
        Ok(())
    }
}

/// Candidate displacements in scan order: `dy` outer, `dx` inner, both
/// ascending over `[-radius, radius]`.
pub fn candidates(radius: i32) -> impl Iterator<Item = MotionVector> {
    (-radius..=radius).flat_map(move |dy| (-radius..=radius).map(move |dx| MotionVector::new(dy, dx)))
}

/// Sum of squared differences between the `size x size` block of `current`
/// at `(y, x)` and the block of `reference` at `(ry, rx)`.
pub fn block_ssd(
    current: &Frame,
    reference: &Frame,
    (y, x): (usize, usize),
    (ry, rx): (usize, usize),
    size: usize,
) -> u64 {
    (0..size)
        .map(|r| {
            let a = &current.row(y + r)[x..x + size];
            let b = &reference.row(ry + r)[rx..rx + size];
            a.iter()
                .zip(b)
                .map(|(&p, &q)| {
                    let d = p as i32 - q as i32;
                    (d * d) as u64
                })
                .sum::<u64>()
        })
        .sum()
}

/// Displacements along one axis that keep a `size`-pixel span starting at
/// `origin` inside `extent`, limited to `[-radius, radius]`. Ascending, and
/// empty when no displacement fits.
fn axis_window(radius: i32, origin: usize, size: usize, extent: u32) -> RangeInclusive<i32> {
    let radius = radius as i64;
    let lo = (-radius).max(-(origin as i64));
    let hi = radius.min(extent as i64 - size as i64 - origin as i64).max(lo - 1);
    lo as i32..=hi as i32
}

/// Top-left of the block at `(y, x)` displaced by `mv`, if the displaced
/// block lies fully inside a `width x height` frame.
pub(crate) fn displaced_origin(
    (y, x): (usize, usize),
    mv: MotionVector,
    size: usize,
    (width, height): (u32, u32),
) -> Option<(usize, usize)> {
    let ry = y as i64 + mv.dy as i64;
    let rx = x as i64 + mv.dx as i64;
    let inside = ry >= 0
        && rx >= 0
        && ry + size as i64 <= height as i64
        && rx + size as i64 <= width as i64;
    inside.then_some((ry as usize, rx as usize))
}

/// Exhaustive SSD block matcher.
#[derive(Debug, Clone, Copy)]
pub struct BlockMatcher {
    params: SearchParams,
}

impl BlockMatcher {
    /// Creates a matcher, validating the parameters.
    pub fn new(params: SearchParams) -> Result<Self, MotionError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Returns the search parameters.
    pub fn params(&self) -> SearchParams {
        self.params
    }

    fn block_size(&self) -> usize {
        self.params.block_size as usize
    }

    /// Checks the frame pair and returns the `(rows, cols)` block grid.
    fn grid(&self, current: &Frame, reference: &Frame) -> Result<(usize, usize), MotionError> {
        for frame in [current, reference] {
            if !frame.is_valid() {
                return Err(MotionError::InvalidParameters(format!(
                    "frame {} has {} pixel bytes, expected {}",
                    frame.index(),
                    frame.pixels().len(),
                    frame.pixel_count()
                )));
            }
        }
        if current.dimensions() != reference.dimensions() {
            return Err(MotionError::InvalidParameters(format!(
                "frame dimensions differ: {:?} vs {:?}",
                current.dimensions(),
                reference.dimensions()
            )));
        }

        let b = self.block_size();
        let rows = current.height() as usize / b;
        let cols = current.width() as usize / b;
        if rows == 0 || cols == 0 {
            return Err(MotionError::InvalidParameters(format!(
                "{}x{} frame holds no whole {}x{} block",
                current.width(),
                current.height(),
                b,
                b
            )));
        }
        Ok((rows, cols))
    }

    /// Searches one block. Callers guarantee the block lies inside the grid.
    fn search(&self, current: &Frame, reference: &Frame, coord: BlockCoord) -> Result<BlockMatch, MotionError> {
        let b = self.block_size();
        let origin = coord.origin(b);
        let bounds = reference.dimensions();

        let radius = self.params.search_radius;
        let rows = axis_window(radius, origin.0, b, bounds.1);
        let cols = axis_window(radius, origin.1, b, bounds.0);

        // The in-bounds subsequence of `candidates(radius)`, in the same order.
        let (best, scored) = rows
            .flat_map(|dy| cols.clone().map(move |dx| MotionVector::new(dy, dx)))
            .filter_map(|mv| displaced_origin(origin, mv, b, bounds).map(|at| (mv, at)))
            .fold((None::<(MotionVector, u64)>, 0u32), |(best, scored), (mv, at)| {
                let cost = block_ssd(current, reference, origin, at, b);
                // Only a strictly smaller cost replaces; ties keep the earlier candidate.
                let best = match best {
                    Some((_, lowest)) if cost >= lowest => best,
                    _ => Some((mv, cost)),
                };
                (best, scored + 1)
            });

        let (vector, ssd) = best.ok_or(MotionError::NoValidCandidate {
            row: coord.row,
            col: coord.col,
        })?;
        Ok(BlockMatch {
            vector,
            ssd,
            candidates: scored,
        })
    }

    /// Finds the best displacement for a single block.
    pub fn match_block(
        &self,
        current: &Frame,
        reference: &Frame,
        coord: BlockCoord,
    ) -> Result<BlockMatch, MotionError> {
        let (rows, cols) = self.grid(current, reference)?;
        if coord.row >= rows || coord.col >= cols {
            return Err(MotionError::InvalidParameters(format!(
                "block ({}, {}) outside {}x{} block grid",
                coord.row, coord.col, rows, cols
            )));
        }
        self.search(current, reference, coord)
    }

    /// Estimates the motion field of `current` relative to `reference`.
    pub fn estimate(&self, current: &Frame, reference: &Frame) -> Result<MotionField, MotionError> {
        let (rows, cols) = self.grid(current, reference)?;
        let matches = block_coords(rows, cols)
            .map(|coord| self.search(current, reference, coord))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.finish(current, reference, rows, cols, matches))
    }

    /// Same as [`estimate`](Self::estimate), searching blocks on the rayon
    /// thread pool. The resulting field is identical.
    pub fn estimate_par(&self, current: &Frame, reference: &Frame) -> Result<MotionField, MotionError> {
        let (rows, cols) = self.grid(current, reference)?;
        let coords: Vec<BlockCoord> = block_coords(rows, cols).collect();
        let matches = coords
            .par_iter()
            .map(|&coord| self.search(current, reference, coord))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.finish(current, reference, rows, cols, matches))
    }

    fn finish(
        &self,
        current: &Frame,
        reference: &Frame,
        rows: usize,
        cols: usize,
        matches: Vec<BlockMatch>,
    ) -> MotionField {
        let field = MotionField::new(self.block_size(), rows, cols, matches);
        tracing::debug!(
            "frame {} vs {}: {} blocks, {} candidates scored, {} non-zero vectors",
            current.index(),
            reference.index(),
            field.len(),
            field.candidates_scored(),
            field.nonzero_count()
        );
        field
    }
}

/// Estimates a motion field with the given block size and search radius.
pub fn estimate(
    current: &Frame,
    reference: &Frame,
    block_size: i32,
    search_radius: i32,
) -> Result<MotionField, MotionError> {
    BlockMatcher::new(SearchParams::new(block_size, search_radius))?.estimate(current, reference)
}
