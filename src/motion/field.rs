//! Motion vectors and the per-block motion field.

use serde::{Deserialize, Serialize};

/// Integer pixel displacement `(dy, dx)` from a block in the current
/// frame to its match in the reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MotionVector {
    /// Vertical displacement in pixels.
    pub dy: i32,
    /// Horizontal displacement in pixels.
    pub dx: i32,
}

impl MotionVector {
    /// The zero displacement.
    pub const ZERO: MotionVector = MotionVector { dy: 0, dx: 0 };

    /// Creates a vector from `(dy, dx)`.
    pub const fn new(dy: i32, dx: i32) -> Self {
        Self { dy, dx }
    }

    /// Returns true for `(0, 0)`.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.dy == 0 && self.dx == 0
    }

    /// Euclidean length in pixels.
    pub fn magnitude(&self) -> f64 {
        (self.dy as f64).hypot(self.dx as f64)
    }
}

/// Position of a block in the block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockCoord {
    /// Block row.
    pub row: usize,
    /// Block column.
    pub col: usize,
}

impl BlockCoord {
    /// Creates a coordinate from `(row, col)`.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Top-left pixel `(y, x)` of this block for the given block size.
    #[inline]
    pub fn origin(&self, block_size: usize) -> (usize, usize) {
        (self.row * block_size, self.col * block_size)
    }
}

/// Row-major enumeration of a `rows x cols` block grid.
pub fn block_coords(rows: usize, cols: usize) -> impl Iterator<Item = BlockCoord> {
    (0..rows).flat_map(move |row| (0..cols).map(move |col| BlockCoord::new(row, col)))
}

/// Outcome of the search for a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMatch {
    /// Selected displacement.
    pub vector: MotionVector,
    /// SSD of the selected candidate.
    pub ssd: u64,
    /// Number of in-bounds candidates scored.
    pub candidates: u32,
}

/// One selected vector per whole block, in row-major block order.
///
/// Margin pixels not covered by a whole block have no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionField {
    block_size: usize,
    rows: usize,
    cols: usize,
    matches: Vec<BlockMatch>,
}

impl MotionField {
    pub(crate) fn new(block_size: usize, rows: usize, cols: usize, matches: Vec<BlockMatch>) -> Self {
        debug_assert_eq!(matches.len(), rows * cols);
        Self {
            block_size,
            rows,
            cols,
            matches,
        }
    }

    /// Builds a field from externally chosen vectors.
    ///
    /// SSD and candidate counts are recorded as zero. Returns `None` if
    /// `vectors.len() != rows * cols`.
    pub fn from_vectors(
        block_size: usize,
        rows: usize,
        cols: usize,
        vectors: Vec<MotionVector>,
    ) -> Option<Self> {
        if vectors.len() != rows * cols {
            return None;
        }
        let matches = vectors
            .into_iter()
            .map(|vector| BlockMatch {
                vector,
                ssd: 0,
                candidates: 0,
            })
            .collect();
        Some(Self::new(block_size, rows, cols, matches))
    }

    /// Block edge length in pixels.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of block rows.
    #[inline]
    pub fn block_rows(&self) -> usize {
        self.rows
    }

    /// Number of block columns.
    #[inline]
    pub fn block_cols(&self) -> usize {
        self.cols
    }

    /// Number of blocks in the field.
    #[inline]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Returns true if the field has no blocks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Returns the search result for `coord`, if it lies inside the grid.
    pub fn block_match(&self, coord: BlockCoord) -> Option<&BlockMatch> {
        if coord.row >= self.rows || coord.col >= self.cols {
            return None;
        }
        self.matches.get(coord.row * self.cols + coord.col)
    }

    /// Returns the vector for `coord`, if it lies inside the grid.
    pub fn get(&self, coord: BlockCoord) -> Option<MotionVector> {
        self.block_match(coord).map(|m| m.vector)
    }

    /// All search results, row-major.
    pub fn matches(&self) -> &[BlockMatch] {
        &self.matches
    }

    /// Iterates `(coord, vector)` pairs in row-major block order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockCoord, MotionVector)> + '_ {
        block_coords(self.rows, self.cols).zip(self.matches.iter().map(|m| m.vector))
    }

    /// Number of blocks with a non-zero vector.
    pub fn nonzero_count(&self) -> usize {
        self.matches.iter().filter(|m| !m.vector.is_zero()).count()
    }

    /// Mean vector length over all blocks.
    pub fn mean_magnitude(&self) -> f64 {
        if self.matches.is_empty() {
            return 0.0;
        }
        let total: f64 = self.matches.iter().map(|m| m.vector.magnitude()).sum();
        total / self.matches.len() as f64
    }

    /// Sum of the selected SSDs.
    pub fn total_ssd(&self) -> u64 {
        self.matches.iter().map(|m| m.ssd).sum()
    }

    /// Total candidates scored across all blocks.
    pub fn candidates_scored(&self) -> u64 {
        self.matches.iter().map(|m| m.candidates as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_field() -> MotionField {
        MotionField::from_vectors(
            16,
            2,
            3,
            vec![
                MotionVector::ZERO,
                MotionVector::new(3, 4),
                MotionVector::ZERO,
                MotionVector::new(-1, 0),
                MotionVector::ZERO,
                MotionVector::new(0, 2),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_block_coords_row_major() {
        let coords: Vec<_> = block_coords(2, 2).collect();
        assert_eq!(
            coords,
            vec![
                BlockCoord::new(0, 0),
                BlockCoord::new(0, 1),
                BlockCoord::new(1, 0),
                BlockCoord::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_origin() {
        assert_eq!(BlockCoord::new(2, 3).origin(32), (64, 96));
    }

    #[test]
    fn test_lookup_by_coord() {
        let field = sample_field();
        assert_eq!(field.get(BlockCoord::new(0, 1)), Some(MotionVector::new(3, 4)));
        assert_eq!(field.get(BlockCoord::new(1, 0)), Some(MotionVector::new(-1, 0)));
        assert_eq!(field.get(BlockCoord::new(2, 0)), None);
        assert_eq!(field.get(BlockCoord::new(0, 3)), None);
    }

    #[test]
    fn test_iter_pairs_coords_with_vectors() {
        let field = sample_field();
        let last = field.iter().last().unwrap();
        assert_eq!(last, (BlockCoord::new(1, 2), MotionVector::new(0, 2)));
        assert_eq!(field.iter().count(), 6);
    }

    #[test]
    fn test_summary_values() {
        let field = sample_field();
        assert_eq!(field.nonzero_count(), 3);
        assert!((field.mean_magnitude() - (5.0 + 1.0 + 2.0) / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_vectors_length_checked() {
        assert!(MotionField::from_vectors(8, 2, 2, vec![MotionVector::ZERO; 3]).is_none());
    }
}
