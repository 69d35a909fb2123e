//! Frame source abstraction.
//!
//! This module provides a trait-based abstraction over where frames come
//! from, allowing planar video files and synthetic sequences to be used
//! interchangeably by the analysis pipeline.

use super::Frame;
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use thiserror::Error;

/// Errors that can occur while producing frames.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid frame geometry {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },
    #[error("frame index {index} out of range ({available} frames available)")]
    IndexOutOfRange { index: u64, available: u64 },
    #[error("unknown chroma format: {0}")]
    UnknownFormat(String),
}

/// Trait for ordered, restartable frame sequences.
pub trait FrameSource {
    /// Returns the next frame, or `None` once the sequence is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Restarts the sequence from its first frame.
    fn rewind(&mut self) -> Result<(), SourceError>;

    /// Returns the frame at `index`. Subsequent `next_frame` calls
    /// continue from `index + 1`.
    fn frame_at(&mut self, index: u64) -> Result<Frame, SourceError>;

    /// Returns `(width, height)` of every frame in the sequence.
    fn dimensions(&self) -> (u32, u32);
}

/// Synthetic source producing a translating random texture.
///
/// Frame `k` is a seeded noise texture shifted by `k * (dy, dx)` with
/// wrap-around, so consecutive frames are related by a known global motion.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    width: u32,
    height: u32,
    texture: Vec<u8>,
    motion: (i32, i32),
    length: u64,
    next_index: u64,
}

impl SyntheticSource {
    /// Default number of frames in a synthetic sequence.
    pub const DEFAULT_LENGTH: u64 = 16;

    /// Creates a static texture source seeded with `seed`.
    pub fn new(width: u32, height: u32, seed: u64) -> Result<Self, SourceError> {
        if width == 0 || height == 0 {
            return Err(SourceError::InvalidGeometry { width, height });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut texture = vec![0u8; (width as usize) * (height as usize)];
        rng.fill_bytes(&mut texture);

        Ok(Self {
            width,
            height,
            texture,
            motion: (0, 0),
            length: Self::DEFAULT_LENGTH,
            next_index: 0,
        })
    }

    /// Sets the per-frame global translation `(dy, dx)`.
    pub fn with_motion(mut self, dy: i32, dx: i32) -> Self {
        self.motion = (dy, dx);
        self
    }

    /// Sets the number of frames in the sequence.
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = length;
        self
    }

    /// Returns the per-frame global translation `(dy, dx)`.
    pub fn motion(&self) -> (i32, i32) {
        self.motion
    }

    fn render(&self, index: u64) -> Frame {
        let (w, h) = (self.width as i64, self.height as i64);
        // Shifts wrap, so the index only matters modulo each dimension.
        let shift_y = (index % h as u64) as i64 * self.motion.0 as i64;
        let shift_x = (index % w as u64) as i64 * self.motion.1 as i64;

        Frame::from_fn(self.width, self.height, index, |x, y| {
            let sy = (y as i64 - shift_y).rem_euclid(h);
            let sx = (x as i64 - shift_x).rem_euclid(w);
            self.texture[(sy * w + sx) as usize]
        })
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        if self.next_index >= self.length {
            return Ok(None);
        }
        let frame = self.render(self.next_index);
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn rewind(&mut self) -> Result<(), SourceError> {
        self.next_index = 0;
        Ok(())
    }

    fn frame_at(&mut self, index: u64) -> Result<Frame, SourceError> {
        if index >= self.length {
            return Err(SourceError::IndexOutOfRange {
                index,
                available: self.length,
            });
        }
        self.next_index = index + 1;
        Ok(self.render(index))
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
