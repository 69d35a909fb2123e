//! Naive frame differencing.
//!
//! The absolute per-pixel difference of two frames, with no motion
//! compensation. Serves as the baseline the compensated residual is
//! compared against.

use super::MotionError;
use crate::source::{DifferenceImage, Frame};

/// Computes `|a - b|` for every pixel, over the full frame.
pub fn difference(a: &Frame, b: &Frame) -> Result<DifferenceImage, MotionError> {
    if a.dimensions() != b.dimensions() {
        return Err(MotionError::DimensionMismatch {
            expected: a.dimensions(),
            found: b.dimensions(),
        });
    }
    for frame in [a, b] {
        if !frame.is_valid() {
            return Err(MotionError::InvalidParameters(format!(
                "frame {} pixel buffer does not match {}x{}",
                frame.index(),
                frame.width(),
                frame.height()
            )));
        }
    }

    let mut out = DifferenceImage::new(a.width() as usize, a.height() as usize);
    for ((d, &p), &q) in out.as_mut_slice().iter_mut().zip(a.pixels()).zip(b.pixels()) {
        *d = (p as i16 - q as i16).unsigned_abs() as u8;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_difference() {
        let a = Frame::filled(8, 8, 0, 100);
        let b = Frame::filled(8, 8, 1, 150);

        let diff = difference(&a, &b).unwrap();
        assert!(diff.as_slice().iter().all(|&v| v == 50));
    }

    #[test]
    fn test_identical_frames_zero_difference() {
        let a = Frame::from_fn(8, 8, 0, |x, y| (x * y) as u8);

        let diff = difference(&a, &a).unwrap();
        assert!(diff.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_symmetric() {
        let a = Frame::from_fn(6, 4, 0, |x, _| (x * 40) as u8);
        let b = Frame::from_fn(6, 4, 1, |_, y| (y * 60) as u8);

        assert_eq!(difference(&a, &b).unwrap(), difference(&b, &a).unwrap());
    }

    #[test]
    fn test_full_scale_difference() {
        let a = Frame::filled(4, 4, 0, 0);
        let b = Frame::filled(4, 4, 1, 255);
        assert!(difference(&a, &b).unwrap().as_slice().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = Frame::filled(8, 8, 0, 0);
        let b = Frame::filled(8, 4, 1, 0);

        assert_eq!(
            difference(&a, &b),
            Err(MotionError::DimensionMismatch {
                expected: (8, 8),
                found: (8, 4),
            })
        );
    }
}
