//! Motion compensation.
//!
//! Rebuilds a prediction of the current frame by copying each block's
//! matched region out of the reference frame, and records the signed
//! residual left over. Pixels outside every whole block stay zero in
//! both outputs.

use super::field::MotionField;
use super::matcher::displaced_origin;
use super::MotionError;
use crate::source::{CompensatedFrame, Frame, ResidualImage};

/// Predicted frame and residual for one frame pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compensation {
    /// Reference blocks placed at their current-frame positions.
    pub compensated: CompensatedFrame,
    /// `current - compensated` over every processed block, signed.
    pub residual: ResidualImage,
}

/// Applies `field` to `reference` and computes the residual against `current`.
pub fn compensate(current: &Frame, reference: &Frame, field: &MotionField) -> Result<Compensation, MotionError> {
    for frame in [current, reference] {
        if !frame.is_valid() {
            return Err(MotionError::InvalidParameters(format!(
                "frame {} pixel buffer does not match {}x{}",
                frame.index(),
                frame.width(),
                frame.height()
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

    let b = field.block_size();
    let (width, height) = (current.width() as usize, current.height() as usize);
    let fits = |blocks: usize, extent: usize| blocks.checked_mul(b).is_some_and(|span| span <= extent);
    if b == 0 || !fits(field.block_rows(), height) || !fits(field.block_cols(), width) {
        return Err(MotionError::InvalidParameters(format!(
            "{}x{} field of {}px blocks does not fit a {}x{} frame",
            field.block_cols(),
            field.block_rows(),
            b,
            width,
            height
        )));
    }

    let mut compensated = CompensatedFrame::new(width, height);
    let mut residual = ResidualImage::new(width, height);

    for (coord, mv) in field.iter() {
        let (y, x) = coord.origin(b);
        let (ry, rx) = displaced_origin((y, x), mv, b, reference.dimensions()).ok_or_else(|| {
            MotionError::InvalidParameters(format!(
                "vector ({}, {}) moves block ({}, {}) outside the reference frame",
                mv.dy, mv.dx, coord.row, coord.col
            ))
        })?;

        for r in 0..b {
            let predicted = &reference.row(ry + r)[rx..rx + b];
            let actual = &current.row(y + r)[x..x + b];

            compensated.row_mut(y + r)[x..x + b].copy_from_slice(predicted);
            for ((out, &c), &p) in residual.row_mut(y + r)[x..x + b].iter_mut().zip(actual).zip(predicted) {
                *out = c as i16 - p as i16;
            }
        }
    }

    Ok(Compensation { compensated, residual })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{BlockCoord, MotionVector};

    fn ramp(width: u32, height: u32, index: u64) -> Frame {
        Frame::from_fn(width, height, index, |x, y| ((x * 5 + y * 11) % 200) as u8)
    }

    #[test]
    fn test_zero_field_copies_reference() {
        let reference = ramp(16, 16, 0);
        let current = Frame::filled(16, 16, 1, 100);
        let field = MotionField::from_vectors(8, 2, 2, vec![MotionVector::ZERO; 4]).unwrap();

        let out = compensate(&current, &reference, &field).unwrap();

        for y in 0..16 {
            for x in 0..16 {
                let p = reference.pixel(x, y);
                assert_eq!(out.compensated.get(x, y), p);
                assert_eq!(out.residual.get(x, y), 100 - p as i16);
            }
        }
    }

    #[test]
    fn test_block_copied_from_displaced_region() {
        let reference = ramp(16, 16, 0);
        let current = ramp(16, 16, 1);
        let vectors = vec![
            MotionVector::new(4, 8),
            MotionVector::ZERO,
            MotionVector::ZERO,
            MotionVector::new(-8, -2),
        ];
        let field = MotionField::from_vectors(8, 2, 2, vectors).unwrap();

        let out = compensate(&current, &reference, &field).unwrap();

        assert_eq!(out.compensated.get(0, 0), reference.pixel(8, 4));
        assert_eq!(out.compensated.get(7, 3), reference.pixel(15, 7));
        assert_eq!(out.compensated.get(8, 8), reference.pixel(6, 0));
        let expected = current.pixel(8, 8) as i16 - reference.pixel(6, 0) as i16;
        assert_eq!(out.residual.get(8, 8), expected);
    }

    #[test]
    fn test_residual_can_be_negative() {
        let reference = Frame::filled(8, 8, 0, 200);
        let current = Frame::filled(8, 8, 1, 10);
        let field = MotionField::from_vectors(8, 1, 1, vec![MotionVector::ZERO]).unwrap();

        let out = compensate(&current, &reference, &field).unwrap();
        assert!(out.residual.as_slice().iter().all(|&v| v == -190));
    }

    #[test]
    fn test_margin_left_at_zero() {
        let reference = Frame::filled(20, 12, 0, 50);
        let current = Frame::filled(20, 12, 1, 60);
        let field = MotionField::from_vectors(8, 1, 2, vec![MotionVector::ZERO; 2]).unwrap();

        let out = compensate(&current, &reference, &field).unwrap();

        for y in 0..12 {
            for x in 0..20 {
                let covered = y < 8 && x < 16;
                let expected = if covered { (50, 10) } else { (0, 0) };
                assert_eq!((out.compensated.get(x, y), out.residual.get(x, y)), expected);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_vector_rejected() {
        let frame = ramp(16, 16, 0);
        let field = MotionField::from_vectors(8, 2, 2, vec![MotionVector::new(-1, 0); 4]).unwrap();

        assert!(matches!(
            compensate(&frame, &frame, &field),
            Err(MotionError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_oversized_field_rejected() {
        let frame = ramp(16, 16, 0);
        let field = MotionField::from_vectors(8, 3, 2, vec![MotionVector::ZERO; 6]).unwrap();

        assert!(matches!(
            compensate(&frame, &frame, &field),
            Err(MotionError::InvalidParameters(_))
        ));
        assert_eq!(field.get(BlockCoord::new(2, 1)), Some(MotionVector::ZERO));
    }

    #[test]
    fn test_overflowing_field_rejected() {
        let frame = ramp(16, 16, 0);
        let field = MotionField::from_vectors(usize::MAX / 2 + 1, 2, 1, vec![MotionVector::ZERO; 2]).unwrap();

        assert!(matches!(
            compensate(&frame, &frame, &field),
            Err(MotionError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_mismatched_frames_rejected() {
        let reference = ramp(16, 16, 0);
        let current = ramp(16, 24, 1);
        let field = MotionField::from_vectors(8, 2, 2, vec![MotionVector::ZERO; 4]).unwrap();

        assert!(matches!(
            compensate(&current, &reference, &field),
            Err(MotionError::InvalidParameters(_))
        ));
        assert!(matches!(
            compensate(&reference, &current, &field),
            Err(MotionError::InvalidParameters(_))
        ));
    }
}
