//! Binary PGM (P5) image output.

use super::OutputError;
use crate::source::{Plane, ResidualImage};
use std::path::Path;

/// Absolute residual values clamped to 8 bits, for display.
pub fn residual_magnitude(residual: &ResidualImage) -> Plane<u8> {
    residual.map(|v| v.unsigned_abs().min(255) as u8)
}

/// Encodes an 8-bit plane as a binary PGM image.
pub fn encode_pgm(plane: &Plane<u8>) -> Vec<u8> {
    let header = format!("P5\n{} {}\n255\n", plane.width(), plane.height());
    let mut out = Vec::with_capacity(header.len() + plane.as_slice().len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(plane.as_slice());
    out
}

/// Writes an 8-bit plane to `path` as a binary PGM image.
pub fn write_pgm(path: impl AsRef<Path>, plane: &Plane<u8>) -> Result<(), OutputError> {
    std::fs::write(path.as_ref(), encode_pgm(plane))?;
    tracing::debug!("wrote {}", path.as_ref().display());
    Ok(())
}
