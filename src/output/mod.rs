//! Image and report output.
//!
//! Renders diagnostic images as PGM files and writes the per-pair report.
//! Signed residuals are reduced to magnitudes only here, at display time.

mod pgm;
mod report;

pub use pgm::{encode_pgm, residual_magnitude, write_pgm};
pub use report::{AnalysisReport, BlockEntry};

use thiserror::Error;

/// Errors that can occur while writing output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to parse report: {0}")]
    Parse(#[from] toml::de::Error),
}
