//! Frame input and grid types.
//!
//! This module provides the grayscale frame model, the zero-initialized
//! planes derived images are written into, and sources that produce
//! ordered frame sequences from planar YUV files or synthetic motion.

mod frame;
mod reader;
mod yuv;

pub use frame::{CompensatedFrame, DifferenceImage, Frame, Plane, ResidualImage};
pub use reader::{FrameSource, SourceError, SyntheticSource};
pub use yuv::{load_frames, ChromaFormat, YuvReader};
