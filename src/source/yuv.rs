//! Planar YUV file reader.
//!
//! Raw planar files store each frame as a full-resolution luma plane
//! followed by the chroma planes. Only luma is kept; chroma bytes are
//! skipped.

use super::{Frame, FrameSource, SourceError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::str::FromStr;

/// Chroma layout of a planar YUV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromaFormat {
    /// Two quarter-size chroma planes.
    #[default]
    Yuv420,
    /// Two half-width, full-height chroma planes.
    Yuv422,
    /// Two full-size chroma planes.
    Yuv444,
    /// Luma only.
    Mono,
}

impl ChromaFormat {
    /// Number of chroma bytes following each luma plane.
    pub fn chroma_bytes(self, width: u32, height: u32) -> u64 {
        let (w, h) = (width as u64, height as u64);
        match self {
            ChromaFormat::Yuv420 => 2 * w.div_ceil(2) * h.div_ceil(2),
            ChromaFormat::Yuv422 => 2 * w.div_ceil(2) * h,
            ChromaFormat::Yuv444 => 2 * w * h,
            ChromaFormat::Mono => 0,
        }
    }

    /// Total bytes per stored frame.
    pub fn frame_bytes(self, width: u32, height: u32) -> u64 {
        (width as u64) * (height as u64) + self.chroma_bytes(width, height)
    }
}

impl std::fmt::Display for ChromaFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChromaFormat::Yuv420 => "yuv420",
            ChromaFormat::Yuv422 => "yuv422",
            ChromaFormat::Yuv444 => "yuv444",
            ChromaFormat::Mono => "mono",
        };
        f.write_str(name)
    }
}

impl FromStr for ChromaFormat {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yuv420" | "420" | "i420" => Ok(ChromaFormat::Yuv420),
            "yuv422" | "422" => Ok(ChromaFormat::Yuv422),
            "yuv444" | "444" => Ok(ChromaFormat::Yuv444),
            "mono" | "gray" | "y" => Ok(ChromaFormat::Mono),
            _ => Err(SourceError::UnknownFormat(s.to_string())),
        }
    }
}

/// Reads luma planes from a planar YUV stream.
pub struct YuvReader<R> {
    inner: R,
    width: u32,
    height: u32,
    format: ChromaFormat,
    frame_count: u64,
    next_index: u64,
}

impl YuvReader<BufReader<File>> {
    /// Opens a planar YUV file.
    pub fn open(
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        format: ChromaFormat,
    ) -> Result<Self, SourceError> {
        let file = File::open(path.as_ref())?;
        let reader = Self::new(BufReader::new(file), width, height, format)?;
        tracing::info!(
            "opened {} ({}x{} {}, {} frames)",
            path.as_ref().display(),
            width,
            height,
            format,
            reader.frame_count
        );
        Ok(reader)
    }
}

impl<R: Read + Seek> YuvReader<R> {
    /// Wraps a seekable stream of planar frames.
    pub fn new(mut inner: R, width: u32, height: u32, format: ChromaFormat) -> Result<Self, SourceError> {
        if width == 0 || height == 0 {
            return Err(SourceError::InvalidGeometry { width, height });
        }

        let frame_bytes = format.frame_bytes(width, height);
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;

        let trailing = len % frame_bytes;
        if trailing != 0 {
            tracing::warn!(
                "ignoring {} trailing bytes (not a whole {}x{} {} frame)",
                trailing,
                width,
                height,
                format
            );
        }

        Ok(Self {
            inner,
            width,
            height,
            format,
            frame_count: len / frame_bytes,
            next_index: 0,
        })
    }

    /// Number of whole frames in the stream.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Chroma layout used to step between frames.
    pub fn format(&self) -> ChromaFormat {
        self.format
    }

    fn frame_bytes(&self) -> u64 {
        self.format.frame_bytes(self.width, self.height)
    }
}

impl<R: Read + Seek> FrameSource for YuvReader<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        if self.next_index >= self.frame_count {
            return Ok(None);
        }

        let mut luma = vec![0u8; (self.width as usize) * (self.height as usize)];
        self.inner.read_exact(&mut luma)?;

        let chroma = self.format.chroma_bytes(self.width, self.height);
        if chroma > 0 {
            self.inner.seek(SeekFrom::Current(chroma as i64))?;
        }

        let frame = Frame::new(luma, self.width, self.height, self.next_index);
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn rewind(&mut self) -> Result<(), SourceError> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.next_index = 0;
        Ok(())
    }

    fn frame_at(&mut self, index: u64) -> Result<Frame, SourceError> {
        let out_of_range = SourceError::IndexOutOfRange {
            index,
            available: self.frame_count,
        };
        if index >= self.frame_count {
            return Err(out_of_range);
        }

        self.inner.seek(SeekFrom::Start(index * self.frame_bytes()))?;
        self.next_index = index;
        self.next_frame()?.ok_or(out_of_range)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Loads every luma plane of a planar YUV file, in order.
pub fn load_frames(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    format: ChromaFormat,
) -> Result<Vec<Frame>, SourceError> {
    let mut reader = YuvReader::open(path, width, height, format)?;
    let mut frames = Vec::with_capacity(reader.frame_count() as usize);
    while let Some(frame) = reader.next_frame()? {
        frames.push(frame);
    }
    Ok(frames)
}
