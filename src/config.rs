//! File configuration.
//!
//! Every section is optional in the TOML file and falls back to its
//! defaults; command-line flags override the loaded values.

use crate::motion::SearchParams;
use crate::source::ChromaFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where frames come from and which two are compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Planar YUV file. A synthetic sequence is used when unset.
    pub path: Option<PathBuf>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Chroma layout of the file.
    pub format: ChromaFormat,
    /// Index of the reference frame.
    pub reference_index: u64,
    /// Index of the current frame.
    pub current_index: u64,
    /// Synthetic sequence settings.
    pub synthetic: SyntheticConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            width: 352, // CIF
            height: 288,
            format: ChromaFormat::Yuv420,
            reference_index: 0,
            current_index: 1,
            synthetic: SyntheticConfig::default(),
        }
    }
}

impl SourceConfig {
    /// Frames a synthetic sequence needs to cover both selected indices.
    pub fn synthetic_length(&self) -> u64 {
        self.reference_index.max(self.current_index).saturating_add(1)
    }
}

/// Synthetic sequence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Texture seed.
    pub seed: u64,
    /// Vertical motion per frame.
    pub dy: i32,
    /// Horizontal motion per frame.
    pub dx: i32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self { seed: 7, dy: 2, dx: -3 }
    }
}

/// Motion search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    /// Block edge length in pixels.
    pub block_size: i32,
    /// Maximum displacement in each axis.
    pub search_radius: i32,
    /// Search blocks in parallel.
    pub parallel: bool,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        let params = SearchParams::default();
        Self {
            block_size: params.block_size,
            search_radius: params.search_radius,
            parallel: false,
        }
    }
}

impl EstimationConfig {
    /// Search parameters described by this section.
    pub fn params(&self) -> SearchParams {
        SearchParams::new(self.block_size, self.search_radius)
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for images and report. Nothing is written when unset.
    pub directory: Option<PathBuf>,
    /// Write PGM images of every diagnostic grid.
    pub write_images: bool,
    /// Write the TOML analysis report.
    pub write_report: bool,
    /// Print Prometheus metrics after the run.
    pub print_metrics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            write_images: true,
            write_report: true,
            print_metrics: false,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),
    #[error("invalid estimation settings: {0}")]
    InvalidEstimation(String),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub estimation: EstimationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.width == 0 || self.source.height == 0 {
            return Err(ConfigError::InvalidDimensions(self.source.width, self.source.height));
        }
        self.estimation
            .params()
            .validate()
            .map_err(|e| ConfigError::InvalidEstimation(e.to_string()))
    }
}
