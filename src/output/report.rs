//! Serializable analysis report.
//!
//! Carries the motion field and pair statistics as plain data so they can
//! be stored next to the rendered images or read back by other tools.

use super::OutputError;
use crate::analysis::PairStatistics;
use crate::motion::{PairAnalysis, SearchParams};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One block of the motion field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntry {
    /// Block row.
    pub row: usize,
    /// Block column.
    pub col: usize,
    /// Vertical displacement.
    pub dy: i32,
    /// Horizontal displacement.
    pub dx: i32,
    /// SSD of the selected candidate.
    pub ssd: u64,
}

/// Report for one analyzed frame pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Report creation time.
    pub generated_at: DateTime<Utc>,
    /// Index of the current frame.
    pub current_index: u64,
    /// Index of the reference frame.
    pub reference_index: u64,
    /// Frame width in pixels.
    pub width: usize,
    /// Frame height in pixels.
    pub height: usize,
    /// Search parameters used.
    pub params: SearchParams,
    /// Pair statistics.
    pub statistics: PairStatistics,
    /// Motion field, row-major.
    pub blocks: Vec<BlockEntry>,
}

impl AnalysisReport {
    /// Builds a report from a pair analysis.
    pub fn new(analysis: &PairAnalysis, params: SearchParams) -> Self {
        let blocks = analysis
            .field
            .iter()
            .zip(analysis.field.matches())
            .map(|((coord, mv), m)| BlockEntry {
                row: coord.row,
                col: coord.col,
                dy: mv.dy,
                dx: mv.dx,
                ssd: m.ssd,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            current_index: analysis.current_index,
            reference_index: analysis.reference_index,
            width: analysis.difference.width(),
            height: analysis.difference.height(),
            params,
            statistics: PairStatistics::from_analysis(analysis),
            blocks,
        }
    }

    /// Serializes the report as TOML.
    pub fn to_toml(&self) -> Result<String, OutputError> {
        Ok(toml::to_string(self)?)
    }

    /// Parses a report from TOML.
    pub fn from_toml(content: &str) -> Result<Self, OutputError> {
        Ok(toml::from_str(content)?)
    }

    /// Writes the report to `path` as TOML.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), OutputError> {
        std::fs::write(path.as_ref(), self.to_toml()?)?;
        tracing::debug!("wrote {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::PairAnalyzer;
    use crate::source::{FrameSource, SyntheticSource};

    fn sample_report() -> AnalysisReport {
        let mut source = SyntheticSource::new(32, 32, 5).unwrap().with_motion(0, 1);
        let reference = source.frame_at(0).unwrap();
        let current = source.frame_at(1).unwrap();

        let params = SearchParams::new(16, 2);
        let analysis = PairAnalyzer::new(params).unwrap().analyze(&current, &reference).unwrap();
        AnalysisReport::new(&analysis, params)
    }

    #[test]
    fn test_blocks_listed_row_major() {
        let report = sample_report();

        assert_eq!(report.blocks.len(), 4);
        assert_eq!((report.blocks[1].row, report.blocks[1].col), (0, 1));
        assert_eq!((report.blocks[2].row, report.blocks[2].col), (1, 0));
        assert_eq!((report.width, report.height), (32, 32));
    }

    #[test]
    fn test_toml_contains_field() {
        let report = sample_report();
        let text = report.to_toml().unwrap();

        assert!(text.contains("[params]"));
        assert!(text.contains("[[blocks]]"));
        assert!(text.contains("block_size = 16"));
    }

    #[test]
    fn test_toml_reads_back() {
        let report = sample_report();
        let parsed = AnalysisReport::from_toml(&report.to_toml().unwrap()).unwrap();

        assert_eq!(parsed.blocks, report.blocks);
        assert_eq!(parsed.params, report.params);
        assert_eq!(parsed.generated_at, report.generated_at);
    }
}
