//! Per-pair summary combining image and motion field statistics.

use super::statistics::{CompensationGain, ImageStatistics};
use crate::motion::PairAnalysis;
use serde::{Deserialize, Serialize};

/// Statistics for one analyzed frame pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStatistics {
    /// Blocks in the motion field.
    pub blocks: usize,
    /// Blocks with a non-zero vector.
    pub nonzero_vectors: usize,
    /// Mean vector length in pixels.
    pub mean_vector_magnitude: f64,
    /// Candidates scored across all blocks.
    pub candidates_scored: u64,
    /// Naive difference image statistics.
    pub difference: ImageStatistics,
    /// Compensated residual statistics.
    pub residual: ImageStatistics,
    /// Energy reduction from compensation.
    pub gain: CompensationGain,
}

impl PairStatistics {
    /// Summarizes a pair analysis.
    pub fn from_analysis(analysis: &PairAnalysis) -> Self {
        let difference = ImageStatistics::analyze(&analysis.difference);
        let residual = ImageStatistics::analyze(&analysis.residual);

        Self {
            blocks: analysis.field.len(),
            nonzero_vectors: analysis.field.nonzero_count(),
            mean_vector_magnitude: analysis.field.mean_magnitude(),
            candidates_scored: analysis.field.candidates_scored(),
            gain: CompensationGain::new(&difference, &residual),
            difference,
            residual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{PairAnalyzer, SearchParams};
    use crate::source::{FrameSource, SyntheticSource};

    #[test]
    fn test_compensation_beats_naive_difference() {
        let mut source = SyntheticSource::new(64, 64, 11).unwrap().with_motion(1, 2);
        let reference = source.frame_at(0).unwrap();
        let current = source.frame_at(1).unwrap();

        let analyzer = PairAnalyzer::new(SearchParams::new(16, 4)).unwrap();
        let analysis = analyzer.analyze(&current, &reference).unwrap();
        let stats = PairStatistics::from_analysis(&analysis);

        assert_eq!(stats.blocks, 16);
        assert!(stats.residual.energy < stats.difference.energy);
        assert!(stats.nonzero_vectors > 0);
    }
}
