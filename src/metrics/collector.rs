//! Metrics collection and registry.

use crate::analysis::PairStatistics;
use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Values recorded for one analyzed frame pair.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Blocks searched.
    pub blocks: u64,
    /// Candidates scored across all blocks.
    pub candidates_scored: u64,
    /// Blocks with a non-zero vector.
    pub nonzero_vectors: u64,
    /// Mean vector length in pixels.
    pub mean_vector_magnitude: f64,
    /// Energy of the naive difference image.
    pub difference_energy: u64,
    /// Energy of the compensated residual.
    pub residual_energy: u64,
    /// Compensation gain in dB, if defined.
    pub gain_db: Option<f64>,
}

impl MetricsSnapshot {
    /// Creates a snapshot from pair statistics.
    pub fn from_statistics(stats: &PairStatistics) -> Self {
        Self {
            blocks: stats.blocks as u64,
            candidates_scored: stats.candidates_scored,
            nonzero_vectors: stats.nonzero_vectors as u64,
            mean_vector_magnitude: stats.mean_vector_magnitude,
            difference_energy: stats.difference.energy,
            residual_energy: stats.residual.energy,
            gain_db: stats.gain.gain_db,
        }
    }
}

/// Prometheus metrics registry for motion analysis.
pub struct MetricsRegistry {
    registry: Registry,

    // Search totals
    pairs_total: IntCounter,
    blocks_total: IntCounter,
    candidates_total: IntCounter,

    // Latest pair
    nonzero_vectors: IntGauge,
    mean_vector_magnitude: Gauge,
    difference_energy: Gauge,
    residual_energy: Gauge,
    gain_db: Gauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all motion metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let pairs_total = IntCounter::new(
            "block_motion_pairs_total",
            "Total number of frame pairs analyzed",
        )?;
        let blocks_total = IntCounter::new(
            "block_motion_blocks_total",
            "Total number of blocks searched",
        )?;
        let candidates_total = IntCounter::new(
            "block_motion_candidates_scored_total",
            "Total number of in-bounds candidates scored by SSD",
        )?;

        let nonzero_vectors = IntGauge::new(
            "block_motion_nonzero_vectors",
            "Blocks with a non-zero motion vector in the latest pair",
        )?;
        let mean_vector_magnitude = Gauge::new(
            "block_motion_mean_vector_magnitude",
            "Mean motion vector length in pixels for the latest pair",
        )?;
        let difference_energy = Gauge::new(
            "block_motion_difference_energy",
            "Sum of squared naive frame differences for the latest pair",
        )?;
        let residual_energy = Gauge::new(
            "block_motion_residual_energy",
            "Sum of squared compensated residuals for the latest pair",
        )?;
        let gain_db = Gauge::new(
            "block_motion_compensation_gain_db",
            "Energy reduction from motion compensation in dB for the latest pair, NaN if undefined",
        )?;

        registry.register(Box::new(pairs_total.clone()))?;
        registry.register(Box::new(blocks_total.clone()))?;
        registry.register(Box::new(candidates_total.clone()))?;
        registry.register(Box::new(nonzero_vectors.clone()))?;
        registry.register(Box::new(mean_vector_magnitude.clone()))?;
        registry.register(Box::new(difference_energy.clone()))?;
        registry.register(Box::new(residual_energy.clone()))?;
        registry.register(Box::new(gain_db.clone()))?;

        Ok(Self {
            registry,
            pairs_total,
            blocks_total,
            candidates_total,
            nonzero_vectors,
            mean_vector_magnitude,
            difference_energy,
            residual_energy,
            gain_db,
        })
    }

    /// Records one analyzed pair.
    pub fn record(&self, snapshot: &MetricsSnapshot) {
        self.pairs_total.inc();
        self.blocks_total.inc_by(snapshot.blocks);
        self.candidates_total.inc_by(snapshot.candidates_scored);

        self.nonzero_vectors.set(snapshot.nonzero_vectors as i64);
        self.mean_vector_magnitude.set(snapshot.mean_vector_magnitude);
        self.difference_energy.set(snapshot.difference_energy as f64);
        self.residual_energy.set(snapshot.residual_energy as f64);

        // NaN when the gain is undefined for this pair
        self.gain_db.set(snapshot.gain_db.unwrap_or(f64::NAN));
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_record_accumulates_totals() {
        let registry = MetricsRegistry::new().unwrap();

        let snapshot = MetricsSnapshot {
            blocks: 4,
            candidates_scored: 100,
            nonzero_vectors: 1,
            mean_vector_magnitude: 0.5,
            difference_energy: 4000,
            residual_energy: 40,
            gain_db: Some(20.0),
        };

        registry.record(&snapshot);
        registry.record(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("block_motion_pairs_total 2"));
        assert!(output.contains("block_motion_blocks_total 8"));
        assert!(output.contains("block_motion_candidates_scored_total 200"));
        assert!(output.contains("block_motion_nonzero_vectors 1"));
        assert!(output.contains("block_motion_compensation_gain_db 20"));
    }

    #[test]
    fn test_undefined_gain_clears_previous_value() {
        let registry = MetricsRegistry::new().unwrap();

        registry.record(&MetricsSnapshot {
            difference_energy: 4000,
            residual_energy: 40,
            gain_db: Some(20.0),
            ..Default::default()
        });
        registry.record(&MetricsSnapshot {
            difference_energy: 4000,
            residual_energy: 0,
            gain_db: None,
            ..Default::default()
        });

        assert!(registry.gain_db.get().is_nan());
        let output = registry.encode().unwrap();
        assert!(!output.contains("block_motion_compensation_gain_db 20"));
        assert!(output.contains("block_motion_residual_energy 0"));
    }

    #[test]
    fn test_metrics_encode() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.encode().unwrap();

        // Should contain metric names
        assert!(output.contains("block_motion_pairs_total"));
        assert!(output.contains("block_motion_residual_energy"));
    }
}
