//! Summary statistics over diagnostic images.
//!
//! Difference and residual images are compared by their energy (sum of
//! squared samples). A good motion field leaves much less residual energy
//! than the naive frame difference.

use crate::source::Plane;
use serde::{Deserialize, Serialize};

/// Statistics of a single difference or residual image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageStatistics {
    /// Number of samples analyzed.
    pub pixel_count: usize,
    /// Mean absolute sample value.
    pub mean_abs: f64,
    /// Sum of squared sample values.
    pub energy: u64,
    /// Largest absolute sample value.
    pub max_abs: u32,
    /// Number of non-zero samples.
    pub nonzero: usize,
}

impl ImageStatistics {
    /// Computes statistics for a plane of unsigned or signed samples.
    pub fn analyze<T>(plane: &Plane<T>) -> Self
    where
        T: Copy + Default + Into<i32>,
    {
        let samples = plane.as_slice();
        let mut abs_sum = 0u64;
        let mut energy = 0u64;
        let mut max_abs = 0u32;
        let mut nonzero = 0usize;

        for &s in samples {
            let v: i32 = s.into();
            let a = v.unsigned_abs();
            abs_sum += a as u64;
            energy += (a as u64) * (a as u64);
            max_abs = max_abs.max(a);
            if a != 0 {
                nonzero += 1;
            }
        }

        let mean_abs = if samples.is_empty() {
            0.0
        } else {
            abs_sum as f64 / samples.len() as f64
        };

        Self {
            pixel_count: samples.len(),
            mean_abs,
            energy,
            max_abs,
            nonzero,
        }
    }

    /// Mean squared sample value.
    pub fn mse(&self) -> f64 {
        if self.pixel_count == 0 {
            return 0.0;
        }
        self.energy as f64 / self.pixel_count as f64
    }

    /// Peak signal-to-noise ratio against an 8-bit peak, in dB.
    ///
    /// `None` when the image is all zero (infinite PSNR).
    pub fn psnr_db(&self) -> Option<f64> {
        let mse = self.mse();
        (mse > 0.0).then(|| 10.0 * (255.0f64 * 255.0 / mse).log10())
    }

    /// Returns true if every sample is zero.
    pub fn is_zero(&self) -> bool {
        self.nonzero == 0
    }
}

/// Energy reduction achieved by motion compensation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompensationGain {
    /// Energy of the naive difference image.
    pub difference_energy: u64,
    /// Energy of the motion-compensated residual.
    pub residual_energy: u64,
    /// `10 * log10(difference / residual)`; `None` if either energy is zero.
    pub gain_db: Option<f64>,
}

impl CompensationGain {
    /// Compares the naive difference against the compensated residual.
    pub fn new(difference: &ImageStatistics, residual: &ImageStatistics) -> Self {
        let gain_db = (difference.energy > 0 && residual.energy > 0)
            .then(|| 10.0 * (difference.energy as f64 / residual.energy as f64).log10());

        Self {
            difference_energy: difference.energy,
            residual_energy: residual.energy,
            gain_db,
        }
    }
}
