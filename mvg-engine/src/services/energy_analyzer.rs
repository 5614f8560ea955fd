//! RMS energy with heuristic normalisation

use mvg_common::params::DEFAULT_ENERGY_SCALE;

/// Normalised RMS energy
///
/// `min(sqrt(mean(x²)) * scale, 1.0)`, with `0.0` for an empty range. The
/// scale factor is a heuristic, not a physical unit; mood classification is
/// tuned against the default of 10.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyAnalyzer {
    scale: f64,
}

impl Default for EnergyAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_ENERGY_SCALE)
    }
}

impl EnergyAnalyzer {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn rms(&self, samples: &[f32]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let mean_square = sum_of_squares(samples) / samples.len() as f64;
        (mean_square.sqrt() * self.scale).clamp(0.0, 1.0)
    }
}

/// Normalised RMS with the default scale
pub fn rms(samples: &[f32]) -> f64 {
    EnergyAnalyzer::default().rms(samples)
}

/// Total squared energy of a window (not normalised)
pub fn sum_of_squares(samples: &[f32]) -> f64 {
    samples.iter().map(|&s| (s as f64) * (s as f64)).sum()
}
