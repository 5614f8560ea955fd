//! Coarse tempo estimation from energy-peak periodicity
//!
//! **Algorithm:**
//! 1. Frame the buffer (50% overlap) and take each frame's total squared energy
//! 2. Find interior local maxima (strictly greater than both neighbours)
//! 3. Fewer than 2 peaks → fallback tempo (degenerate input, not an error)
//! 4. Mean peak gap in hops → `bpm = 60 * (sample_rate / hop) / mean_gap`
//! 5. Clamp to `[min_bpm, max_bpm]`
//!
//! No autocorrelation; the estimate is intentionally coarse.

use super::energy_analyzer::sum_of_squares;
use super::signal_framer::SignalFramer;
use mvg_common::params::{
    AnalysisParams, DEFAULT_FALLBACK_BPM, DEFAULT_FRAME_SIZE, DEFAULT_MAX_BPM, DEFAULT_MIN_BPM,
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct TempoEstimator {
    framer: SignalFramer,
    min_bpm: f64,
    max_bpm: f64,
    fallback_bpm: f64,
}

impl Default for TempoEstimator {
    fn default() -> Self {
        Self {
            framer: SignalFramer::half_overlap(DEFAULT_FRAME_SIZE),
            min_bpm: DEFAULT_MIN_BPM,
            max_bpm: DEFAULT_MAX_BPM,
            fallback_bpm: DEFAULT_FALLBACK_BPM,
        }
    }
}

impl TempoEstimator {
    pub fn from_params(params: &AnalysisParams) -> Self {
        Self {
            framer: SignalFramer::new(params.frame_size, params.hop_size()),
            min_bpm: params.min_bpm,
            max_bpm: params.max_bpm,
            fallback_bpm: params.fallback_bpm,
        }
    }

    /// Estimate tempo (BPM) of `samples` recorded at `sample_rate`
    pub fn estimate(&self, samples: &[f32], sample_rate: u32) -> f64 {
        let curve = self.energy_curve(samples);
        let peaks = find_peaks(&curve);

        if peaks.len() < 2 || sample_rate == 0 {
            debug!(
                peaks = peaks.len(),
                frames = curve.len(),
                "Insufficient energy peaks, using fallback tempo"
            );
            return self.fallback_bpm;
        }

        let span = (peaks[peaks.len() - 1] - peaks[0]) as f64;
        let mean_gap = span / (peaks.len() - 1) as f64;
        let frame_rate = sample_rate as f64 / self.framer.hop_size() as f64;
        let bpm = 60.0 * frame_rate / mean_gap;

        debug!(
            peaks = peaks.len(),
            mean_gap = format!("{:.3}", mean_gap),
            raw_bpm = format!("{:.2}", bpm),
            "Tempo estimated"
        );

        bpm.clamp(self.min_bpm, self.max_bpm)
    }

    /// Total squared energy per frame
    pub fn energy_curve(&self, samples: &[f32]) -> Vec<f64> {
        self.framer.frames(samples).map(sum_of_squares).collect()
    }
}

/// Indices of interior points strictly greater than both neighbours
pub fn find_peaks(curve: &[f64]) -> Vec<usize> {
    curve
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] > w[2])
        .map(|(i, _)| i + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-sample decaying pulse every `period` samples starting at odd `offset`
    ///
    /// With hop 2 an odd offset splits the pulse across frames unevenly, so
    /// each pulse yields exactly one strict peak.
    fn pulses(len: usize, period: usize, offset: usize) -> Vec<f32> {
        (0..len)
            .map(|i| match i % period {
                p if p == offset => 1.0,
                p if p == offset + 1 => 0.5,
                _ => 0.0,
            })
            .collect()
    }

    fn small_frames() -> TempoEstimator {
        TempoEstimator::from_params(&AnalysisParams {
            frame_size: 4,
            ..Default::default()
        })
    }

    #[test]
    fn test_find_peaks_strict() {
        assert_eq!(find_peaks(&[0.0, 1.0, 0.0, 2.0, 1.0]), vec![1, 3]);
        // Plateaus are not peaks
        assert_eq!(find_peaks(&[0.0, 1.0, 1.0, 0.0]), Vec::<usize>::new());
        // Endpoints are never peaks
        assert_eq!(find_peaks(&[5.0, 1.0, 5.0]), Vec::<usize>::new());
        assert!(find_peaks(&[1.0, 2.0]).is_empty());
    }

    #[test]
    fn test_silence_falls_back() {
        let estimator = TempoEstimator::default();
        assert_eq!(estimator.estimate(&vec![0.0; 441_000], 44100), 120.0);
    }

    #[test]
    fn test_empty_and_short_fall_back() {
        let estimator = TempoEstimator::default();
        assert_eq!(estimator.estimate(&[], 44100), 120.0);
        assert_eq!(estimator.estimate(&[0.5; 4096], 44100), 120.0);
    }

    #[test]
    fn test_single_impulse_falls_back() {
        let mut samples = vec![0.0f32; 44100];
        samples[20_000] = 1.0;
        // One impulse lands in two overlapping frames: a plateau, zero peaks
        assert_eq!(TempoEstimator::default().estimate(&samples, 44100), 120.0);
    }

    #[test]
    fn test_pulse_curve_shape() {
        let curve = small_frames().energy_curve(&pulses(20, 8, 3));
        assert_eq!(find_peaks(&curve), vec![1, 5]);
        assert!((curve[1] - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_in_range_estimate() {
        // 100 Hz, hop 2 → 50 frames/s; a pulse every 50 samples is a peak
        // every 25 frames → 60 * 50 / 25 = 120 BPM
        let bpm = small_frames().estimate(&pulses(2000, 50, 25), 100);
        assert!((bpm - 120.0).abs() < 1e-9, "got {}", bpm);
    }

    #[test]
    fn test_clamped_high() {
        // Peak every 4 frames at 44.1 kHz is far above 180 BPM
        let samples = pulses(4000, 8, 3);
        assert_eq!(small_frames().estimate(&samples, 44100), 180.0);
    }

    #[test]
    fn test_clamped_low() {
        // 10 Hz, peak every 50 frames → 6 BPM
        let samples = pulses(1000, 100, 51);
        assert_eq!(small_frames().estimate(&samples, 10), 60.0);
    }

    #[test]
    fn test_zero_sample_rate_falls_back() {
        assert_eq!(small_frames().estimate(&pulses(2000, 50, 25), 0), 120.0);
    }
}
