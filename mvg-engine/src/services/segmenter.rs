//! Equal-length track segmentation

use super::energy_analyzer::EnergyAnalyzer;
use crate::models::AudioSegment;
use mvg_common::params::DEFAULT_SEGMENT_COUNT;

/// Dominant frequency reported for every segment (Hz)
///
/// Placeholder: no spectral analysis is performed.
pub const PLACEHOLDER_DOMINANT_FREQUENCY: f64 = 440.0;

/// Splits a track into `count` contiguous segments with local energy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segmenter {
    count: usize,
    energy: EnergyAnalyzer,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_COUNT, EnergyAnalyzer::default())
    }
}

impl Segmenter {
    /// `count` is floored at 1
    pub fn new(count: usize, energy: EnergyAnalyzer) -> Self {
        Self {
            count: count.max(1),
            energy,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Segment `samples` spanning `duration_seconds`
    ///
    /// Sample chunks are `len / count` long; the last chunk also takes the
    /// remainder. Time boundaries are `i * duration / count` so segments tile
    /// the duration exactly.
    pub fn segment(&self, samples: &[f32], duration_seconds: f64) -> Vec<AudioSegment> {
        let samples_per_segment = samples.len() / self.count;
        let segment_duration = duration_seconds / self.count as f64;

        (0..self.count)
            .map(|i| {
                let start = (i * samples_per_segment).min(samples.len());
                let end = if i + 1 == self.count {
                    samples.len()
                } else {
                    (start + samples_per_segment).min(samples.len())
                };

                AudioSegment {
                    start_time: i as f64 * segment_duration,
                    duration: segment_duration,
                    energy: self.energy.rms(&samples[start..end]),
                    dominant_frequency: PLACEHOLDER_DOMINANT_FREQUENCY,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_segments_tile_duration() {
        let samples = vec![0.01f32; 44100 * 10];
        let segments = Segmenter::default().segment(&samples, 10.0);

        assert_eq!(segments.len(), 8);
        for pair in segments.windows(2) {
            assert!(pair[1].start_time > pair[0].start_time);
            let gap = pair[1].start_time - (pair[0].start_time + pair[0].duration);
            assert!(gap.abs() < 1e-9);
        }
        let span: f64 = segments.iter().map(|s| s.duration).sum();
        assert!((span - 10.0).abs() < 1e-9);
        assert_eq!(segments[0].start_time, 0.0);
    }

    #[test]
    fn test_segment_energy_is_local() {
        // First half silent, second half loud
        let mut samples = vec![0.0f32; 800];
        for s in samples.iter_mut().skip(400) {
            *s = 0.05;
        }
        let segments = Segmenter::default().segment(&samples, 8.0);

        assert_eq!(segments[0].energy, 0.0);
        assert!((segments[7].energy - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_last_segment_absorbs_remainder() {
        // 10 samples, 3 segments: chunks of 3, 3, 4
        let mut samples = vec![0.0f32; 10];
        samples[9] = 0.1;
        let segments = Segmenter::new(3, EnergyAnalyzer::new(1.0)).segment(&samples, 3.0);

        assert_eq!(segments.len(), 3);
        let expected = (0.01f64 / 4.0).sqrt();
        assert!((segments[2].energy - expected).abs() < 1e-6);
    }

    #[test]
    fn test_placeholder_frequency() {
        let segments = Segmenter::default().segment(&[0.0; 64], 1.0);
        assert!(segments
            .iter()
            .all(|s| s.dominant_frequency == PLACEHOLDER_DOMINANT_FREQUENCY));
    }

    #[test]
    fn test_empty_buffer() {
        let segments = Segmenter::default().segment(&[], 4.0);
        assert_eq!(segments.len(), 8);
        assert!(segments.iter().all(|s| s.energy == 0.0));
    }
}
