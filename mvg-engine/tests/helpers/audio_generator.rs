//! Audio Test Fixture Generator
//!
//! Writes 16-bit WAV files made of silence plus periodic decaying bursts.
//! Bursts start mid-hop so each one produces exactly one strict energy peak
//! with the default 4096/2048 framing.

use std::path::{Path, PathBuf};

/// Configuration for generated burst audio
#[derive(Debug, Clone)]
pub struct BurstConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Samples between burst onsets
    pub period_samples: usize,
    /// Onset of the first burst
    pub offset_samples: usize,
    pub amplitude: f32,
    /// Exponential decay constant (samples)
    pub decay_samples: f32,
    pub burst_length: usize,
}

impl Default for BurstConfig {
    /// 30s, one burst every 0.6s (100 BPM)
    fn default() -> Self {
        Self {
            duration_seconds: 30.0,
            sample_rate: 40960,
            channels: 1,
            period_samples: 24576,
            offset_samples: 1024,
            amplitude: 0.25,
            decay_samples: 1000.0,
            burst_length: 4096,
        }
    }
}

impl BurstConfig {
    /// One burst every 0.5s at 44.1kHz. The period is not a multiple of
    /// the analysis hop, so the measured tempo lands just under 120 BPM.
    pub fn half_second(duration_seconds: f64) -> Self {
        Self {
            duration_seconds,
            sample_rate: 44100,
            period_samples: 22050,
            offset_samples: 256,
            ..Default::default()
        }
    }

    fn sample_at(&self, i: usize) -> f32 {
        if i < self.offset_samples || self.period_samples == 0 {
            return 0.0;
        }
        let phase = (i - self.offset_samples) % self.period_samples;
        if phase < self.burst_length {
            self.amplitude * (-(phase as f32) / self.decay_samples).exp()
        } else {
            0.0
        }
    }
}

/// Generate a burst WAV file
///
/// # Returns
/// Generated file path
pub fn generate_burst_wav(path: &Path, config: &BurstConfig) -> anyhow::Result<PathBuf> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    let total_samples = (config.duration_seconds * config.sample_rate as f64) as usize;

    for i in 0..total_samples {
        let sample = (config.sample_at(i) * i16::MAX as f32) as i16;
        for _ in 0..config.channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(path.to_path_buf())
}

/// Generate a silent WAV file
pub fn generate_silent_wav(
    path: &Path,
    duration_seconds: f64,
    sample_rate: u32,
) -> anyhow::Result<PathBuf> {
    let config = BurstConfig {
        duration_seconds,
        sample_rate,
        amplitude: 0.0,
        ..Default::default()
    };
    generate_burst_wav(path, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_shape() {
        let config = BurstConfig::default();
        assert_eq!(config.sample_at(0), 0.0);
        assert_eq!(config.sample_at(1024), 0.25);
        assert!(config.sample_at(1025) < 0.25);
        assert_eq!(config.sample_at(1024 + 4096), 0.0);
        assert_eq!(config.sample_at(1024 + 24576), 0.25);
    }
}
