//! Audio analysis orchestrator
//!
//! Decodes a track and composes tempo, energy, mood and segmentation into
//! one [`AudioAnalysis`]. Decoding and feature extraction are CPU-bound and
//! run on the blocking pool.

use super::energy_analyzer::EnergyAnalyzer;
use super::mood_classifier::classify_mood;
use super::segmenter::Segmenter;
use super::tempo_estimator::TempoEstimator;
use crate::error::AnalysisError;
use crate::models::AudioAnalysis;
use crate::utils::audio_decoder::{AudioDecoder, DecodedAudio, SymphoniaDecoder};
use mvg_common::params::{AnalysisParams, DEFAULT_SAMPLE_RATE};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Analysis result together with the decoded track length
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedTrack {
    pub analysis: AudioAnalysis,
    /// Track length (seconds)
    pub duration_seconds: f64,
}

/// Stateless analysis service; cheap to clone and share
#[derive(Clone)]
pub struct AudioAnalyzer {
    decoder: Arc<dyn AudioDecoder>,
    params: AnalysisParams,
}

impl AudioAnalyzer {
    /// Analyzer backed by the symphonia decoder
    pub fn new(params: AnalysisParams) -> Self {
        Self::with_decoder(Arc::new(SymphoniaDecoder), params)
    }

    pub fn with_decoder(decoder: Arc<dyn AudioDecoder>, params: AnalysisParams) -> Self {
        Self { decoder, params }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Decode and analyze `path` off the async executor
    ///
    /// # Errors
    /// * `NoAudioTrack` - source has no decodable audio stream
    /// * `AnalysisFailure` - any decode/extraction fault, or no samples
    pub async fn analyze(&self, path: &Path) -> Result<AnalyzedTrack, AnalysisError> {
        let analyzer = self.clone();
        let path: PathBuf = path.to_path_buf();

        tokio::task::spawn_blocking(move || analyzer.analyze_blocking(&path))
            .await
            .map_err(|e| AnalysisError::AnalysisFailure(format!("analysis task failed: {}", e)))?
    }

    /// Synchronous decode + analysis
    pub fn analyze_blocking(&self, path: &Path) -> Result<AnalyzedTrack, AnalysisError> {
        let audio = self.decoder.decode(path)?;
        let analysis = self.analyze_buffer(&audio)?;

        info!(
            path = %path.display(),
            tempo = format!("{:.1}", analysis.tempo),
            energy = format!("{:.3}", analysis.energy),
            mood = %analysis.mood,
            "Audio analysis complete"
        );

        Ok(AnalyzedTrack {
            analysis,
            duration_seconds: audio.duration_seconds,
        })
    }

    /// Analyze an already-decoded buffer
    pub fn analyze_buffer(&self, audio: &DecodedAudio) -> Result<AudioAnalysis, AnalysisError> {
        if audio.samples.is_empty() {
            return Err(AnalysisError::AnalysisFailure(
                "decoder produced no samples".to_string(),
            ));
        }

        let energy_analyzer = EnergyAnalyzer::new(self.params.energy_scale);
        let sample_rate = self.effective_sample_rate(audio.sample_rate);

        let tempo = TempoEstimator::from_params(&self.params).estimate(&audio.samples, sample_rate);
        let energy = energy_analyzer.rms(&audio.samples);
        let mood = classify_mood(tempo, energy);
        let segments = Segmenter::new(self.params.segment_count, energy_analyzer)
            .segment(&audio.samples, audio.duration_seconds);

        debug!(
            samples = audio.samples.len(),
            sample_rate = sample_rate,
            segments = segments.len(),
            "Features extracted"
        );

        Ok(AudioAnalysis {
            tempo,
            energy,
            mood,
            segments,
        })
    }

    /// Override first, then the decoded rate, then [`DEFAULT_SAMPLE_RATE`]
    fn effective_sample_rate(&self, decoded: u32) -> u32 {
        match self.params.sample_rate_override {
            Some(rate) => rate,
            None if decoded > 0 => decoded,
            None => DEFAULT_SAMPLE_RATE,
        }
    }
}
