//! Tunable parameters for audio analysis and clip resolution
//!
//! Every constant the analysis pipeline depends on lives here rather than
//! inline, so tests can drive the pipeline with synthetic fixtures and
//! deployments can override values from the `[analysis]` and `[clips]`
//! sections of the TOML config.
//!
//! # Usage
//!
//! ```rust
//! use mvg_common::params::AnalysisParams;
//!
//! let params = AnalysisParams {
//!     segment_count: 4,
//!     ..Default::default()
//! };
//! assert!(params.validate().is_ok());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of equal-length segments per track
pub const DEFAULT_SEGMENT_COUNT: usize = 8;

/// Default analysis frame size in samples (hop is half of this)
pub const DEFAULT_FRAME_SIZE: usize = 4096;

/// Sample rate assumed when the decoder reports none and no override is set
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Lower tempo clamp bound (BPM)
pub const DEFAULT_MIN_BPM: f64 = 60.0;

/// Upper tempo clamp bound (BPM)
pub const DEFAULT_MAX_BPM: f64 = 180.0;

/// Tempo reported when fewer than two energy peaks are found (BPM)
pub const DEFAULT_FALLBACK_BPM: f64 = 120.0;

/// Heuristic RMS normalisation factor
pub const DEFAULT_ENERGY_SCALE: f64 = 10.0;

/// Average length of one resolved clip (seconds)
pub const DEFAULT_TARGET_CLIP_DURATION: f64 = 5.0;

/// Audio analysis parameters
///
/// Valid ranges are enforced by [`AnalysisParams::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Number of equal segments the track is split into
    ///
    /// Valid range: [1, ∞)
    /// Default: 8
    pub segment_count: usize,

    /// Frame size in samples for the tempo energy curve (hop = frame_size / 2)
    ///
    /// Valid range: [2, ∞)
    /// Default: 4096
    pub frame_size: usize,

    /// Sample rate used by tempo estimation instead of the decoded rate
    ///
    /// Default: None (use the rate reported by the decoder)
    pub sample_rate_override: Option<u32>,

    /// Lower tempo clamp bound (BPM)
    pub min_bpm: f64,

    /// Upper tempo clamp bound (BPM)
    pub max_bpm: f64,

    /// Tempo reported for degenerate input (fewer than 2 peaks)
    pub fallback_bpm: f64,

    /// RMS multiplier before clamping energy to 1.0
    pub energy_scale: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            segment_count: DEFAULT_SEGMENT_COUNT,
            frame_size: DEFAULT_FRAME_SIZE,
            sample_rate_override: None,
            min_bpm: DEFAULT_MIN_BPM,
            max_bpm: DEFAULT_MAX_BPM,
            fallback_bpm: DEFAULT_FALLBACK_BPM,
            energy_scale: DEFAULT_ENERGY_SCALE,
        }
    }
}

impl AnalysisParams {
    /// Reject parameter combinations the analysis cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.segment_count == 0 {
            return Err(Error::Config("segment_count must be at least 1".to_string()));
        }
        if self.frame_size < 2 {
            return Err(Error::Config(format!(
                "frame_size must be at least 2 samples (got {})",
                self.frame_size
            )));
        }
        if let Some(0) = self.sample_rate_override {
            return Err(Error::Config("sample_rate_override must be positive".to_string()));
        }
        if !(self.min_bpm > 0.0 && self.min_bpm <= self.max_bpm) {
            return Err(Error::Config(format!(
                "tempo bounds invalid: min_bpm={} max_bpm={}",
                self.min_bpm, self.max_bpm
            )));
        }
        if !(self.energy_scale > 0.0) {
            return Err(Error::Config("energy_scale must be positive".to_string()));
        }
        Ok(())
    }

    /// Hop between consecutive analysis frames (50% overlap)
    pub fn hop_size(&self) -> usize {
        (self.frame_size / 2).max(1)
    }
}

/// Search terms appended to the clip query for each mood
///
/// Four terms per mood. Field names match the mood identifiers so the
/// table can be overridden in TOML:
///
/// ```toml
/// [clips.mood_keywords]
/// happy = ["sunshine", "celebration", "joy", "bright"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodKeywordTable {
    pub happy: Vec<String>,
    pub sad: Vec<String>,
    pub energetic: Vec<String>,
    pub calm: Vec<String>,
    pub melancholic: Vec<String>,
    pub uplifting: Vec<String>,
    pub aggressive: Vec<String>,
    pub peaceful: Vec<String>,
}

fn terms(words: [&str; 4]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for MoodKeywordTable {
    fn default() -> Self {
        Self {
            happy: terms(["sunshine", "celebration", "joy", "bright"]),
            sad: terms(["rain", "melancholy", "alone", "cloudy"]),
            energetic: terms(["action", "dynamic", "movement", "sports"]),
            calm: terms(["peaceful", "nature", "serene", "quiet"]),
            melancholic: terms(["sunset", "nostalgia", "memories", "vintage"]),
            uplifting: terms(["inspiring", "sky", "sunrise", "hope"]),
            aggressive: terms(["intense", "power", "storm", "urban"]),
            peaceful: terms(["water", "zen", "meditation", "tranquil"]),
        }
    }
}

/// Clip resolution parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipParams {
    /// Average clip length used to size the search (seconds)
    ///
    /// Valid range: (0, ∞)
    /// Default: 5.0
    pub target_clip_duration: f64,

    /// Mood-specific search terms
    pub mood_keywords: MoodKeywordTable,
}

impl Default for ClipParams {
    fn default() -> Self {
        Self {
            target_clip_duration: DEFAULT_TARGET_CLIP_DURATION,
            mood_keywords: MoodKeywordTable::default(),
        }
    }
}

impl ClipParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.target_clip_duration > 0.0) || !self.target_clip_duration.is_finite() {
            return Err(Error::Config(format!(
                "target_clip_duration must be positive (got {})",
                self.target_clip_duration
            )));
        }
        Ok(())
    }
}
