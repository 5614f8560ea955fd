//! Audio analysis result types

use mvg_common::params::MoodKeywordTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule-based mood derived from tempo and energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Calm,
    Melancholic,
    Uplifting,
    Aggressive,
    Peaceful,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Calm,
        Mood::Melancholic,
        Mood::Uplifting,
        Mood::Aggressive,
        Mood::Peaceful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
            Mood::Melancholic => "melancholic",
            Mood::Uplifting => "uplifting",
            Mood::Aggressive => "aggressive",
            Mood::Peaceful => "peaceful",
        }
    }

    /// Stock-footage search terms for this mood
    pub fn search_terms<'a>(&self, table: &'a MoodKeywordTable) -> &'a [String] {
        match self {
            Mood::Happy => &table.happy,
            Mood::Sad => &table.sad,
            Mood::Energetic => &table.energetic,
            Mood::Calm => &table.calm,
            Mood::Melancholic => &table.melancholic,
            Mood::Uplifting => &table.uplifting,
            Mood::Aggressive => &table.aggressive,
            Mood::Peaceful => &table.peaceful,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fixed-size time slice of the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSegment {
    /// Offset from track start (seconds)
    pub start_time: f64,
    /// Segment length (seconds)
    pub duration: f64,
    /// Normalised RMS energy (0.0-1.0)
    pub energy: f64,
    /// Dominant frequency (Hz); currently the fixed placeholder value
    pub dominant_frequency: f64,
}

/// Complete analysis of one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioAnalysis {
    /// Tempo in BPM, clamped to the configured bounds
    pub tempo: f64,
    /// Whole-track normalised energy (0.0-1.0)
    pub energy: f64,
    pub mood: Mood,
    /// Contiguous segments tiling the track in time order
    pub segments: Vec<AudioSegment>,
}
