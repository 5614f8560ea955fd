//! Transcribed lyrics and derived keyword data

use serde::{Deserialize, Serialize};

/// One recognised text span with its position in the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedLyric {
    pub text: String,
    pub start_time: f64,
    pub duration: f64,
}

/// Lyrics attached to a song after transcription
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsData {
    pub full_text: String,
    pub timed_segments: Vec<TimedLyric>,
    /// Lowercase nouns, first-seen order, at most 10
    pub themes: Vec<String>,
    /// Named entities then verbs/adjectives, first-seen order, at most 20
    pub keywords: Vec<String>,
}
