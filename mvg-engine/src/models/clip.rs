//! Video clip and transition types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a clip came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipSource {
    Stock,
    AiGenerated,
    UserProvided,
}

/// A visual asset with trim and placement metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoClip {
    pub id: Uuid,
    pub url: String,
    pub thumbnail_url: Option<String>,
    /// Full source length (seconds, > 0)
    pub duration: f64,
    pub source: ClipSource,
    pub tags: Vec<String>,
    /// Position in the final timeline (seconds)
    pub start_time: f64,
    /// Seconds trimmed from the clip head
    pub trim_start: f64,
    /// Seconds trimmed from the clip tail
    pub trim_end: f64,
}

impl VideoClip {
    /// New untrimmed clip placed at the timeline origin
    pub fn new(url: impl Into<String>, duration: f64, source: ClipSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            thumbnail_url: None,
            duration,
            source,
            tags: Vec::new(),
            start_time: 0.0,
            trim_start: 0.0,
            trim_end: 0.0,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail_url: Option<String>) -> Self {
        self.thumbnail_url = thumbnail_url;
        self
    }

    /// Played length after trims (never negative)
    pub fn effective_duration(&self) -> f64 {
        (self.duration - self.trim_start - self.trim_end).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    Dissolve,
    Fade,
    Wipe,
    Push,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTransition {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub transition_type: TransitionType,
    pub duration: f64,
}

impl VideoTransition {
    /// Default transition length (seconds)
    pub const DEFAULT_DURATION: f64 = 0.5;

    pub fn new(transition_type: TransitionType) -> Self {
        Self {
            id: Uuid::new_v4(),
            transition_type,
            duration: Self::DEFAULT_DURATION,
        }
    }
}
