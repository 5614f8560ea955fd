//! Video project aggregate

use super::{ColorGrading, Song, VideoClip, VideoTransition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// The unit of mutable state: one song and everything built on it
///
/// Owned by a single `ProjectSession`; other components receive snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoProject {
    pub id: Uuid,
    pub name: String,
    pub song: Song,
    pub clips: Vec<VideoClip>,
    pub transitions: Vec<VideoTransition>,
    pub color_grading: ColorGrading,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub export_location: Option<PathBuf>,
}

impl VideoProject {
    pub fn new(name: impl Into<String>, song: Song) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            song,
            clips: Vec::new(),
            transitions: Vec::new(),
            color_grading: ColorGrading::default(),
            created_at: now,
            modified_at: now,
            export_location: None,
        }
    }

    /// Record a modification
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    /// Total played length of the arranged clips (seconds)
    pub fn timeline_duration(&self) -> f64 {
        self.clips.iter().map(VideoClip::effective_duration).sum()
    }
}
