//! Song model with explicit analysis lifecycle
//!
//! A song moves `Raw → Analyzed → Transcribed`. Lyrics can only be attached
//! to an analyzed song, so "lyrics without analysis" cannot be represented.
//! A song that stays `Analyzed` (no lyrics) is a valid terminal state.

use super::{AudioAnalysis, LyricsData};
use crate::error::ProjectError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Analysis lifecycle of a song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SongState {
    Raw,
    Analyzed {
        analysis: AudioAnalysis,
    },
    Transcribed {
        analysis: AudioAnalysis,
        lyrics: LyricsData,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: Uuid,
    /// Audio source location
    pub source: PathBuf,
    pub title: String,
    /// Track length (seconds)
    pub duration: f64,
    pub state: SongState,
}

impl Song {
    pub fn new(source: impl Into<PathBuf>, title: impl Into<String>, duration: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            title: title.into(),
            duration,
            state: SongState::Raw,
        }
    }

    pub fn analysis(&self) -> Option<&AudioAnalysis> {
        match &self.state {
            SongState::Raw => None,
            SongState::Analyzed { analysis } | SongState::Transcribed { analysis, .. } => {
                Some(analysis)
            }
        }
    }

    pub fn lyrics(&self) -> Option<&LyricsData> {
        match &self.state {
            SongState::Transcribed { lyrics, .. } => Some(lyrics),
            _ => None,
        }
    }

    /// Attach (or replace) the analysis, keeping any lyrics already present
    pub fn with_analysis(mut self, analysis: AudioAnalysis) -> Self {
        self.state = match self.state {
            SongState::Transcribed { lyrics, .. } => SongState::Transcribed { analysis, lyrics },
            _ => SongState::Analyzed { analysis },
        };
        self
    }

    /// Attach lyrics; the song must already be analyzed
    pub fn with_lyrics(mut self, lyrics: LyricsData) -> Result<Self, ProjectError> {
        self.state = match self.state {
            SongState::Raw => return Err(ProjectError::NotAnalyzed),
            SongState::Analyzed { analysis } | SongState::Transcribed { analysis, .. } => {
                SongState::Transcribed { analysis, lyrics }
            }
        };
        Ok(self)
    }
}
