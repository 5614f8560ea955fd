//! Lyrics transcription boundary
//!
//! Speech-to-text is an external capability behind [`Transcriber`]. The
//! [`TranscriptSidecar`] adapter reads a recognizer's output from a JSON
//! file so it can be fed into the pipeline:
//!
//! ```json
//! {
//!   "full_text": "The sun rises over the quiet city",
//!   "segments": [{"text": "The", "start_time": 0.4, "duration": 0.2}],
//!   "tokens": [{"text": "sun", "class": "noun"}],
//!   "entities": []
//! }
//! ```

use super::keyword_extractor::{extract_terms, PosTagger, TaggedToken};
use crate::error::TranscriptionError;
use crate::models::{LyricsData, TimedLyric};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Raw recognizer output: full text plus timed segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    pub full_text: String,
    pub segments: Vec<TimedLyric>,
}

impl Transcript {
    /// Build lyrics, deriving themes and keywords with `tagger`
    pub fn into_lyrics(self, tagger: &dyn PosTagger) -> LyricsData {
        let terms = extract_terms(tagger, &self.full_text);
        debug!(
            themes = terms.themes.len(),
            keywords = terms.keywords.len(),
            "Extracted lyric terms"
        );

        LyricsData {
            full_text: self.full_text,
            timed_segments: self.segments,
            themes: terms.themes,
            keywords: terms.keywords,
        }
    }
}

/// "Transcribe" capability
///
/// Implementations must return `TranscriptionError::Cancelled` promptly once
/// `cancel` fires.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        source: &Path,
        cancel: &CancellationToken,
    ) -> Result<Transcript, TranscriptionError>;
}

/// Transcriber used when no recognizer is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableTranscriber;

#[async_trait]
impl Transcriber for UnavailableTranscriber {
    async fn transcribe(
        &self,
        _source: &Path,
        _cancel: &CancellationToken,
    ) -> Result<Transcript, TranscriptionError> {
        Err(TranscriptionError::RecognizerUnavailable)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SidecarSegment {
    text: String,
    start_time: f64,
    duration: f64,
}

/// Recognizer + tagger output loaded from a JSON sidecar file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSidecar {
    full_text: String,
    segments: Vec<SidecarSegment>,
    tokens: Vec<TaggedToken>,
    entities: Vec<String>,
}

impl TranscriptSidecar {
    /// Parse a sidecar document
    pub fn from_json(json: &str) -> Result<Self, TranscriptionError> {
        serde_json::from_str(json)
            .map_err(|e| TranscriptionError::TranscriptionFailure(format!("invalid transcript: {}", e)))
    }

    /// Read and parse a sidecar file
    pub async fn load(path: &Path) -> Result<Self, TranscriptionError> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            TranscriptionError::TranscriptionFailure(format!(
                "failed to read transcript {}: {}",
                path.display(),
                e
            ))
        })?;
        let sidecar = Self::from_json(&contents)?;

        info!(
            path = %path.display(),
            segments = sidecar.segments.len(),
            tokens = sidecar.tokens.len(),
            "Loaded transcript sidecar"
        );
        Ok(sidecar)
    }

    pub fn transcript(&self) -> Transcript {
        Transcript {
            full_text: self.full_text.clone(),
            segments: self
                .segments
                .iter()
                .map(|s| TimedLyric {
                    text: s.text.clone(),
                    start_time: s.start_time,
                    duration: s.duration,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Transcriber for TranscriptSidecar {
    async fn transcribe(
        &self,
        _source: &Path,
        cancel: &CancellationToken,
    ) -> Result<Transcript, TranscriptionError> {
        if cancel.is_cancelled() {
            return Err(TranscriptionError::Cancelled);
        }
        Ok(self.transcript())
    }
}

impl PosTagger for TranscriptSidecar {
    fn lexical_tokens(&self, _text: &str) -> Vec<TaggedToken> {
        self.tokens.clone()
    }

    fn named_entities(&self, _text: &str) -> Vec<String> {
        self.entities.clone()
    }
}
