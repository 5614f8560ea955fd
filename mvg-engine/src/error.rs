//! Error types for mvg-engine
//!
//! Each service has its own error enum; the pipeline wraps them in
//! [`PipelineError`] together with the stage that failed.

use mvg_common::events::Stage;
use thiserror::Error;
use uuid::Uuid;

/// Audio decoding errors
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("No audio track found")]
    NoAudioTrack,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported audio format: {0}")]
    Unsupported(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Audio analysis errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No audio track found")]
    NoAudioTrack,

    #[error("Analysis failed: {0}")]
    AnalysisFailure(String),
}

impl From<DecodeError> for AnalysisError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::NoAudioTrack => AnalysisError::NoAudioTrack,
            other => AnalysisError::AnalysisFailure(other.to_string()),
        }
    }
}

/// Speech transcription errors
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Speech recognizer unavailable")]
    RecognizerUnavailable,

    #[error("Speech recognition not authorized")]
    AuthorizationDenied,

    #[error("Transcription failed: {0}")]
    TranscriptionFailure(String),

    #[error("Transcription cancelled")]
    Cancelled,
}

/// Stock clip search errors
#[derive(Debug, Error)]
pub enum ClipSearchError {
    #[error("Clip search credential not configured")]
    MissingCredential,

    #[error("Invalid search URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({0}): {1}")]
    Api(u16, String),

    #[error("No data in search response")]
    NoData,

    #[error("Failed to decode search response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClipSearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClipSearchError::Decode(err.to_string())
        } else {
            ClipSearchError::Network(err.to_string())
        }
    }
}

/// Render/export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Export cancelled")]
    ExportCancelled,
}

/// Project mutation errors
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Song has not been analyzed")]
    NotAnalyzed,

    #[error("Clip not found: {0}")]
    ClipNotFound(Uuid),

    #[error("Project session closed")]
    SessionClosed,
}

/// Underlying cause of a pipeline stage failure
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    #[error(transparent)]
    ClipSearch(#[from] ClipSearchError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("Cancelled")]
    Cancelled,
}

/// A pipeline failure tagged with the stage that produced it
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    pub fn cancelled(stage: Stage) -> Self {
        Self {
            stage,
            source: StageError::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self.source,
            StageError::Cancelled
                | StageError::Export(ExportError::ExportCancelled)
                | StageError::Transcription(TranscriptionError::Cancelled)
        )
    }
}
