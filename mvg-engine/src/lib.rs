//! mvg-engine library interface
//!
//! Audio analysis, lyric keyword extraction, clip resolution and timeline
//! planning for music-video generation. Exposes public APIs for the CLI and
//! for integration testing.

pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

pub use crate::error::{PipelineError, StageError};
pub use crate::workflow::{GenerationOutcome, Pipeline, PipelineConfig, ProjectHandle};
