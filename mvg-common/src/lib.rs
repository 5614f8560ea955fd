//! # MVG Common Library
//!
//! Shared code for the music video generator crates including:
//! - Error and result types
//! - TOML configuration and tunable analysis/clip parameters
//! - Workflow event types and the broadcast event bus
//! - Timecode formatting for timeline display

pub mod config;
pub mod error;
pub mod events;
pub mod params;
pub mod timecode;

pub use error::{Error, Result};
pub use events::{EventBus, Stage, WorkflowEvent};
pub use params::{AnalysisParams, ClipParams, MoodKeywordTable};
