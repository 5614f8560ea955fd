//! Per-project workflow
//!
//! - [`project_session`]: single-writer owner of a project's state
//! - [`pipeline`]: stage orchestration (analysis → export)
//! - [`event_bridge`]: pipeline events onto the broadcast bus

pub mod event_bridge;
pub mod pipeline;
pub mod project_session;

pub use event_bridge::bridge_workflow_events;
pub use pipeline::{GenerationOutcome, Pipeline, PipelineConfig};
pub use project_session::{ProjectCommand, ProjectHandle, ProjectSession};
