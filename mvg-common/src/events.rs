//! Workflow event types and broadcast event bus
//!
//! Events describe pipeline progress for one project. The pipeline sends them
//! over a caller-owned `mpsc` channel (so the caller decides which execution
//! context consumes them) and may re-broadcast them on an [`EventBus`] for
//! any number of observers.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Pipeline stage identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Analysis,
    Transcription,
    ClipFetch,
    Arrangement,
    Planning,
    Export,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Analysis => "analysis",
            Stage::Transcription => "transcription",
            Stage::ClipFetch => "clip_fetch",
            Stage::Arrangement => "arrangement",
            Stage::Planning => "planning",
            Stage::Export => "export",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow events for progress reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkflowEvent {
    /// Stage processing started
    StageStarted {
        project_id: Uuid,
        stage: Stage,
    },

    /// Stage finished successfully
    StageCompleted {
        project_id: Uuid,
        stage: Stage,
    },

    /// Optional stage could not run; pipeline continues with reduced information
    StageSkipped {
        project_id: Uuid,
        stage: Stage,
        reason: String,
    },

    /// Fatal stage failure; pipeline halted for this project
    StageFailed {
        project_id: Uuid,
        stage: Stage,
        message: String,
    },

    /// Export progress (0.0-1.0, non-decreasing)
    ExportProgress {
        project_id: Uuid,
        fraction: f64,
    },

    /// Stage was cancelled by the caller
    Cancelled {
        project_id: Uuid,
        stage: Stage,
    },
}

impl WorkflowEvent {
    pub fn project_id(&self) -> Uuid {
        match self {
            WorkflowEvent::StageStarted { project_id, .. }
            | WorkflowEvent::StageCompleted { project_id, .. }
            | WorkflowEvent::StageSkipped { project_id, .. }
            | WorkflowEvent::StageFailed { project_id, .. }
            | WorkflowEvent::ExportProgress { project_id, .. }
            | WorkflowEvent::Cancelled { project_id, .. } => *project_id,
        }
    }
}

/// Broadcast bus for workflow events
///
/// Cloning the bus shares the underlying channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<WorkflowEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use mvg_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: WorkflowEvent,
    ) -> Result<usize, broadcast::error::SendError<WorkflowEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: WorkflowEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
