//! Workflow event bridge
//!
//! Forwards events from a pipeline's `mpsc` channel onto an [`EventBus`] so
//! any number of observers (CLI progress output, tests) can follow a run.

use mvg_common::events::{EventBus, WorkflowEvent};
use mvg_common::timecode::format_timecode;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Bridge task that forwards workflow events to the EventBus
///
/// Runs until every sender of `workflow_rx` is dropped. Returns the number of
/// events forwarded.
pub async fn bridge_workflow_events(
    mut workflow_rx: mpsc::Receiver<WorkflowEvent>,
    event_bus: EventBus,
) -> usize {
    info!("Workflow event bridge started");

    let start_time = std::time::Instant::now();
    let mut forwarded = 0;

    while let Some(event) = workflow_rx.recv().await {
        debug!("Bridge: Received workflow event: {:?}", event);

        match &event {
            WorkflowEvent::StageStarted { stage, .. } => {
                info!(
                    "Bridge: {} started at {}",
                    stage,
                    format_timecode(start_time.elapsed().as_secs_f64())
                );
            }
            WorkflowEvent::StageFailed { stage, message, .. } => {
                warn!("Bridge: {} failed: {}", stage, message);
            }
            WorkflowEvent::StageSkipped { stage, reason, .. } => {
                info!("Bridge: {} skipped: {}", stage, reason);
            }
            _ => {}
        }

        event_bus.emit_lossy(event);
        forwarded += 1;
    }

    info!(
        "Workflow event bridge stopped after {} events ({})",
        forwarded,
        format_timecode(start_time.elapsed().as_secs_f64())
    );
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvg_common::events::Stage;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_forwards_in_order_until_senders_drop() {
        let bus = EventBus::new(16);
        let mut observer = bus.subscribe();
        let (tx, rx) = mpsc::channel(16);
        let bridge = tokio::spawn(bridge_workflow_events(rx, bus.clone()));

        let project_id = Uuid::new_v4();
        tx.send(WorkflowEvent::StageStarted {
            project_id,
            stage: Stage::Analysis,
        })
        .await
        .unwrap();
        tx.send(WorkflowEvent::StageCompleted {
            project_id,
            stage: Stage::Analysis,
        })
        .await
        .unwrap();
        drop(tx);

        assert_eq!(bridge.await.unwrap(), 2);
        assert!(matches!(
            observer.recv().await.unwrap(),
            WorkflowEvent::StageStarted { .. }
        ));
        assert!(matches!(
            observer.recv().await.unwrap(),
            WorkflowEvent::StageCompleted { .. }
        ));
    }

    #[tokio::test]
    async fn test_no_observers_is_not_an_error() {
        let bus = EventBus::new(4);
        let (tx, rx) = mpsc::channel(4);
        tx.send(WorkflowEvent::ExportProgress {
            project_id: Uuid::nil(),
            fraction: 1.0,
        })
        .await
        .unwrap();
        drop(tx);

        assert_eq!(bridge_workflow_events(rx, bus).await, 1);
    }
}
