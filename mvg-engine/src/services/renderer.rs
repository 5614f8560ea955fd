//! Render/export boundary
//!
//! Encoding is an external capability behind [`Renderer`]. Progress flows
//! through a [`ProgressReporter`], which clamps every value to `[0, 1]` and
//! drops regressions, onto a channel the caller drains in its own context.
//!
//! **Progress stages:** clip inserts `[0.0, 0.7)`, plan finalised `0.8`,
//! completed `1.0`.

use super::composition_planner::RenderPlan;
use crate::error::ExportError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Share of progress assigned to clip inserts
pub const INSERT_PROGRESS_SHARE: f64 = 0.7;
/// Progress reported once the plan is finalised
pub const FINALIZE_PROGRESS: f64 = 0.8;

/// Monotonic progress sink
#[derive(Debug)]
pub struct ProgressReporter {
    last_bits: AtomicU64,
    tx: mpsc::UnboundedSender<f64>,
}

impl ProgressReporter {
    /// Reporter plus the receiving end for the caller
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<f64>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let reporter = Self {
            last_bits: AtomicU64::new((-1.0f64).to_bits()),
            tx,
        };
        (reporter, rx)
    }

    /// Report `fraction`; values below the last reported one are dropped
    ///
    /// Safe to call from any thread.
    pub fn report(&self, fraction: f64) {
        let value = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };

        let advanced = self
            .last_bits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                (value > f64::from_bits(bits)).then_some(value.to_bits())
            })
            .is_ok();

        if advanced {
            // Receiver gone means nobody is observing; rendering continues
            let _ = self.tx.send(value);
        }
    }

    /// Last reported value (0.0 before any report)
    pub fn last(&self) -> f64 {
        f64::from_bits(self.last_bits.load(Ordering::SeqCst)).max(0.0)
    }
}

/// "Render" capability
///
/// Terminal states: `Ok(output)` (completed), `Err(ExportFailed)`,
/// `Err(ExportCancelled)`.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(
        &self,
        plan: &RenderPlan,
        progress: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, ExportError>;
}

/// Run `renderer`, racing it against cancellation
pub async fn run_export(
    renderer: &dyn Renderer,
    plan: &RenderPlan,
    progress: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<PathBuf, ExportError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!(project_id = %plan.project_id, "Export cancelled");
            Err(ExportError::ExportCancelled)
        }
        result = renderer.render(plan, progress, cancel) => result,
    }
}

/// Writes the render plan as a JSON manifest next to the planned output
///
/// The manifest is the hand-off document for an external encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestRenderer;

impl ManifestRenderer {
    pub fn manifest_path(plan: &RenderPlan) -> PathBuf {
        plan.output.output_path.with_extension("json")
    }
}

#[async_trait]
impl Renderer for ManifestRenderer {
    async fn render(
        &self,
        plan: &RenderPlan,
        progress: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, ExportError> {
        let count = plan.video.len();
        for (index, insert) in plan.video.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(ExportError::ExportCancelled);
            }
            debug!(clip_id = %insert.clip_id, at = insert.at, "Insert planned");
            progress.report(INSERT_PROGRESS_SHARE * index as f64 / count as f64);
        }

        let json = serde_json::to_vec_pretty(plan)
            .map_err(|e| ExportError::ExportFailed(format!("failed to serialize plan: {}", e)))?;
        progress.report(FINALIZE_PROGRESS);

        if cancel.is_cancelled() {
            return Err(ExportError::ExportCancelled);
        }

        let target = Self::manifest_path(plan);
        write_atomically(&target, &json).await?;
        progress.report(1.0);

        info!(path = %target.display(), inserts = count, "Render manifest written");
        Ok(target)
    }
}

/// Write to `<path>.tmp` then rename over `path`
async fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), ExportError> {
    let failed = |e: std::io::Error| ExportError::ExportFailed(format!("{}: {}", path.display(), e));

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(failed)?;
    }
    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, contents).await.map_err(failed)?;
    tokio::fs::rename(&temp_path, path).await.map_err(failed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClipSource, Song, VideoClip, VideoProject};
    use crate::services::composition_planner::CompositionPlanner;

    fn drain(rx: &mut mpsc::UnboundedReceiver<f64>) -> Vec<f64> {
        let mut values = Vec::new();
        while let Ok(v) = rx.try_recv() {
            values.push(v);
        }
        values
    }

    fn plan_in(dir: &Path, clip_count: usize) -> RenderPlan {
        let mut project = VideoProject::new("Test", Song::new("/music/song.wav", "Song", 10.0));
        project.clips = (0..clip_count)
            .map(|_| VideoClip::new("clip.mp4", 2.5, ClipSource::Stock))
            .collect();
        CompositionPlanner::new(dir).plan(&project)
    }

    #[test]
    fn test_progress_clamped_and_monotonic() {
        let (reporter, mut rx) = ProgressReporter::channel();
        for value in [0.0, 0.3, 0.2, 1.7, 0.9, -0.5, f64::NAN] {
            reporter.report(value);
        }
        assert_eq!(drain(&mut rx), vec![0.0, 0.3, 1.0]);
        assert_eq!(reporter.last(), 1.0);
    }

    #[tokio::test]
    async fn test_manifest_written_with_staged_progress() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let plan = plan_in(temp_dir.path(), 4);
        let (reporter, mut rx) = ProgressReporter::channel();

        let path = run_export(&ManifestRenderer, &plan, &reporter, &CancellationToken::new())
            .await
            .unwrap();

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
        let written: RenderPlan =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written, plan);

        let values = drain(&mut rx);
        let expected = [0.0, 0.175, 0.35, 0.525, 0.8, 1.0];
        assert_eq!(values.len(), expected.len());
        for (got, want) in values.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "got {:?}", values);
        }
    }

    #[tokio::test]
    async fn test_cancelled_export() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let plan = plan_in(temp_dir.path(), 2);
        let (reporter, _rx) = ProgressReporter::channel();
        let token = CancellationToken::new();
        token.cancel();

        let result = run_export(&ManifestRenderer, &plan, &reporter, &token).await;
        assert!(matches!(result, Err(ExportError::ExportCancelled)));
        assert!(!ManifestRenderer::manifest_path(&plan).exists());
    }
}
