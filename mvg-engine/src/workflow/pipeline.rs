//! Pipeline Orchestrator
//!
//! Drives one project through the audio-to-timeline pipeline:
//!
//! - **Analysis** (fatal): decode + tempo/energy/mood/segments
//! - **Transcription** (optional): lyrics, themes and keywords
//! - **Clip fetch** (never fails): search, placeholder fallback
//! - **Arrangement**: clips laid out against the song
//! - **Planning**: render plan from clips, song and grading
//! - **Export** (fatal, cancellable): renderer consumes the plan
//!
//! # Error Handling
//! - Fatal stages return [`PipelineError`] naming the stage; the project
//!   keeps every result produced before the failure, so a caller can retry
//!   from the failing stage with the same [`ProjectHandle`]
//! - Optional-stage failures are logged and reported as `StageSkipped`
//! - Cancellation is checked between stages; transcription and export race
//!   the token directly
//!
//! # Example
//! ```rust,ignore
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let handle = pipeline.start_project(Path::new("song.mp3"), "Song");
//! let outcome = pipeline.generate(&handle, &CancellationToken::new()).await?;
//! ```

use crate::error::{PipelineError, ProjectError, TranscriptionError};
use crate::models::{LyricsData, Song, VideoClip, VideoProject};
use crate::services::audio_analyzer::AudioAnalyzer;
use crate::services::clip_fetcher::{ClipResolver, ClipSearch, DisabledSearch};
use crate::services::composition_planner::{CompositionPlanner, RenderPlan};
use crate::services::keyword_extractor::{NoopTagger, PosTagger};
use crate::services::renderer::{run_export, ManifestRenderer, ProgressReporter, Renderer};
use crate::services::transcriber::{Transcriber, UnavailableTranscriber};
use crate::utils::audio_decoder::{AudioDecoder, SymphoniaDecoder};
use crate::workflow::project_session::{ProjectHandle, ProjectSession};
use mvg_common::config::TomlConfig;
use mvg_common::events::{Stage, WorkflowEvent};
use mvg_common::params::{AnalysisParams, ClipParams};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub analysis: AnalysisParams,
    pub clips: ClipParams,
    /// Folder receiving render outputs
    pub output_folder: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisParams::default(),
            clips: ClipParams::default(),
            output_folder: std::env::temp_dir(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml(config: &TomlConfig) -> Self {
        Self {
            analysis: config.analysis.clone(),
            clips: config.clips.clone(),
            output_folder: config.output_folder(),
        }
    }
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Final project snapshot
    pub project: VideoProject,
    pub plan: RenderPlan,
    /// File produced by the renderer
    pub output: PathBuf,
}

/// Pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
    decoder: Arc<dyn AudioDecoder>,
    transcriber: Arc<dyn Transcriber>,
    tagger: Arc<dyn PosTagger>,
    clip_search: Arc<dyn ClipSearch>,
    renderer: Arc<dyn Renderer>,
    event_tx: Option<mpsc::Sender<WorkflowEvent>>,
}

impl Pipeline {
    /// Pipeline with the symphonia decoder, no transcription, no clip search
    /// (placeholders) and the manifest renderer
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            decoder: Arc::new(SymphoniaDecoder),
            transcriber: Arc::new(UnavailableTranscriber),
            tagger: Arc::new(NoopTagger),
            clip_search: Arc::new(DisabledSearch),
            renderer: Arc::new(ManifestRenderer),
            event_tx: None,
        }
    }

    /// Send progress events to `event_tx`
    pub fn with_events(mut self, event_tx: mpsc::Sender<WorkflowEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn AudioDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_transcription(
        mut self,
        transcriber: Arc<dyn Transcriber>,
        tagger: Arc<dyn PosTagger>,
    ) -> Self {
        self.transcriber = transcriber;
        self.tagger = tagger;
        self
    }

    pub fn with_clip_search(mut self, clip_search: Arc<dyn ClipSearch>) -> Self {
        self.clip_search = clip_search;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Create a project for `source` and spawn its session
    pub fn start_project(&self, source: &Path, title: &str) -> ProjectHandle {
        let project = VideoProject::new(title, Song::new(source, title, 0.0));
        info!(project_id = %project.id, source = %source.display(), "Project created");
        let (handle, _task) = ProjectSession::spawn(project);
        handle
    }

    /// Run every stage for the project behind `handle`
    pub async fn generate(
        &self,
        handle: &ProjectHandle,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutcome, PipelineError> {
        self.check_cancelled(handle, Stage::Analysis, cancel).await?;
        self.run_analysis(handle).await?;

        self.check_cancelled(handle, Stage::Transcription, cancel).await?;
        self.run_transcription(handle, cancel).await?;

        self.check_cancelled(handle, Stage::ClipFetch, cancel).await?;
        let clips = self.run_clip_fetch(handle).await?;

        self.check_cancelled(handle, Stage::Arrangement, cancel).await?;
        self.run_arrangement(handle, clips).await?;

        self.check_cancelled(handle, Stage::Planning, cancel).await?;
        let plan = self.run_planning(handle).await?;

        let output = self.run_export(handle, &plan, cancel).await?;

        let project = handle
            .snapshot()
            .await
            .map_err(|e| PipelineError::new(Stage::Export, e))?;

        info!(
            project_id = %project.id,
            clips = project.clips.len(),
            output = %output.display(),
            "Pipeline complete"
        );

        Ok(GenerationOutcome {
            project,
            plan,
            output,
        })
    }

    /// Analysis stage (fatal on failure)
    pub async fn run_analysis(&self, handle: &ProjectHandle) -> Result<(), PipelineError> {
        let stage = Stage::Analysis;
        let project_id = handle.project_id();
        self.emit_started(project_id, stage).await;

        let project = self.snapshot(handle, stage).await?;
        let analyzer = AudioAnalyzer::with_decoder(self.decoder.clone(), self.config.analysis.clone());

        let track = match analyzer.analyze(&project.song.source).await {
            Ok(track) => track,
            Err(e) => return Err(self.fail(project_id, PipelineError::new(stage, e)).await),
        };

        if let Err(e) = handle
            .set_analysis(track.analysis, track.duration_seconds)
            .await
        {
            return Err(self.fail(project_id, PipelineError::new(stage, e)).await);
        }

        self.emit_completed(project_id, stage).await;
        Ok(())
    }

    /// Transcription stage (optional)
    ///
    /// Returns the attached lyrics, or `None` when transcription was
    /// unavailable, failed or was cancelled; the song then stays analyzed.
    pub async fn run_transcription(
        &self,
        handle: &ProjectHandle,
        cancel: &CancellationToken,
    ) -> Result<Option<LyricsData>, PipelineError> {
        let stage = Stage::Transcription;
        let project_id = handle.project_id();
        self.emit_started(project_id, stage).await;

        let project = self.snapshot(handle, stage).await?;
        if project.song.analysis().is_none() {
            let err = PipelineError::new(stage, ProjectError::NotAnalyzed);
            return Err(self.fail(project_id, err).await);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TranscriptionError::Cancelled),
            result = self.transcriber.transcribe(&project.song.source, cancel) => result,
        };

        let transcript = match result {
            Ok(transcript) => transcript,
            Err(TranscriptionError::Cancelled) => {
                info!(project_id = %project_id, "Transcription cancelled, continuing without lyrics");
                self.emit_event(WorkflowEvent::Cancelled { project_id, stage }).await;
                return Ok(None);
            }
            Err(e) => {
                warn!(project_id = %project_id, error = %e, "Transcription unavailable, continuing without lyrics");
                self.emit_event(WorkflowEvent::StageSkipped {
                    project_id,
                    stage,
                    reason: e.to_string(),
                })
                .await;
                return Ok(None);
            }
        };

        let lyrics = transcript.into_lyrics(self.tagger.as_ref());
        if let Err(e) = handle.set_lyrics(lyrics.clone()).await {
            return Err(self.fail(project_id, PipelineError::new(stage, e)).await);
        }

        self.emit_completed(project_id, stage).await;
        Ok(Some(lyrics))
    }

    /// Clip fetch stage; search failures fall back to placeholders
    pub async fn run_clip_fetch(&self, handle: &ProjectHandle) -> Result<Vec<VideoClip>, PipelineError> {
        let stage = Stage::ClipFetch;
        let project_id = handle.project_id();
        self.emit_started(project_id, stage).await;

        let project = self.snapshot(handle, stage).await?;
        let mood = match project.song.analysis() {
            Some(analysis) => analysis.mood,
            None => {
                let err = PipelineError::new(stage, ProjectError::NotAnalyzed);
                return Err(self.fail(project_id, err).await);
            }
        };
        let keywords = project
            .song
            .lyrics()
            .map(|lyrics| lyrics.keywords.clone())
            .unwrap_or_default();

        let resolver = ClipResolver::new(self.clip_search.clone(), self.config.clips.clone());
        let clips = resolver
            .fetch_clips(&keywords, mood, project.song.duration)
            .await;

        self.emit_completed(project_id, stage).await;
        Ok(clips)
    }

    /// Arrangement stage: hand the clips to the session, which arranges them
    pub async fn run_arrangement(
        &self,
        handle: &ProjectHandle,
        clips: Vec<VideoClip>,
    ) -> Result<Vec<VideoClip>, PipelineError> {
        let stage = Stage::Arrangement;
        let project_id = handle.project_id();
        self.emit_started(project_id, stage).await;

        let arranged = match handle.replace_clips(clips).await {
            Ok(arranged) => arranged,
            Err(e) => return Err(self.fail(project_id, PipelineError::new(stage, e)).await),
        };

        self.emit_completed(project_id, stage).await;
        Ok(arranged)
    }

    /// Planning stage
    pub async fn run_planning(&self, handle: &ProjectHandle) -> Result<RenderPlan, PipelineError> {
        let stage = Stage::Planning;
        let project_id = handle.project_id();
        self.emit_started(project_id, stage).await;

        let project = self.snapshot(handle, stage).await?;
        let plan = CompositionPlanner::new(&self.config.output_folder).plan(&project);

        self.emit_completed(project_id, stage).await;
        Ok(plan)
    }

    /// Export stage (fatal on failure, cancellable)
    ///
    /// Renderer progress is forwarded as `ExportProgress` events; all
    /// progress events are delivered before the stage's terminal event.
    pub async fn run_export(
        &self,
        handle: &ProjectHandle,
        plan: &RenderPlan,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, PipelineError> {
        let stage = Stage::Export;
        let project_id = handle.project_id();
        self.emit_started(project_id, stage).await;

        let (reporter, mut progress_rx) = ProgressReporter::channel();
        let event_tx = self.event_tx.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(fraction) = progress_rx.recv().await {
                if let Some(tx) = &event_tx {
                    let _ = tx
                        .send(WorkflowEvent::ExportProgress {
                            project_id,
                            fraction,
                        })
                        .await;
                }
            }
        });

        let result = run_export(self.renderer.as_ref(), plan, &reporter, cancel).await;

        drop(reporter);
        if let Err(e) = forwarder.await {
            warn!(project_id = %project_id, error = %e, "Progress forwarder failed");
        }

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                let err = PipelineError::new(stage, e);
                if err.is_cancelled() {
                    self.emit_event(WorkflowEvent::Cancelled { project_id, stage }).await;
                    return Err(err);
                }
                return Err(self.fail(project_id, err).await);
            }
        };

        if let Err(e) = handle.set_export_location(output.clone()).await {
            return Err(self.fail(project_id, PipelineError::new(stage, e)).await);
        }

        self.emit_completed(project_id, stage).await;
        Ok(output)
    }

    async fn snapshot(&self, handle: &ProjectHandle, stage: Stage) -> Result<VideoProject, PipelineError> {
        match handle.snapshot().await {
            Ok(project) => Ok(project),
            Err(e) => Err(self.fail(handle.project_id(), PipelineError::new(stage, e)).await),
        }
    }

    /// Halt before `stage` if cancellation was requested
    async fn check_cancelled(
        &self,
        handle: &ProjectHandle,
        stage: Stage,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        if cancel.is_cancelled() {
            info!(project_id = %handle.project_id(), stage = %stage, "Pipeline cancelled");
            self.emit_event(WorkflowEvent::Cancelled {
                project_id: handle.project_id(),
                stage,
            })
            .await;
            return Err(PipelineError::cancelled(stage));
        }
        Ok(())
    }

    /// Log and report a fatal stage failure
    async fn fail(&self, project_id: uuid::Uuid, err: PipelineError) -> PipelineError {
        error!(project_id = %project_id, stage = %err.stage, error = %err.source, "Stage failed");
        self.emit_event(WorkflowEvent::StageFailed {
            project_id,
            stage: err.stage,
            message: err.source.to_string(),
        })
        .await;
        err
    }

    async fn emit_started(&self, project_id: uuid::Uuid, stage: Stage) {
        self.emit_event(WorkflowEvent::StageStarted { project_id, stage })
            .await;
    }

    async fn emit_completed(&self, project_id: uuid::Uuid, stage: Stage) {
        self.emit_event(WorkflowEvent::StageCompleted { project_id, stage })
            .await;
    }

    /// Emit event if channel is configured
    async fn emit_event(&self, event: WorkflowEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event).await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
