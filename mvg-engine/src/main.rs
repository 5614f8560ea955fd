//! mvg-engine - Music video generator
//!
//! Analyzes a song, resolves stock or placeholder clips against its mood and
//! lyric keywords, arranges them on a timeline and writes a render manifest.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mvg_common::config::{load_or_default, resolve_pexels_api_key, TomlConfig};
use mvg_common::events::{EventBus, WorkflowEvent};
use mvg_common::timecode::{format_range, format_timecode};
use mvg_engine::models::{ColorGrading, ColorPreset};
use mvg_engine::services::{AudioAnalyzer, ClipSearch, DisabledSearch, PexelsClient, TranscriptSidecar};
use mvg_engine::workflow::bridge_workflow_events;
use mvg_engine::{Pipeline, PipelineConfig};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Workflow event channel depth
const EVENT_BUFFER: usize = 100;

/// Command-line arguments for mvg-engine
#[derive(Parser, Debug)]
#[command(name = "mvg-engine")]
#[command(about = "Generate music-video timelines from audio")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "MVG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a track and print tempo, energy, mood and segments as JSON
    Analyze {
        /// Audio or video file
        audio: PathBuf,
    },

    /// Run the full pipeline and write a render manifest
    Generate {
        /// Audio or video file
        audio: PathBuf,

        /// Project title (defaults to the file stem)
        #[arg(long)]
        title: Option<String>,

        /// Transcript sidecar (JSON) supplying lyrics and lexical tags
        #[arg(long, value_name = "FILE")]
        transcript: Option<PathBuf>,

        /// Colour grading preset (cinematic, vibrant, vintage, noir, pastel)
        #[arg(long)]
        preset: Option<String>,

        /// Skip stock-footage search and use placeholder clips
        #[arg(long)]
        offline: bool,

        /// Folder receiving the render output
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref());

    // Initialize tracing (RUST_LOG overrides the configured level)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Starting mvg-engine {}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Analyze { audio } => analyze(&config, audio).await,
        Command::Generate {
            audio,
            title,
            transcript,
            preset,
            offline,
            output_dir,
        } => {
            let options = GenerateOptions {
                audio,
                title,
                transcript,
                preset,
                offline,
                output_dir,
            };
            generate(&config, options).await
        }
    }
}

async fn analyze(config: &TomlConfig, audio: PathBuf) -> Result<()> {
    let analyzer = AudioAnalyzer::new(config.analysis.clone());
    let track = analyzer
        .analyze(&audio)
        .await
        .with_context(|| format!("Failed to analyze {}", audio.display()))?;

    info!(
        "{}: {:.1} BPM, energy {:.3}, mood {}, length {}",
        audio.display(),
        track.analysis.tempo,
        track.analysis.energy,
        track.analysis.mood,
        format_timecode(track.duration_seconds)
    );
    println!("{}", serde_json::to_string_pretty(&track.analysis)?);
    Ok(())
}

struct GenerateOptions {
    audio: PathBuf,
    title: Option<String>,
    transcript: Option<PathBuf>,
    preset: Option<String>,
    offline: bool,
    output_dir: Option<PathBuf>,
}

async fn generate(config: &TomlConfig, options: GenerateOptions) -> Result<()> {
    let mut pipeline_config = PipelineConfig::from_toml(config);
    if let Some(dir) = options.output_dir {
        pipeline_config.output_folder = dir;
    }

    let grading = match options.preset.as_deref() {
        Some(name) => {
            let preset = ColorPreset::from_name(name)
                .with_context(|| format!("Unknown colour preset: {}", name))?;
            Some(ColorGrading::from_preset(preset))
        }
        None => None,
    };

    let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
    let mut pipeline = Pipeline::new(pipeline_config)
        .with_events(event_tx)
        .with_clip_search(clip_search(config, options.offline)?);

    if let Some(path) = &options.transcript {
        let sidecar = Arc::new(
            TranscriptSidecar::load(path)
                .await
                .with_context(|| format!("Failed to load transcript {}", path.display()))?,
        );
        pipeline = pipeline.with_transcription(sidecar.clone(), sidecar);
    }

    let event_bus = EventBus::new(EVENT_BUFFER);
    let progress = tokio::spawn(log_progress(event_bus.subscribe()));
    let bridge = tokio::spawn(bridge_workflow_events(event_rx, event_bus));

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let title = options.title.unwrap_or_else(|| {
        options
            .audio
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    });
    let handle = pipeline.start_project(&options.audio, &title);
    if let Some(grading) = grading {
        handle.set_color_grading(grading).await?;
    }

    let result = pipeline.generate(&handle, &cancel).await;

    // Close the event channel so the bridge and observer finish
    drop(pipeline);
    let _ = bridge.await;
    let _ = progress.await;

    let outcome = result?;
    for clip in &outcome.project.clips {
        info!(
            "{} {}",
            format_range(clip.start_time, clip.effective_duration()),
            clip.url
        );
    }
    println!("{}", outcome.output.display());
    Ok(())
}

/// Stock-footage search, or placeholders when offline or unconfigured
fn clip_search(config: &TomlConfig, offline: bool) -> Result<Arc<dyn ClipSearch>> {
    if offline {
        info!("Offline mode: using placeholder clips");
        return Ok(Arc::new(DisabledSearch));
    }

    match resolve_pexels_api_key(config) {
        Ok(key) => {
            let client = PexelsClient::new(Some(key)).context("Failed to create Pexels client")?;
            Ok(Arc::new(client))
        }
        Err(e) => {
            warn!("{}; using placeholder clips", e);
            Ok(Arc::new(DisabledSearch))
        }
    }
}

/// Log export progress and stage outcomes from the event bus
async fn log_progress(mut rx: broadcast::Receiver<WorkflowEvent>) {
    loop {
        match rx.recv().await {
            Ok(WorkflowEvent::StageCompleted { stage, .. }) => info!("✓ {}", stage),
            Ok(WorkflowEvent::ExportProgress { fraction, .. }) => {
                info!("Export {:.0}%", fraction * 100.0)
            }
            Ok(WorkflowEvent::Cancelled { stage, .. }) => info!("Cancelled during {}", stage),
            Ok(_) => {}
            Err(RecvError::Lagged(n)) => {
                warn!("Progress output skipped {} events", n)
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl+C received, cancelling");
        cancel.cancel();
    }
}
