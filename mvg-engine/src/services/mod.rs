//! Service modules for the audio-to-timeline pipeline
//!
//! Leaves first: framing, energy, tempo, mood and segmentation feed the
//! analysis orchestrator; keyword extraction, clip resolution, arrangement
//! and planning turn the analysis into a render plan.

pub mod audio_analyzer;
pub mod clip_arranger;
pub mod clip_fetcher;
pub mod composition_planner;
pub mod energy_analyzer;
pub mod keyword_extractor;
pub mod mood_classifier;
pub mod pexels_client;
pub mod renderer;
pub mod segmenter;
pub mod signal_framer;
pub mod tempo_estimator;
pub mod transcriber;

pub use audio_analyzer::{AnalyzedTrack, AudioAnalyzer};
pub use clip_arranger::arrange;
pub use clip_fetcher::{ClipCandidate, ClipResolver, ClipSearch, DisabledSearch};
pub use composition_planner::{CompositionPlanner, RenderPlan};
pub use energy_analyzer::{rms, EnergyAnalyzer};
pub use keyword_extractor::{extract_terms, LexicalClass, NoopTagger, PosTagger, TaggedToken};
pub use mood_classifier::classify_mood;
pub use pexels_client::PexelsClient;
pub use renderer::{run_export, ManifestRenderer, ProgressReporter, Renderer};
pub use segmenter::Segmenter;
pub use signal_framer::SignalFramer;
pub use tempo_estimator::TempoEstimator;
pub use transcriber::{Transcriber, Transcript, TranscriptSidecar, UnavailableTranscriber};
