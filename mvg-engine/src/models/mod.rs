//! Data model for songs, clips, grading and projects

mod analysis;
mod clip;
mod grading;
mod lyrics;
mod project;
mod song;

pub use analysis::{AudioAnalysis, AudioSegment, Mood};
pub use clip::{ClipSource, TransitionType, VideoClip, VideoTransition};
pub use grading::{ColorGrading, ColorPreset};
pub use lyrics::{LyricsData, TimedLyric};
pub use project::VideoProject;
pub use song::{Song, SongState};
