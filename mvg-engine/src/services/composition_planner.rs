//! Render plan construction
//!
//! Translates an arranged clip list, the song and the colour grading into a
//! declarative [`RenderPlan`]: one audio insert, sequential video inserts and
//! a single global colour transform. Encoding is left to a [`Renderer`].
//!
//! [`Renderer`]: super::renderer::Renderer

use crate::models::{ColorGrading, ColorPreset, VideoClip, VideoProject};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Neutral colour temperature at zero warmth (Kelvin)
pub const NEUTRAL_TEMPERATURE_K: f64 = 6500.0;
/// Temperature shift per unit of warmth (Kelvin)
pub const WARMTH_TEMPERATURE_SPAN_K: f64 = 2000.0;
/// Transfer function requested by the cinematic and noir presets
pub const TRANSFER_ITU_R_709_2: &str = "ITU_R_709_2";

/// Half-open time range in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub duration: f64,
}

impl TimeRange {
    pub fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }
}

/// Full song placed on the audio track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioInsert {
    pub source: PathBuf,
    pub source_range: TimeRange,
    /// Destination offset on the output timeline (seconds)
    pub at: f64,
}

/// One clip placed on the video track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInsert {
    pub clip_id: Uuid,
    pub source_url: String,
    /// `(trim_start, duration - trim_start - trim_end)`
    pub source_range: TimeRange,
    /// Destination offset on the output timeline (seconds)
    pub at: f64,
}

/// Global colour transform descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTransform {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub warmth: f64,
    pub preset: ColorPreset,
    /// `6500 + warmth * 2000` (Kelvin)
    pub neutral_temperature: f64,
    pub transfer_function: Option<String>,
}

impl From<&ColorGrading> for ColorTransform {
    fn from(grading: &ColorGrading) -> Self {
        let resolved = grading.resolved();
        let transfer_function = match resolved.preset {
            ColorPreset::Cinematic | ColorPreset::Noir => Some(TRANSFER_ITU_R_709_2.to_string()),
            _ => None,
        };

        Self {
            brightness: resolved.brightness,
            contrast: resolved.contrast,
            saturation: resolved.saturation,
            warmth: resolved.warmth,
            preset: resolved.preset,
            neutral_temperature: NEUTRAL_TEMPERATURE_K
                + resolved.warmth * WARMTH_TEMPERATURE_SPAN_K,
            transfer_function,
        }
    }
}

/// Output container parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub container: String,
    /// Frame duration as `(value, timescale)`, i.e. 1/30 s
    pub frame_duration: (u32, u32),
    pub render_width: u32,
    pub render_height: u32,
    /// Ticks per second for time values handed to the encoder
    pub timescale: u32,
    pub output_path: PathBuf,
}

impl OutputSettings {
    /// Default settings writing `<output_folder>/output_<uuid>.mp4`
    pub fn in_folder(output_folder: &Path) -> Self {
        Self {
            container: "mp4".to_string(),
            frame_duration: (1, 30),
            render_width: 1920,
            render_height: 1080,
            timescale: 600,
            output_path: output_folder.join(format!("output_{}.mp4", Uuid::new_v4())),
        }
    }
}

/// Ordered, declarative description of a render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub project_id: Uuid,
    pub audio: AudioInsert,
    pub video: Vec<VideoInsert>,
    pub color: ColorTransform,
    pub output: OutputSettings,
}

/// Builds render plans into a fixed output folder
#[derive(Debug, Clone)]
pub struct CompositionPlanner {
    output_folder: PathBuf,
}

impl CompositionPlanner {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
        }
    }

    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    /// Plan a render of `project`'s current clips, song and grading
    pub fn plan(&self, project: &VideoProject) -> RenderPlan {
        let audio = AudioInsert {
            source: project.song.source.clone(),
            source_range: TimeRange::new(0.0, project.song.duration.max(0.0)),
            at: 0.0,
        };

        let video = video_inserts(&project.clips);
        let color = ColorTransform::from(&project.color_grading);
        let output = OutputSettings::in_folder(&self.output_folder);

        debug!(
            project_id = %project.id,
            inserts = video.len(),
            skipped = project.clips.len() - video.len(),
            preset = ?color.preset,
            "Render plan built"
        );

        RenderPlan {
            project_id: project.id,
            audio,
            video,
            color,
            output,
        }
    }
}

/// Sequential inserts; zero-length clips are skipped
pub fn video_inserts(clips: &[VideoClip]) -> Vec<VideoInsert> {
    let mut cursor = 0.0;
    let mut inserts = Vec::with_capacity(clips.len());

    for clip in clips {
        let played = clip.effective_duration();
        if played <= 0.0 {
            continue;
        }
        inserts.push(VideoInsert {
            clip_id: clip.id,
            source_url: clip.url.clone(),
            source_range: TimeRange::new(clip.trim_start.max(0.0), played),
            at: cursor,
        });
        cursor += played;
    }

    inserts
}
