//! Clip arrangement along the song timeline
//!
//! **Algorithm:** walk clips in input order with a cursor starting at 0:
//! 1. Place the clip at the cursor (`start_time`)
//! 2. If the clip's length after its head trim exceeds the time remaining,
//!    trim its tail so it ends at the song end
//! 3. Advance the cursor by the clip's played length
//! 4. Once the cursor reaches the song end, drop every following clip
//!
//! Under-coverage (clips run out first) is left to the caller.

use crate::models::VideoClip;
use tracing::debug;

/// Cursor distance from the song end treated as full coverage (seconds)
pub const COVERAGE_EPSILON: f64 = 1e-9;

/// Arrange `clips` against a song of `song_duration` seconds
///
/// Returns a prefix of the input in order. Only the clip placed at the song
/// end gets a new tail trim; trims are clamped so a clip never plays for a
/// negative length.
pub fn arrange(clips: Vec<VideoClip>, song_duration: f64) -> Vec<VideoClip> {
    let song_duration = if song_duration.is_nan() {
        0.0
    } else {
        song_duration.max(0.0)
    };

    let input_count = clips.len();
    let mut arranged = Vec::with_capacity(input_count);
    let mut cursor = 0.0;

    for mut clip in clips {
        clip.start_time = cursor;
        clamp_trims(&mut clip);

        let remaining = song_duration - cursor;
        let after_head = clip.duration - clip.trim_start;
        if after_head > remaining {
            clip.trim_end = after_head - remaining;
        }

        cursor += clip.effective_duration();
        arranged.push(clip);

        if cursor >= song_duration - COVERAGE_EPSILON {
            break;
        }
    }

    debug!(
        input = input_count,
        kept = arranged.len(),
        covered = format!("{:.3}", cursor),
        song_duration = format!("{:.3}", song_duration),
        "Clips arranged"
    );

    arranged
}

/// Sum of played lengths of an arranged list (seconds)
pub fn covered_duration(clips: &[VideoClip]) -> f64 {
    clips.iter().map(VideoClip::effective_duration).sum()
}

/// Force `0 <= trim_start`, `0 <= trim_end` and `trim_start + trim_end <= duration`
///
/// Non-finite durations and NaN trims count as zero.
fn clamp_trims(clip: &mut VideoClip) {
    if !clip.duration.is_finite() {
        clip.duration = 0.0;
    }
    let duration = clip.duration.max(0.0);
    clip.trim_start = non_nan(clip.trim_start).clamp(0.0, duration);
    clip.trim_end = non_nan(clip.trim_end).clamp(0.0, duration - clip.trim_start);
}

fn non_nan(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}
