//! Clip source resolution
//!
//! Builds a stock-footage query from lyric keywords and the song's mood,
//! asks a [`ClipSearch`] backend for enough clips to cover the song, and
//! converts the results into [`VideoClip`]s.
//!
//! **Fallback contract:** any search *failure* (network, decode, missing
//! credential) is replaced by synthetic placeholder clips that exactly cover
//! the target duration. A search that succeeds with zero results is returned
//! unchanged.

use crate::error::ClipSearchError;
use crate::models::{ClipSource, Mood, VideoClip};
use async_trait::async_trait;
use mvg_common::params::{ClipParams, MoodKeywordTable};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Tag carried by every synthesized clip
pub const PLACEHOLDER_TAG: &str = "placeholder";

/// One search hit, before conversion to a timeline clip
#[derive(Debug, Clone, PartialEq)]
pub struct ClipCandidate {
    pub url: String,
    pub thumbnail_url: Option<String>,
    /// Source length (seconds)
    pub duration: f64,
    pub tags: Vec<String>,
}

/// "Search clips" capability
#[async_trait]
pub trait ClipSearch: Send + Sync {
    async fn search(&self, query: &str, count: usize)
        -> Result<Vec<ClipCandidate>, ClipSearchError>;
}

/// Search backend for offline runs; always fails so placeholders are used
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSearch;

#[async_trait]
impl ClipSearch for DisabledSearch {
    async fn search(
        &self,
        _query: &str,
        _count: usize,
    ) -> Result<Vec<ClipCandidate>, ClipSearchError> {
        Err(ClipSearchError::MissingCredential)
    }
}

/// Number of clips needed to cover `target_duration`
///
/// `ceil(target_duration / clip_length)`; non-positive or non-finite input
/// needs no clips.
pub fn desired_clip_count(target_duration: f64, clip_length: f64) -> usize {
    if !(target_duration > 0.0) || !target_duration.is_finite() || !(clip_length > 0.0) {
        return 0;
    }
    (target_duration / clip_length).ceil() as usize
}

/// `keywords ++ mood terms`, space separated
pub fn build_query(keywords: &[String], mood: Mood, table: &MoodKeywordTable) -> String {
    keywords
        .iter()
        .chain(mood.search_terms(table))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a clip list for a song
#[derive(Clone)]
pub struct ClipResolver {
    search: Arc<dyn ClipSearch>,
    params: ClipParams,
    placeholder_dir: PathBuf,
}

impl ClipResolver {
    /// Placeholders are located in the system temp directory
    pub fn new(search: Arc<dyn ClipSearch>, params: ClipParams) -> Self {
        Self::with_placeholder_dir(search, params, std::env::temp_dir())
    }

    pub fn with_placeholder_dir(
        search: Arc<dyn ClipSearch>,
        params: ClipParams,
        placeholder_dir: PathBuf,
    ) -> Self {
        Self {
            search,
            params,
            placeholder_dir,
        }
    }

    /// Fetch clips for `keywords` + `mood` covering `target_duration` seconds
    ///
    /// Never fails: search errors are logged and replaced by placeholders.
    pub async fn fetch_clips(
        &self,
        keywords: &[String],
        mood: Mood,
        target_duration: f64,
    ) -> Vec<VideoClip> {
        let count = desired_clip_count(target_duration, self.params.target_clip_duration);
        if count == 0 {
            return Vec::new();
        }

        let query = build_query(keywords, mood, &self.params.mood_keywords);
        info!(query = %query, count = count, mood = %mood, "Searching for clips");

        match self.search.search(&query, count).await {
            Ok(candidates) => {
                info!(results = candidates.len(), "Clip search succeeded");
                candidates.into_iter().map(candidate_to_clip).collect()
            }
            Err(e) => {
                warn!(error = %e, count = count, "Clip search failed, using placeholder clips");
                self.placeholder_clips(count, target_duration)
            }
        }
    }

    /// `count` equal placeholder clips tiling `target_duration`
    pub fn placeholder_clips(&self, count: usize, target_duration: f64) -> Vec<VideoClip> {
        if count == 0 {
            return Vec::new();
        }
        let clip_duration = target_duration / count as f64;

        (0..count)
            .map(|i| {
                let url = self
                    .placeholder_dir
                    .join(format!("placeholder_{}.mp4", i))
                    .to_string_lossy()
                    .into_owned();
                let mut clip = VideoClip::new(url, clip_duration, ClipSource::AiGenerated)
                    .with_tags(vec![PLACEHOLDER_TAG.to_string()]);
                clip.start_time = i as f64 * clip_duration;
                clip
            })
            .collect()
    }
}

fn candidate_to_clip(candidate: ClipCandidate) -> VideoClip {
    VideoClip::new(candidate.url, candidate.duration, ClipSource::Stock)
        .with_thumbnail(candidate.thumbnail_url)
        .with_tags(candidate.tags)
}
