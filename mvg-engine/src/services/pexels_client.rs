//! Pexels video search client
//!
//! Implements [`ClipSearch`] over `GET /videos/search` with rate limiting.

use super::clip_fetcher::{ClipCandidate, ClipSearch};
use crate::error::ClipSearchError;
use async_trait::async_trait;
use mvg_common::config::is_valid_key;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

const PEXELS_BASE_URL: &str = "https://api.pexels.com";
const USER_AGENT: &str = concat!("mvg-engine/", env!("CARGO_PKG_VERSION"));
const RATE_LIMIT_MS: u64 = 1000; // 1 request per second
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Pexels search response
#[derive(Debug, Clone, Deserialize)]
pub struct PexelsResponse {
    pub videos: Option<Vec<PexelsVideo>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PexelsVideo {
    pub id: u64,
    /// Whole seconds
    pub duration: i64,
    /// Preview image URL
    pub image: Option<String>,
    #[serde(default)]
    pub video_files: Vec<PexelsVideoFile>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PexelsVideoFile {
    pub id: u64,
    pub quality: Option<String>,
    pub link: String,
}

/// Convert a response into candidates
///
/// Videos without a file link or with a non-positive duration are skipped.
pub fn candidates_from_response(
    response: PexelsResponse,
) -> Result<Vec<ClipCandidate>, ClipSearchError> {
    let videos = response.videos.ok_or(ClipSearchError::NoData)?;

    Ok(videos
        .into_iter()
        .filter_map(|video| {
            let link = video.video_files.into_iter().next()?.link;
            if link.trim().is_empty() || video.duration <= 0 {
                debug!(video_id = video.id, "Skipping unusable Pexels result");
                return None;
            }
            Some(ClipCandidate {
                url: link,
                thumbnail_url: video.image.filter(|i| !i.is_empty()),
                duration: video.duration as f64,
                tags: video.tags,
            })
        })
        .collect())
}

/// Rate limiter enforcing a minimum spacing between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Pexels API client
pub struct PexelsClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    api_key: Option<String>,
    base_url: String,
}

impl PexelsClient {
    /// Client for the public API; `api_key` may be absent (searches then
    /// fail with `MissingCredential`)
    pub fn new(api_key: Option<String>) -> Result<Self, ClipSearchError> {
        Self::with_base_url(api_key, PEXELS_BASE_URL)
    }

    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ClipSearchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClipSearchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
            api_key,
            base_url: base_url.into(),
        })
    }

    fn search_url(&self, query: &str, count: usize) -> Result<reqwest::Url, ClipSearchError> {
        let base = format!("{}/videos/search", self.base_url.trim_end_matches('/'));
        let per_page = count.to_string();
        reqwest::Url::parse_with_params(&base, &[("query", query), ("per_page", per_page.as_str())])
            .map_err(|e| ClipSearchError::InvalidUrl(format!("{}: {}", base, e)))
    }
}

#[async_trait]
impl ClipSearch for PexelsClient {
    async fn search(
        &self,
        query: &str,
        count: usize,
    ) -> Result<Vec<ClipCandidate>, ClipSearchError> {
        let api_key = match self.api_key.as_deref() {
            Some(key) if is_valid_key(key) => key,
            _ => return Err(ClipSearchError::MissingCredential),
        };

        let url = self.search_url(query, count)?;

        self.rate_limiter.wait().await;

        debug!(url = %url, "Querying Pexels API");

        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClipSearchError::Api(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(ClipSearchError::NoData);
        }

        let parsed: PexelsResponse =
            serde_json::from_str(&body).map_err(|e| ClipSearchError::Decode(e.to_string()))?;

        candidates_from_response(parsed)
    }
}
