//! Video metadata and caption retrieval.
//!
//! The pipeline only depends on [`TranscriptFetcher`]; [`HttpTranscriptFetcher`]
//! talks to a transcript service exposing `GET {base_url}/videos/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::FetchError;
use crate::identify::VideoId;
use crate::types::{VideoMetadata, VideoTranscript};

/// Result of a successful fetch. Missing captions are a normal outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Available(VideoTranscript),
    Unavailable,
}

#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// # Errors
    ///
    /// Returns [`FetchError`] only when the collaborator itself fails. A video
    /// without captions is [`FetchOutcome::Unavailable`].
    async fn fetch(&self, video_id: &VideoId) -> Result<FetchOutcome, FetchError>;
}

#[derive(Debug, Deserialize)]
struct VideoPayload {
    title: String,
    channel_name: String,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    view_count: u64,
    #[serde(default)]
    caption_text: Option<String>,
}

impl VideoPayload {
    fn into_outcome(self) -> FetchOutcome {
        match self.caption_text {
            Some(text) if !text.trim().is_empty() => FetchOutcome::Available(VideoTranscript {
                metadata: VideoMetadata {
                    title: self.title,
                    channel_name: self.channel_name,
                    published_at: self.published_at,
                    view_count: self.view_count,
                },
                caption_text: text,
            }),
            _ => FetchOutcome::Unavailable,
        }
    }
}

/// HTTP client for the transcript service.
#[derive(Clone)]
pub struct HttpTranscriptFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranscriptFetcher {
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the underlying client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vidbias/0.1 (transcript-analysis)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TranscriptFetcher for HttpTranscriptFetcher {
    async fn fetch(&self, video_id: &VideoId) -> Result<FetchOutcome, FetchError> {
        let url = format!("{}/videos/{}", self.base_url, video_id.as_str());
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(video_id = %video_id, "transcript service has no record");
            return Ok(FetchOutcome::Unavailable);
        }
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let payload: VideoPayload =
            serde_json::from_str(&body).map_err(|source| FetchError::Deserialize {
                context: format!("video {video_id}"),
                source,
            })?;

        Ok(payload.into_outcome())
    }
}
