use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vidbias_core::{BiasVector, SentimentResult};

/// Video metadata returned by the transcript collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub channel_name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: u64,
}

/// Metadata plus the caption text to analyse.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoTranscript {
    pub metadata: VideoMetadata,
    pub caption_text: String,
}

/// Everything the store needs to persist a fresh analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideoAnalysis {
    pub video_id: String,
    pub video_url: String,
    pub metadata: VideoMetadata,
    pub caption_text: String,
    pub sentiment: SentimentResult,
    pub bias: BiasVector,
}

/// The canonical, write-once analysis of one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysisRecord {
    pub video_id: String,
    pub video_url: String,
    pub title: String,
    pub channel_name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: u64,
    pub caption_text: String,
    pub sentiment: SentimentResult,
    pub bias: BiasVector,
    pub created_at: DateTime<Utc>,
}

impl VideoAnalysisRecord {
    /// Materialize a record from a new analysis with the given creation time.
    #[must_use]
    pub fn from_new(new: NewVideoAnalysis, created_at: DateTime<Utc>) -> Self {
        Self {
            video_id: new.video_id,
            video_url: new.video_url,
            title: new.metadata.title,
            channel_name: new.metadata.channel_name,
            published_at: new.metadata.published_at,
            view_count: new.metadata.view_count,
            caption_text: new.caption_text,
            sentiment: new.sentiment,
            bias: new.bias,
            created_at,
        }
    }
}
