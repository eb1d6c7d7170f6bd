use async_trait::async_trait;
use sqlx::PgPool;
use vidbias_core::{BiasVector, SentimentLabel, SentimentResult};
use vidbias_db::{NewVideoAnalysisRow, VideoAnalysisRow};

use super::{AnalysisStore, Lookup};
use crate::error::StoreError;
use crate::identify::VideoId;
use crate::types::{NewVideoAnalysis, VideoAnalysisRecord};

/// Store backed by the `video_analyses` table.
#[derive(Debug, Clone)]
pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn lookup(&self, video_id: &VideoId) -> Result<Lookup, StoreError> {
        let row = vidbias_db::get_video_analysis_by_video_id(&self.pool, video_id.as_str()).await?;
        Ok(row.map_or(Lookup::Missing, |row| Lookup::Found(row.into())))
    }

    async fn insert(&self, analysis: NewVideoAnalysis) -> Result<VideoAnalysisRecord, StoreError> {
        let row = vidbias_db::insert_video_analysis(
            &self.pool,
            NewVideoAnalysisRow {
                video_id: &analysis.video_id,
                video_url: &analysis.video_url,
                video_title: &analysis.metadata.title,
                channel_name: &analysis.metadata.channel_name,
                published_at: analysis.metadata.published_at,
                view_count: i64::try_from(analysis.metadata.view_count).unwrap_or(i64::MAX),
                caption_text: &analysis.caption_text,
                sentiment_label: analysis.sentiment.label.as_str(),
                sentiment_score: analysis.sentiment.confidence,
                bias_left: analysis.bias.left,
                bias_center: analysis.bias.center,
                bias_right: analysis.bias.right,
                bias_biased: analysis.bias.biased,
                bias_neutral: analysis.bias.neutral,
            },
        )
        .await?;

        Ok(row.into())
    }
}

impl From<VideoAnalysisRow> for VideoAnalysisRecord {
    fn from(row: VideoAnalysisRow) -> Self {
        Self {
            video_id: row.video_id,
            video_url: row.video_url,
            title: row.video_title,
            channel_name: row.channel_name,
            published_at: row.published_at,
            view_count: u64::try_from(row.view_count).unwrap_or(0),
            caption_text: row.caption_text,
            sentiment: SentimentResult {
                label: SentimentLabel::from_stored(&row.sentiment_label),
                confidence: row.sentiment_score,
            },
            bias: BiasVector {
                left: row.bias_left,
                center: row.bias_center,
                right: row.bias_right,
                biased: row.bias_biased,
                neutral: row.bias_neutral,
            },
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn row_converts_to_record() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let row = VideoAnalysisRow {
            id: 7,
            video_id: "dQw4w9WgXcQ".to_string(),
            video_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            video_title: "Budget debate".to_string(),
            channel_name: "Civic Desk".to_string(),
            published_at: None,
            view_count: 42,
            caption_text: "text".to_string(),
            sentiment_label: "NEGATIVE".to_string(),
            sentiment_score: 0.8,
            bias_left: 0.1,
            bias_center: 0.2,
            bias_right: 0.7,
            bias_biased: 0.6,
            bias_neutral: 0.4,
            created_at,
        };

        let record = VideoAnalysisRecord::from(row);
        assert_eq!(record.title, "Budget debate");
        assert_eq!(record.view_count, 42);
        assert_eq!(record.sentiment.label, SentimentLabel::Negative);
        assert!((record.bias.right - 0.7).abs() < f64::EPSILON);
        assert_eq!(record.created_at, created_at);
    }

    #[test]
    fn unknown_stored_label_reads_as_unknown() {
        let row = VideoAnalysisRow {
            id: 1,
            video_id: "x".repeat(11),
            video_url: String::new(),
            video_title: String::new(),
            channel_name: String::new(),
            published_at: None,
            view_count: -1,
            caption_text: String::new(),
            sentiment_label: "MIXED".to_string(),
            sentiment_score: 0.0,
            bias_left: 0.0,
            bias_center: 1.0,
            bias_right: 0.0,
            bias_biased: 0.0,
            bias_neutral: 1.0,
            created_at: Utc::now(),
        };
        let record = VideoAnalysisRecord::from(row);
        assert_eq!(record.sentiment.label, SentimentLabel::Unknown);
        assert_eq!(record.view_count, 0);
    }
}
