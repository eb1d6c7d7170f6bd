//! Database operations for the `video_analyses` table.
//!
//! Rows are written once per `video_id` and never updated; the unique index on
//! `video_id` is the only uniqueness constraint on the table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{is_unique_violation, DbError};

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `video_analyses` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct VideoAnalysisRow {
    pub id: i64,
    pub video_id: String,
    pub video_url: String,
    pub video_title: String,
    pub channel_name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub caption_text: String,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub bias_left: f64,
    pub bias_center: f64,
    pub bias_right: f64,
    pub bias_biased: f64,
    pub bias_neutral: f64,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`insert_video_analysis`].
#[derive(Debug, Clone, Copy)]
pub struct NewVideoAnalysisRow<'a> {
    pub video_id: &'a str,
    pub video_url: &'a str,
    pub video_title: &'a str,
    pub channel_name: &'a str,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub caption_text: &'a str,
    pub sentiment_label: &'a str,
    pub sentiment_score: f64,
    pub bias_left: f64,
    pub bias_center: f64,
    pub bias_right: f64,
    pub bias_biased: f64,
    pub bias_neutral: f64,
}

/// One distinct channel with the number of analysed videos.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChannelRow {
    pub channel_name: String,
    pub video_count: i64,
    pub latest_published_at: Option<DateTime<Utc>>,
}

/// Mean bias components for a channel, expressed as percentages.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChannelBiasSummaryRow {
    pub channel_name: String,
    pub video_count: i64,
    pub left_avg: f64,
    pub center_avg: f64,
    pub right_avg: f64,
    pub biased_avg: f64,
    pub neutral_avg: f64,
}

const SELECT_COLUMNS: &str = "SELECT id, video_id, video_url, video_title, channel_name, \
        published_at, view_count, caption_text, sentiment_label, sentiment_score, \
        bias_left, bias_center, bias_right, bias_biased, bias_neutral, created_at \
     FROM video_analyses";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the stored analysis for a video, or `None` if it has not been analysed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_video_analysis_by_video_id(
    pool: &PgPool,
    video_id: &str,
) -> Result<Option<VideoAnalysisRow>, DbError> {
    let row = sqlx::query_as::<_, VideoAnalysisRow>(&format!(
        "{SELECT_COLUMNS} WHERE video_id = $1"
    ))
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Insert a new analysis and return the stored row.
///
/// No `ON CONFLICT` clause: a second writer for the same `video_id` observes
/// the conflict instead of overwriting.
///
/// # Errors
///
/// Returns [`DbError::DuplicateKey`] if a row for `video_id` already exists,
/// or [`DbError::Sqlx`] for any other failure.
pub async fn insert_video_analysis(
    pool: &PgPool,
    new: NewVideoAnalysisRow<'_>,
) -> Result<VideoAnalysisRow, DbError> {
    let result = sqlx::query_as::<_, VideoAnalysisRow>(
        "INSERT INTO video_analyses \
             (video_id, video_url, video_title, channel_name, published_at, view_count, \
              caption_text, sentiment_label, sentiment_score, \
              bias_left, bias_center, bias_right, bias_biased, bias_neutral) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         RETURNING id, video_id, video_url, video_title, channel_name, published_at, \
                   view_count, caption_text, sentiment_label, sentiment_score, \
                   bias_left, bias_center, bias_right, bias_biased, bias_neutral, created_at",
    )
    .bind(new.video_id)
    .bind(new.video_url)
    .bind(new.video_title)
    .bind(new.channel_name)
    .bind(new.published_at)
    .bind(new.view_count)
    .bind(new.caption_text)
    .bind(new.sentiment_label)
    .bind(new.sentiment_score)
    .bind(new.bias_left)
    .bind(new.bias_center)
    .bind(new.bias_right)
    .bind(new.bias_biased)
    .bind(new.bias_neutral)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => Ok(row),
        Err(e) if is_unique_violation(&e) => Err(DbError::DuplicateKey {
            video_id: new.video_id.to_string(),
        }),
        Err(e) => Err(DbError::Sqlx(e)),
    }
}

/// Lists distinct channels with their analysed-video counts, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_channels(pool: &PgPool) -> Result<Vec<ChannelRow>, DbError> {
    let rows = sqlx::query_as::<_, ChannelRow>(
        "SELECT channel_name, COUNT(*) AS video_count, MAX(published_at) AS latest_published_at \
         FROM video_analyses \
         GROUP BY channel_name \
         ORDER BY channel_name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Lists analyses for one channel, newest publication first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_video_analyses_by_channel(
    pool: &PgPool,
    channel_name: &str,
    limit: i64,
) -> Result<Vec<VideoAnalysisRow>, DbError> {
    let rows = sqlx::query_as::<_, VideoAnalysisRow>(&format!(
        "{SELECT_COLUMNS} WHERE channel_name = $1 \
         ORDER BY published_at DESC NULLS LAST, id DESC \
         LIMIT $2"
    ))
    .bind(channel_name)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the per-channel mean of every bias component as a percentage, or
/// `None` if the channel has no analyses.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_channel_bias_summary(
    pool: &PgPool,
    channel_name: &str,
) -> Result<Option<ChannelBiasSummaryRow>, DbError> {
    let row = sqlx::query_as::<_, ChannelBiasSummaryRow>(
        "SELECT channel_name, \
                COUNT(*) AS video_count, \
                AVG(bias_left) * 100 AS left_avg, \
                AVG(bias_center) * 100 AS center_avg, \
                AVG(bias_right) * 100 AS right_avg, \
                AVG(bias_biased) * 100 AS biased_avg, \
                AVG(bias_neutral) * 100 AS neutral_avg \
         FROM video_analyses \
         WHERE channel_name = $1 \
         GROUP BY channel_name",
    )
    .bind(channel_name)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
