//! Read-only channel views.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub(crate) fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// List every analyzed channel with its video count.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_channels(pool: &PgPool) -> anyhow::Result<()> {
    let channels = vidbias_db::list_channels(pool).await?;
    if channels.is_empty() {
        println!("no analyzed videos yet; run `vidbias analyze` first");
        return Ok(());
    }

    println!("{:<40}{:<8}LATEST", "CHANNEL", "VIDEOS");
    for channel in &channels {
        println!(
            "{:<40}{:<8}{}",
            channel.channel_name,
            channel.video_count,
            format_date(channel.latest_published_at)
        );
    }
    Ok(())
}

/// Show per-channel bias averages and the newest videos.
///
/// # Errors
///
/// Returns an error if a database query fails.
pub(crate) async fn run_channel(pool: &PgPool, name: &str, limit: i64) -> anyhow::Result<()> {
    let Some(summary) = vidbias_db::get_channel_bias_summary(pool, name).await? else {
        println!("no analyzed videos for channel '{name}'");
        return Ok(());
    };

    println!("channel: {} ({} videos)", summary.channel_name, summary.video_count);
    println!(
        "average ideology: left {:.1}%  center {:.1}%  right {:.1}%",
        summary.left_avg, summary.center_avg, summary.right_avg
    );
    println!(
        "average language: biased {:.1}%  neutral {:.1}%",
        summary.biased_avg, summary.neutral_avg
    );
    println!();

    let videos = vidbias_db::list_video_analyses_by_channel(pool, name, limit.max(1)).await?;
    println!("{:<14}{:<12}{:<12}TITLE", "VIDEO", "PUBLISHED", "SENTIMENT");
    for video in &videos {
        println!(
            "{:<14}{:<12}{:<12}{}",
            video.video_id,
            format_date(video.published_at),
            video.sentiment_label,
            video.video_title
        );
    }
    Ok(())
}
