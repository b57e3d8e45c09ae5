//! Video ingestion: fetch metadata, derive duration/score/summary/tag, insert.
//!
//! A run is one sequential pass and stops at the first hard failure
//! (invalid input, video not found, YouTube error, storage error). AI
//! trouble never stops a run; the summarizer degrades to the description.

mod channels;
mod duration;
mod score;
mod tagging;
mod video_id;

pub use channels::{register_channel, ChannelRefresher, RefreshReport};
pub use duration::parse_duration;
pub use score::recency_score;
pub use tagging::tag_for;
pub use video_id::{extract_video_id, watch_url};

use chrono::{DateTime, Utc};

use crate::ai::Summarizer;
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{KeywordKind, NewVideo, Video};
use crate::services::YouTubeClient;

#[derive(Clone)]
pub struct Ingestor {
    youtube: YouTubeClient,
    summarizer: Summarizer,
    repository: Repository,
}

impl Ingestor {
    pub fn new(youtube: YouTubeClient, summarizer: Summarizer, repository: Repository) -> Self {
        Self {
            youtube,
            summarizer,
            repository,
        }
    }

    /// Accepts any supported YouTube URL shape or a bare video id.
    pub async fn ingest_url(&self, input: &str) -> Result<Video> {
        let video_id = extract_video_id(input).ok_or_else(|| {
            AppError::InvalidInput(format!("Not a YouTube video URL or ID: {:?}", input.trim()))
        })?;
        self.ingest_video_id(&video_id).await
    }

    pub async fn ingest_video_id(&self, video_id: &str) -> Result<Video> {
        self.ingest_at(video_id, Utc::now()).await
    }

    /// Runs the pipeline with `now` as the reference time for the score.
    pub async fn ingest_at(&self, video_id: &str, now: DateTime<Utc>) -> Result<Video> {
        let details = self.youtube.fetch_video(video_id).await?;

        let published_at = details.published_at.ok_or_else(|| {
            AppError::YouTubeApi(format!("Video {video_id} has no publish date"))
        })?;
        let duration_sec = Some(parse_duration(&details.duration)).filter(|secs| *secs > 0);
        let score = recency_score(details.view_count, published_at, now);
        let summary = self
            .summarizer
            .summarize(&details.description, &details.title)
            .await;

        let keywords = self
            .repository
            .get_keywords_by_kind(KeywordKind::Include)
            .await?;
        let tag = tag_for(&keywords, &details.title, &details.description);

        let new_video = NewVideo {
            title: details.title,
            url: watch_url(&details.id),
            thumbnail_url: details.thumbnail_url,
            summary: Some(summary.summary),
            published_at,
            importance: summary.importance,
            tag,
            channel_title: details.channel_title,
            channel_id: details.channel_id,
            duration_sec,
            score: Some(score),
        };

        let id = self.repository.insert_video(new_video.clone()).await?;
        tracing::info!("Ingested {:?} as #{} (score {})", new_video.title, id, score);

        Ok(new_video.into_video(id, now))
    }
}
