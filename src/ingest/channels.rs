use chrono::Utc;

use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::feed::ChannelFeedFetcher;
use crate::models::{Channel, NewChannel};
use crate::services::YouTubeClient;

use super::{watch_url, Ingestor};

/// Verifies the channel with YouTube, then stores it under its YouTube title.
pub async fn register_channel(
    youtube: &YouTubeClient,
    repository: &Repository,
    channel_id: &str,
) -> Result<Channel> {
    let channel_id = channel_id.trim();
    if channel_id.is_empty() {
        return Err(AppError::InvalidInput("Channel ID is required".to_string()));
    }

    // Store the id YouTube reports back, not the user's spelling of it
    let info = youtube.fetch_channel(channel_id).await?;
    let id = repository
        .insert_channel(NewChannel {
            channel_id: info.channel_id.clone(),
            name: info.title.clone(),
        })
        .await?;

    tracing::info!("Registered channel {} ({})", info.title, info.channel_id);
    Ok(Channel {
        id,
        channel_id: info.channel_id,
        name: info.title,
        created_at: Utc::now(),
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub ingested: usize,
    pub skipped: usize,
    /// Videos that failed to ingest plus channels whose feed couldn't be read.
    pub failed: usize,
}

/// Pulls recent uploads of every registered channel through the pipeline.
#[derive(Clone)]
pub struct ChannelRefresher {
    feeds: ChannelFeedFetcher,
    ingestor: Ingestor,
    repository: Repository,
    max_per_channel: usize,
}

impl ChannelRefresher {
    pub fn new(
        feeds: ChannelFeedFetcher,
        ingestor: Ingestor,
        repository: Repository,
        max_per_channel: usize,
    ) -> Self {
        Self {
            feeds,
            ingestor,
            repository,
            max_per_channel,
        }
    }

    /// Channels and their videos are handled one at a time.
    pub async fn refresh_all(&self) -> Result<RefreshReport> {
        let channels = self.repository.get_all_channels().await?;
        let mut report = RefreshReport::default();

        for channel in &channels {
            if let Err(e) = self.refresh_channel(channel, &mut report).await {
                tracing::warn!("Failed to refresh channel {}: {}", channel.name, e);
                report.failed += 1;
            }
        }

        tracing::info!(
            "Refreshed {} channels: {} ingested, {} skipped, {} failed",
            channels.len(),
            report.ingested,
            report.skipped,
            report.failed
        );
        Ok(report)
    }

    async fn refresh_channel(&self, channel: &Channel, report: &mut RefreshReport) -> Result<()> {
        let videos = self
            .feeds
            .recent_videos(&channel.channel_id, self.max_per_channel)
            .await?;

        for video in videos {
            if self
                .repository
                .video_url_exists(&watch_url(&video.video_id))
                .await?
            {
                report.skipped += 1;
                continue;
            }

            match self.ingestor.ingest_video_id(&video.video_id).await {
                Ok(_) => report.ingested += 1,
                // lost a race with another ingest of the same video
                Err(e) if e.is_duplicate() => report.skipped += 1,
                Err(e) if e.is_upstream() => {
                    tracing::warn!("Failed to fetch {} ({}): {}", video.video_id, video.title, e);
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to ingest {} ({}): {}", video.video_id, video.title, e);
                    report.failed += 1;
                }
            }
        }
        Ok(())
    }
}
