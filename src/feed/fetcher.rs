use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;

use crate::error::Result;
use crate::ingest::extract_video_id;

/// One upload listed in a channel's Atom feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedVideo {
    pub video_id: String,
    pub title: String,
}

#[derive(Clone)]
pub struct ChannelFeedFetcher {
    client: Client,
    base_url: String,
}

impl ChannelFeedFetcher {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("video-curator/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Newest uploads first, at most `limit` of them.
    pub async fn recent_videos(&self, channel_id: &str, limit: usize) -> Result<Vec<FeedVideo>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("channel_id", channel_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch channel feed: HTTP {}",
                response.status()
            )
            .into());
        }

        let bytes = response.bytes().await?;
        let feed = parser::parse(&bytes[..])?;

        let mut entries = feed.entries;
        entries.sort_by(|a, b| b.published.cmp(&a.published));

        let videos = entries
            .into_iter()
            .filter_map(|entry| {
                // YouTube ids look like "yt:video:<id>"; fall back to the watch link
                let video_id = entry
                    .id
                    .strip_prefix("yt:video:")
                    .map(str::to_string)
                    .or_else(|| {
                        entry
                            .links
                            .iter()
                            .find_map(|link| extract_video_id(&link.href))
                    })?;
                Some(FeedVideo {
                    video_id,
                    title: entry
                        .title
                        .map(|t| t.content)
                        .unwrap_or_else(|| "Untitled".to_string()),
                })
            })
            .take(limit)
            .collect();

        Ok(videos)
    }
}
