use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    description: String,
    channel_id: Option<String>,
    channel_title: Option<String>,
    published_at: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    // The API encodes counters as strings
    view_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    maxres: Option<Thumbnail>,
    high: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl Thumbnails {
    /// maxres, then high, then default.
    fn best(self) -> Option<String> {
        self.maxres.or(self.high).or(self.default).map(|t| t.url)
    }
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    snippet: ChannelSnippet,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
}

/// Snippet, content details and statistics of one video.
#[derive(Debug, Clone)]
pub struct VideoDetails {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    /// Raw ISO-8601 duration, e.g. `PT10M30S`.
    pub duration: String,
    pub view_count: u64,
}

#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub channel_id: String,
    pub title: String,
}

#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("video-curator/1.0")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// One call to `videos` with the snippet, contentDetails and statistics parts.
    pub async fn fetch_video(&self, video_id: &str) -> Result<VideoDetails> {
        let response = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet,contentDetails,statistics"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let list: ListResponse<VideoItem> = ensure_success(response).await?.json().await?;
        let item = list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Video not found on YouTube: {video_id}")))?;

        let published_at = item
            .snippet
            .published_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(VideoDetails {
            id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            channel_id: item.snippet.channel_id,
            channel_title: item.snippet.channel_title,
            published_at,
            thumbnail_url: item.snippet.thumbnails.and_then(Thumbnails::best),
            duration: item
                .content_details
                .and_then(|cd| cd.duration)
                .unwrap_or_default(),
            view_count: item
                .statistics
                .and_then(|s| s.view_count)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        })
    }

    /// Looks a channel up by ID to confirm it exists and learn its title.
    pub async fn fetch_channel(&self, channel_id: &str) -> Result<ChannelInfo> {
        let response = self
            .client
            .get(format!("{}/channels", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("id", channel_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let list: ListResponse<ChannelItem> = ensure_success(response).await?.json().await?;
        list.items
            .into_iter()
            .next()
            .map(|item| ChannelInfo {
                channel_id: item.id,
                title: item.snippet.title,
            })
            .ok_or_else(|| AppError::NotFound(format!("Channel not found on YouTube: {channel_id}")))
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(AppError::YouTubeApi(format!("HTTP {status}: {error_text}")))
}
