use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub summary: Option<String>,
    pub published_at: DateTime<Utc>,
    pub importance: i64,
    pub tag: Option<String>,
    pub channel_title: Option<String>,
    pub channel_id: Option<String>,
    pub is_saved: bool,
    pub duration_sec: Option<i64>,
    pub score: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Video {
    /// `h:mm:ss` or `m:ss`, empty when the duration is unknown.
    pub fn duration_label(&self) -> String {
        match self.duration_sec {
            Some(total) if total > 0 => {
                let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
                if h > 0 {
                    format!("{h}:{m:02}:{s:02}")
                } else {
                    format!("{m}:{s:02}")
                }
            }
            _ => String::new(),
        }
    }
}

/// A fully assembled record, ready for insertion.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub summary: Option<String>,
    pub published_at: DateTime<Utc>,
    pub importance: i64,
    pub tag: Option<String>,
    pub channel_title: Option<String>,
    pub channel_id: Option<String>,
    pub duration_sec: Option<i64>,
    pub score: Option<i64>,
}

impl NewVideo {
    /// The record as stored right after insertion.
    pub fn into_video(self, id: i64, created_at: DateTime<Utc>) -> Video {
        Video {
            id,
            title: self.title,
            url: self.url,
            thumbnail_url: self.thumbnail_url,
            summary: self.summary,
            published_at: self.published_at,
            importance: self.importance,
            tag: self.tag,
            channel_title: self.channel_title,
            channel_id: self.channel_id,
            is_saved: false,
            duration_sec: self.duration_sec,
            score: self.score,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoFilter {
    #[default]
    All,
    Saved,
}

impl VideoFilter {
    pub fn cycle(&self) -> Self {
        match self {
            VideoFilter::All => VideoFilter::Saved,
            VideoFilter::Saved => VideoFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoFilter::All => "All",
            VideoFilter::Saved => "Saved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Importance,
}

impl SortOrder {
    pub fn toggle(&self) -> Self {
        match self {
            SortOrder::Newest => SortOrder::Importance,
            SortOrder::Importance => SortOrder::Newest,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Importance => "importance",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VideoQuery {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Inclusive, by publish date (UTC).
    pub start_date: Option<NaiveDate>,
    /// Inclusive, by publish date (UTC).
    pub end_date: Option<NaiveDate>,
    pub filter: VideoFilter,
    pub sort: SortOrder,
}
