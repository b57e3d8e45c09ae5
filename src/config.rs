use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

pub const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_CHANNEL_FEED_URL: &str = "https://www.youtube.com/feeds/videos.xml";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    pub youtube_api_key: Option<String>,
    pub gemini_api_key: Option<String>,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Language the AI summaries and reports are written in.
    #[serde(default = "default_summary_language")]
    pub summary_language: String,

    /// Caption languages tried, in order, when building a report.
    /// An empty list turns transcripts off and reports use the description.
    #[serde(default = "default_transcript_languages")]
    pub transcript_languages: Vec<String>,

    #[serde(default = "default_max_videos_per_channel")]
    pub max_videos_per_channel: usize,

    #[serde(default = "default_youtube_api_url")]
    pub youtube_api_url: String,

    #[serde(default = "default_channel_feed_url")]
    pub channel_feed_url: String,

    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("video-curator");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("videos.db").to_string_lossy().to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_summary_language() -> String {
    "Japanese".to_string()
}

fn default_transcript_languages() -> Vec<String> {
    vec!["ja".to_string(), "en".to_string()]
}

fn default_max_videos_per_channel() -> usize {
    5
}

fn default_youtube_api_url() -> String {
    DEFAULT_YOUTUBE_API_URL.to_string()
}

fn default_channel_feed_url() -> String {
    DEFAULT_CHANNEL_FEED_URL.to_string()
}

fn default_gemini_api_url() -> String {
    DEFAULT_GEMINI_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            youtube_api_key: None,
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            summary_language: default_summary_language(),
            transcript_languages: default_transcript_languages(),
            max_videos_per_channel: default_max_videos_per_channel(),
            youtube_api_url: default_youtube_api_url(),
            channel_feed_url: default_channel_feed_url(),
            gemini_api_url: default_gemini_api_url(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        config.apply_env();
        Ok(config)
    }

    /// Environment variables win over the config file so keys can stay out of it.
    fn apply_env(&mut self) {
        if let Some(key) = non_empty_env("YOUTUBE_API_KEY") {
            self.youtube_api_key = Some(key);
        }
        if let Some(key) = non_empty_env("GEMINI_API_KEY") {
            self.gemini_api_key = Some(key);
        }
        if let Some(model) = non_empty_env("GEMINI_MODEL") {
            self.gemini_model = model;
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("video-curator")
            .join("config.toml")
    }

    pub fn youtube_api_key(&self) -> Result<&str> {
        self.youtube_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::Config(format!(
                    "youtube_api_key is not set (add it to {} or export YOUTUBE_API_KEY)",
                    Self::config_path().display()
                ))
            })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
