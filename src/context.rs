use chrono::Utc;

use crate::ai::{GeminiClient, ReportGenerator, Summarizer};
use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::feed::ChannelFeedFetcher;
use crate::ingest::{extract_video_id, ChannelRefresher, Ingestor};
use crate::models::{Report, Video};
use crate::services::{TranscriptFetcher, YouTubeClient};

/// Everything a command needs, built once from the config and passed around.
///
/// YouTube-backed pieces are absent when no YouTube key is configured.
#[derive(Clone)]
pub struct AppContext {
    pub repository: Repository,
    youtube: Option<YouTubeClient>,
    ingestor: Option<Ingestor>,
    refresher: Option<ChannelRefresher>,
    reports: Option<ReportGenerator>,
}

impl AppContext {
    pub async fn new(config: &Config) -> Result<Self> {
        let repository = Repository::new(&config.db_path).await?;

        let gemini = config
            .gemini_api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| {
                GeminiClient::new(
                    key.clone(),
                    config.gemini_model.clone(),
                    config.gemini_api_url.clone(),
                )
            });
        let summarizer = Summarizer::new(gemini.clone(), config.summary_language.clone());
        if !summarizer.is_enabled() {
            tracing::warn!("No Gemini API key configured, summaries fall back to descriptions");
        }

        let youtube = config
            .youtube_api_key()
            .ok()
            .map(|key| YouTubeClient::new(key.to_string(), config.youtube_api_url.clone()));

        let ingestor = youtube.as_ref().map(|youtube| {
            Ingestor::new(youtube.clone(), summarizer, repository.clone())
        });

        let refresher = ingestor.as_ref().map(|ingestor| {
            ChannelRefresher::new(
                ChannelFeedFetcher::new(config.channel_feed_url.clone()),
                ingestor.clone(),
                repository.clone(),
                config.max_videos_per_channel,
            )
        });

        let transcripts = if config.transcript_languages.is_empty() {
            None
        } else {
            match TranscriptFetcher::new(config.transcript_languages.clone()) {
                Ok(fetcher) => Some(fetcher),
                Err(e) => {
                    tracing::warn!("Transcripts unavailable, reports use descriptions: {}", e);
                    None
                }
            }
        };

        let reports = youtube.as_ref().map(|youtube| {
            ReportGenerator::new(
                youtube.clone(),
                transcripts,
                gemini,
                config.summary_language.clone(),
            )
        });

        Ok(Self {
            repository,
            youtube,
            ingestor,
            refresher,
            reports,
        })
    }

    pub fn youtube(&self) -> Result<&YouTubeClient> {
        self.youtube.as_ref().ok_or_else(missing_youtube_key)
    }

    pub fn ingestor(&self) -> Result<&Ingestor> {
        self.ingestor.as_ref().ok_or_else(missing_youtube_key)
    }

    pub fn refresher(&self) -> Result<&ChannelRefresher> {
        self.refresher.as_ref().ok_or_else(missing_youtube_key)
    }

    pub fn reports(&self) -> Result<&ReportGenerator> {
        self.reports.as_ref().ok_or_else(missing_youtube_key)
    }

    /// Returns the cached report, generating and caching one when needed.
    pub async fn report_for(&self, video: &Video, regenerate: bool) -> Result<Report> {
        if !regenerate {
            if let Some(report) = self.repository.get_report(video.id).await? {
                return Ok(report);
            }
        }

        let generator = self.reports()?;
        let video_id = extract_video_id(&video.url)
            .ok_or_else(|| AppError::InvalidInput(format!("No video ID in {}", video.url)))?;

        let content = generator.generate(&video_id).await?;
        let model = generator.model_version().unwrap_or_default().to_string();
        self.repository
            .save_report(video.id, content.clone(), model.clone())
            .await?;

        Ok(Report {
            id: 0,
            video_id: video.id,
            content,
            model_version: model,
            generated_at: Utc::now(),
        })
    }
}

fn missing_youtube_key() -> AppError {
    AppError::Config(format!(
        "YouTube API key not configured (set youtube_api_key in {} or export YOUTUBE_API_KEY)",
        Config::config_path().display()
    ))
}
