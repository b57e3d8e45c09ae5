use std::sync::Arc;

use yt_transcript_rs::api::YouTubeTranscriptApi;

use crate::error::{AppError, Result};

/// Caption text for a video, tried in the configured language order.
#[derive(Clone)]
pub struct TranscriptFetcher {
    api: Arc<YouTubeTranscriptApi>,
    languages: Vec<String>,
}

impl TranscriptFetcher {
    pub fn new(languages: Vec<String>) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None).map_err(|e| {
            AppError::Other(anyhow::anyhow!("Failed to create transcript client: {e}"))
        })?;

        Ok(Self {
            api: Arc::new(api),
            languages,
        })
    }

    /// `None` when the video has no usable captions in any configured language.
    pub async fn fetch(&self, video_id: &str) -> Option<String> {
        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        match self.api.fetch_transcript(video_id, &languages, false).await {
            Ok(transcript) => {
                let text = join_snippets(transcript.into_iter().map(|snippet| snippet.text));
                if text.is_empty() {
                    None
                } else {
                    tracing::info!("Fetched transcript for {} ({} chars)", video_id, text.len());
                    Some(text)
                }
            }
            Err(e) => {
                tracing::info!("No transcript for {}: {}", video_id, e);
                None
            }
        }
    }
}

/// Caption snippets joined into one line of text, whitespace collapsed.
fn join_snippets(snippets: impl IntoIterator<Item = String>) -> String {
    snippets
        .into_iter()
        .flat_map(|snippet| {
            snippet
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
