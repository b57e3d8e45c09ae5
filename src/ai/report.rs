use crate::error::{AppError, Result};
use crate::services::{TranscriptFetcher, YouTubeClient};

use super::gemini::{truncate_chars, GeminiClient, ResponseFormat};

const MAX_TRANSCRIPT_CHARS: usize = 50_000;
const MAX_DESCRIPTION_CHARS: usize = 15_000;

/// Text a report is written from. Captions win over the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSource {
    Transcript(String),
    Description(String),
}

impl ReportSource {
    /// `None` when neither source has any text.
    pub fn select(transcript: Option<String>, description: &str) -> Option<Self> {
        match transcript.filter(|t| !t.trim().is_empty()) {
            Some(transcript) => Some(ReportSource::Transcript(transcript)),
            None if !description.trim().is_empty() => {
                Some(ReportSource::Description(description.to_string()))
            }
            None => None,
        }
    }

    pub fn prompt(&self, language: &str, title: &str) -> String {
        match self {
            ReportSource::Transcript(text) => format!(
                r#"Write a very detailed, comprehensive report in {language} based on the transcript of the following YouTube video.

Requirements:
- Leave nothing out: keep every important argument, number, technical term and piece of code logic.
- Follow the flow of the video. Split it into sections and explain each part in depth; length is not a concern.
- Structure:
  - Introduction: background and purpose of the video
  - Details: the main part, one markdown heading (##) per topic
  - Conclusion: recap of the key points

Title: {title}

Transcript:
{text}"#,
                text = truncate_chars(text, MAX_TRANSCRIPT_CHARS),
            ),
            ReportSource::Description(text) => format!(
                r#"Write a report in {language}, as detailed as possible, about the following YouTube video, based on its description.
No transcript is available, so make the most of the description.

Requirements:
- Structure the content with markdown headings (##) and bullet points.
- Keep concrete details such as tool names, versions, numbers and steps.
- End with a short "Key takeaways" section.

Title: {title}

Description:
{text}"#,
                text = truncate_chars(text, MAX_DESCRIPTION_CHARS),
            ),
        }
    }
}

/// Long-form markdown reports built from a video's captions or description.
///
/// Unlike [`super::Summarizer`], failures here are reported to the caller.
#[derive(Clone)]
pub struct ReportGenerator {
    youtube: YouTubeClient,
    transcripts: Option<TranscriptFetcher>,
    gemini: Option<GeminiClient>,
    language: String,
}

impl ReportGenerator {
    pub fn new(
        youtube: YouTubeClient,
        transcripts: Option<TranscriptFetcher>,
        gemini: Option<GeminiClient>,
        language: String,
    ) -> Self {
        Self {
            youtube,
            transcripts,
            gemini,
            language,
        }
    }

    pub async fn generate(&self, video_id: &str) -> Result<String> {
        if video_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Invalid video ID".to_string()));
        }

        let details = self.youtube.fetch_video(video_id).await?;
        let transcript = match &self.transcripts {
            Some(transcripts) => transcripts.fetch(video_id).await,
            None => None,
        };

        self.generate_from(video_id, &details.title, transcript, &details.description)
            .await
    }

    async fn generate_from(
        &self,
        video_id: &str,
        title: &str,
        transcript: Option<String>,
        description: &str,
    ) -> Result<String> {
        let source = ReportSource::select(transcript, description).ok_or_else(|| {
            AppError::NotFound(format!(
                "No transcript or description available for {video_id}"
            ))
        })?;

        let Some(gemini) = &self.gemini else {
            return Err(AppError::Config("Gemini API key is missing".to_string()));
        };

        let prompt = source.prompt(&self.language, title);
        let markdown = gemini.generate(&prompt, ResponseFormat::Text).await?;
        tracing::info!("Generated report for {} ({} chars)", video_id, markdown.len());
        Ok(markdown)
    }

    pub fn model_version(&self) -> Option<&str> {
        self.gemini.as_ref().map(|g| g.model_version())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Route, StubServer};

    fn video_json(description: &str) -> String {
        serde_json::json!({
            "items": [{
                "id": "abcdefghijk",
                "snippet": {"title": "Tokio internals", "description": description, "publishedAt": "2026-01-01T00:00:00Z"},
                "contentDetails": {"duration": "PT20M"},
                "statistics": {"viewCount": "10"}
            }]
        })
        .to_string()
    }

    fn candidate(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn generates_markdown_from_description() {
        let server = StubServer::start(vec![
            Route::json("/videos", 200, video_json("How the scheduler works")),
            Route::json(":generateContent", 200, candidate("## Overview\n- scheduler")),
        ])
        .await;
        let youtube = YouTubeClient::new("yt".into(), server.base_url.clone());
        let gemini = GeminiClient::new("g".into(), "gemini-2.5-flash".into(), server.base_url.clone());
        let generator = ReportGenerator::new(youtube, None, Some(gemini), "English".into());

        let markdown = generator.generate("abcdefghijk").await.unwrap();
        assert_eq!(markdown, "## Overview\n- scheduler");
        assert_eq!(generator.model_version(), Some("gemini-2.5-flash"));

        let requests = server.requests();
        let prompt_body = &requests.iter().find(|r| r.target.contains("generateContent")).unwrap().body;
        assert!(prompt_body.contains("Tokio internals"));
        assert!(prompt_body.contains("How the scheduler works"));
    }

    #[tokio::test]
    async fn missing_gemini_key_is_an_error() {
        let server =
            StubServer::start(vec![Route::json("/videos", 200, video_json("Some text"))]).await;
        let youtube = YouTubeClient::new("yt".into(), server.base_url.clone());
        let generator = ReportGenerator::new(youtube, None, None, "English".into());

        assert!(matches!(
            generator.generate("abcdefghijk").await,
            Err(AppError::Config(_))
        ));
    }

    #[tokio::test]
    async fn empty_description_is_not_found() {
        let server = StubServer::start(vec![Route::json("/videos", 200, video_json("  "))]).await;
        let youtube = YouTubeClient::new("yt".into(), server.base_url.clone());
        let gemini = GeminiClient::new("g".into(), "m".into(), server.base_url.clone());
        let generator = ReportGenerator::new(youtube, None, Some(gemini), "English".into());

        assert!(matches!(
            generator.generate("abcdefghijk").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn gemini_failure_is_reported() {
        let server = StubServer::start(vec![
            Route::json("/videos", 200, video_json("Some text")),
            Route::json(":generateContent", 503, "overloaded".into()),
        ])
        .await;
        let youtube = YouTubeClient::new("yt".into(), server.base_url.clone());
        let gemini = GeminiClient::new("g".into(), "m".into(), server.base_url.clone());
        let generator = ReportGenerator::new(youtube, None, Some(gemini), "English".into());

        assert!(matches!(
            generator.generate("abcdefghijk").await,
            Err(AppError::GeminiApi(_))
        ));
    }

    #[test]
    fn transcript_is_preferred_over_description() {
        assert_eq!(
            ReportSource::select(Some("captions".into()), "desc"),
            Some(ReportSource::Transcript("captions".into()))
        );
        assert_eq!(
            ReportSource::select(Some("  ".into()), "desc"),
            Some(ReportSource::Description("desc".into()))
        );
        assert_eq!(
            ReportSource::select(None, "desc"),
            Some(ReportSource::Description("desc".into()))
        );
        assert_eq!(ReportSource::select(None, " \n"), None);
    }

    #[test]
    fn each_source_has_its_own_limit() {
        let long = "@".repeat(60_000);

        let prompt = ReportSource::Transcript(long.clone()).prompt("English", "T");
        assert!(prompt.contains("Transcript:"));
        assert_eq!(prompt.matches('@').count(), 50_000);

        let prompt = ReportSource::Description(long).prompt("English", "T");
        assert!(prompt.contains("No transcript is available"));
        assert_eq!(prompt.matches('@').count(), 15_000);
    }

    #[tokio::test]
    async fn builds_report_from_transcript_when_available() {
        let server = StubServer::start(vec![Route::json(
            ":generateContent",
            200,
            candidate("## Introduction"),
        )])
        .await;
        let youtube = YouTubeClient::new("yt".into(), server.base_url.clone());
        let gemini = GeminiClient::new("g".into(), "m".into(), server.base_url.clone());
        let generator = ReportGenerator::new(youtube, None, Some(gemini), "English".into());

        let markdown = generator
            .generate_from(
                "abcdefghijk",
                "Tokio internals",
                Some("today we look at the work stealing scheduler".into()),
                "short description",
            )
            .await
            .unwrap();
        assert_eq!(markdown, "## Introduction");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].body.contains("work stealing scheduler"));
        assert!(requests[0].body.contains("Transcript:"));
        assert!(!requests[0].body.contains("short description"));
    }

    #[tokio::test]
    async fn falls_back_to_description_without_transcript() {
        let server = StubServer::start(vec![Route::json(
            ":generateContent",
            200,
            candidate("## Overview"),
        )])
        .await;
        let youtube = YouTubeClient::new("yt".into(), server.base_url.clone());
        let gemini = GeminiClient::new("g".into(), "m".into(), server.base_url.clone());
        let generator = ReportGenerator::new(youtube, None, Some(gemini), "English".into());

        generator
            .generate_from("abcdefghijk", "Tokio internals", None, "short description")
            .await
            .unwrap();

        let body = &server.requests()[0].body;
        assert!(body.contains("short description"));
        assert!(body.contains("No transcript is available"));
    }

    #[tokio::test]
    async fn blank_id_is_rejected_without_requests() {
        let server = StubServer::start(vec![]).await;
        let youtube = YouTubeClient::new("yt".into(), server.base_url.clone());
        let generator = ReportGenerator::new(youtube, None, None, "English".into());

        assert!(matches!(
            generator.generate(" ").await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(server.requests().is_empty());
    }
}
