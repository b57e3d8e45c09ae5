use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::Summary;

use super::gemini::{truncate_chars, GeminiClient, ResponseFormat};

const MAX_DESCRIPTION_CHARS: usize = 5000;

#[derive(Debug, Deserialize)]
struct RawSummary {
    summary: String,
    importance: Value,
}

/// Produces the short summary and 1-5 importance stored with each video.
///
/// Never fails: without a Gemini key, or when the request goes wrong in any
/// way, the raw description is kept and importance falls back to 5.
#[derive(Clone)]
pub struct Summarizer {
    gemini: Option<GeminiClient>,
    language: String,
}

impl Summarizer {
    pub fn new(gemini: Option<GeminiClient>, language: String) -> Self {
        Self { gemini, language }
    }

    pub fn is_enabled(&self) -> bool {
        self.gemini.is_some()
    }

    pub async fn summarize(&self, description: &str, title: &str) -> Summary {
        let Some(gemini) = &self.gemini else {
            return Summary::fallback(description);
        };

        match self.request_summary(gemini, description, title).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("AI summary failed for {:?}, keeping description: {}", title, e);
                Summary::fallback(description)
            }
        }
    }

    async fn request_summary(
        &self,
        gemini: &GeminiClient,
        description: &str,
        title: &str,
    ) -> Result<Summary> {
        let prompt = format!(
            r#"You curate a personal video news dashboard.
Summarize the following YouTube video and rate how important it is.

Respond with strict JSON only, no markdown: {{"summary": string, "importance": integer}}
- summary: written in {language}, at most 3 lines.
- importance: 1 (trivial) to 5 (must watch).

Title: {title}

Description:
{description}"#,
            language = self.language,
            title = title,
            description = truncate_chars(description, MAX_DESCRIPTION_CHARS),
        );

        let text = gemini.generate(&prompt, ResponseFormat::Json).await?;
        parse_summary(&text)
    }
}

/// Parses the model's JSON reply, tolerating code fences and string ratings.
fn parse_summary(text: &str) -> Result<Summary> {
    let json = strip_code_fence(text);
    let raw: RawSummary = serde_json::from_str(json)?;

    let importance = match &raw.importance {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AppError::GeminiApi(format!("Invalid importance: {}", raw.importance)))?;

    Ok(Summary {
        summary: raw.summary,
        importance: importance.clamp(1, 5),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
