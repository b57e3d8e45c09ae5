use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// Thin client for the `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sends one prompt and returns the text of the first candidate.
    pub async fn generate(&self, prompt: &str, format: ResponseFormat) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: match format {
                ResponseFormat::Json => Some(GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                }),
                ResponseFormat::Text => None,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::GeminiApi(format!("HTTP {status}: {error_text}")));
        }

        let body: GenerateResponse = response.json().await?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AppError::GeminiApi("Empty response from model".to_string()))
    }

    pub fn model_version(&self) -> &str {
        &self.model
    }
}

/// Truncates on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Route, StubServer};

    fn candidate(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn json_requests_carry_response_mime_type() {
        let server = StubServer::start(vec![Route::json(
            ":generateContent",
            200,
            candidate("{\"ok\": true}"),
        )])
        .await;
        let client = GeminiClient::new("k".into(), "gemini-2.5-flash".into(), server.base_url.clone());

        let text = client.generate("hello", ResponseFormat::Json).await.unwrap();
        assert_eq!(text, "{\"ok\": true}");

        let request = &server.requests()[0];
        assert!(request.target.starts_with("/models/gemini-2.5-flash:generateContent"));
        assert!(request.target.contains("key=k"));
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[tokio::test]
    async fn text_requests_omit_generation_config() {
        let server =
            StubServer::start(vec![Route::json(":generateContent", 200, candidate("# Report"))])
                .await;
        let client = GeminiClient::new("k".into(), "m".into(), server.base_url.clone());

        assert_eq!(
            client.generate("p", ResponseFormat::Text).await.unwrap(),
            "# Report"
        );
        let body: serde_json::Value = serde_json::from_str(&server.requests()[0].body).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn empty_candidates_are_an_error() {
        let server = StubServer::start(vec![Route::json(
            ":generateContent",
            200,
            r#"{"candidates": []}"#.into(),
        )])
        .await;
        let client = GeminiClient::new("k".into(), "m".into(), server.base_url.clone());

        assert!(matches!(
            client.generate("p", ResponseFormat::Text).await,
            Err(AppError::GeminiApi(_))
        ));
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("動画データ", 2), "動画");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
