//! Gemini completion endpoint client.
//!
//! This module owns the wire format for `generateContent` calls: the
//! request/response serde structs, the permissive safety configuration, and
//! the [`GenerateText`] trait that the summarization strategies are generic
//! over.
//!
//! # Safety configuration
//!
//! Every harm category is sent with threshold `BLOCK_NONE`. The source
//! material is a technical blog digest; default thresholds intermittently
//! block summaries of security or policy coverage.
//!
//! # Errors
//!
//! A call fails on transport errors, non-success HTTP statuses, an error
//! payload in the response body, or a response with no candidate text.
//! There is no retry here; callers own their single-fallback policies.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{instrument, warn};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Per-call timeout; batched prompts carry a lot of text.
const API_TIMEOUT: Duration = Duration::from_secs(120);

/// The four harm categories, all permissive.
const SAFETY_SETTINGS: [SafetySetting; 4] = [
    SafetySetting {
        category: "HARM_CATEGORY_HATE_SPEECH",
        threshold: "BLOCK_NONE",
    },
    SafetySetting {
        category: "HARM_CATEGORY_HARASSMENT",
        threshold: "BLOCK_NONE",
    },
    SafetySetting {
        category: "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        threshold: "BLOCK_NONE",
    },
    SafetySetting {
        category: "HARM_CATEGORY_DANGEROUS_CONTENT",
        threshold: "BLOCK_NONE",
    },
];

#[derive(Debug, Clone, Copy, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "safetySettings")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Trait for text generation.
///
/// The summarization strategies are generic over this so tests can run them
/// against scripted responses instead of the live endpoint.
pub trait GenerateText {
    /// Send a prompt and return the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>>;
}

/// [`GenerateText`] implementation against the Gemini REST endpoint.
#[derive(Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder().timeout(API_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{GEMINI_ENDPOINT}/{}:generateContent?key={}",
            self.model, self.api_key
        )
    }
}

impl GenerateText for GeminiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model, prompt_bytes = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            safety_settings: SAFETY_SETTINGS.to_vec(),
        };

        let response = self
            .client
            .post(self.request_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body: GenerateResponse = response.json().await?;

        if let Some(error) = body.error {
            warn!(%status, error = %error.message, "Model call rejected");
            return Err(format!("model call failed: {}", error.message).into());
        }
        if !status.is_success() {
            return Err(format!("model call failed with status {status}").into());
        }

        body.candidates
            .and_then(|mut c| {
                if c.is_empty() {
                    None
                } else {
                    c.swap_remove(0).content
                }
            })
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| "model returned no candidate text".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_safety_settings() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
            safety_settings: SAFETY_SETTINGS.to_vec(),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        let settings = value["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        assert!(settings.iter().all(|s| s["threshold"] == "BLOCK_NONE"));
        assert!(
            settings
                .iter()
                .any(|s| s["category"] == "HARM_CATEGORY_DANGEROUS_CONTENT")
        );
    }

    #[test]
    fn test_response_parses_candidate_text() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "generated summary"}]}}
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        let text = response.candidates.unwrap()[0]
            .content
            .as_ref()
            .unwrap()
            .parts[0]
            .text
            .clone();
        assert_eq!(text, "generated summary");
    }

    #[test]
    fn test_response_parses_error_payload() {
        let json = r#"{"error": {"message": "quota exceeded"}}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error.unwrap().message, "quota exceeded");
        assert!(response.candidates.is_none());
    }

    #[test]
    fn test_request_url_contains_model_and_key() {
        let client = GeminiClient::new("secret", "gemini-2.5-flash").unwrap();
        let url = client.request_url();
        assert!(url.contains("/gemini-2.5-flash:generateContent"));
        assert!(url.ends_with("key=secret"));
    }
}
