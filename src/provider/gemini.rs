use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FillError;
use crate::provider::{TextGenerator, provider_error_message};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_endpoint(api_key, model, DEFAULT_ENDPOINT)
    }

    /// Endpoint override for tests pointed at a local stub.
    pub fn with_endpoint(api_key: &str, model: &str, endpoint: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }

    /// Request payload: `{contents:[{parts:[{text}]}]}`.
    pub fn request_body(prompt: &str) -> Value {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        serde_json::to_value(request).unwrap_or(Value::Null)
    }

    /// Pull the generated text out of a success body.
    pub fn parse_success(body: &str) -> Result<String, FillError> {
        let response: GeminiResponse =
            serde_json::from_str(body).map_err(|e| FillError::Provider {
                provider: "gemini".to_string(),
                message: format!("unexpected response shape: {}", e),
                status: None,
            })?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| FillError::Provider {
                provider: "gemini".to_string(),
                message: "response contained no candidate text".to_string(),
                status: None,
            })
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, FillError> {
        let response = self
            .client
            .post(self.url())
            .json(&Self::request_body(prompt))
            .send()
            .map_err(|e| FillError::Transport {
                provider: "gemini".to_string(),
                source: e,
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| FillError::Transport {
            provider: "gemini".to_string(),
            source: e,
        })?;

        if !status.is_success() {
            let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            let message = provider_error_message(&parsed)
                .unwrap_or_else(|| "Gemini API Error".to_string());
            return Err(FillError::Provider {
                provider: "gemini".to_string(),
                message,
                status: Some(status.as_u16()),
            });
        }

        Self::parse_success(&body)
    }
}
