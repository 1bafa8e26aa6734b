use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FillError;
use crate::provider::{TextGenerator, provider_error_message};

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

pub struct AnthropicClient {
    api_key: String,
    model: String,
    endpoint: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

impl AnthropicClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_endpoint(api_key, model, DEFAULT_ENDPOINT)
    }

    /// Endpoint override for tests pointed at a local stub.
    pub fn with_endpoint(api_key: &str, model: &str, endpoint: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Request payload: `{model, max_tokens, messages:[{role,content}]}`.
    pub fn request_body(model: &str, prompt: &str) -> Value {
        let request = AnthropicRequest {
            model: model.to_string(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt.to_string(),
            }],
        };
        serde_json::to_value(request).unwrap_or(Value::Null)
    }

    /// Pull the generated text out of a success body.
    pub fn parse_success(body: &str) -> Result<String, FillError> {
        let response: AnthropicResponse =
            serde_json::from_str(body).map_err(|e| FillError::Provider {
                provider: "anthropic".to_string(),
                message: format!("unexpected response shape: {}", e),
                status: None,
            })?;

        response
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| FillError::Provider {
                provider: "anthropic".to_string(),
                message: "response contained no content blocks".to_string(),
                status: None,
            })
    }
}

impl TextGenerator for AnthropicClient {
    fn generate(&self, prompt: &str) -> Result<String, FillError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&Self::request_body(&self.model, prompt))
            .send()
            .map_err(|e| FillError::Transport {
                provider: "anthropic".to_string(),
                source: e,
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| FillError::Transport {
            provider: "anthropic".to_string(),
            source: e,
        })?;

        if !status.is_success() {
            let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            let message = provider_error_message(&parsed)
                .unwrap_or_else(|| "Anthropic API Error".to_string());
            return Err(FillError::Provider {
                provider: "anthropic".to_string(),
                message,
                status: Some(status.as_u16()),
            });
        }

        Self::parse_success(&body)
    }
}
