pub mod anthropic;
pub mod gemini;

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FillError;
use crate::provider::anthropic::AnthropicClient;
use crate::provider::gemini::GeminiClient;
use crate::settings::Settings;

// ============================================================================
// Provider selection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::Anthropic => "claude-3-5-sonnet-20240620",
        }
    }

    /// Model ids offered by the settings surface for this provider.
    pub fn known_models(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::Gemini => &[
                "gemini-1.5-flash",
                "gemini-1.5-pro",
                "gemini-1.5-flash-latest",
                "gemini-1.5-pro-latest",
                "gemini-2.5-flash",
                "gemini-2.5-pro",
            ],
            ProviderKind::Anthropic => &[
                "claude-sonnet-4-20250514",
                "claude-opus-4-20250514",
                "claude-3-5-sonnet-20240620",
                "claude-3-opus-20240229",
                "claude-3-haiku-20240307",
            ],
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(ProviderKind::Gemini),
            "anthropic" => Ok(ProviderKind::Anthropic),
            other => Err(format!("Unsupported provider: {}", other)),
        }
    }
}

// ============================================================================
// TextGenerator — the single capability both vendor clients implement
// ============================================================================

/// One generation call: prompt in, raw model text out. One HTTP request per
/// call, no retry, no streaming.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, FillError>;
}

impl fmt::Debug for dyn TextGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn TextGenerator")
    }
}

/// Build the configured vendor client from settings. Fails with
/// `ConfigurationMissing` before any network activity when the key is absent.
pub fn build_generator(settings: &Settings) -> Result<Box<dyn TextGenerator>, FillError> {
    let provider = settings.selected_provider;
    let api_key = settings
        .api_key_for(provider)
        .ok_or_else(|| FillError::ConfigurationMissing(format!("{} API key", provider)))?;
    let model = settings.resolved_model();

    Ok(match provider {
        ProviderKind::Gemini => Box::new(GeminiClient::new(api_key, &model)),
        ProviderKind::Anthropic => Box::new(AnthropicClient::new(api_key, &model)),
    })
}

impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    fn generate(&self, prompt: &str) -> Result<String, FillError> {
        (**self).generate(prompt)
    }
}

/// Both vendors report failures as `{"error": {"message": ...}}`.
pub fn provider_error_message(body: &Value) -> Option<String> {
    body.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

// ============================================================================
// MockGenerator — scripted replies for tests and offline runs
// ============================================================================

struct MockState {
    queue: Vec<Result<String, String>>,
    cursor: usize,
    calls: usize,
}

/// Scripted generator: replays canned replies in order, repeating the last
/// one once exhausted, and counts how many calls it served.
pub struct MockGenerator {
    state: Mutex<MockState>,
}

impl MockGenerator {
    pub fn with_response(text: &str) -> Self {
        Self::with_sequence(vec![Ok(text.to_string())])
    }

    pub fn failing(message: &str) -> Self {
        Self::with_sequence(vec![Err(message.to_string())])
    }

    pub fn with_sequence(queue: Vec<Result<String, String>>) -> Self {
        Self {
            state: Mutex::new(MockState {
                queue,
                cursor: 0,
                calls: 0,
            }),
        }
    }

    pub fn calls(&self) -> usize {
        self.state.lock().expect("mock generator lock").calls
    }
}

impl TextGenerator for MockGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, FillError> {
        let mut state = self.state.lock().expect("mock generator lock");
        state.calls += 1;

        let reply = if state.cursor < state.queue.len() {
            let r = state.queue[state.cursor].clone();
            if state.cursor + 1 < state.queue.len() {
                state.cursor += 1;
            }
            r
        } else {
            Err("mock generator has no scripted replies".to_string())
        };

        reply.map_err(|message| FillError::Provider {
            provider: "mock".to_string(),
            message,
            status: None,
        })
    }
}
