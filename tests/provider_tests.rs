use form_autofill::error::FillError;
use form_autofill::provider::anthropic::AnthropicClient;
use form_autofill::provider::gemini::GeminiClient;
use form_autofill::provider::{ProviderKind, build_generator, provider_error_message};
use form_autofill::settings::Settings;
use serde_json::json;

// =========================================================================
// Provider selection
// =========================================================================

#[test]
fn provider_kind_parses_and_displays() {
    assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
    assert_eq!(
        "anthropic".parse::<ProviderKind>().unwrap(),
        ProviderKind::Anthropic
    );
    assert!("openai".parse::<ProviderKind>().is_err());
    assert_eq!(ProviderKind::Gemini.to_string(), "gemini");
}

#[test]
fn each_provider_has_a_default_model_in_its_catalog() {
    for provider in [ProviderKind::Gemini, ProviderKind::Anthropic] {
        assert!(provider.known_models().contains(&provider.default_model()));
    }
}

#[test]
fn build_generator_requires_an_api_key() {
    let settings = Settings::default();
    match build_generator(&settings).unwrap_err() {
        FillError::ConfigurationMissing(what) => assert!(what.contains("API key")),
        other => panic!("expected ConfigurationMissing, got {:?}", other),
    }

    let configured = Settings {
        gemini_api_key: Some("k".to_string()),
        ..Settings::default()
    };
    assert!(build_generator(&configured).is_ok());
}

// =========================================================================
// Gemini wire contract
// =========================================================================

#[test]
fn gemini_request_body_matches_the_contents_shape() {
    let body = GeminiClient::request_body("map these fields");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "map these fields");
}

#[test]
fn gemini_success_body_yields_candidate_text() {
    let body = json!({
        "candidates": [
            { "content": { "parts": [ { "text": "{\"a\": \"b\"}" } ] } }
        ]
    })
    .to_string();

    assert_eq!(GeminiClient::parse_success(&body).unwrap(), "{\"a\": \"b\"}");
}

#[test]
fn gemini_empty_candidates_is_a_provider_error() {
    let body = json!({ "candidates": [] }).to_string();
    assert!(matches!(
        GeminiClient::parse_success(&body),
        Err(FillError::Provider { .. })
    ));
}

// =========================================================================
// Anthropic wire contract
// =========================================================================

#[test]
fn anthropic_request_body_matches_the_messages_shape() {
    let body = AnthropicClient::request_body("claude-3-haiku-20240307", "map these fields");
    assert_eq!(body["model"], "claude-3-haiku-20240307");
    assert_eq!(body["max_tokens"], 4096);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "map these fields");
}

#[test]
fn anthropic_success_body_yields_first_content_block() {
    let body = json!({ "content": [ { "text": "{}" }, { "text": "ignored" } ] }).to_string();
    assert_eq!(AnthropicClient::parse_success(&body).unwrap(), "{}");
}

#[test]
fn anthropic_empty_content_is_a_provider_error() {
    let body = json!({ "content": [] }).to_string();
    assert!(matches!(
        AnthropicClient::parse_success(&body),
        Err(FillError::Provider { .. })
    ));
}

// =========================================================================
// Error bodies
// =========================================================================

#[test]
fn error_message_is_pulled_from_the_provider_body() {
    let body = json!({ "error": { "message": "API key not valid" } });
    assert_eq!(
        provider_error_message(&body).as_deref(),
        Some("API key not valid")
    );

    assert!(provider_error_message(&json!({ "oops": true })).is_none());
    assert!(provider_error_message(&serde_json::Value::Null).is_none());
}
