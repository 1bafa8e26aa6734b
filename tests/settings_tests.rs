use form_autofill::profile::{DEFAULT_FIELDS, Profile};
use form_autofill::provider::ProviderKind;
use form_autofill::settings::{FileSettings, MemorySettings, Settings, SettingsStore};

// =========================================================================
// Profile
// =========================================================================

#[test]
fn scaffold_seeds_the_default_fields_in_order() {
    let profile = Profile::scaffold();
    let keys: Vec<&str> = profile.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, DEFAULT_FIELDS.to_vec());
    assert!(profile.iter().all(|(_, v)| v.is_empty()));
}

#[test]
fn set_overwrites_in_place_and_appends_new_fields() {
    let mut profile = Profile::scaffold();
    profile.set("Email", "ada@example.com");
    profile.set("GitHub", "https://github.com/ada");

    let keys: Vec<&str> = profile.iter().map(|(k, _)| k).collect();
    assert_eq!(keys[1], "Email"); // unchanged position
    assert_eq!(keys.last(), Some(&"GitHub"));
    assert_eq!(profile.get("Email"), Some("ada@example.com"));
}

#[test]
fn captured_values_fall_back_to_a_generic_key() {
    let mut profile = Profile::new();
    profile.save_captured(None, "555-0100");
    assert_eq!(profile.get("New Field"), Some("555-0100"));

    profile.save_captured(Some("Phone"), "555-0199");
    assert_eq!(profile.get("Phone"), Some("555-0199"));
}

#[test]
fn profile_serializes_as_an_ordered_object() {
    let mut profile = Profile::new();
    profile.set("Zeta", "1");
    profile.set("Alpha", "2");

    let json = serde_json::to_string(&profile).unwrap();
    // Insertion order, not alphabetical.
    assert!(json.find("Zeta").unwrap() < json.find("Alpha").unwrap());

    let back: Profile = serde_json::from_str(&json).unwrap();
    assert_eq!(back, profile);
}

// =========================================================================
// Settings
// =========================================================================

#[test]
fn settings_use_camel_case_storage_key_names() {
    let settings = Settings {
        selected_provider: ProviderKind::Anthropic,
        anthropic_api_key: Some("k".to_string()),
        selected_model: Some("claude-3-haiku-20240307".to_string()),
        ..Settings::default()
    };

    let value = serde_json::to_value(&settings).unwrap();
    assert_eq!(value["selectedProvider"], "anthropic");
    assert_eq!(value["anthropicApiKey"], "k");
    assert_eq!(value["selectedModel"], "claude-3-haiku-20240307");
}

#[test]
fn empty_api_keys_count_as_absent() {
    let settings = Settings {
        gemini_api_key: Some(String::new()),
        ..Settings::default()
    };
    assert!(settings.api_key_for(ProviderKind::Gemini).is_none());
    assert!(!settings.is_fill_ready());
}

#[test]
fn model_resolution_falls_back_to_the_provider_default() {
    let settings = Settings::default();
    assert_eq!(settings.resolved_model(), "gemini-1.5-flash");

    let chosen = Settings {
        selected_model: Some("gemini-1.5-pro".to_string()),
        ..Settings::default()
    };
    assert_eq!(chosen.resolved_model(), "gemini-1.5-pro");
}

// =========================================================================
// Stores
// =========================================================================

#[test]
fn memory_store_round_trips() {
    let mut store = MemorySettings::default();
    let mut settings = store.read();
    settings.gemini_api_key = Some("k".to_string());
    store.write(&settings).unwrap();
    assert_eq!(store.read().gemini_api_key.as_deref(), Some("k"));
}

#[test]
fn file_store_defaults_when_missing_and_round_trips() {
    let path = std::env::temp_dir().join(format!(
        "form-autofill-settings-{}.yaml",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let mut store = FileSettings::new(&path);
    assert_eq!(store.read(), Settings::default());

    let settings = Settings {
        gemini_api_key: Some("k".to_string()),
        user_profile: Some(Profile::scaffold()),
        ..Settings::default()
    };
    store.write(&settings).unwrap();
    assert_eq!(store.read(), settings);

    let _ = std::fs::remove_file(&path);
}
