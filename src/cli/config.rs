use clap::{Parser, Subcommand};

use crate::provider::ProviderKind;
use crate::settings::{FileSettings, Settings, SettingsStore};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-autofill",
    version,
    about = "LLM-assisted web form autofill"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (provider, API keys, model, profile)
    #[arg(long, global = true, default_value = "autofill.yaml")]
    pub settings: String,

    /// Provider override: gemini or anthropic
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Model override
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a page dump and fill its forms from the stored profile
    Fill {
        /// Path to the page dump JSON
        #[arg(long)]
        page: String,

        /// Skip the settle delay (user-initiated fill)
        #[arg(long)]
        force: bool,

        /// Print the proposed mappings without applying them
        #[arg(long)]
        dry_run: bool,

        /// Write the filled-field report as JSON
        #[arg(short, long)]
        output: Option<String>,

        /// Trace file (JSONL); tracing is off when omitted
        #[arg(long)]
        trace: Option<String>,
    },

    /// Print the form snapshots extracted from a page dump
    Snapshot {
        /// Path to the page dump JSON
        #[arg(long)]
        page: String,
    },

    /// Show or edit the stored profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Save provider selection, API key, and model
    Configure {
        /// Provider: gemini or anthropic
        #[arg(long)]
        provider: String,

        /// API key for that provider
        #[arg(long)]
        api_key: String,

        /// Model id (defaults to the provider's default model)
        #[arg(long)]
        model: Option<String>,
    },

    /// List known model ids per provider
    Models {
        /// Limit to one provider
        #[arg(long)]
        provider: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Print the stored profile
    Show,
    /// Seed the default profile scaffold
    Init,
    /// Set a profile field
    Set { key: String, value: String },
    /// Remove a profile field
    Remove { key: String },
}

// ============================================================================
// Settings resolution (CLI overrides > settings file > defaults)
// ============================================================================

pub fn resolve_settings(
    settings_path: &str,
    provider_override: Option<&str>,
    model_override: Option<&str>,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = FileSettings::new(settings_path).read();

    if let Some(provider) = provider_override {
        settings.selected_provider = provider.parse::<ProviderKind>()?;
    }
    if let Some(model) = model_override {
        settings.selected_model = Some(model.to_string());
    }

    Ok(settings)
}
