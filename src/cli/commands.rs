use std::time::Duration;

use crate::cli::config::{ProfileAction, resolve_settings};
use crate::dom::document::PageDocument;
use crate::engine::{FillEngine, ScanTrigger, container_label, find_containers};
use crate::profile::Profile;
use crate::provider::ProviderKind;
use crate::settings::{FileSettings, MemorySettings, Settings, SettingsStore};
use crate::snapshot::extract_snapshot;
use crate::trace::logger::TraceLogger;

// ============================================================================
// fill subcommand
// ============================================================================

pub fn cmd_fill(
    page_path: &str,
    force: bool,
    dry_run: bool,
    output: Option<&str>,
    trace_path: Option<&str>,
    settings_path: &str,
    provider_override: Option<&str>,
    model_override: Option<&str>,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = resolve_settings(settings_path, provider_override, model_override)?;
    let mut doc = load_page(page_path)?;

    if dry_run {
        return print_dry_run(&doc, settings);
    }

    let tracer = match trace_path {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    let mut engine = FillEngine::new(Box::new(MemorySettings::new(settings)))
        .with_tracer(tracer)
        .with_settle_delay(if force {
            Duration::ZERO
        } else {
            crate::engine::SETTLE_DELAY
        });

    let trigger = if force {
        ScanTrigger::ForceFill
    } else {
        ScanTrigger::PageLoad
    };
    let summary = engine.scan_page(&mut doc, trigger);

    if summary.gated {
        eprintln!("Not configured: set an API key and a profile first.");
        std::process::exit(1);
    }

    println!(
        "Containers: {} found, {} filled, {} empty, {} failed",
        summary.containers_found,
        summary.containers_filled,
        summary.containers_skipped,
        summary.failures.len()
    );
    for failure in &summary.failures {
        eprintln!("  failed: {}", failure);
    }
    if verbose > 0 {
        for outcome in &summary.outcomes {
            println!("  {} -> {:?}", outcome.identifier, outcome.action);
        }
    }

    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&summary.outcomes)?)?;
        if verbose > 0 {
            eprintln!("Report written to {}", path);
        }
    }

    Ok(())
}

/// Request mappings for every container and print them without touching the
/// page.
fn print_dry_run(doc: &PageDocument, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let Some(profile) = settings.user_profile.clone() else {
        return Err("no profile configured; run `profile init` first".into());
    };
    let engine = FillEngine::new(Box::new(MemorySettings::new(settings)));

    for container in find_containers(doc) {
        let name = container_label(doc, container);
        let snapshot = extract_snapshot(doc, container);
        if snapshot.is_empty() {
            println!("# {} (empty, skipped)", name);
            continue;
        }
        match engine.analyze(&profile, &snapshot) {
            Ok(mappings) => {
                println!("# {}", name);
                println!("{}", serde_json::to_string_pretty(&mappings)?);
            }
            Err(e) => eprintln!("# {} failed: {}", name, e),
        }
    }

    Ok(())
}

// ============================================================================
// snapshot subcommand
// ============================================================================

pub fn cmd_snapshot(page_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_page(page_path)?;
    let containers = find_containers(&doc);

    if containers.is_empty() {
        println!("No forms or fillable controls found.");
        return Ok(());
    }

    for container in containers {
        let snapshot = extract_snapshot(&doc, container);
        println!("# {}", container_label(&doc, container));
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}

// ============================================================================
// profile subcommand
// ============================================================================

pub fn cmd_profile(
    action: &ProfileAction,
    settings_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileSettings::new(settings_path);
    let mut settings = store.read();

    match action {
        ProfileAction::Show => match &settings.user_profile {
            Some(profile) => {
                for (key, value) in profile.iter() {
                    println!("{}: {}", key, value);
                }
            }
            None => println!("No profile stored. Run `profile init` to seed one."),
        },

        ProfileAction::Init => {
            if settings.user_profile.is_some() {
                println!("Profile already exists; leaving it untouched.");
            } else {
                settings.user_profile = Some(Profile::scaffold());
                store.write(&settings)?;
                println!("Profile scaffold created.");
            }
        }

        ProfileAction::Set { key, value } => {
            let mut profile = settings.user_profile.take().unwrap_or_default();
            profile.set(key, value);
            settings.user_profile = Some(profile);
            store.write(&settings)?;
            println!("Saved {}.", key);
        }

        ProfileAction::Remove { key } => {
            let mut profile = settings.user_profile.take().unwrap_or_default();
            let removed = profile.remove(key);
            settings.user_profile = Some(profile);
            store.write(&settings)?;
            if removed {
                println!("Removed {}.", key);
            } else {
                println!("No such field: {}", key);
            }
        }
    }

    Ok(())
}

// ============================================================================
// configure subcommand
// ============================================================================

pub fn cmd_configure(
    provider: &str,
    api_key: &str,
    model: Option<&str>,
    settings_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider: ProviderKind = provider.parse()?;

    let mut store = FileSettings::new(settings_path);
    let mut settings = store.read();

    settings.selected_provider = provider;
    match provider {
        ProviderKind::Gemini => settings.gemini_api_key = Some(api_key.to_string()),
        ProviderKind::Anthropic => settings.anthropic_api_key = Some(api_key.to_string()),
    }
    settings.selected_model = model.map(str::to_string);

    store.write(&settings)?;
    println!(
        "Configuration saved: {} / {}",
        provider,
        settings.resolved_model()
    );

    Ok(())
}

// ============================================================================
// models subcommand
// ============================================================================

pub fn cmd_models(provider: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let providers: Vec<ProviderKind> = match provider {
        Some(p) => vec![p.parse()?],
        None => vec![ProviderKind::Gemini, ProviderKind::Anthropic],
    };

    for provider in providers {
        println!("{}:", provider);
        for model in provider.known_models() {
            println!("  {}", model);
        }
    }

    Ok(())
}

fn load_page(path: &str) -> Result<PageDocument, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(PageDocument::from_json_str(&content)?)
}
