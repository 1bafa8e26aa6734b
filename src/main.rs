use clap::Parser;
use form_autofill::cli::commands::{cmd_configure, cmd_fill, cmd_models, cmd_profile, cmd_snapshot};
use form_autofill::cli::config::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fill {
            ref page,
            force,
            dry_run,
            ref output,
            ref trace,
        } => {
            cmd_fill(
                page,
                force,
                dry_run,
                output.as_deref(),
                trace.as_deref(),
                &cli.settings,
                cli.provider.as_deref(),
                cli.model.as_deref(),
                cli.verbose,
            )?;
        }
        Commands::Snapshot { ref page } => {
            cmd_snapshot(page)?;
        }
        Commands::Profile { ref action } => {
            cmd_profile(action, &cli.settings)?;
        }
        Commands::Configure {
            ref provider,
            ref api_key,
            ref model,
        } => {
            cmd_configure(provider, api_key, model.as_deref(), &cli.settings)?;
        }
        Commands::Models { ref provider } => {
            cmd_models(provider.as_deref())?;
        }
    }

    Ok(())
}
