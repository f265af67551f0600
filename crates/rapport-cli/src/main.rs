//! Rapport CLI - Command-line interface for the relationship graph engine.

use clap::Parser;
use rapport_cli::commands;
use rapport_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> rapport_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config (defaults when the file does not exist)
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        // `config init --force` must be able to replace a broken file
        Err(e) if matches!(cli.command, Command::Config(_)) => {
            tracing::warn!("Ignoring unreadable config {}: {}", config_path.display(), e);
            Config::default()
        }
        Err(e) => return Err(e),
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Handle commands
    match cli.command {
        Command::Build(args) => commands::execute_build(args, &formatter)?,
        Command::Layout(args) => commands::execute_layout(args, &config, &formatter).await?,
        Command::Summary(args) => commands::execute_summary(args, &formatter)?,
        Command::Config(args) => commands::execute_config(args, &config, &config_path, &formatter)?,
    }

    Ok(())
}

/// Initialize tracing (log to stderr); `RUST_LOG` overrides `-v`.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
