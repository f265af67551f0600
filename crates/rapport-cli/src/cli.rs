//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rapport CLI - Build and lay out relationship graphs.
#[derive(Debug, Parser)]
#[command(name = "rapport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "RAPPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the graph without layout
    Build(BuildArgs),

    /// Build the graph and compute positions
    Layout(LayoutArgs),

    /// Print graph summary statistics
    Summary(SummaryArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the build command.
#[derive(Debug, Parser)]
pub struct BuildArgs {
    /// Snapshot JSON file
    pub file: PathBuf,
}

/// Arguments for the layout command.
#[derive(Debug, Parser)]
pub struct LayoutArgs {
    /// Snapshot JSON file
    pub file: PathBuf,

    /// Number of simulation steps
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Canvas width
    #[arg(long)]
    pub width: Option<f64>,

    /// Canvas height
    #[arg(long)]
    pub height: Option<f64>,

    /// Seed for initial positions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not cluster household and business members
    #[arg(long)]
    pub no_clusters: bool,

    /// Force preset (replaces the configured forces)
    #[arg(short, long, value_enum)]
    pub preset: Option<PresetArg>,
}

/// Arguments for the summary command.
#[derive(Debug, Parser)]
pub struct SummaryArgs {
    /// Snapshot JSON file
    pub file: PathBuf,
}

/// Arguments for config management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Layout preset argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// Balanced spacing
    Default,
    /// Tighter clusters
    Compact,
    /// More room between nodes
    Spacious,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<PresetArg> for rapport_pipeline::PipelineConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => rapport_pipeline::PipelineConfig::default(),
            PresetArg::Compact => rapport_pipeline::PipelineConfig::compact(),
            PresetArg::Spacious => rapport_pipeline::PipelineConfig::spacious(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command() {
        let cli = Cli::parse_from(["rapport", "build", "people.json"]);
        match cli.command {
            Command::Build(args) => assert_eq!(args.file, PathBuf::from("people.json")),
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_layout_flags() {
        let cli = Cli::parse_from([
            "rapport",
            "layout",
            "people.json",
            "--iterations",
            "50",
            "--seed",
            "7",
            "--no-clusters",
            "--preset",
            "compact",
            "--format",
            "json",
            "-vv",
        ]);
        assert_eq!(cli.format, Some(CliFormat::Json));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Layout(args) => {
                assert_eq!(args.iterations, Some(50));
                assert_eq!(args.seed, Some(7));
                assert!(args.no_clusters);
                assert_eq!(args.preset, Some(PresetArg::Compact));
            }
            _ => panic!("Expected Layout command"),
        }
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::parse_from(["rapport", "config", "init", "--force"]);
        match cli.command {
            Command::Config(ConfigArgs { action: ConfigAction::Init { force } }) => assert!(force),
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_preset_conversion() {
        let config: rapport_pipeline::PipelineConfig = PresetArg::Spacious.into();
        assert_eq!(config, rapport_pipeline::PipelineConfig::spacious());
    }
}
