//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Mimesis - LLM-driven tick simulation
#[derive(Parser, Debug)]
#[command(name = "mimesis")]
#[command(about = "Advance an LLM-driven simulation one tick at a time", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one or more ticks and persist the result
    Tick(TickArgs),

    /// Show tick number, status and usage of a simulation
    Status(StatusArgs),

    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

/// Arguments of `mimesis tick`.
#[derive(Args, Debug)]
pub struct TickArgs {
    /// Simulation state file; defaults to `storage.state_path` from the config
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Configuration file layered over the bundled defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub ticks: u32,

    /// Append JSON-lines narration to this file
    #[arg(long)]
    pub narrate_file: Option<PathBuf>,

    /// Post each tick's narrative to this chat webhook
    #[arg(long)]
    pub webhook: Option<String>,
}

/// Arguments of `mimesis status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Simulation state file; defaults to `storage.state_path` from the config
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Configuration file layered over the bundled defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `mimesis config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file layered over the bundled defaults
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tick() {
        let cli = Cli::try_parse_from([
            "mimesis",
            "tick",
            "--state",
            "world.json",
            "--ticks",
            "3",
            "--webhook",
            "http://localhost/hook",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Tick(args) = cli.command else {
            panic!("expected tick");
        };
        assert_eq!(args.state, Some(PathBuf::from("world.json")));
        assert_eq!(args.ticks, 3);
        assert_eq!(args.webhook.as_deref(), Some("http://localhost/hook"));
        assert!(args.narrate_file.is_none());
    }

    #[test]
    fn test_zero_ticks_rejected() {
        assert!(Cli::try_parse_from(["mimesis", "tick", "--ticks", "0"]).is_err());
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["mimesis", "--json-logs", "status", "--json"]).unwrap();

        assert!(cli.json_logs);
        let Commands::Status(args) = cli.command else {
            panic!("expected status");
        };
        assert!(args.json);
        assert!(args.state.is_none());
    }
}
