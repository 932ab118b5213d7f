//! Mimesis CLI binary.
//!
//! - `mimesis tick` advances a simulation by one or more ticks
//! - `mimesis status` prints where a simulation stands
//! - `mimesis config` prints the effective configuration

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_ticks, show_config, show_status};

    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };

    #[cfg(feature = "observability")]
    mimesis::init_observability_with_config(
        mimesis::ObservabilityConfig::new("mimesis")
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )?;

    #[cfg(not(feature = "observability"))]
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Tick(args) => run_ticks(args, cli.verbose).await,
        Commands::Status(args) => show_status(args).await,
        Commands::Config(args) => show_config(args),
    };

    #[cfg(feature = "observability")]
    mimesis::shutdown_observability();

    result.map_err(Into::into)
}
