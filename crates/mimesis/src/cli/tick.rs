//! `mimesis tick`.

use super::commands::TickArgs;
use super::{load_config, state_path};
use mimesis::{
    ChatNarrator, ConsoleNarrator, FileNarrator, JsonStateStore, MimesisResult,
    ResponsesTransport, TickRunner,
};
use std::sync::Arc;
use tracing::info;

/// Run `args.ticks` ticks in sequence, stopping at the first failure.
pub async fn run_ticks(args: TickArgs, verbose: bool) -> MimesisResult<()> {
    let config = load_config(args.config.as_deref())?;
    let state_path = state_path(args.state, &config)?;

    let transport = Arc::new(ResponsesTransport::from_config(&config)?);
    let store = Arc::new(JsonStateStore::new(&state_path));

    let console = if verbose {
        ConsoleNarrator::verbose()
    } else {
        ConsoleNarrator::new()
    };
    let mut runner = TickRunner::from_config(transport, store, &config).with_narrator(console);
    if let Some(path) = args.narrate_file {
        runner = runner.with_narrator(FileNarrator::new(path));
    }
    if let Some(url) = args.webhook {
        runner = runner.with_narrator(ChatNarrator::new(url));
    }

    info!(
        state = %state_path.display(),
        model = %config.provider.model,
        phases = ?runner.phase_names(),
        ticks = args.ticks,
        "Starting simulation"
    );

    for _ in 0..args.ticks {
        let report = runner.run_next().await?;
        info!(tick = report.tick, run_id = %report.run_id, "Tick finished");
    }
    Ok(())
}
