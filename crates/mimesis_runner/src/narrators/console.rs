//! Terminal narrator.

use async_trait::async_trait;
use mimesis_core::SimulationState;
use mimesis_error::MimesisResult;
use mimesis_interface::{Narrator, PhaseReport, TickReport};

/// Prints tick progress and the final narrative to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNarrator {
    verbose: bool,
}

impl ConsoleNarrator {
    /// Print only the final narrative and a usage line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print tick start and every phase.
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

#[async_trait]
impl Narrator for ConsoleNarrator {
    fn name(&self) -> &str {
        "console"
    }

    async fn on_tick_start(&self, tick: u64, state: &SimulationState) -> MimesisResult<()> {
        if self.verbose {
            println!(
                "== Tick {} ({} characters, {} locations)",
                tick,
                state.characters.len(),
                state.locations.len()
            );
        }
        Ok(())
    }

    async fn on_phase_complete(&self, report: &PhaseReport) -> MimesisResult<()> {
        if self.verbose {
            println!(
                "-- {} in {} ms: {} requests, {} errors, {} tokens",
                report.name,
                report.duration_ms,
                report.stats.requests(),
                report.stats.errors(),
                report.stats.total_tokens()
            );
        }
        Ok(())
    }

    async fn on_tick_complete(&self, report: &TickReport) -> MimesisResult<()> {
        println!("== Tick {} complete", report.tick);
        for line in &report.narrative {
            println!("{}", line);
        }
        let stats = report.total_stats();
        println!(
            "   {} requests, {} tokens ({} reasoning, {} cached)",
            stats.requests(),
            stats.total_tokens(),
            stats.reasoning_tokens(),
            stats.cached_tokens()
        );
        Ok(())
    }
}
