//! Tick orchestration for the Mimesis simulation engine.
//!
//! A [`TickRunner`] executes an ordered list of [`Phase`]s against a paused
//! [`SimulationState`](mimesis_core::SimulationState):
//!
//! 1. Each phase gets a fresh [`BatchClient`](mimesis_client::BatchClient)
//!    scoped to its entity collection, plus the outputs of earlier phases.
//! 2. Any phase failure aborts the tick without touching storage.
//! 3. When every phase succeeds, chain metadata is merged back, the tick
//!    counter advances and the state is saved exactly once.
//!
//! [`Narrator`](mimesis_interface::Narrator)s observe the tick; their failures
//! are logged and never abort it.
//!
//! # Example
//!
//! ```rust,ignore
//! use mimesis_runner::TickRunner;
//!
//! let runner = TickRunner::from_config(transport, store, &config)
//!     .with_narrator(ConsoleNarrator::new());
//! let report = runner.run_next().await?;
//! println!("tick {} done", report.tick);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod narrators;
mod phase;
mod prompt;
mod runner;

pub use narrators::{ChatNarrator, ConsoleNarrator, FileNarrator};
pub use phase::{Phase, PhaseContext, PhaseOutcome};
pub use prompt::EntityPromptPhase;
pub use runner::TickRunner;
