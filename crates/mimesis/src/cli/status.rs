//! `mimesis status`.

use super::commands::StatusArgs;
use super::{load_config, state_path};
use mimesis::{JsonStateStore, MimesisResult, SimulationState, StateStore, UsageCounters};
use serde_json::{Value as JsonValue, json};

/// Print tick, status and aggregate usage of a stored simulation.
pub async fn show_status(args: StatusArgs) -> MimesisResult<()> {
    let config = load_config(args.config.as_deref())?;
    let path = state_path(args.state, &config)?;
    let state = JsonStateStore::new(&path).load().await?;
    let summary = summarize(&state);

    if args.json {
        println!("{}", summary);
    } else {
        println!("State:      {}", path.display());
        println!("Tick:       {}", summary["tick"]);
        println!("Status:     {}", state.status);
        println!(
            "Entities:   {} characters, {} locations",
            summary["characters"], summary["locations"]
        );
        println!(
            "Usage:      {} requests, {} tokens ({} reasoning, {} cached)",
            summary["requests"],
            summary["total_tokens"],
            summary["reasoning_tokens"],
            summary["cached_tokens"]
        );
        println!("Chains:     {} continuation tokens held", summary["chain_tokens"]);
        if !state.is_paused() {
            println!("Warning:    a previous tick did not finish; restore a paused state to continue");
        }
    }
    Ok(())
}

fn summarize(state: &SimulationState) -> JsonValue {
    let mut usage = UsageCounters::default();
    let mut chain_tokens = 0usize;
    for entity in state.characters.iter().chain(&state.locations) {
        usage.absorb(&entity.meta().usage);
        chain_tokens += entity.meta().chains.values().map(Vec::len).sum::<usize>();
    }

    json!({
        "tick": state.tick,
        "status": state.status.to_string(),
        "characters": state.characters.len(),
        "locations": state.locations.len(),
        "requests": usage.requests(),
        "total_tokens": usage.total_tokens(),
        "reasoning_tokens": usage.reasoning_tokens(),
        "cached_tokens": usage.cached_tokens(),
        "chain_tokens": chain_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimesis::{Entity, Usage};

    #[test]
    fn test_summary_totals_usage_and_chains() {
        let mut bob = Entity::new("bob");
        bob.meta_mut().usage.record(&Usage::new(10, 5, 2, 1));
        bob.meta_mut().chains.insert(
            "intention".to_string(),
            vec!["r1".to_string(), "r2".to_string()],
        );
        let mut harbour = Entity::new("harbour");
        harbour.meta_mut().usage.record(&Usage::new(20, 10, 0, 4));
        harbour
            .meta_mut()
            .chains
            .insert("resolution".to_string(), vec!["r3".to_string()]);
        let state = SimulationState {
            tick: 6,
            characters: vec![bob, Entity::new("ann")],
            locations: vec![harbour],
            ..Default::default()
        };

        let summary = summarize(&state);

        assert_eq!(
            summary,
            json!({
                "tick": 6,
                "status": "paused",
                "characters": 2,
                "locations": 1,
                "requests": 2,
                "total_tokens": 45,
                "reasoning_tokens": 2,
                "cached_tokens": 5,
                "chain_tokens": 3,
            })
        );
    }
}
