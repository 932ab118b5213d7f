//! Config-driven prompting phase.

use crate::{Phase, PhaseContext, PhaseOutcome};
use async_trait::async_trait;
use mimesis_core::{ChainKey, Entity, EntityScope, OutputShape, Request};
use mimesis_error::{
    JsonError, JsonErrorKind, MimesisResult, RequestError, RequestErrorKind,
};
use mimesis_rate_limit::PhaseConfig;
use serde_json::{Map, Value as JsonValue, json};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Prompts once per entity in scope, or once in total for
/// [`EntityScope::None`], as described by a [`PhaseConfig`].
///
/// Each request's content is a JSON document with the tick number, the
/// entity's fields (without provider metadata) and the outputs of earlier
/// phases. Entity requests continue the chain `"{purpose}:{id}"`.
///
/// Output is `{id: response}` for entity scopes and the bare response
/// otherwise. A failed request contributes `null` unless the phase is
/// `required`, in which case the first failure fails the phase.
///
/// A string `narrative` field in a response becomes a narrative line.
#[derive(Debug, Clone)]
pub struct EntityPromptPhase {
    config: PhaseConfig,
    shape: OutputShape,
}

impl EntityPromptPhase {
    /// Create a phase from its configuration.
    pub fn new(config: PhaseConfig) -> Self {
        let shape = OutputShape::new(config.name.clone(), config.shape.clone());
        Self { config, shape }
    }

    /// The phase configuration.
    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    fn content(&self, ctx: &PhaseContext<'_>, entity: Option<&Entity>) -> MimesisResult<String> {
        let mut body = Map::new();
        body.insert("tick".to_string(), json!(ctx.tick()));
        if let Some(entity) = entity {
            body.insert("entity".to_string(), JsonValue::Object(entity.fields().clone()));
        }
        body.insert(
            "previous".to_string(),
            JsonValue::Object(ctx.previous_outputs().clone()),
        );
        serde_json::to_string_pretty(&body)
            .map_err(|e| JsonError::new(JsonErrorKind::PhaseContent(e.to_string())).into())
    }

    fn request(&self, content: String, chain_key: Option<ChainKey>) -> MimesisResult<Request> {
        Request::builder()
            .instructions(self.config.instructions.clone())
            .content(content)
            .shape(self.shape.clone())
            .chain_key(chain_key)
            .build()
            .map_err(|e| RequestError::new(RequestErrorKind::Incomplete(e.to_string())).into())
    }

    async fn run_single(&self, ctx: &PhaseContext<'_>) -> MimesisResult<PhaseOutcome> {
        let request = self.request(self.content(ctx, None)?, None)?;

        match ctx.client().execute(&request).await {
            Ok(output) => {
                let narrative = narrative_of(&output).map(str::to_string);
                Ok(PhaseOutcome::new(output).with_narrative(narrative))
            }
            Err(e) if self.config.required => Err(e),
            Err(e) => {
                warn!(phase = %self.config.name, error = %e, "Request failed, using null output");
                Ok(PhaseOutcome::new(JsonValue::Null))
            }
        }
    }

    async fn run_entities(
        &self,
        ctx: &PhaseContext<'_>,
        scope: EntityScope,
    ) -> MimesisResult<PhaseOutcome> {
        let mut ids = Vec::new();
        let mut requests = Vec::new();
        for entity in ctx.state().entities(scope) {
            let Some(id) = entity.id() else {
                debug!(phase = %self.config.name, "Skipping entity without id");
                continue;
            };
            let key = ChainKey::new(self.config.purpose(), id)?;
            requests.push(self.request(self.content(ctx, Some(entity))?, Some(key))?);
            ids.push(id.to_string());
        }

        let results = ctx.client().batch(&requests).await;

        let mut output = Map::new();
        let mut narrative = Vec::new();
        let mut failed = 0usize;
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(value) => {
                    if let Some(line) = narrative_of(&value) {
                        narrative.push(format!("{}: {}", id, line));
                    }
                    output.insert(id, value);
                }
                Err(e) if self.config.required => return Err(e),
                Err(e) => {
                    warn!(phase = %self.config.name, entity = %id, error = %e, "Request failed, using null output");
                    failed += 1;
                    output.insert(id, JsonValue::Null);
                }
            }
        }

        info!(
            phase = %self.config.name,
            entities = output.len(),
            failed,
            "Entity prompts settled"
        );
        Ok(PhaseOutcome::new(JsonValue::Object(output)).with_narrative(narrative))
    }
}

fn narrative_of(output: &JsonValue) -> Option<&str> {
    output
        .get("narrative")
        .and_then(JsonValue::as_str)
        .filter(|text| !text.trim().is_empty())
}

#[async_trait]
impl Phase for EntityPromptPhase {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn scope(&self) -> EntityScope {
        self.config.scope
    }

    fn depth(&self) -> Option<usize> {
        self.config.depth
    }

    fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    #[instrument(skip_all, fields(phase = %self.config.name, scope = %self.config.scope, tick = ctx.tick()))]
    async fn run(&self, ctx: &PhaseContext<'_>) -> MimesisResult<PhaseOutcome> {
        match self.config.scope {
            EntityScope::None => self.run_single(ctx).await,
            scope => self.run_entities(ctx, scope).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrative_of() {
        assert_eq!(narrative_of(&json!({"narrative": "Rain."})), Some("Rain."));
        assert_eq!(narrative_of(&json!({"narrative": "  "})), None);
        assert_eq!(narrative_of(&json!({"narrative": 3})), None);
        assert_eq!(narrative_of(&JsonValue::Null), None);
    }
}
