//! Single and batched request execution.

use crate::ChainRegistry;
use futures::future::join_all;
use mimesis_core::{ChainKey, OutputShape, Request};
use mimesis_error::MimesisResult;
use mimesis_interface::{CallStats, Transport, TransportCall};
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Executes requests for one entity collection.
///
/// `single` propagates errors so the caller picks its own fallback. `batch`
/// runs every request concurrently and reports each outcome in its slot,
/// never failing the whole batch for one item.
///
/// A chain key must appear at most once per batch: concurrent commits to the
/// same chain leave its order unspecified.
pub struct BatchClient {
    transport: Arc<dyn Transport>,
    registry: ChainRegistry,
    depth: usize,
    timeout: Duration,
    last_call: Mutex<CallStats>,
    totals: Mutex<CallStats>,
}

impl std::fmt::Debug for BatchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchClient")
            .field("provider", &self.transport.provider_name())
            .field("model", &self.transport.model_name())
            .field("entities", &self.registry.len())
            .field("depth", &self.depth)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BatchClient {
    /// Create a client committing chains with `depth` by default and giving
    /// each attempt `timeout`.
    pub fn new(
        transport: Arc<dyn Transport>,
        registry: ChainRegistry,
        depth: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            registry,
            depth,
            timeout,
            last_call: Mutex::new(CallStats::default()),
            totals: Mutex::new(CallStats::default()),
        }
    }

    /// A client without entities or chains.
    pub fn stateless(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self::new(transport, ChainRegistry::empty(), 0, timeout)
    }

    /// The registry this client commits to.
    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Default chain depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Run one request with the default depth, propagating any error.
    #[instrument(skip_all, fields(chain = chain_key.map(tracing::field::display)))]
    pub async fn single(
        &self,
        instructions: &str,
        content: &str,
        shape: &OutputShape,
        chain_key: Option<&ChainKey>,
    ) -> MimesisResult<JsonValue> {
        self.reset_last_call();
        self.run_one(instructions, content, shape, chain_key, self.depth)
            .await
    }

    /// Run one request, honouring its depth override, propagating any error.
    #[instrument(skip_all, fields(chain = request.chain_key().as_ref().map(tracing::field::display)))]
    pub async fn execute(&self, request: &Request) -> MimesisResult<JsonValue> {
        self.reset_last_call();
        self.run_request(request).await
    }

    /// Run all requests concurrently. The result at index `i` belongs to
    /// `requests[i]`.
    #[instrument(skip_all, fields(batch_size = requests.len()))]
    pub async fn batch(&self, requests: &[Request]) -> Vec<MimesisResult<JsonValue>> {
        self.reset_last_call();

        let results = join_all(requests.iter().map(|request| self.run_request(request))).await;

        let stats = self.last_call_stats();
        info!(
            requests = requests.len(),
            successes = stats.successes(),
            errors = stats.errors(),
            total_tokens = stats.total_tokens(),
            "Batch settled"
        );
        results
    }

    /// Counters of the most recent `single`, `execute` or `batch` call.
    pub fn last_call_stats(&self) -> CallStats {
        *self.last_call.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counters of every call made through this client.
    pub fn total_stats(&self) -> CallStats {
        *self.totals.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reset_last_call(&self) {
        *self.last_call.lock().unwrap_or_else(PoisonError::into_inner) = CallStats::default();
    }

    async fn run_request(&self, request: &Request) -> MimesisResult<JsonValue> {
        self.run_one(
            request.instructions(),
            request.content(),
            request.shape(),
            request.chain_key().as_ref(),
            request.depth().unwrap_or(self.depth),
        )
        .await
    }

    async fn run_one(
        &self,
        instructions: &str,
        content: &str,
        shape: &OutputShape,
        chain_key: Option<&ChainKey>,
        depth: usize,
    ) -> MimesisResult<JsonValue> {
        let previous = match chain_key {
            Some(key) if depth > 0 => self.registry.get_previous(key),
            _ => None,
        };

        let call = TransportCall {
            instructions,
            content,
            shape,
            previous_token: previous.as_deref(),
            timeout: self.timeout,
        };

        let completion = match self.transport.execute(call).await {
            Ok(completion) => completion,
            Err(e) => {
                self.update_stats(|stats| stats.record_error());
                warn!(chain = ?chain_key.map(ToString::to_string), error = %e, "Request failed");
                return Err(e);
            }
        };

        if let Some(key) = chain_key {
            for token in self.registry.confirm(key, completion.token.as_str(), depth) {
                debug!(chain = %key, token = %token, "Deleting evicted continuation");
                self.transport.delete(&token).await;
            }
            if !self.registry.record_usage(key.entity_id(), &completion.usage) {
                debug!(chain = %key, "Entity not indexed, usage not attributed");
            }
        }

        self.update_stats(|stats| stats.record_success(&completion.usage));
        Ok(completion.output)
    }

    fn update_stats(&self, apply: impl Fn(&mut CallStats)) {
        apply(&mut self.last_call.lock().unwrap_or_else(PoisonError::into_inner));
        apply(&mut self.totals.lock().unwrap_or_else(PoisonError::into_inner));
    }
}
