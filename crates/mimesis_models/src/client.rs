//! Responses API transport.

use crate::{
    LlmMetrics, ReasoningConfig, ResponsesRequest, ResponsesResponse, TextConfig, TextFormat,
    interpret_response, status_error, strict_schema, transport_error,
};
use async_trait::async_trait;
use mimesis_error::{
    MimesisResult, ProviderError, ProviderErrorKind, RequestError, RequestErrorKind,
};
use mimesis_interface::{Completion, Transport, TransportCall};
use mimesis_rate_limit::{MimesisConfig, ProviderSettings, RequestLimiter, RetryPolicy};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument, warn};

const PROVIDER: &str = "openai";
const DELETE_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport over an OpenAI-style Responses API.
///
/// Each call is retried by the configured [`RetryPolicy`] and gated by the
/// shared [`RequestLimiter`]. Clones share the HTTP connection pool and the
/// limiter.
#[derive(Clone)]
pub struct ResponsesTransport {
    client: Client,
    api_key: String,
    settings: ProviderSettings,
    endpoint: String,
    policy: RetryPolicy,
    limiter: RequestLimiter,
}

impl std::fmt::Debug for ResponsesTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponsesTransport")
            .field("endpoint", &self.endpoint)
            .field("model", &self.settings.model)
            .field("policy", &self.policy)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl ResponsesTransport {
    /// Build a transport from configuration, reading the API key from the
    /// configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::MissingApiKey`] when the variable is unset.
    #[instrument(skip(config), fields(model = %config.provider.model))]
    pub fn from_config(config: &MimesisConfig) -> MimesisResult<Self> {
        let env = &config.provider.api_key_env;
        let api_key = std::env::var(env).map_err(|_| {
            error!(env = %env, "API key not set");
            ProviderError::new(ProviderErrorKind::MissingApiKey(env.clone()))
        })?;

        Ok(Self::with_api_key(
            api_key,
            config.provider.clone(),
            RetryPolicy::new(&config.retry),
            RequestLimiter::new(&config.limits),
        ))
    }

    /// Build a transport with an explicit API key.
    pub fn with_api_key(
        api_key: impl Into<String>,
        settings: ProviderSettings,
        policy: RetryPolicy,
        limiter: RequestLimiter,
    ) -> Self {
        let endpoint = format!("{}/responses", settings.base_url.trim_end_matches('/'));
        debug!(endpoint = %endpoint, "Creating Responses transport");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            settings,
            endpoint,
            policy,
            limiter,
        }
    }

    /// Endpoint receiving `POST` requests.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Translate a call into a request body.
    pub fn build_request(&self, call: &TransportCall<'_>) -> MimesisResult<ResponsesRequest> {
        let shape = call.shape;
        let schema = if *shape.strict() {
            strict_schema(shape.schema())
        } else {
            shape.schema().clone()
        };

        let mut builder = ResponsesRequest::builder();
        builder
            .model(self.settings.model.clone())
            .instructions(call.instructions)
            .input(call.content)
            .text(TextConfig {
                format: TextFormat::json_schema(shape.name().clone(), schema, *shape.strict()),
                verbosity: self.settings.verbosity.clone(),
            })
            .reasoning(self.settings.reasoning_effort.clone().map(|effort| {
                ReasoningConfig {
                    effort,
                    summary: Some("auto".to_string()),
                }
            }))
            .previous_response_id(call.previous_token.map(str::to_string))
            .max_output_tokens(self.settings.max_output_tokens)
            .truncation(self.settings.truncation.clone());

        builder
            .build()
            .map_err(|e| RequestError::new(RequestErrorKind::InvalidBody(e.to_string())).into())
    }

    async fn send_once(&self, body: &ResponsesRequest) -> Result<Completion, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Request to provider failed");
                transport_error(&e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &headers, &text, &self.policy));
        }

        let decoded: ResponsesResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to decode provider response");
            transport_error(&e)
        })?;
        debug!(response_id = %decoded.id(), status = ?decoded.status(), "Received response");

        interpret_response(decoded)
    }
}

#[async_trait]
impl Transport for ResponsesTransport {
    #[instrument(
        skip(self, call),
        fields(
            provider = PROVIDER,
            model = %self.settings.model,
            schema = %call.shape.name(),
            chained = call.previous_token.is_some(),
        )
    )]
    async fn execute(&self, call: TransportCall<'_>) -> MimesisResult<Completion> {
        let body = self.build_request(&call)?;
        let started = Instant::now();

        let result = self
            .policy
            .run(&self.limiter, call.timeout, || self.send_once(&body))
            .await;

        let metrics = LlmMetrics::get();
        match result {
            Ok(completion) => {
                let elapsed = started.elapsed().as_secs_f64();
                metrics.record_success(PROVIDER, &self.settings.model, elapsed, &completion.usage);
                debug!(
                    token = %completion.token,
                    total_tokens = completion.usage.total_tokens(),
                    elapsed_secs = elapsed,
                    "Call completed"
                );
                Ok(completion)
            }
            Err(e) => {
                metrics.record_error(PROVIDER, &self.settings.model, &e.kind);
                error!(error = %e.kind, "Call failed");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn delete(&self, token: &str) {
        let url = format!("{}/{}", self.endpoint, token);
        let outcome = self
            .client
            .delete(&url)
            .bearer_auth(&self.api_key)
            .timeout(DELETE_TIMEOUT)
            .send()
            .await;

        match outcome {
            Ok(response) if response.status().is_success() => {
                debug!("Deleted continuation token");
            }
            Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                debug!("Continuation token already gone");
            }
            Ok(response) => {
                warn!(status = %response.status(), "Provider refused to delete continuation token");
                LlmMetrics::get().record_orphan(PROVIDER);
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete continuation token");
                LlmMetrics::get().record_orphan(PROVIDER);
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}
