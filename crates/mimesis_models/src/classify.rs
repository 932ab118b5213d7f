//! Response classification.
//!
//! Maps HTTP outcomes and response bodies onto either a [`Completion`] or a
//! [`ProviderErrorKind`]. Only rate limits, timeouts and connection failures
//! come out transient; everything else is terminal.

use crate::{ContentPart, OutputItem, ResponseStatus, ResponsesResponse};
use chrono::{DateTime, Utc};
use mimesis_core::Usage;
use mimesis_error::{ProviderError, ProviderErrorKind};
use mimesis_interface::{Completion, DebugInfo};
use mimesis_rate_limit::{RetryPolicy, reset_hint_from_headers};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

/// Classify a non-success HTTP status.
///
/// 429 becomes [`ProviderErrorKind::RateLimited`] carrying the wait derived
/// from the reset headers (margin included); 408 and 504 become
/// [`ProviderErrorKind::Timeout`]; anything else is terminal.
///
/// # Examples
///
/// ```
/// use mimesis_error::ProviderErrorKind;
/// use mimesis_models::status_error;
/// use mimesis_rate_limit::RetryPolicy;
/// use reqwest::{StatusCode, header::{HeaderMap, HeaderValue}};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-ratelimit-reset-requests", HeaderValue::from_static("2000ms"));
///
/// let err = status_error(StatusCode::TOO_MANY_REQUESTS, &headers, "", &RetryPolicy::default());
/// assert_eq!(err.kind, ProviderErrorKind::RateLimited { retry_after_ms: 2500 });
/// ```
#[track_caller]
pub fn status_error(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
    policy: &RetryPolicy,
) -> ProviderError {
    let kind = match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let wait = policy.rate_limit_wait(reset_hint_from_headers(headers));
            ProviderErrorKind::RateLimited {
                retry_after_ms: wait.as_millis() as u64,
            }
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderErrorKind::Timeout,
        _ => ProviderErrorKind::HttpStatus {
            status_code: status.as_u16(),
            message: body.to_string(),
        },
    };
    ProviderError::new(kind)
}

/// Classify a failure of the HTTP client itself.
#[track_caller]
pub fn transport_error(err: &reqwest::Error) -> ProviderError {
    let kind = if err.is_timeout() {
        ProviderErrorKind::Timeout
    } else if err.is_decode() {
        ProviderErrorKind::Parse(err.to_string())
    } else {
        ProviderErrorKind::Connection(err.to_string())
    };
    ProviderError::new(kind)
}

/// Turn a decoded response body into a completion or a terminal error.
///
/// A refusal anywhere in the output wins over the status, so a refused and
/// truncated response reports the refusal.
#[track_caller]
pub fn interpret_response(response: ResponsesResponse) -> Result<Completion, ProviderError> {
    let mut payload = None;
    let mut reasoning = Vec::new();

    for item in response.output() {
        match item {
            OutputItem::Message { content } => {
                for part in content {
                    match part {
                        ContentPart::Refusal { refusal } => {
                            return Err(ProviderError::new(ProviderErrorKind::Refusal(
                                refusal.clone(),
                            )));
                        }
                        ContentPart::OutputText { text } if payload.is_none() => {
                            payload = Some(text.as_str());
                        }
                        _ => {}
                    }
                }
            }
            OutputItem::Reasoning { summary } => {
                reasoning.extend(summary.iter().map(|part| part.text.as_str()));
            }
            OutputItem::Other => {}
        }
    }

    match response.status() {
        ResponseStatus::Completed => {}
        ResponseStatus::Incomplete => {
            let reason = response
                .incomplete_details()
                .as_ref()
                .and_then(|details| details.reason.clone())
                .unwrap_or_else(|| "unknown".to_string());
            return Err(ProviderError::new(ProviderErrorKind::Incomplete(reason)));
        }
        ResponseStatus::Failed => {
            let message = response
                .error()
                .as_ref()
                .map(|e| match &e.code {
                    Some(code) => format!("{}: {}", code, e.message),
                    None => e.message.clone(),
                })
                .unwrap_or_else(|| "no error details".to_string());
            return Err(ProviderError::new(ProviderErrorKind::Failed(message)));
        }
        other => {
            return Err(ProviderError::new(ProviderErrorKind::Failed(format!(
                "unexpected response status {:?}",
                other
            ))));
        }
    }

    let text = payload.ok_or_else(|| ProviderError::new(ProviderErrorKind::MissingPayload))?;
    let output = serde_json::from_str(text)
        .map_err(|e| ProviderError::new(ProviderErrorKind::Parse(e.to_string())))?;

    let wire = response.usage().unwrap_or_default();
    let usage = Usage::new(
        wire.input_tokens,
        wire.output_tokens,
        wire.output_tokens_details.unwrap_or_default().reasoning_tokens,
        wire.input_tokens_details.unwrap_or_default().cached_tokens,
    );

    let reasoning = reasoning
        .into_iter()
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>();

    Ok(Completion {
        token: response.id().clone(),
        output,
        usage,
        debug: DebugInfo {
            model: response.model().clone(),
            created_at: response
                .created_at()
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
            reasoning: (!reasoning.is_empty()).then(|| reasoning.join("\n")),
        },
    })
}
