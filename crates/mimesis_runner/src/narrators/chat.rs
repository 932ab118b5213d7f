//! Chat webhook narrator.

use async_trait::async_trait;
use mimesis_error::{MimesisResult, WebhookError, WebhookErrorKind};
use mimesis_interface::{Narrator, TickReport};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

/// Posts the tick narrative to a chat webhook.
///
/// Only the final report is posted. Each post is bounded by a timeout so a
/// slow webhook delays the end of the tick by at most that long.
///
/// The body is `{"content": "...", "tick": n}`, which Discord-style
/// webhooks accept as-is.
#[derive(Debug, Clone)]
pub struct ChatNarrator {
    client: reqwest::Client,
    webhook_url: String,
    timeout: Duration,
}

impl ChatNarrator {
    /// Default post timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Post to `webhook_url` with the default timeout.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Override the post timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn message(report: &TickReport) -> String {
        let mut message = format!("**Tick {}**", report.tick);
        for line in &report.narrative {
            message.push('\n');
            message.push_str(line);
        }
        message
    }
}

#[async_trait]
impl Narrator for ChatNarrator {
    fn name(&self) -> &str {
        "chat"
    }

    #[instrument(skip_all, fields(tick = report.tick))]
    async fn on_tick_complete(&self, report: &TickReport) -> MimesisResult<()> {
        let body = json!({
            "content": Self::message(report),
            "tick": report.tick,
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| WebhookError::new(WebhookErrorKind::Delivery(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::new(WebhookErrorKind::Rejected(status.as_u16())).into());
        }

        debug!(status = %status, "Posted tick narrative");
        Ok(())
    }
}
