//! Responses API data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Structured output format sent in `text.format`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFormat {
    /// Always `json_schema`
    #[serde(rename = "type")]
    pub format_type: String,
    /// Schema name
    pub name: String,
    /// JSON schema
    pub schema: JsonValue,
    /// Strict schema adherence
    pub strict: bool,
}

impl TextFormat {
    /// A `json_schema` format.
    pub fn json_schema(name: impl Into<String>, schema: JsonValue, strict: bool) -> Self {
        Self {
            format_type: "json_schema".to_string(),
            name: name.into(),
            schema,
            strict,
        }
    }
}

/// Text output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Output format
    pub format: TextFormat,
    /// Verbosity knob
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<String>,
}

/// Reasoning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningConfig {
    /// Effort knob
    pub effort: String,
    /// Reasoning summary mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Responses API request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ResponsesRequest {
    /// Model identifier
    model: String,
    /// System instructions
    instructions: String,
    /// User input
    input: String,
    /// Output configuration
    text: TextConfig,
    /// Reasoning configuration
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<ReasoningConfig>,
    /// Continuation token
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_response_id: Option<String>,
    /// Output size cap
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    /// Context truncation strategy
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    truncation: Option<String>,
    /// Keep the response server-side so it can be continued
    #[builder(default = "true")]
    store: bool,
}

impl ResponsesRequest {
    /// Creates a new builder for `ResponsesRequest`.
    pub fn builder() -> ResponsesRequestBuilder {
        ResponsesRequestBuilder::default()
    }
}

/// Lifecycle status of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Finished with output
    Completed,
    /// Stopped early (output cap, content filter)
    Incomplete,
    /// Provider-side failure
    Failed,
    /// Still running
    InProgress,
    /// Waiting to run
    Queued,
    /// Cancelled
    Cancelled,
    /// Anything newer than this client
    #[serde(other)]
    Unknown,
}

/// Text segment of a reasoning summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPart {
    /// Summary text
    #[serde(default)]
    pub text: String,
}

/// Content of an output message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Generated text (the structured payload)
    OutputText {
        /// JSON text
        text: String,
    },
    /// Safety refusal
    Refusal {
        /// Refusal explanation
        refusal: String,
    },
    /// Unrecognised part
    #[serde(other)]
    Other,
}

/// One item of the `output` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    /// Assistant message
    Message {
        /// Message parts
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    /// Reasoning trace
    Reasoning {
        /// Summary parts
        #[serde(default)]
        summary: Vec<SummaryPart>,
    },
    /// Unrecognised item
    #[serde(other)]
    Other,
}

/// Breakdown of input tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTokensDetails {
    /// Prompt tokens served from cache
    #[serde(default)]
    pub cached_tokens: u64,
}

/// Breakdown of output tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTokensDetails {
    /// Hidden reasoning tokens
    #[serde(default)]
    pub reasoning_tokens: u64,
}

/// Usage block of a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireUsage {
    /// Prompt tokens
    #[serde(default)]
    pub input_tokens: u64,
    /// Generated tokens
    #[serde(default)]
    pub output_tokens: u64,
    /// Input breakdown
    #[serde(default)]
    pub input_tokens_details: Option<InputTokensDetails>,
    /// Output breakdown
    #[serde(default)]
    pub output_tokens_details: Option<OutputTokensDetails>,
}

/// Error reported inside a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    /// Error code
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

/// Why a response is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteDetails {
    /// Reason, e.g. `max_output_tokens`
    #[serde(default)]
    pub reason: Option<String>,
}

/// Responses API response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ResponsesResponse {
    /// Response ID, used as the continuation token
    id: String,
    /// Lifecycle status
    status: ResponseStatus,
    /// Model that answered
    #[serde(default)]
    model: String,
    /// Unix creation time in seconds
    #[serde(default)]
    created_at: Option<i64>,
    /// Output items
    #[serde(default)]
    output: Vec<OutputItem>,
    /// Token usage
    #[serde(default)]
    usage: Option<WireUsage>,
    /// Failure details
    #[serde(default)]
    error: Option<WireError>,
    /// Incompleteness details
    #[serde(default)]
    incomplete_details: Option<IncompleteDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_unset_options() {
        let request = ResponsesRequest::builder()
            .model("gpt-5-mini")
            .instructions("be brief")
            .input("hi")
            .text(TextConfig {
                format: TextFormat::json_schema("reply", json!({"type": "object"}), true),
                verbosity: None,
            })
            .build()
            .unwrap();

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["text"]["format"]["type"], "json_schema");
        assert_eq!(body["store"], true);
        assert!(body.get("previous_response_id").is_none());
        assert!(body.get("reasoning").is_none());
        assert!(body["text"].get("verbosity").is_none());
    }

    #[test]
    fn test_response_tolerates_unknown_items() {
        let response: ResponsesResponse = serde_json::from_value(json!({
            "id": "resp_1",
            "status": "completed",
            "output": [
                {"type": "web_search_call", "id": "ws_1"},
                {"type": "message", "content": [
                    {"type": "annotation"},
                    {"type": "output_text", "text": "{}"}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(response.output()[0], OutputItem::Other);
        assert_eq!(
            response.output()[1],
            OutputItem::Message {
                content: vec![
                    ContentPart::Other,
                    ContentPart::OutputText {
                        text: "{}".to_string()
                    }
                ]
            }
        );
        assert!(response.usage().is_none());
    }

    #[test]
    fn test_unknown_status() {
        let status: ResponseStatus = serde_json::from_value(json!("paused_for_review")).unwrap();
        assert_eq!(status, ResponseStatus::Unknown);
    }
}
