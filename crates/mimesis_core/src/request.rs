//! Request value objects.

use crate::ChainKey;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Expected structured output: a named JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct OutputShape {
    /// Schema name sent to the provider
    name: String,
    /// JSON schema the output must satisfy
    schema: JsonValue,
    /// Whether the provider must follow the schema strictly
    #[serde(default = "default_strict")]
    strict: bool,
}

fn default_strict() -> bool {
    true
}

impl OutputShape {
    /// Create a strict shape.
    pub fn new(name: impl Into<String>, schema: JsonValue) -> Self {
        Self {
            name: name.into(),
            schema,
            strict: true,
        }
    }

    /// Relax strict schema adherence.
    pub fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }
}

/// One logical provider request.
///
/// Instructions and content must be non-empty. A request without a chain key
/// is stateless; `depth` overrides the executor default for chain commits.
///
/// # Examples
///
/// ```
/// use mimesis_core::{OutputShape, Request};
/// use serde_json::json;
///
/// let request = Request::builder()
///     .instructions("You are Bob.")
///     .content("What do you do next?")
///     .shape(OutputShape::new("intention", json!({"type": "object"})))
///     .chain_key(Some("intention:bob".parse().unwrap()))
///     .depth(Some(3_usize))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.chain_key().as_ref().unwrap().entity_id(), "bob");
/// assert!(Request::builder()
///     .instructions("")
///     .content("x")
///     .shape(OutputShape::new("s", json!({})))
///     .build()
///     .is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct Request {
    /// System instructions
    instructions: String,
    /// User content
    content: String,
    /// Expected output shape
    shape: OutputShape,
    /// Chain to continue and commit to
    #[builder(default)]
    chain_key: Option<ChainKey>,
    /// Chain depth override
    #[builder(default)]
    depth: Option<usize>,
}

impl Request {
    /// Create a new builder.
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }
}

impl RequestBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.instructions.as_ref().is_some_and(|s| s.trim().is_empty()) {
            return Err("instructions must not be empty".to_string());
        }
        if self.content.as_ref().is_some_and(|s| s.trim().is_empty()) {
            return Err("content must not be empty".to_string());
        }
        Ok(())
    }
}
