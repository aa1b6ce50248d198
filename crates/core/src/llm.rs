//! Language-model capability.
//!
//! The engine depends only on this contract, never on a concrete provider.
//! Routing calls `classify_intent` alone; `extract_entities` and
//! `generate_text` complete the capability for flows that need them. The
//! [`NoopProvider`] variant keeps the system fully functional with no model
//! configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

/// An intent offered to the classifier as a candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentCandidate {
    pub name: String,
    pub examples: Vec<String>,
}

/// A free-form text generation prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no language model provider is configured")]
    Unconfigured,
    #[error("model request failed: {0}")]
    Transport(String),
    #[error("model returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model response could not be parsed: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("model call was cancelled")]
    Cancelled,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Classify `input` as one of `candidates`, returning the intent name.
    async fn classify_intent(
        &self,
        input: &str,
        candidates: &[IntentCandidate],
    ) -> Result<String, LlmError>;

    /// Extract named fields from `input` following `schema` (field name to
    /// description).
    async fn extract_entities(
        &self,
        input: &str,
        schema: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, LlmError>;

    /// Generate free-form text from `prompt`.
    async fn generate_text(&self, prompt: &Prompt) -> Result<String, LlmError>;
}

/// Provider used when no model is configured; every call fails, which keeps
/// routing fully deterministic.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopProvider;

#[async_trait]
impl LlmProvider for NoopProvider {
    async fn classify_intent(
        &self,
        _input: &str,
        _candidates: &[IntentCandidate],
    ) -> Result<String, LlmError> {
        Err(LlmError::Unconfigured)
    }

    async fn extract_entities(
        &self,
        _input: &str,
        _schema: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, LlmError> {
        Err(LlmError::Unconfigured)
    }

    async fn generate_text(&self, _prompt: &Prompt) -> Result<String, LlmError> {
        Err(LlmError::Unconfigured)
    }
}
