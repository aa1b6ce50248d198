//! Ollama-backed provider.
//!
//! Talks to a local Ollama instance over its `/api/generate` endpoint with
//! non-streaming JSON requests. Prompts instruct the model to answer with
//! JSON only; the answer is parsed and validated by the caller against the
//! candidate set.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use chatflow_core::llm::{IntentCandidate, LlmError, LlmProvider, Prompt};

pub struct OllamaProvider {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Build a provider against `base_url` (e.g. `http://localhost:11434`).
    /// `timeout` bounds every request; the engine treats an elapsed timeout
    /// like any other classifier failure.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| LlmError::Transport(error.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest { model: &self.model, prompt, stream: false };

        debug!(model = %self.model, url = %url, "ollama generate request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|error| LlmError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status: status.as_u16(), body });
        }

        let envelope: GenerateResponse = response
            .json()
            .await
            .map_err(|error| LlmError::Transport(error.to_string()))?;
        Ok(envelope.response)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn classify_intent(
        &self,
        input: &str,
        candidates: &[IntentCandidate],
    ) -> Result<String, LlmError> {
        let prompt = classification_prompt(input, candidates);
        let response = self.generate(&prompt).await?;
        parse_intent_response(&response)
    }

    async fn extract_entities(
        &self,
        input: &str,
        schema: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, LlmError> {
        let prompt = extraction_prompt(input, schema);
        let response = self.generate(&prompt).await?;
        parse_entity_response(&response)
    }

    async fn generate_text(&self, prompt: &Prompt) -> Result<String, LlmError> {
        self.generate(&prompt.text).await
    }
}

fn classification_prompt(input: &str, candidates: &[IntentCandidate]) -> String {
    let mut prompt = String::new();
    prompt.push_str("Classify the following user input into one of the provided intents.\n");
    prompt.push_str("Respond with JSON only: {\"intent\": \"<intent_name>\"}\n\n");
    let _ = writeln!(prompt, "User input: {input}\n");
    prompt.push_str("Available intents:\n");
    for candidate in candidates {
        let _ = writeln!(
            prompt,
            "- {} (examples: {})",
            candidate.name,
            candidate.examples.join(", ")
        );
    }
    prompt
}

fn extraction_prompt(input: &str, schema: &BTreeMap<String, String>) -> String {
    let mut prompt = String::new();
    prompt.push_str("Extract entities from the following user input.\n");
    prompt.push_str("Respond with JSON only containing the extracted entities.\n\n");
    let _ = writeln!(prompt, "User input: {input}\n");
    prompt.push_str("Schema:\n");
    for (field, description) in schema {
        let _ = writeln!(prompt, "- {field}: {description}");
    }
    prompt
}

fn parse_intent_response(raw: &str) -> Result<String, LlmError> {
    #[derive(Deserialize)]
    struct IntentReply {
        intent: String,
    }

    let reply: IntentReply = serde_json::from_str(raw.trim()).map_err(LlmError::Parse)?;
    Ok(reply.intent)
}

fn parse_entity_response(raw: &str) -> Result<BTreeMap<String, String>, LlmError> {
    serde_json::from_str(raw.trim()).map_err(LlmError::Parse)
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}
