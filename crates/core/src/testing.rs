//! Test doubles for the engine's capabilities.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm::{IntentCandidate, LlmError, LlmProvider, Prompt};
use crate::render::{Console, ConsoleError};

/// Everything a scripted console has written, shared with the test body.
pub(crate) type Transcript = Arc<Mutex<Vec<String>>>;

/// Console fed from a fixed input script, capturing every written line.
/// Reads past the end of the script fail like a closed input stream.
pub(crate) struct ScriptedConsole {
    inputs: VecDeque<String>,
    written: Transcript,
}

impl ScriptedConsole {
    pub(crate) fn new<'a, I>(inputs: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            inputs: inputs.into_iter().map(str::to_string).collect(),
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn transcript(&self) -> Transcript {
        Arc::clone(&self.written)
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn write_line(&mut self, line: &str) -> Result<(), ConsoleError> {
        self.written.lock().expect("transcript lock").push(line.to_string());
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String, ConsoleError> {
        self.inputs.pop_front().ok_or(ConsoleError::Closed)
    }
}

/// Provider that always answers `classify_intent` with one fixed name.
pub(crate) struct StaticClassifier {
    intent: String,
}

impl StaticClassifier {
    pub(crate) fn answering(intent: &str) -> Self {
        Self { intent: intent.to_string() }
    }
}

#[async_trait]
impl LlmProvider for StaticClassifier {
    async fn classify_intent(
        &self,
        _input: &str,
        _candidates: &[IntentCandidate],
    ) -> Result<String, LlmError> {
        Ok(self.intent.clone())
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
