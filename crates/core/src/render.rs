//! Message rendering and the line-oriented console capability.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

use crate::flow::Intent;

/// Prompt written before every input read.
const INPUT_PROMPT: &str = "> ";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("input stream closed")]
    Closed,
    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Substitute `{{name}}` for every currently bound variable. Placeholders
/// without a binding are left verbatim; neither the template nor the
/// bindings are mutated.
pub fn interpolate(template: &str, bindings: &BTreeMap<String, String>) -> String {
    let mut message = template.to_string();
    for (name, value) in bindings {
        let placeholder = format!("{{{{{name}}}}}");
        message = message.replace(&placeholder, value);
    }
    message
}

/// Non-authoritative hint lines listing a node's intents. Matching never
/// consults these; they only tell the user what the node understands.
pub fn intent_hints(intents: &[Intent]) -> Vec<String> {
    if intents.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![String::new(), "Available options:".to_string()];
    for (index, intent) in intents.iter().enumerate() {
        let line = match intent.examples.first() {
            Some(example) => format!("  {}. {} (e.g., \"{example}\")", index + 1, intent.name),
            None => format!("  {}. {}", index + 1, intent.name),
        };
        lines.push(line);
    }
    lines.push(String::new());
    lines
}

/// Line-oriented I/O surface. Reads and writes block the single engine task.
#[async_trait]
pub trait Console: Send {
    async fn write_line(&mut self, line: &str) -> Result<(), ConsoleError>;

    /// Read one input line, trimmed. Fails with [`ConsoleError::Closed`] at
    /// end of input.
    async fn read_line(&mut self) -> Result<String, ConsoleError>;

    async fn show_intents(&mut self, intents: &[Intent]) -> Result<(), ConsoleError> {
        for line in intent_hints(intents) {
            self.write_line(&line).await?;
        }
        Ok(())
    }
}

/// Console bound to the process terminal.
pub struct TerminalConsole {
    input: Lines<BufReader<Stdin>>,
    output: Stdout,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self { input: BufReader::new(tokio::io::stdin()).lines(), output: tokio::io::stdout() }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for TerminalConsole {
    async fn write_line(&mut self, line: &str) -> Result<(), ConsoleError> {
        self.output.write_all(line.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String, ConsoleError> {
        self.output.write_all(INPUT_PROMPT.as_bytes()).await?;
        self.output.flush().await?;

        let line = self.input.next_line().await?.ok_or(ConsoleError::Closed)?;
        Ok(line.trim().to_string())
    }
}
