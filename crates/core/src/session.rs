//! Per-run session state.

use std::collections::BTreeMap;

use crate::flow::START_NODE;

/// Mutable state of one conversation run: the current node, the variable
/// bindings, and the committed turn history. Created once per run, owned
/// exclusively by the conversation engine, and discarded with the process.
#[derive(Clone, Debug)]
pub struct Session {
    current_node: String,
    variables: BTreeMap<String, String>,
    history: Vec<Turn>,
}

/// One committed exchange. Append-only and kept for observability; the
/// engine never reads it back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub node: String,
    pub user_input: String,
    pub response: String,
}

/// Capability the action executor mutates variables through.
pub trait SessionMutator {
    fn set_variable(&mut self, name: &str, value: &str);
}

impl Session {
    pub fn new() -> Self {
        Self {
            current_node: START_NODE.to_string(),
            variables: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    pub fn current_node(&self) -> &str {
        &self.current_node
    }

    pub(crate) fn set_current_node(&mut self, node: impl Into<String>) {
        self.current_node = node.into();
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub(crate) fn record_turn(&mut self, turn: Turn) {
        self.history.push(turn);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMutator for Session {
    fn set_variable(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }
}
