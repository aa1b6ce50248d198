//! Structural validation of a flow graph.

use thiserror::Error;

use crate::flow::{FlowGraph, START_NODE};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("flow name is required")]
    MissingName,
    #[error("flow must define at least one node")]
    EmptyGraph,
    #[error("flow must contain a `start` node")]
    MissingStart,
    #[error("node `{node}` references non-existent next node `{target}`")]
    DanglingNext { node: String, target: String },
    #[error("node `{node}` intent `{intent}` references non-existent next node `{target}`")]
    DanglingIntentNext { node: String, intent: String, target: String },
}

/// Accepts any graph that names a `start` node and whose transition targets
/// all resolve; rejects everything else before a run can begin.
pub fn validate(graph: &FlowGraph) -> Result<(), ValidationError> {
    if graph.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if graph.nodes.is_empty() {
        return Err(ValidationError::EmptyGraph);
    }
    if !graph.contains(START_NODE) {
        return Err(ValidationError::MissingStart);
    }

    for (name, node) in &graph.nodes {
        if let Some(target) = &node.next {
            if !graph.contains(target) {
                return Err(ValidationError::DanglingNext {
                    node: name.clone(),
                    target: target.clone(),
                });
            }
        }

        for intent in &node.intents {
            if let Some(target) = &intent.next {
                if !graph.contains(target) {
                    return Err(ValidationError::DanglingIntentNext {
                        node: name.clone(),
                        intent: intent.name.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}
