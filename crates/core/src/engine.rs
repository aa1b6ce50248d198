//! The conversation engine.
//!
//! Drives one session through the flow graph, one transition per loop
//! iteration: render the current node, stop on a terminal node, read a
//! line, then take exactly one of the capture / intent-routing /
//! plain-transition branches. Routing failures reprompt on the same node;
//! every other failure terminates the run.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::actions::ActionExecutor;
use crate::flow::loader::ActionError;
use crate::flow::{FlowGraph, Intent};
use crate::llm::LlmProvider;
use crate::render::{self, Console, ConsoleError};
use crate::router::{ClassifierRouter, IntentRouter, RouteError, RuleRouter};
use crate::session::{Session, SessionMutator, Turn};

/// Notice shown when neither router resolves the input.
const FALLBACK_NOTICE: &str = "I didn't understand that. Please try again.";

#[derive(Debug, Error)]
pub enum EngineError {
    /// The session points at a node the graph does not contain. Transition
    /// is the only mutator of the current node, so this indicates a broken
    /// invariant (or an unvalidated graph).
    #[error("current node `{node}` is not part of the flow graph")]
    NodeNotFound { node: String },
    #[error("invalid transition from `{from}`: target `{target}` is not part of the flow graph")]
    InvalidTransition { from: String, target: String },
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("failed to read input: {0}")]
    InputRead(#[source] ConsoleError),
    #[error("failed to write output: {0}")]
    OutputWrite(#[source] ConsoleError),
    #[error("run cancelled while awaiting input")]
    Cancelled,
}

/// Orchestrates one conversation run over an immutable flow graph.
pub struct ConversationEngine<C> {
    flow: FlowGraph,
    session: Session,
    rules: RuleRouter,
    classifier: Option<ClassifierRouter>,
    executor: ActionExecutor,
    console: C,
}

impl<C: Console> ConversationEngine<C> {
    pub fn new(flow: FlowGraph, console: C) -> Self {
        Self {
            flow,
            session: Session::new(),
            rules: RuleRouter::new(),
            classifier: None,
            executor: ActionExecutor::new(),
            console,
        }
    }

    /// Configure the classifier fallback consulted when rule matching fails.
    pub fn with_classifier(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.classifier = Some(ClassifierRouter::new(provider));
        self
    }

    /// Read-only view of the run's session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Drive the conversation until a terminal node renders. Cancellation
    /// observed at the input read aborts the run; cancellation during a
    /// classifier call only fails that routing attempt.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), EngineError> {
        loop {
            let node_name = self.session.current_node().to_string();
            let node = self
                .flow
                .node(&node_name)
                .cloned()
                .ok_or_else(|| EngineError::NodeNotFound { node: node_name.clone() })?;

            let rendered = render::interpolate(&node.message, self.session.variables());
            self.console.write_line(&rendered).await.map_err(EngineError::OutputWrite)?;

            if node.is_terminal() {
                info!(
                    node = %node_name,
                    turns = self.session.history().len(),
                    "conversation finished"
                );
                return Ok(());
            }

            if !node.intents.is_empty() {
                self.console
                    .show_intents(&node.intents)
                    .await
                    .map_err(EngineError::OutputWrite)?;
            }

            let user_input = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(EngineError::Cancelled),
                line = self.console.read_line() => line.map_err(EngineError::InputRead)?,
            };

            // Input capture wins over intents when a node declares both.
            if let Some(input_spec) = &node.input {
                self.session.set_variable(&input_spec.save_as, &user_input);
                self.executor.execute(&node.actions, &user_input, &mut self.session)?;
                if let Some(target) = &node.next {
                    self.transition(&node_name, target)?;
                }
                self.commit_turn(&node_name, &user_input, &rendered);
                continue;
            }

            if !node.intents.is_empty() {
                let matched = match self.route(&user_input, &node.intents, &cancel).await {
                    Ok(name) => name,
                    Err(error) => {
                        debug!(node = %node_name, error = %error, "routing failed, reprompting");
                        self.console
                            .write_line(FALLBACK_NOTICE)
                            .await
                            .map_err(EngineError::OutputWrite)?;
                        continue;
                    }
                };

                // Routers only return names drawn from the candidate set,
                // and the first authoring-order occurrence wins.
                let Some(intent) = node.intents.iter().find(|intent| intent.name == matched)
                else {
                    self.console
                        .write_line(FALLBACK_NOTICE)
                        .await
                        .map_err(EngineError::OutputWrite)?;
                    continue;
                };

                self.executor.execute(&node.actions, &user_input, &mut self.session)?;
                if let Some(target) = &intent.next {
                    self.transition(&node_name, target)?;
                }
                self.commit_turn(&node_name, &user_input, &rendered);
                continue;
            }

            if let Some(target) = &node.next {
                self.executor.execute(&node.actions, &user_input, &mut self.session)?;
                self.transition(&node_name, target)?;
                self.commit_turn(&node_name, &user_input, &rendered);
            }
        }
    }

    async fn route(
        &self,
        input: &str,
        intents: &[Intent],
        cancel: &CancellationToken,
    ) -> Result<String, RouteError> {
        match self.rules.route(input, intents, cancel).await {
            Ok(name) => Ok(name),
            Err(rule_error) => match &self.classifier {
                Some(classifier) => {
                    debug!(error = %rule_error, "rule matching failed, trying classifier");
                    classifier.route(input, intents, cancel).await
                }
                None => Err(rule_error),
            },
        }
    }

    /// The only mutator of the session's current node.
    fn transition(&mut self, from: &str, target: &str) -> Result<(), EngineError> {
        if target.is_empty() || !self.flow.contains(target) {
            return Err(EngineError::InvalidTransition {
                from: from.to_string(),
                target: target.to_string(),
            });
        }
        debug!(from = %from, to = %target, "transition");
        self.session.set_current_node(target);
        Ok(())
    }

    fn commit_turn(&mut self, node: &str, user_input: &str, response: &str) {
        self.session.record_turn(Turn {
            node: node.to_string(),
            user_input: user_input.to_string(),
            response: response.to_string(),
        });
    }
}
