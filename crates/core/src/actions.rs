//! Action execution.

use tracing::debug;

use crate::flow::loader::ActionError;
use crate::flow::Action;
use crate::session::SessionMutator;

/// Executes a node's action list, in order, against a session-mutation
/// capability. Execution is fail-fast: the first failure stops the
/// remaining actions, and already-applied actions are not rolled back.
/// Argument shapes are validated when the flow is loaded, so the only work
/// left here is the mutation itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionExecutor;

impl ActionExecutor {
    pub fn new() -> Self {
        Self
    }

    pub fn execute<M: SessionMutator>(
        &self,
        actions: &[Action],
        raw_input: &str,
        mutator: &mut M,
    ) -> Result<(), ActionError> {
        for action in actions {
            self.execute_one(action, raw_input, mutator)?;
        }
        Ok(())
    }

    fn execute_one<M: SessionMutator>(
        &self,
        action: &Action,
        raw_input: &str,
        mutator: &mut M,
    ) -> Result<(), ActionError> {
        match action {
            Action::SetVar { name, value } => {
                let value = value.as_deref().unwrap_or(raw_input);
                debug!(variable = %name, "set_var");
                mutator.set_variable(name, value);
                Ok(())
            }
        }
    }
}
