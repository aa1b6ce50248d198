//! Input-to-intent routing.
//!
//! Two router variants share one contract: the deterministic [`RuleRouter`]
//! and the [`ClassifierRouter`] over a language model. The engine consults
//! them in that order.

mod classifier;
mod rules;

pub use classifier::ClassifierRouter;
pub use rules::RuleRouter;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::flow::Intent;
use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no intents provided")]
    NoIntents,
    #[error("no matching intent found")]
    NoMatch,
    #[error("intent classification failed: {0}")]
    Classifier(#[source] LlmError),
    #[error("classifier returned an intent outside the candidate set: `{returned}`")]
    InvalidResponse { returned: String },
}

#[async_trait]
pub trait IntentRouter: Send + Sync {
    /// Resolve `input` to the name of one of `intents`. A returned name is
    /// always a member of the candidate set.
    async fn route(
        &self,
        input: &str,
        intents: &[Intent],
        cancel: &CancellationToken,
    ) -> Result<String, RouteError>;
}
