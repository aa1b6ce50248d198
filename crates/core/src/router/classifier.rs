//! Classifier-backed routing fallback.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::flow::Intent;
use crate::llm::{IntentCandidate, LlmError, LlmProvider};
use crate::router::{IntentRouter, RouteError};

/// Routes through an external language model and validates the answer
/// against the candidate set. An unvalidated name is never handed back to
/// the engine; cancellation of the in-flight call surfaces as a classifier
/// failure, which the engine treats as recoverable.
pub struct ClassifierRouter {
    provider: Arc<dyn LlmProvider>,
}

impl ClassifierRouter {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl IntentRouter for ClassifierRouter {
    async fn route(
        &self,
        input: &str,
        intents: &[Intent],
        cancel: &CancellationToken,
    ) -> Result<String, RouteError> {
        if intents.is_empty() {
            return Err(RouteError::NoIntents);
        }

        let candidates: Vec<IntentCandidate> = intents
            .iter()
            .map(|intent| IntentCandidate {
                name: intent.name.clone(),
                examples: intent.examples.clone(),
            })
            .collect();

        let name = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(RouteError::Classifier(LlmError::Cancelled));
            }
            result = self.provider.classify_intent(input, &candidates) => {
                result.map_err(RouteError::Classifier)?
            }
        };

        if intents.iter().any(|intent| intent.name == name) {
            debug!(intent = %name, "classifier resolved intent");
            Ok(name)
        } else {
            Err(RouteError::InvalidResponse { returned: name })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_util::sync::CancellationToken;

    use crate::flow::Intent;
    use crate::llm::{LlmError, NoopProvider};
    use crate::router::{ClassifierRouter, IntentRouter, RouteError};
    use crate::testing::StaticClassifier;

    fn intents() -> Vec<Intent> {
        vec![
            Intent { name: "greet".to_string(), examples: vec!["hello".to_string()], next: None },
            Intent { name: "bye".to_string(), examples: vec!["goodbye".to_string()], next: None },
        ]
    }

    #[tokio::test]
    async fn accepts_a_name_from_the_candidate_set() {
        let router = ClassifierRouter::new(Arc::new(StaticClassifier::answering("bye")));
        let routed = router
            .route("see you", &intents(), &CancellationToken::new())
            .await
            .expect("candidate name should be accepted");
        assert_eq!(routed, "bye");
    }

    #[tokio::test]
    async fn rejects_a_name_outside_the_candidate_set() {
        let router = ClassifierRouter::new(Arc::new(StaticClassifier::answering("refund")));
        let error = router
            .route("see you", &intents(), &CancellationToken::new())
            .await
            .expect_err("foreign name must be rejected");
        assert!(matches!(
            error,
            RouteError::InvalidResponse { ref returned } if returned == "refund"
        ));
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_classifier_error() {
        let router = ClassifierRouter::new(Arc::new(NoopProvider));
        let error = router
            .route("see you", &intents(), &CancellationToken::new())
            .await
            .expect_err("noop provider must fail");
        assert!(matches!(error, RouteError::Classifier(LlmError::Unconfigured)));
    }

    #[tokio::test]
    async fn cancellation_surfaces_as_classifier_error() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let router = ClassifierRouter::new(Arc::new(StaticClassifier::answering("greet")));
        let error = router
            .route("hello", &intents(), &cancel)
            .await
            .expect_err("cancelled call must fail");
        assert!(matches!(error, RouteError::Classifier(LlmError::Cancelled)));
    }

    #[tokio::test]
    async fn empty_candidate_set_fails_before_calling_the_provider() {
        let router = ClassifierRouter::new(Arc::new(StaticClassifier::answering("greet")));
        let error = router
            .route("hello", &[], &CancellationToken::new())
            .await
            .expect_err("empty candidates must fail");
        assert!(matches!(error, RouteError::NoIntents));
    }
}
