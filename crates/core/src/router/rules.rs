//! Deterministic rule-based matching.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::flow::Intent;
use crate::router::{IntentRouter, RouteError};

/// Tokens this short carry no matching signal in the word-overlap tier.
const MIN_SIGNIFICANT_LEN: usize = 3;

/// Three-tier matcher: exact equality, substring containment, then word
/// overlap. Tiers are evaluated in order against the intents in authoring
/// order and each intent's examples in authoring order; the first tier that
/// matches anything wins, so ties always resolve to the earliest-authored
/// intent.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleRouter;

impl RuleRouter {
    pub fn new() -> Self {
        Self
    }

    /// Pure matching function: identical arguments always produce identical
    /// results.
    pub fn match_intent(input: &str, intents: &[Intent]) -> Result<String, RouteError> {
        if intents.is_empty() {
            return Err(RouteError::NoIntents);
        }

        let normalized = input.trim().to_lowercase();

        for intent in intents {
            for example in &intent.examples {
                if example.to_lowercase() == normalized {
                    return Ok(intent.name.clone());
                }
            }
        }

        for intent in intents {
            for example in &intent.examples {
                let example = example.to_lowercase();
                if normalized.contains(&example) || example.contains(&normalized) {
                    return Ok(intent.name.clone());
                }
            }
        }

        let input_tokens = significant_tokens(&normalized);
        if !input_tokens.is_empty() {
            for intent in intents {
                for example in &intent.examples {
                    if word_overlap_matches(&input_tokens, &example.to_lowercase()) {
                        return Ok(intent.name.clone());
                    }
                }
            }
        }

        Err(RouteError::NoMatch)
    }
}

/// At least half of the input's significant tokens must appear in the
/// example; the boundary is inclusive.
fn word_overlap_matches(input_tokens: &BTreeSet<String>, example: &str) -> bool {
    let example_tokens: BTreeSet<&str> = example.split_whitespace().collect();
    let shared =
        input_tokens.iter().filter(|token| example_tokens.contains(token.as_str())).count();
    shared * 2 >= input_tokens.len()
}

fn significant_tokens(normalized: &str) -> BTreeSet<String> {
    normalized
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_SIGNIFICANT_LEN)
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl IntentRouter for RuleRouter {
    async fn route(
        &self,
        input: &str,
        intents: &[Intent],
        _cancel: &CancellationToken,
    ) -> Result<String, RouteError> {
        Self::match_intent(input, intents)
    }
}
