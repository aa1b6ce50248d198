//! Conversation engine core.
//!
//! This crate drives a single session through a declarative flow graph:
//!
//! 1. **Flow model** (`flow`) - immutable, pre-validated nodes, intents,
//!    and typed actions loaded from YAML
//! 2. **Routing** (`router`) - deterministic three-tier rule matching with
//!    an optional classifier fallback behind the `LlmProvider` capability
//! 3. **Execution** (`actions`, `session`) - ordered, fail-fast action
//!    application against the session's variable bindings
//! 4. **Rendering** (`render`) - `{{var}}` interpolation and the
//!    line-oriented console capability
//! 5. **Orchestration** (`engine`) - the per-turn loop from `start` to a
//!    terminal node
//!
//! The engine only ever depends on capability contracts (`LlmProvider`,
//! `IntentRouter`, `SessionMutator`, `Console`); concrete variants are
//! wired in by the caller.

pub mod actions;
pub mod config;
pub mod engine;
pub mod flow;
pub mod llm;
pub mod render;
pub mod router;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::ActionExecutor;
pub use config::{
    AppConfig, ConfigError, ConfigOverrides, FlowConfig, LlmConfig, LlmProviderKind, LoadOptions,
    LogFormat, LoggingConfig,
};
pub use engine::{ConversationEngine, EngineError};
pub use flow::loader::{load_file, load_str, ActionError, LoadError};
pub use flow::validate::{validate, ValidationError};
pub use flow::{Action, CaptureMode, FlowGraph, InputSpec, Intent, Node, START_NODE};
pub use llm::{IntentCandidate, LlmError, LlmProvider, NoopProvider, Prompt};
pub use render::{interpolate, Console, ConsoleError, TerminalConsole};
pub use router::{ClassifierRouter, IntentRouter, RouteError, RuleRouter};
pub use session::{Session, SessionMutator, Turn};
