//! Live language-model providers for chatflow.
//!
//! Implements the core's `LlmProvider` capability against real backends.
//! The only backend today is Ollama; the core's `NoopProvider` covers the
//! unconfigured case.

pub mod ollama;

pub use ollama::OllamaProvider;
