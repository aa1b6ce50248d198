use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use chatflow_core::config::{AppConfig, ConfigOverrides, LlmProviderKind, LoadOptions};
use chatflow_core::engine::ConversationEngine;
use chatflow_core::flow::loader;
use chatflow_core::llm::{LlmProvider, NoopProvider};
use chatflow_core::render::TerminalConsole;
use chatflow_llm::OllamaProvider;

pub struct RunArgs {
    pub flow: Option<PathBuf>,
    pub llm: Option<String>,
    pub ollama_url: Option<String>,
    pub ollama_model: Option<String>,
    pub config: Option<PathBuf>,
}

/// Load config and flow, wire the selected provider, and drive the
/// conversation to completion. Ctrl-C cancels the run cooperatively.
pub async fn run(args: RunArgs) -> Result<()> {
    let llm_provider = args
        .llm
        .as_deref()
        .map(str::parse::<LlmProviderKind>)
        .transpose()
        .context("invalid --llm value")?;

    let config = AppConfig::load(LoadOptions {
        config_path: args.config,
        overrides: ConfigOverrides {
            flow_path: args.flow,
            llm_provider,
            llm_base_url: args.ollama_url,
            llm_model: args.ollama_model,
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    })
    .context("failed to load configuration")?;

    crate::init_logging(&config);

    let flow = loader::load_file(&config.flow.path)
        .with_context(|| format!("failed to load flow `{}`", config.flow.path.display()))?;

    info!(flow = %flow.name, nodes = flow.nodes.len(), "flow loaded");

    let provider: Arc<dyn LlmProvider> = match config.llm.provider {
        LlmProviderKind::Noop => Arc::new(NoopProvider),
        LlmProviderKind::Ollama => Arc::new(
            OllamaProvider::new(
                config.llm.base_url.clone(),
                config.llm.model.clone(),
                config.llm.timeout(),
            )
            .context("failed to build the ollama provider")?,
        ),
    };

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let mut engine =
        ConversationEngine::new(flow, TerminalConsole::new()).with_classifier(provider);
    engine.run(cancel).await.context("conversation error")?;

    Ok(())
}

fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(error = %error, "could not listen for ctrl-c");
            return;
        }
        cancel.cancel();
    });
}
