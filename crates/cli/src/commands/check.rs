use std::path::PathBuf;

use anyhow::{Context, Result};

use chatflow_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use chatflow_core::flow::loader;

/// Load and validate a flow file without running it.
pub fn run(flow: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(LoadOptions {
        config_path: config,
        overrides: ConfigOverrides { flow_path: flow, ..ConfigOverrides::default() },
        ..LoadOptions::default()
    })
    .context("failed to load configuration")?;

    let graph = loader::load_file(&config.flow.path)
        .with_context(|| format!("flow `{}` failed validation", config.flow.path.display()))?;

    println!("ok: flow `{}` with {} nodes", graph.name, graph.nodes.len());
    Ok(())
}
