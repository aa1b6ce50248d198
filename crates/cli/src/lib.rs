pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use chatflow_core::config::AppConfig;

#[derive(Debug, Parser)]
#[command(
    name = "chatflow",
    about = "Deterministic CLI chatbot framework",
    long_about = "Run declarative conversational flows from the terminal, with deterministic \
                  intent matching and an optional local-LLM routing fallback.",
    after_help = "Examples:\n  chatflow run --flow flows/support-bot.yaml\n  chatflow run --llm ollama --ollama-model llama2\n  chatflow check --flow flows/support-bot.yaml"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run a conversational flow to completion")]
    Run {
        #[arg(short = 'b', long, help = "Path to the flow YAML file")]
        flow: Option<PathBuf>,
        #[arg(short = 'l', long, help = "LLM provider for the routing fallback (noop, ollama)")]
        llm: Option<String>,
        #[arg(long, help = "Ollama API URL")]
        ollama_url: Option<String>,
        #[arg(long, help = "Ollama model name")]
        ollama_model: Option<String>,
        #[arg(long, help = "Path to a chatflow.toml config file")]
        config: Option<PathBuf>,
    },
    #[command(about = "Validate a flow file without running it")]
    Check {
        #[arg(short = 'b', long, help = "Path to the flow YAML file")]
        flow: Option<PathBuf>,
        #[arg(long, help = "Path to a chatflow.toml config file")]
        config: Option<PathBuf>,
    },
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { flow, llm, ollama_url, ollama_model, config } => {
            commands::run::run(commands::run::RunArgs {
                flow,
                llm,
                ollama_url,
                ollama_model,
                config,
            })
            .await
        }
        Command::Check { flow, config } => commands::check::run(flow, config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

pub(crate) fn init_logging(config: &AppConfig) {
    use chatflow_core::config::LogFormat::{Compact, Json, Pretty};
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}
