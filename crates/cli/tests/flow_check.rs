use std::fs;

use clap::Parser;
use tempfile::TempDir;

use chatflow_cli::{commands, Cli};

const VALID_FLOW: &str = r#"
bot:
  name: support-bot
flows:
  start:
    message: "Hi!"
    intents:
      - name: greet
        examples: ["hello", "hi"]
        next: farewell
  farewell:
    message: "Bye"
"#;

const DANGLING_FLOW: &str = r#"
bot:
  name: support-bot
flows:
  start:
    message: "Hi!"
    next: missing
"#;

#[test]
fn check_accepts_a_valid_flow_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("flow.yaml");
    fs::write(&path, VALID_FLOW).expect("write flow");

    commands::check::run(Some(path), None).expect("valid flow should pass check");
}

#[test]
fn check_rejects_a_dangling_reference() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("flow.yaml");
    fs::write(&path, DANGLING_FLOW).expect("write flow");

    let error = commands::check::run(Some(path), None).expect_err("dangling flow must fail");
    let chain = format!("{error:#}");
    assert!(chain.contains("non-existent"), "unexpected error chain: {chain}");
}

#[test]
fn check_reports_a_missing_flow_file() {
    let error = commands::check::run(Some("no/such/flow.yaml".into()), None)
        .expect_err("missing file must fail");
    let chain = format!("{error:#}");
    assert!(chain.contains("could not read flow file"), "unexpected error chain: {chain}");
}

#[test]
fn cli_accepts_run_and_check_invocations() {
    Cli::try_parse_from(["chatflow", "run", "--flow", "flow.yaml", "--llm", "ollama"])
        .expect("run invocation should parse");
    Cli::try_parse_from(["chatflow", "check", "--flow", "flow.yaml"])
        .expect("check invocation should parse");
    Cli::try_parse_from(["chatflow", "converse"]).expect_err("unknown subcommand must fail");
}
