use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    chatflow_cli::run().await
}
