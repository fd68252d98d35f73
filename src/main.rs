//! rag: terminal client for a RAG question answering service.

use clap::Parser;

use ragline::cli::{self, Cli};
use ragline::notify::{self, Severity};

#[tokio::main]
async fn main() {
    // Load .env if present; absence is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ragline=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = cli::run(cli).await {
        notify::emit(Severity::Error, &err.to_string());
        std::process::exit(1);
    }
}
