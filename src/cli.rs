//! Command-line interface definitions and one-shot command handlers.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use crate::client::RagClient;
use crate::config::{self, Config};
use crate::notify::{self, Severity};
use crate::render::{self, chart, highlight, CONTENT_PLACEHOLDER};
use crate::tui;

#[derive(Debug, Parser)]
#[command(
    name = "rag",
    about = "Terminal client for a RAG question answering service",
    version
)]
pub struct Cli {
    /// Backend endpoint override (e.g. http://127.0.0.1:5000).
    #[arg(long, global = true, env = "RAGLINE_ENDPOINT")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask a question and show the answer with source relevance.
    Query {
        /// Question text (words are joined with spaces).
        text: Vec<String>,
        /// Skip the relevance chart.
        #[arg(long)]
        no_chart: bool,
    },
    /// Upload a document for indexing.
    Upload {
        /// Path to the file to upload.
        file: PathBuf,
    },
    /// Work with indexed documents.
    Docs {
        #[command(subcommand)]
        command: DocsCommand,
    },
    /// Show recent queries.
    Recent {
        /// Maximum number of queries to show (defaults from config).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Launch the interactive terminal UI.
    Ui,
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Debug, Subcommand)]
pub enum DocsCommand {
    /// List indexed documents.
    List,
    /// Show one document with its chunk previews.
    Show {
        /// Document id.
        id: i64,
    },
}

/// Resolve settings, build the client, and dispatch the subcommand.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = config::load_settings().await;
    if let Some(ref endpoint) = cli.endpoint {
        settings.endpoint = endpoint.trim_end_matches('/').to_string();
    }
    if let Err(msg) = settings.validate() {
        anyhow::bail!(msg);
    }
    let client = RagClient::new(&settings);

    match cli.command {
        Command::Query { text, no_chart } => {
            query_command(&client, &text.join(" "), no_chart).await
        }
        Command::Upload { file } => upload_command(&client, &file).await,
        Command::Docs {
            command: DocsCommand::List,
        } => list_command(&client).await,
        Command::Docs {
            command: DocsCommand::Show { id },
        } => show_command(&client, id).await,
        Command::Recent { limit } => {
            recent_command(&client, limit.unwrap_or(settings.recent_limit)).await
        }
        Command::Ui => tui::launch(client, settings.recent_limit).await,
        Command::Config => config_command(&settings),
    }
}

async fn query_command(client: &RagClient, text: &str, no_chart: bool) -> anyhow::Result<()> {
    let outcome = client.submit_query(text).await?;

    println!("{}", style("Answer").bold().underlined());
    println!("{}\n", outcome.response);

    if !no_chart {
        let width = Term::stdout()
            .size_checked()
            .map(|(_, cols)| cols as usize)
            .unwrap_or(80)
            .min(100);
        if let Some(frame) = chart::relevance_chart(&outcome.sources, width) {
            println!("{}", style("Source relevance").bold().underlined());
            print!("{}", frame);
            println!();
        }
    }

    for source in &outcome.sources {
        let pct = chart::score_percent(source.relevance_score);
        println!(
            "{} {}  {}",
            style("●").cyan(),
            style(&source.document_title).bold(),
            style(chart::relevance_label(pct)).dim(),
        );
        let excerpt = render::truncate(&source.chunk_content, 400);
        let highlighted = highlight::highlight_terminal(&excerpt, text);
        println!("  {}\n", highlighted.replace('\n', "\n  "));
    }
    Ok(())
}

async fn upload_command(client: &RagClient, file: &Path) -> anyhow::Result<()> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("uploading [{bar:40.cyan/blue}] {pos:>3}%")?
            .progress_chars("█░ "),
    );

    let progress_bar = bar.clone();
    let result = client
        .upload_document(file, move |pct| progress_bar.set_position(pct as u64))
        .await;

    match result {
        Ok(receipt) => {
            bar.finish_and_clear();
            notify::emit(
                Severity::Success,
                &format!(
                    "Uploaded {} as document {}",
                    receipt.filename, receipt.document_id
                ),
            );
            Ok(())
        }
        Err(e) => {
            bar.abandon();
            Err(e.into())
        }
    }
}

async fn list_command(client: &RagClient) -> anyhow::Result<()> {
    let docs = client.list_documents().await?;
    if docs.is_empty() {
        println!("No documents indexed yet.");
        return Ok(());
    }

    for doc in &docs {
        let status = if doc.processed {
            style("ready").green()
        } else {
            style("processing").yellow()
        };
        println!(
            "{:>5}  {:<42}  {:<18}  {}",
            doc.id,
            render::truncate(&doc.title, 40),
            render::format_timestamp(&doc.upload_date),
            status,
        );
    }
    Ok(())
}

async fn show_command(client: &RagClient, id: i64) -> anyhow::Result<()> {
    let doc = client.fetch_document(id).await?;

    println!("{} ({})", style(&doc.title).bold(), doc.filename);
    println!(
        "uploaded {} · {}",
        render::format_timestamp(&doc.upload_date),
        if doc.processed { "ready" } else { "processing" },
    );

    if doc.content.trim().is_empty() {
        println!("\n{}", style(CONTENT_PLACEHOLDER).dim());
    } else {
        println!("\n{}", render::truncate(&doc.content, 2000));
    }

    if !doc.chunks.is_empty() {
        println!("\n{}", style("Chunks").bold().underlined());
        for chunk in &doc.chunks {
            println!(
                "{:>4}  {}",
                chunk.chunk_index,
                render::truncate(&chunk.content, 100)
            );
        }
    }
    Ok(())
}

async fn recent_command(client: &RagClient, limit: usize) -> anyhow::Result<()> {
    let queries = client.recent_queries(limit).await?;
    if queries.is_empty() {
        println!("No recent queries.");
        return Ok(());
    }

    for query in &queries {
        println!(
            "{}  {}",
            style(render::format_timestamp(&query.timestamp)).dim(),
            render::truncate(&query.content, 80),
        );
        for resp in &query.responses {
            println!("    ↳ {}", render::truncate(&resp.content, 100));
        }
    }
    Ok(())
}

fn config_command(settings: &crate::config::Settings) -> anyhow::Result<()> {
    let snapshot = Config::from_settings(settings);
    print!("{}", toml::to_string_pretty(&snapshot)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn query_words_parse_as_positional_text() {
        let cli = Cli::parse_from(["rag", "query", "what", "is", "rust"]);
        match cli.command {
            Command::Query { text, no_chart } => {
                assert_eq!(text.join(" "), "what is rust");
                assert!(!no_chart);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn endpoint_flag_is_global() {
        let cli = Cli::parse_from(["rag", "docs", "list", "--endpoint", "http://host:9999"]);
        assert_eq!(cli.endpoint.as_deref(), Some("http://host:9999"));
    }

    #[test]
    fn recent_limit_defaults_to_none() {
        let cli = Cli::parse_from(["rag", "recent"]);
        match cli.command {
            Command::Recent { limit } => assert!(limit.is_none()),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
