//! AI Model Evaluator CLI
//!
//! Serves the evaluator web page, or generates a single report from a file.

use ai_model_evaluator::{
    config::Config,
    dataset::GlueDataset,
    handler::ReportHandler,
    llm::LlmClient,
    page::{EvaluatorPage, NoticeKind, Notifier, SubmitRejected},
    report::BenchmarkReportFlow,
    request::BenchmarkRequest,
    server::{self, AppState},
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// AI Model Evaluator - LLM-narrated GLUE benchmark reports
#[derive(Parser)]
#[command(name = "model-evaluator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the evaluator web page
    Serve {
        /// Address to listen on (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Generate one report from a file of model outputs
    Report {
        /// File containing the model outputs (JSON or CSV text)
        input: PathBuf,

        /// GLUE dataset to compare against (e.g. MRPC)
        #[arg(short, long)]
        dataset: String,

        /// Where to write the report (a directory receives benchmark-report.md)
        #[arg(short, long, default_value = "benchmark-report.md")]
        output: PathBuf,
    },

    /// List the GLUE datasets the form offers
    Datasets,

    /// Test LLM connection
    Test,
}

/// Prints notices to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NoticeKind, title: &str, message: &str) {
        match kind {
            NoticeKind::Success => println!("{} {}", title, message),
            NoticeKind::Error => eprintln!("{}: {}", title, message),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => cmd_serve(bind).await,
        Commands::Report {
            input,
            dataset,
            output,
        } => cmd_report(input, dataset, output).await,
        Commands::Datasets => cmd_datasets(),
        Commands::Test => cmd_test().await,
    }
}

fn load_config() -> Result<Config> {
    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn build_handler(config: &Config) -> Result<ReportHandler> {
    let client = LlmClient::new(config.llm.clone()).context("Failed to create LLM client")?;
    let flow = BenchmarkReportFlow::new(client);
    Ok(ReportHandler::new(Arc::new(flow), config.limits))
}

async fn cmd_serve(bind: Option<String>) -> Result<()> {
    let config = load_config()?;
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());

    tracing::info!(
        model = %config.llm.model,
        max_model_outputs = config.limits.max_model_outputs,
        "starting AI Model Evaluator v{}",
        env!("CARGO_PKG_VERSION")
    );

    let state = Arc::new(AppState::new(build_handler(&config)?));
    server::serve(&bind, state)
        .await
        .with_context(|| format!("Server on {} failed", bind))
}

async fn cmd_report(input: PathBuf, dataset: String, output: PathBuf) -> Result<()> {
    let config = load_config()?;

    let model_outputs = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read model outputs from '{}'", input.display()))?;

    println!("Generating report for {} using {}...", dataset, config.llm.model);
    let start = Instant::now();

    let handler = build_handler(&config)?;
    let mut page = EvaluatorPage::new(config.limits, ConsoleNotifier);

    match page
        .submit(&handler, BenchmarkRequest::new(model_outputs, dataset))
        .await
    {
        Ok(()) => {}
        Err(SubmitRejected::Invalid(errors)) => {
            let messages: Vec<String> = [errors.model_outputs, errors.glue_dataset]
                .into_iter()
                .flatten()
                .collect();
            anyhow::bail!("Invalid input: {}", messages.join(" "));
        }
        Err(SubmitRejected::Busy) => anyhow::bail!("A report is already being generated"),
    }

    let Some(download) = page.export() else {
        anyhow::bail!("No report was generated");
    };

    let path = download.save(&output).context("Failed to write report")?;
    println!(
        "Report saved to: {} ({} bytes, {:.2?})",
        path.display(),
        download.bytes.len(),
        start.elapsed()
    );

    Ok(())
}

fn cmd_datasets() -> Result<()> {
    println!("GLUE Datasets");
    println!("{}", "─".repeat(50));
    for dataset in GlueDataset::ALL {
        println!("  {:<6}  {}", dataset.label(), dataset.task());
    }
    Ok(())
}

async fn cmd_test() -> Result<()> {
    println!("Testing LLM connection...\n");

    let config = Config::load().context("Failed to load configuration")?;

    println!("Configuration:");
    println!("  API Base:  {}", config.llm.api_base);
    println!("  Model:     {}", config.llm.model);
    println!(
        "  API Key:   {}...",
        config.llm.api_key.chars().take(8).collect::<String>()
    );
    println!();

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let client = LlmClient::new(config.llm).context("Failed to create LLM client")?;

    println!("Sending test request...");
    match client.test_connection().await {
        Ok(()) => {
            println!("Connection successful!");
        }
        Err(e) => {
            println!("Connection failed: {}", e);
        }
    }

    Ok(())
}
