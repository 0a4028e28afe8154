//! Upload a CSV of banknote measurements to the scoring service.
//!
//! Usage:
//!   banknote-client billets.csv
//!   banknote-client billets.csv --endpoint http://scoring:8000/predict --format json
//!   banknote-client billets.csv --preview-only

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use banknote_detector::{
    client::{self, OutputFormat, UploadOptions},
    config,
};

#[derive(Parser)]
#[command(name = "banknote-client")]
#[command(about = "Détection des faux billets : envoi d'un CSV au modèle")]
struct Cli {
    /// CSV file with the six banknote measurements
    file: PathBuf,

    /// Scoring endpoint (defaults to the configured one)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Number of rows shown in the preview
    #[arg(long)]
    preview_rows: Option<usize>,

    /// Only preview and check the file, do not send it
    #[arg(long)]
    preview_only: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Configuration file (defaults to CONFIG_PATH or config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match &cli.config {
        Some(path) => config::load_from(path).await?,
        None => config::load().await?,
    };

    let options = UploadOptions {
        path: cli.file,
        endpoint: cli.endpoint.unwrap_or(config.client.endpoint),
        preview_rows: cli.preview_rows.unwrap_or(config.client.preview_rows),
        preview_only: cli.preview_only,
        format: cli.format,
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = client::run(&options, &mut stdout).await {
        eprintln!("{e}");
        std::process::exit(1);
    }

    Ok(())
}
