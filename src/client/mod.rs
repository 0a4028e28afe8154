//! Command-line upload UI: previews a CSV, sends it to the scoring service
//! and renders the returned predictions.

mod api;
pub mod render;

pub use api::PredictionClient;

use crate::{Error, model::FEATURE_COUNT, scoring::CsvTable};
use std::{io::Write, path::PathBuf};
use thiserror::Error as ThisError;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {s}. Use 'text' or 'json'.")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub path: PathBuf,
    pub endpoint: String,
    pub preview_rows: usize,
    pub preview_only: bool,
    pub format: OutputFormat,
}

/// What went wrong during an upload, worded for the person running it.
#[derive(ThisError, Debug)]
pub enum UploadError {
    #[error("Erreur lecture CSV : {0}")]
    ReadCsv(Error),

    #[error("Le fichier CSV doit contenir exactement 6 colonnes. Ce fichier en contient {0}.")]
    ColumnCount(usize),

    #[error("Erreur API : {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Erreur lors de la requête : {0}")]
    Request(Error),

    #[error("Erreur d'affichage : {0}")]
    Output(#[from] std::io::Error),
}

/// Runs one upload and writes everything meant for the user to `out`.
pub async fn run<W: Write>(options: &UploadOptions, out: &mut W) -> Result<(), UploadError> {
    let bytes = tokio::fs::read(&options.path)
        .await
        .map_err(|e| UploadError::ReadCsv(e.into()))?;
    let table = CsvTable::parse(&bytes).map_err(UploadError::ReadCsv)?;

    write!(out, "{}", render::render_preview(&table, options.preview_rows))?;

    // only a shortcut, the server checks the column names
    if table.column_count() != FEATURE_COUNT {
        return Err(UploadError::ColumnCount(table.column_count()));
    }
    if options.preview_only {
        return Ok(());
    }

    let file_name = options
        .path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "data.csv".to_string());

    let client = PredictionClient::new(options.endpoint.clone());
    info!("Sending {} to {}", file_name, client.endpoint());

    let report = client
        .predict(&file_name, bytes)
        .await
        .map_err(|e| match e {
            Error::Api { status, body } => UploadError::Api { status, body },
            other => UploadError::Request(other),
        })?;

    match options.format {
        OutputFormat::Text => write!(out, "\n{}", render::render_report(&report))?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| UploadError::Request(e.into()))?;
            writeln!(out, "{json}")?;
        }
    }

    Ok(())
}
