use super::types::{CSV_CONTENT_TYPE, ErrorResponse, FILE_FIELD};
use crate::{
    Error, Result,
    model::Scorer,
    scoring::{PredictionReport, score_csv},
};
use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<Scorer>,
}

struct CsvUpload {
    file_name: Option<String>,
    bytes: Vec<u8>,
}

pub async fn predict(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Json<PredictionReport>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();

    match process_upload(state, multipart)
        .instrument(info_span!("predict", %request_id))
        .await
    {
        Ok(report) => {
            info!(
                %request_id,
                "Scored {} rows: {} genuine, {} counterfeit",
                report.statistiques.total,
                report.statistiques.vrais,
                report.statistiques.faux
            );
            Ok(Json(report))
        }
        Err(e) => Err(error_response(e)),
    }
}

async fn process_upload(
    state: AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<PredictionReport> {
    let mut multipart = multipart.map_err(|e| Error::bad_request(e.to_string()))?;
    let upload = read_csv_upload(&mut multipart).await?;
    info!(
        "Received {} ({} bytes)",
        upload.file_name.as_deref().unwrap_or("<unnamed>"),
        upload.bytes.len()
    );

    // scoring is CPU-bound; keep it off the async workers
    let scorer = Arc::clone(&state.scorer);
    tokio::task::spawn_blocking(move || score_csv(&upload.bytes, &scorer))
        .await
        .map_err(|e| Error::internal(format!("scoring task failed: {e}")))?
}

async fn read_csv_upload(multipart: &mut Multipart) -> Result<CsvUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::bad_request(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        if !is_csv(content_type.as_deref()) {
            return Err(Error::UnsupportedMediaType { content_type });
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::bad_request(e.to_string()))?;

        return Ok(CsvUpload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(Error::MissingField {
        field: FILE_FIELD.to_string(),
    })
}

/// The part header must be exactly `text/csv`; parameters and other spellings are refused.
fn is_csv(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.trim() == CSV_CONTENT_TYPE)
}

fn error_response(err: Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = err.status_code();
    if err.is_client_error() {
        warn!("Rejected upload: {}", err);
    } else {
        error!("Failed to process upload: {}", err);
    }

    (status, Json(ErrorResponse { detail: err.detail() }))
}
