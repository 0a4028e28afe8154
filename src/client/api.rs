use crate::{
    Error, Result,
    scoring::PredictionReport,
    server::{CSV_CONTENT_TYPE, FILE_FIELD},
};
use reqwest::{
    StatusCode,
    multipart::{Form, Part},
};
use tracing::debug;

/// HTTP client for the `/predict` endpoint.
pub struct PredictionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PredictionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Uploads one CSV file. Any status other than 200 is returned as
    /// [`Error::Api`] with the response body; nothing is retried.
    pub async fn predict(&self, file_name: &str, bytes: Vec<u8>) -> Result<PredictionReport> {
        debug!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), self.endpoint);

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(CSV_CONTENT_TYPE)?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self.http.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<PredictionReport>().await?)
    }
}
