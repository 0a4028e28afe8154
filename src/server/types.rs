use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Field name of the uploaded CSV in the multipart form.
pub const FILE_FIELD: &str = "file";

pub const CSV_CONTENT_TYPE: &str = "text/csv";
