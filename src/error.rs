use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Le fichier doit être au format CSV.")]
    UnsupportedMediaType { content_type: Option<String> },

    #[error("Champ manquant : {field}")]
    MissingField { field: String },

    #[error("Requête invalide : {0}")]
    BadRequest(String),

    #[error("Colonnes manquantes : {}. Requises : [{}]", .missing.join(", "), .required.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        required: Vec<String>,
    },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Client-input errors the user can fix by correcting the upload.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMediaType { .. }
                | Self::MissingField { .. }
                | Self::BadRequest(_)
                | Self::MissingColumns { .. }
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedMediaType { .. } | Self::BadRequest(_) | Self::MissingColumns { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingField { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent back to the caller in the `detail` field.
    pub fn detail(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            format!("Erreur lors du traitement : {self}")
        }
    }
}
