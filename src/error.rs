use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    #[error("Malformed record in {path} at line {line}: {source}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Request signing failed: {0}")]
    Signing(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote service error ({status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Invalid ML job type '{0}', expected one of dataprocessing, modeltraining, modeltransform")]
    InvalidJobType(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl CatalogError {
    pub fn io(source: std::io::Error, context: impl Into<String>) -> Self {
        CatalogError::Io {
            source,
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
