//! Error types for unauthcheck

use thiserror::Error;

/// Result type alias using the scan Error
pub type Result<T> = std::result::Result<T, ScanError>;

/// Fatal errors that abort a scan. Recoverable failures (AI generation,
/// per-probe network errors) never reach this type; they are carried as
/// result variants through to the report instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to load OpenAPI spec: {0}")]
    Load(String),

    #[error("invalid JSON in OpenAPI spec: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "no base URL found in OpenAPI spec; provide 'servers' (OpenAPI 3.x) \
         or 'host' (OpenAPI 2.0) in the spec, or use --url instead of --file"
    )]
    MissingBaseUrl,

    #[error("failed to fetch OpenAPI spec: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),
}
