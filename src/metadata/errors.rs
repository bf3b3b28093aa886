use thiserror::Error;

/// Failures of the bundled metadata clients
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Invalid index pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("no such index [{name}]")]
    IndexNotFound { name: String },
    #[error("Failed to parse metadata snapshot: {error}")]
    SnapshotParse { error: String },
    #[error("Invalid metadata URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Index metadata request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Index metadata request returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode index metadata response: {0}")]
    Decode(#[from] serde_json::Error),
}
