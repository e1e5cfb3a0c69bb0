use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrandError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a JSON object for {context}, got {found}")]
    UnexpectedShape { context: String, found: String },

    #[error("unexpected HTTP status {status} from model: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("model blocked the prompt: {0}")]
    Blocked(String),

    #[error("model returned no text")]
    EmptyResponse,

    #[error("invalid model base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
