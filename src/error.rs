use std::path::PathBuf;
use thiserror::Error;

/// The main error type for plastiscan operations.
#[derive(Debug, Error)]
pub enum PlastiscanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid detection endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Could not connect to detection API at {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Detection API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse detection API response: {source}")]
    ResponseParse {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize report: {source}")]
    ReportSerialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("Example image directory '{dir}' not found")]
    MissingExampleDirectory { dir: PathBuf },

    #[error("No example image named '{name}' in '{dir}' (run 'plastiscan examples' to list them)")]
    UnknownExample { name: String, dir: PathBuf },

    #[error("Unsupported image type '{path}' (accepted: .jpg, .jpeg, .png)")]
    UnsupportedImageType { path: PathBuf },

    #[error("Camera capture failed: {message}")]
    CameraCapture { message: String },
}
