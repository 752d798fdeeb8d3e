use std::time::Duration;

use thiserror::Error;

use crate::status::ResourceKind;

/// All errors that can occur when using the Video Jungle client.
#[derive(Error, Debug)]
pub enum VideoJungleError {
    /// The API key is missing or invalid (HTTP 401).
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The authenticated user does not have access to the requested resource (HTTP 403).
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The server rejected the request body (HTTP 422).
    #[error("request rejected by server validation: {message}")]
    Validation {
        message: String,
        body: Option<serde_json::Value>,
    },

    /// A non-specific API error with the HTTP status code and response body.
    #[error("API error {status_code}: {message}")]
    Api {
        status_code: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    /// An edit specification failed local validation. No request was sent.
    #[error("invalid edit: {message}")]
    InvalidEdit { message: String },

    /// Fetching artifact bytes returned a non-success status.
    #[error("download failed with status {status_code}: {body}")]
    Download { status_code: u16, body: String },

    /// The presigned upload endpoint rejected the file.
    #[error("upload failed with status {status_code}: {message}")]
    Upload { status_code: u16, message: String },

    /// The server registered an upload but returned no presigned form for it.
    #[error("server returned no upload form for {kind} {id}")]
    MissingUploadForm { kind: ResourceKind, id: String },

    /// A resource reached `Ready` but exposes no `download_url`.
    #[error("{kind} {id} is ready but has no download URL")]
    MissingArtifact { kind: ResourceKind, id: String },

    /// A transport-level HTTP error from reqwest.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A successful response whose body did not match the expected shape.
    #[error("could not decode response: {source} (body: {body})")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// A request body could not be serialized.
    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// An I/O error, typically from reading or writing a local file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Waiting for a job exceeded the configured deadline or attempt count.
    #[error("{kind} {id} still pending after {attempts} checks ({waited:?})")]
    Timeout {
        kind: ResourceKind,
        id: String,
        attempts: u32,
        waited: Duration,
    },

    /// The job reported a status configured as a failure marker.
    #[error("{kind} {id} failed with status {status:?}")]
    JobFailed {
        kind: ResourceKind,
        id: String,
        status: String,
    },
}

/// A convenience alias for `Result<T, VideoJungleError>`.
pub type Result<T> = std::result::Result<T, VideoJungleError>;
