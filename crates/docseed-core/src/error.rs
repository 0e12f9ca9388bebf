//! Error types for decoding, configuration, and document-store writes.

use thiserror::Error;

/// Errors that can occur outside the (infallible) encoding path.
#[derive(Error, Debug)]
pub enum DocseedError {
    /// Input or response text was not valid JSON, or did not match the wire shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An `integerValue` payload that does not parse as a signed 64-bit integer.
    #[error("Invalid integerValue payload: {0:?}")]
    InvalidInteger(String),

    /// Store configuration or document path is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The store answered with a non-2xx status.
    #[error("Document store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced an HTTP response (DNS, TLS, socket, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A seed plan file is structurally wrong.
    #[error("Seed plan error: {0}")]
    Plan(String),
}

/// Convenience alias used throughout docseed-core.
pub type Result<T> = std::result::Result<T, DocseedError>;
