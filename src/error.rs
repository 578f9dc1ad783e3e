use thiserror::Error;

/// Failures surfaced by webmail operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection, timeout, proxy or HTTP status failure.
    #[error("transport error: {0:#}")]
    Transport(anyhow::Error),

    /// The bootstrap document carried no `window.__initAppData(...)` call.
    #[error("app data wrapper not found in bootstrap response")]
    MissingAppData,

    /// A response body was not the JSON we expected.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The login endpoint answered with something other than `Result: true`.
    #[error("login rejected: {0}")]
    LoginRejected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
