use fophelp_common::TokenField;
use http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("login failed: {status}")]
    LoginFailed { status: StatusCode },
    #[error("missing required token: {0}")]
    MissingToken(TokenField),
    #[error("API_USERNAME and API_PASSWORD must be set")]
    MissingCredentials,
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("environment file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("unexpected response status: {status}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("http request error: {0}")]
    HttpRequest(#[from] http::Error),
    #[error("http client error: {0}")]
    HttpClient(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error(transparent)]
    Fetch(#[from] fophelp_http::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// Type alias to use this crate's [`Error`](enum@crate::Error) type in a [`Result`](core::result::Result).
pub type Result<T> = core::result::Result<T, Error>;
