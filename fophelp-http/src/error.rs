#![doc = "Error types."]
use http::StatusCode;
use std::sync::Arc;

/// Failure of the refresh handshake.
///
/// Cloneable so that every caller waiting on the same in-flight refresh observes it.
#[derive(thiserror::Error, Debug, Clone)]
pub enum RefreshError {
    #[error("token refresh failed: {0}")]
    Status(StatusCode),
    #[error("token refresh request error: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync + 'static>),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("http request error: {0}")]
    HttpRequest(#[from] http::Error),
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
    #[error("http client error: {0}")]
    HttpClient(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("serde_html_form error: {0}")]
    SerdeHtmlForm(#[from] serde_html_form::ser::Error),
    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

/// Type alias to use this crate's [`Error`] type in a [`Result`](core::result::Result).
pub type Result<T> = core::result::Result<T, Error>;
