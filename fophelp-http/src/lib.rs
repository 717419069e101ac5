#![doc = "Authenticated request layer with single-flight token refresh for the FopHELP API."]
pub use http;

pub mod error;
pub mod refresh;
pub mod service;
mod traits;
pub mod types;

pub use crate::error::{Error, RefreshError, Result};
pub use crate::refresh::{is_token_expired, TokenRefreshService, REFRESH_PATH};
pub use crate::service::FetchApiService;
pub use crate::traits::HttpClient;
pub use crate::types::{ApiRequest, AuthSecret, Encoding, Header};

#[cfg(test)]
mod tests;
