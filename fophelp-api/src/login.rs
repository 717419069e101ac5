#![doc = "Username / password login against the FopHELP authentication endpoint."]
use crate::env_file;
use crate::error::{Error, Result};
use crate::types::LoginRequest;
use fophelp_common::cookie::parse_set_cookie_headers;
use fophelp_common::{CredentialSet, TokenStore};
use fophelp_http::{Header, HttpClient};
use http::{Method, Request};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Path of the login endpoint, relative to the base URL.
pub const LOGIN_PATH: &str = "/api/react/authenticate/login";

/// Exchanges a username and password for a [`CredentialSet`].
pub struct LoginService<T> {
    base_uri: String,
    http: Arc<T>,
    store: Option<Arc<dyn TokenStore>>,
}

impl<T> LoginService<T>
where
    T: HttpClient + Send + Sync,
{
    pub fn new(base_uri: impl AsRef<str>, http: Arc<T>) -> Self {
        Self { base_uri: base_uri.as_ref().trim_end_matches('/').into(), http, store: None }
    }
    /// Pushes every successful login into `store`.
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }
    /// Logs in and returns the five session tokens found in the response cookies.
    pub async fn login(&self, username: &str, password: &str) -> Result<CredentialSet> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("{}{LOGIN_PATH}", self.base_uri))
            .header(Header::ContentType, "application/json")
            .header(Header::Accept, "application/json")
            .body(serde_json::to_vec(&LoginRequest { username, password })?)?;
        let response = self.http.send_http(request).await.map_err(Error::HttpClient)?;
        if !response.status().is_success() {
            warn!(status = %response.status(), username, "login rejected");
            return Err(Error::LoginFailed { status: response.status() });
        }
        let credentials = parse_set_cookie_headers(response.headers())
            .into_credentials()
            .map_err(Error::MissingToken)?;
        if let Some(store) = &self.store {
            store.update_tokens(credentials.clone().into());
        }
        info!(username, "logged in");
        Ok(credentials)
    }
    /// Logs in, then writes the tokens into the credential file at `path`
    /// (`.env` in the working directory by default).
    ///
    /// The file must already exist.
    pub async fn login_and_update_env(
        &self,
        username: &str,
        password: &str,
        path: Option<&Path>,
    ) -> Result<CredentialSet> {
        let credentials = self.login(username, password).await?;
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_env_path()?,
        };
        env_file::write_credentials(&path, &credentials)?;
        info!(path = %path.display(), "credential file updated");
        Ok(credentials)
    }
}

fn default_env_path() -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join(".env"))
}
