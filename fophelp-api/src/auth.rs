use crate::error::{Error, Result};
use crate::login::LoginService;
use fophelp_common::CredentialSet;
use fophelp_http::HttpClient;
use std::path::Path;

/// Environment variable holding the login username.
pub const API_USERNAME: &str = "API_USERNAME";
/// Environment variable holding the login password.
pub const API_PASSWORD: &str = "API_PASSWORD";

/// Authentication operations.
pub struct AuthApi<T> {
    login: LoginService<T>,
}

impl<T> AuthApi<T>
where
    T: HttpClient + Send + Sync,
{
    pub fn new(login: LoginService<T>) -> Self {
        Self { login }
    }
    pub async fn login(&self, username: &str, password: &str) -> Result<CredentialSet> {
        self.login.login(username, password).await
    }
    pub async fn login_and_update_env(
        &self,
        username: &str,
        password: &str,
        path: Option<&Path>,
    ) -> Result<CredentialSet> {
        self.login.login_and_update_env(username, password, path).await
    }
    /// Logs in with `API_USERNAME` and `API_PASSWORD` from the process environment,
    /// updating the default credential file if `update_env` is set.
    pub async fn login_from_env(&self, update_env: bool) -> Result<CredentialSet> {
        self.login_from_vars(|key| std::env::var(key).ok(), update_env).await
    }
    /// Same as [`login_from_env`](Self::login_from_env), reading the variables through `var`.
    pub async fn login_from_vars<F>(&self, var: F, update_env: bool) -> Result<CredentialSet>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.login_with(var(API_USERNAME), var(API_PASSWORD), update_env).await
    }
    async fn login_with(
        &self,
        username: Option<String>,
        password: Option<String>,
        update_env: bool,
    ) -> Result<CredentialSet> {
        let (Some(username), Some(password)) = (
            username.filter(|s| !s.is_empty()),
            password.filter(|s| !s.is_empty()),
        ) else {
            return Err(Error::MissingCredentials);
        };
        if update_env {
            self.login.login_and_update_env(&username, &password, None).await
        } else {
            self.login.login(&username, &password).await
        }
    }
}
