//! Configuration for the [`FophelpApiClient`](crate::FophelpApiClient).
mod env;
mod file;

pub use self::env::EnvLoader;
pub use self::file::EnvFileStore;
use crate::error::{Error, Result};
use fophelp_api::DEFAULT_API_VERSION;
use fophelp_common::{CredentialSet, TokenField};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://new.fophelp.pro";
/// Variable overriding [`Config::base_url`].
pub const FOPHELP_BASE_URL: &str = "FOPHELP_BASE_URL";
/// Variable overriding [`Config::api_version`].
pub const FOPHELP_API_VERSION: &str = "FOPHELP_API_VERSION";

/// Configuration data struct for the [`FophelpApiClient`](crate::FophelpApiClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// The base URL of the API.
    pub base_url: String,
    /// Path prefix of the domain endpoints, e.g. `/api/v2.0`.
    pub api_version: String,
    /// The session cookies.
    pub credentials: Option<CredentialSet>,
}

impl Config {
    /// Loads the configuration from the provided loader.
    pub async fn load(loader: &impl Loader) -> Result<Self> {
        loader.load().await.map_err(Error::ConfigLoad)
    }
    /// Saves the configuration using the provided saver.
    pub async fn save(&self, saver: &impl Saver) -> Result<()> {
        saver.save(self).await.map_err(Error::ConfigSave)
    }
    /// Builds a configuration from `KEY=value` variables.
    ///
    /// Unset keys fall back to the defaults. The credential block is present as
    /// soon as one of the five credential keys is set; the others default to empty.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = if TokenField::ALL.iter().any(|field| var(field.env_key()).is_some()) {
            let value = |field: TokenField| var(field.env_key()).unwrap_or_default();
            Some(CredentialSet {
                access_token: value(TokenField::AccessToken),
                refresh_token: value(TokenField::RefreshToken),
                username: value(TokenField::Username),
                refresh_expires: value(TokenField::RefreshExpires),
                session_user: value(TokenField::SessionUser),
            })
        } else {
            None
        };
        let defaults = Self::default();
        Self {
            base_url: var(FOPHELP_BASE_URL).filter(|s| !s.is_empty()).unwrap_or(defaults.base_url),
            api_version: var(FOPHELP_API_VERSION)
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.api_version),
            credentials,
        }
    }
    /// `KEY=value` variables describing this configuration.
    pub fn to_vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![
            (FOPHELP_BASE_URL, self.base_url.clone()),
            (FOPHELP_API_VERSION, self.api_version.clone()),
        ];
        if let Some(credentials) = &self.credentials {
            vars.extend(credentials.env_entries());
        }
        vars
    }
}

impl Default for Config {
    /// Creates a new default configuration.
    ///
    /// The default configuration uses the base URL `https://new.fophelp.pro` and
    /// the API version `/api/v2.0`.
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_version: String::from(DEFAULT_API_VERSION),
            credentials: None,
        }
    }
}

/// The trait for loading configuration data.
pub trait Loader {
    /// Loads the configuration data.
    fn load(
        &self,
    ) -> impl Future<
        Output = core::result::Result<Config, Box<dyn std::error::Error + Send + Sync + 'static>>,
    > + Send;
}

/// The trait for saving configuration data.
pub trait Saver {
    /// Saves the configuration data.
    fn save(
        &self,
        config: &Config,
    ) -> impl Future<
        Output = core::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>,
    > + Send;
}
