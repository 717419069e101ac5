#[cfg(feature = "default-client")]
use crate::config::EnvLoader;
use crate::config::Config;
use crate::error::{Error, Result};
use fophelp_api::{AuthApi, IncomesApi, LoginService, TaxesApi};
use fophelp_common::{MemoryTokenStore, TokenStore};
use fophelp_http::{AuthSecret, FetchApiService, HttpClient};
#[cfg(feature = "default-client")]
use fophelp_http_client::ReqwestClient;
use std::sync::Arc;
use tracing::{debug, info};

/// Authenticated FopHELP API client.
///
/// Owns the token store of one session. Every domain client shares the same
/// [`FetchApiService`], so a refresh triggered by one of them is seen by all.
pub struct FophelpApiClient<T> {
    config: Config,
    store: MemoryTokenStore,
    service: Arc<FetchApiService<T>>,
    auth: AuthApi<T>,
    incomes: IncomesApi<T>,
    taxes: TaxesApi<T>,
}

#[cfg(feature = "default-client")]
impl FophelpApiClient<ReqwestClient> {
    /// Creates a client from the environment (and `.env`), using [`ReqwestClient`].
    pub async fn from_env() -> Result<Self> {
        Self::new(Config::load(&EnvLoader::new()).await?, ReqwestClient::new())
    }
}

impl<T> FophelpApiClient<T>
where
    T: HttpClient + Send + Sync + 'static,
{
    /// Creates a client for `config` sending requests through `http`.
    ///
    /// Fails with [`Error::Configuration`] if `config` carries no credentials.
    pub fn new(config: Config, http: T) -> Result<Self> {
        let Some(credentials) = &config.credentials else {
            return Err(Error::Configuration(String::from(
                "FopHELP API authentication cookies are not configured",
            )));
        };
        let store = MemoryTokenStore::new(credentials.clone());
        let service = Arc::new(
            FetchApiService::new(&config.base_url, http, AuthSecret::default())
                .with_token_store(Arc::new(store.clone())),
        );
        let login = LoginService::new(&config.base_url, Arc::clone(service.http_client()))
            .with_token_store(Arc::new(store.clone()));
        debug!(base_url = %config.base_url, api_version = %config.api_version, "client configured");
        Ok(Self {
            auth: AuthApi::new(login),
            incomes: IncomesApi::with_api_version(Arc::clone(&service), &config.api_version),
            taxes: TaxesApi::with_api_version(Arc::clone(&service), &config.api_version),
            config,
            store,
            service,
        })
    }
    /// The underlying request service, for custom requests.
    pub fn api_service(&self) -> &FetchApiService<T> {
        &self.service
    }
    /// The token store, to inspect the current credentials.
    pub fn token_store(&self) -> &MemoryTokenStore {
        &self.store
    }
    pub fn auth(&self) -> &AuthApi<T> {
        &self.auth
    }
    pub fn incomes(&self) -> &IncomesApi<T> {
        &self.incomes
    }
    pub fn taxes(&self) -> &TaxesApi<T> {
        &self.taxes
    }
    /// Logs in with `API_USERNAME` / `API_PASSWORD` if the stored credentials are
    /// incomplete. Returns whether a login happened.
    pub async fn ensure_authenticated(&self) -> Result<bool> {
        self.ensure_authenticated_with(|key| std::env::var(key).ok()).await
    }
    async fn ensure_authenticated_with<F>(&self, var: F) -> Result<bool>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.store.credentials().is_complete() {
            return Ok(false);
        }
        info!("stored credentials are incomplete, logging in");
        self.auth.login_from_vars(var, false).await?;
        Ok(true)
    }
    /// The configuration of this client with the current credentials.
    pub fn to_config(&self) -> Config {
        Config { credentials: Some(self.store.credentials()), ..self.config.clone() }
    }
}
