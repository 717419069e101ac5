use crate::error::Result;
use crate::types::{ApiResponse, Tax};
use crate::DEFAULT_API_VERSION;
use fophelp_http::{FetchApiService, HttpClient};
use std::sync::Arc;

/// Tax periods of the logged in user.
pub struct TaxesApi<T> {
    service: Arc<FetchApiService<T>>,
    api_version: String,
}

impl<T> TaxesApi<T>
where
    T: HttpClient + Send + Sync + 'static,
{
    pub fn new(service: Arc<FetchApiService<T>>) -> Self {
        Self::with_api_version(service, DEFAULT_API_VERSION)
    }
    pub fn with_api_version(service: Arc<FetchApiService<T>>, api_version: impl Into<String>) -> Self {
        Self { service, api_version: api_version.into() }
    }
    pub fn api_version(&self) -> &str {
        &self.api_version
    }
    pub async fn get_taxes(&self) -> Result<ApiResponse<Vec<Tax>>> {
        let response = self.service.get(&format!("{}/taxes", self.api_version), None, None).await?;
        ApiResponse::from_json(response)
    }
}
