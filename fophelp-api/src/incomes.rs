use crate::error::{Error, Result};
use crate::types::{check_status, AddIncomeRequest, AddIncomeResponse, ApiResponse, Income};
use crate::DEFAULT_API_VERSION;
use fophelp_http::{FetchApiService, HttpClient};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::debug;

static RE_INCOME_ID: OnceLock<Regex> = OnceLock::new();

/// Income records of the logged in user.
pub struct IncomesApi<T> {
    service: Arc<FetchApiService<T>>,
    api_version: String,
}

impl<T> IncomesApi<T>
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
    /// Adds an income and returns the id reported by the server.
    pub async fn add_income(&self, request: &AddIncomeRequest) -> Result<AddIncomeResponse> {
        let response = self
            .service
            .post(&format!("{}/incomes/add", self.api_version), request, None)
            .await?;
        let body = check_status(response)?.into_body();
        let message = String::from_utf8_lossy(&body).into_owned();
        let response = parse_add_income_response(message)?;
        debug!(id = %response.id, "income added");
        Ok(response)
    }
    pub async fn get_incomes(&self) -> Result<ApiResponse<Vec<Income>>> {
        let response = self.service.get(&format!("{}/incomes", self.api_version), None, None).await?;
        ApiResponse::from_json(response)
    }
}

/// Extracts the id from a confirmation such as `Successfully created income with ID: <uuid>`.
pub fn parse_add_income_response(message: String) -> Result<AddIncomeResponse> {
    let re = RE_INCOME_ID
        .get_or_init(|| Regex::new(r"(?i)ID:\s*([a-f0-9-]+)").expect("invalid regex"));
    let Some(id) = re.captures(&message).and_then(|captures| captures.get(1)) else {
        return Err(Error::Parse(format!("no income id in response: {message}")));
    };
    Ok(AddIncomeResponse { id: id.as_str().to_owned(), message })
}
