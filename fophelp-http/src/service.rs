#![doc = "Generic HTTP verb surface with pluggable authentication and one-shot retry after refresh."]
use crate::error::{Error, Result};
use crate::refresh::{is_token_expired, TokenRefreshService};
use crate::traits::HttpClient;
use crate::types::{ApiRequest, AuthSecret, Encoding, Header, APPLICATION_JSON, FORM_URLENCODED};
use fophelp_common::TokenStore;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::{Method, Request, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends requests relative to a base URL, attaching authentication material and
/// retrying once after a token refresh when the response signals expiry.
///
/// Responses are returned as-is whatever their status; checking it is left to
/// the API clients built on top.
pub struct FetchApiService<T> {
    base_uri: String,
    http: Arc<T>,
    secret: AuthSecret,
    token_store: Option<Arc<dyn TokenStore>>,
    refresher: Option<TokenRefreshService<T>>,
}

impl<T> FetchApiService<T>
where
    T: HttpClient + Send + Sync + 'static,
{
    pub fn new(base_uri: impl AsRef<str>, http: T, secret: AuthSecret) -> Self {
        Self {
            base_uri: base_uri.as_ref().trim_end_matches('/').into(),
            http: Arc::new(http),
            secret,
            token_store: None,
            refresher: None,
        }
    }
    /// Uses `store` for cookie authentication and enables refresh-and-retry.
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.refresher =
            Some(TokenRefreshService::new(&self.base_uri, Arc::clone(&self.http), Arc::clone(&store)));
        self.token_store = Some(store);
        self
    }
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }
    pub fn http_client(&self) -> &Arc<T> {
        &self.http
    }
    pub fn token_store(&self) -> Option<&Arc<dyn TokenStore>> {
        self.token_store.as_ref()
    }
    pub fn refresher(&self) -> Option<&TokenRefreshService<T>> {
        self.refresher.as_ref()
    }
    pub async fn get(
        &self,
        path: &str,
        params: Option<&[(&str, &str)]>,
        headers: Option<&HeaderMap>,
    ) -> Result<Response<Vec<u8>>> {
        let mut request = ApiRequest::new(Method::GET, path).headers(headers);
        if let Some(params) = params {
            request = request.query(params);
        }
        self.send(&request).await
    }
    pub async fn post<B>(
        &self,
        path: &str,
        body: &B,
        headers: Option<&HeaderMap>,
    ) -> Result<Response<Vec<u8>>>
    where
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::new(Method::POST, path)
            .headers(headers)
            .json_body(serde_json::to_vec(body)?);
        self.send(&request).await
    }
    pub async fn post_form<F>(
        &self,
        path: &str,
        form: &F,
        headers: Option<&HeaderMap>,
    ) -> Result<Response<Vec<u8>>>
    where
        F: Serialize + ?Sized,
    {
        let request = ApiRequest::new(Method::POST, path)
            .headers(headers)
            .form_body(serde_html_form::to_string(form)?.into_bytes());
        self.send(&request).await
    }
    pub async fn put<B>(
        &self,
        path: &str,
        body: &B,
        headers: Option<&HeaderMap>,
    ) -> Result<Response<Vec<u8>>>
    where
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::new(Method::PUT, path)
            .headers(headers)
            .json_body(serde_json::to_vec(body)?);
        self.send(&request).await
    }
    /// Sends `request`, refreshing the tokens and resending it exactly once if the
    /// first response signals expiry.
    ///
    /// The second response is returned whatever it is. If the refresh itself fails
    /// the first response is returned.
    pub async fn send(&self, request: &ApiRequest) -> Result<Response<Vec<u8>>> {
        let response = self.send_once(request, 0).await?;
        let Some(refresher) = &self.refresher else {
            return Ok(response);
        };
        if !is_token_expired(&response) {
            return Ok(response);
        }
        warn!(
            method = %request.method,
            path = %request.path,
            status = %response.status(),
            "token expired, refreshing"
        );
        if let Err(err) = refresher.refresh_tokens().await {
            warn!(error = %err, path = %request.path, "token refresh failed, returning original response");
            return Ok(response);
        }
        self.send_once(request, 1).await
    }
    async fn send_once(&self, request: &ApiRequest, attempt: u8) -> Result<Response<Vec<u8>>> {
        let http_request = self.build_request(request)?;
        debug!(method = %request.method, path = %request.path, attempt, "sending request");
        let response = self.http.send_http(http_request).await.map_err(Error::HttpClient)?;
        debug!(status = %response.status(), attempt, "received response");
        Ok(response)
    }
    /// Builds the wire request. Authentication is read at call time, so a resent
    /// request picks up refreshed credentials.
    fn build_request(&self, request: &ApiRequest) -> Result<Request<Vec<u8>>> {
        // caller headers keep every value and win over the auth and form defaults
        let mut headers = request.headers.clone();
        if let Some((name, value)) = self.auth_header() {
            if !headers.contains_key(&name) {
                headers.insert(name, HeaderValue::from_str(&value)?);
            }
        }
        if request.encoding == Encoding::Form && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        }
        headers.insert(HeaderName::from(Header::Accept), HeaderValue::from_static(APPLICATION_JSON));
        if request.encoding == Encoding::Json {
            headers.insert(HeaderName::from(Header::ContentType), HeaderValue::from_static(APPLICATION_JSON));
        }
        let mut http_request = Request::builder()
            .method(&request.method)
            .uri(format!("{}{}", self.base_uri, request.path_and_query()))
            .body(request.body.clone())?;
        *http_request.headers_mut() = headers;
        Ok(http_request)
    }
    fn auth_header(&self) -> Option<(HeaderName, String)> {
        if let Some(key) = self.secret.api_key() {
            Some((Header::ApiKey.into(), key.to_owned()))
        } else if let Some(token) = self.secret.basic_token() {
            Some((Header::Authorization.into(), format!("Basic {token}")))
        } else if let Some(token) = self.secret.bearer_token() {
            Some((Header::Authorization.into(), format!("Bearer {token}")))
        } else if let Some(store) = &self.token_store {
            Some((Header::Cookie.into(), store.cookie_header()))
        } else {
            self.secret.cookie_header().map(|cookies| (Header::Cookie.into(), cookies))
        }
    }
}
