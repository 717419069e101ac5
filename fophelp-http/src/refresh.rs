#![doc = "Single-flight coordination of the token refresh handshake."]
use crate::error::RefreshError;
use crate::traits::HttpClient;
use crate::types::{Header, APPLICATION_JSON};
use fophelp_common::cookie::parse_set_cookie_headers;
use fophelp_common::TokenStore;
use futures::future::{BoxFuture, FutureExt, Shared};
use http::{Method, Request, Response, StatusCode};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Path of the refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/api/react/authenticate/refresh";

type RefreshFuture = Shared<BoxFuture<'static, Result<(), RefreshError>>>;

struct InFlight {
    generation: u64,
    operation: RefreshFuture,
}

#[derive(Default)]
struct RefreshState {
    in_flight: Option<InFlight>,
    generation: u64,
}

/// Whether a response signals an expired or invalid credential.
///
/// True for an explicit `Token-Expired: true` header, or for status 401 or 403.
pub fn is_token_expired<B>(response: &Response<B>) -> bool {
    response
        .headers()
        .get(http::HeaderName::from(Header::TokenExpired))
        .is_some_and(|value| value.as_bytes() == b"true")
        || response.status() == StatusCode::UNAUTHORIZED
        || response.status() == StatusCode::FORBIDDEN
}

/// Performs the refresh handshake, with at most one call in flight at a time.
pub struct TokenRefreshService<T> {
    http: Arc<T>,
    store: Arc<dyn TokenStore>,
    refresh_uri: String,
    state: Arc<Mutex<RefreshState>>,
}

impl<T> TokenRefreshService<T>
where
    T: HttpClient + Send + Sync + 'static,
{
    pub fn new(base_uri: impl AsRef<str>, http: Arc<T>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            store,
            refresh_uri: format!("{}{REFRESH_PATH}", base_uri.as_ref()),
            state: Arc::new(Mutex::new(RefreshState::default())),
        }
    }
    /// Same as the free function [`is_token_expired`].
    pub fn is_token_expired<B>(response: &Response<B>) -> bool {
        is_token_expired(response)
    }
    /// Whether a refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().expect("failed to lock refresh state").in_flight.is_some()
    }
    /// Refreshes the tokens in the store.
    ///
    /// Concurrent callers share the single outstanding refresh and all observe its
    /// outcome. The operation clears the in-flight slot itself as it settles, whether
    /// it succeeded or not, so no caller arriving afterwards can join a finished one.
    pub async fn refresh_tokens(&self) -> Result<(), RefreshError> {
        let operation = {
            let mut guard = self.state.lock().expect("failed to lock refresh state");
            let state = &mut *guard;
            match &state.in_flight {
                Some(current) => {
                    debug!(generation = current.generation, "joining in-flight token refresh");
                    current.operation.clone()
                }
                None => {
                    state.generation += 1;
                    let generation = state.generation;
                    let slot = Arc::downgrade(&self.state);
                    let refresh = perform_refresh(
                        Arc::clone(&self.http),
                        Arc::clone(&self.store),
                        self.refresh_uri.clone(),
                    );
                    let operation = async move {
                        let result = refresh.await;
                        if let Some(slot) = slot.upgrade() {
                            clear_in_flight(&slot, generation);
                        }
                        result
                    }
                    .boxed()
                    .shared();
                    state.in_flight = Some(InFlight { generation, operation: operation.clone() });
                    debug!(generation, "starting token refresh");
                    operation
                }
            }
        };
        operation.await
    }
}

fn clear_in_flight(state: &Mutex<RefreshState>, generation: u64) {
    let mut state = state.lock().expect("failed to lock refresh state");
    if state.in_flight.as_ref().is_some_and(|current| current.generation == generation) {
        state.in_flight = None;
    }
}

async fn perform_refresh<T>(
    http: Arc<T>,
    store: Arc<dyn TokenStore>,
    uri: String,
) -> Result<(), RefreshError>
where
    T: HttpClient + Send + Sync,
{
    let request = Request::builder()
        .method(Method::GET)
        .uri(&uri)
        .header(Header::Cookie, store.cookie_header())
        .header(Header::Accept, APPLICATION_JSON)
        .body(Vec::new())
        .map_err(|e| RefreshError::Request(Arc::new(e)))?;
    let response = http.send_http(request).await.map_err(|e| RefreshError::Request(Arc::from(e)))?;
    if !response.status().is_success() {
        warn!(status = %response.status(), "token refresh rejected");
        return Err(RefreshError::Status(response.status()));
    }
    let update = parse_set_cookie_headers(response.headers());
    info!(fields = ?update.fields(), "tokens refreshed");
    store.update_tokens(update);
    Ok(())
}
