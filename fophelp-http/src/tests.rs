use crate::refresh::REFRESH_PATH;
use crate::{AuthSecret, FetchApiService, HttpClient, RefreshError, TokenRefreshService};
use fophelp_common::{CredentialSet, MemoryTokenStore, TokenStore};
use http::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use http::{Request, Response, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const BASE_URI: &str = "http://localhost:8080";

#[derive(Clone, Copy, Default)]
enum ExpiredSignal {
    #[default]
    Unauthorized,
    Forbidden,
    Header,
}

#[derive(Default)]
struct MockClient {
    counts: Arc<RwLock<HashMap<String, usize>>>,
    requests: Arc<RwLock<Vec<Request<Vec<u8>>>>>,
    signal: ExpiredSignal,
    refresh_fails: bool,
    refresh_does_not_help: bool,
}

impl HttpClient for MockClient {
    async fn send_http(
        &self,
        request: Request<Vec<u8>>,
    ) -> Result<Response<Vec<u8>>, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let path = request.uri().path().to_string();
        *self.counts.write().await.entry(path.clone()).or_default() += 1;
        let cookie = request
            .headers()
            .get(COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.requests.write().await.push(request);

        if path == REFRESH_PATH {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            if self.refresh_fails {
                return Ok(Response::builder().status(StatusCode::UNAUTHORIZED).body(Vec::new())?);
            }
            let access = if self.refresh_does_not_help { "expired" } else { "fresh" };
            return Ok(Response::builder()
                .status(StatusCode::OK)
                .header(SET_COOKIE, format!("X-Access-Token={access}; Path=/; HttpOnly"))
                .header(SET_COOKIE, "X-Refresh-Token=refresh-2; Path=/; HttpOnly")
                .body(Vec::new())?);
        }

        tokio::time::sleep(std::time::Duration::from_micros(10)).await;
        if cookie.contains("X-Access-Token=expired") {
            let builder = match self.signal {
                ExpiredSignal::Unauthorized => Response::builder().status(StatusCode::UNAUTHORIZED),
                ExpiredSignal::Forbidden => Response::builder().status(StatusCode::FORBIDDEN),
                ExpiredSignal::Header => {
                    Response::builder().status(StatusCode::OK).header("Token-Expired", "true")
                }
            };
            return Ok(builder.body(Vec::new())?);
        }
        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json")
            .body(br#"{"ok":true}"#.to_vec())?)
    }
}

fn credentials(access_token: &str) -> CredentialSet {
    CredentialSet {
        access_token: access_token.into(),
        refresh_token: "refresh".into(),
        username: "alice".into(),
        refresh_expires: "1234567890".into(),
        session_user: "sess".into(),
    }
}

fn service(client: MockClient, access_token: &str) -> (FetchApiService<MockClient>, MemoryTokenStore) {
    let store = MemoryTokenStore::new(credentials(access_token));
    let service = FetchApiService::new(BASE_URI, client, AuthSecret::default())
        .with_token_store(Arc::new(store.clone()));
    (service, store)
}

async fn count(counts: &Arc<RwLock<HashMap<String, usize>>>, path: &str) -> usize {
    counts.read().await.get(path).copied().unwrap_or_default()
}

#[tokio::test]
async fn request_with_valid_token() {
    let client = MockClient::default();
    let counts = Arc::clone(&client.counts);
    let (service, _) = service(client, "valid");
    let response = service.get("/api/v2.0/incomes", None, None).await.expect("get should succeed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body(), br#"{"ok":true}"#);
    assert_eq!(count(&counts, "/api/v2.0/incomes").await, 1);
    assert_eq!(count(&counts, REFRESH_PATH).await, 0);
}

#[tokio::test]
async fn refresh_and_retry_once() {
    for signal in [ExpiredSignal::Unauthorized, ExpiredSignal::Forbidden, ExpiredSignal::Header] {
        let client = MockClient { signal, ..Default::default() };
        let counts = Arc::clone(&client.counts);
        let requests = Arc::clone(&client.requests);
        let (service, store) = service(client, "expired");
        let response = service.get("/api/v2.0/taxes", None, None).await.expect("get should succeed");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("token-expired").is_none());
        assert_eq!(count(&counts, "/api/v2.0/taxes").await, 2);
        assert_eq!(count(&counts, REFRESH_PATH).await, 1);
        assert_eq!(store.access_token(), "fresh");
        assert_eq!(store.refresh_token(), "refresh-2");
        assert_eq!(store.username(), "alice");

        let requests = requests.read().await;
        let cookies = requests
            .iter()
            .map(|request| request.headers().get(COOKIE).cloned())
            .collect::<Vec<_>>();
        assert_eq!(
            cookies,
            vec![
                Some(HeaderValue::from_static(
                    "X-Access-Token=expired; X-Refresh-Token=refresh; X-Username=alice; \
                     X-Refresh-Expires=1234567890; Session-User=sess"
                )),
                Some(HeaderValue::from_static(
                    "X-Access-Token=expired; X-Refresh-Token=refresh; X-Username=alice; \
                     X-Refresh-Expires=1234567890; Session-User=sess"
                )),
                Some(HeaderValue::from_static(
                    "X-Access-Token=fresh; X-Refresh-Token=refresh-2; X-Username=alice; \
                     X-Refresh-Expires=1234567890; Session-User=sess"
                )),
            ]
        );
        assert_eq!(requests[1].uri().to_string(), format!("{BASE_URI}{REFRESH_PATH}"));
        assert_eq!(requests[1].headers().get(ACCEPT), Some(&HeaderValue::from_static("application/json")));
    }
}

#[tokio::test]
async fn second_expired_response_is_returned() {
    let client = MockClient { refresh_does_not_help: true, ..Default::default() };
    let counts = Arc::clone(&client.counts);
    let (service, _) = service(client, "expired");
    let response = service.get("/api/v2.0/incomes", None, None).await.expect("get should succeed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(count(&counts, "/api/v2.0/incomes").await, 2);
    assert_eq!(count(&counts, REFRESH_PATH).await, 1);
}

#[tokio::test]
async fn failed_refresh_returns_original_response() {
    let client = MockClient { refresh_fails: true, ..Default::default() };
    let counts = Arc::clone(&client.counts);
    let (service, store) = service(client, "expired");
    let response = service.get("/api/v2.0/incomes", None, None).await.expect("get should succeed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(count(&counts, "/api/v2.0/incomes").await, 1);
    assert_eq!(count(&counts, REFRESH_PATH).await, 1);
    assert_eq!(store.access_token(), "expired");
    assert!(!service.refresher().expect("refresher").is_refreshing());
}

#[tokio::test]
async fn no_refresh_without_token_store() {
    let client = MockClient::default();
    let counts = Arc::clone(&client.counts);
    let service = FetchApiService::new(
        BASE_URI,
        client,
        AuthSecret {
            cookies: Some(vec![("X-Access-Token".into(), "expired".into())]),
            ..Default::default()
        },
    );
    let response = service.get("/api/v2.0/incomes", None, None).await.expect("get should succeed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(count(&counts, "/api/v2.0/incomes").await, 1);
    assert_eq!(count(&counts, REFRESH_PATH).await, 0);
}

#[tokio::test]
async fn duplicated_refresh() {
    let client = MockClient::default();
    let counts = Arc::clone(&client.counts);
    let (service, store) = service(client, "expired");
    let service = Arc::new(service);
    let handles = (0..3).map(|_| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.get("/api/v2.0/incomes", None, None).await })
    });
    let results = futures::future::join_all(handles).await;
    for result in &results {
        let response = result
            .as_ref()
            .expect("task should be successfully executed")
            .as_ref()
            .expect("get should succeed");
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(store.access_token(), "fresh");
    assert_eq!(
        counts.read().await.clone(),
        HashMap::from_iter([(REFRESH_PATH.into(), 1), ("/api/v2.0/incomes".into(), 6)])
    );
}

#[tokio::test]
async fn concurrent_refresh_calls_share_one_request() {
    let client = MockClient::default();
    let counts = Arc::clone(&client.counts);
    let store = MemoryTokenStore::new(credentials("expired"));
    let refresher =
        Arc::new(TokenRefreshService::new(BASE_URI, Arc::new(client), Arc::new(store.clone())));
    let handles = (0..5).map(|_| {
        let refresher = Arc::clone(&refresher);
        tokio::spawn(async move { refresher.refresh_tokens().await })
    });
    for result in futures::future::join_all(handles).await {
        result.expect("task should be successfully executed").expect("refresh should succeed");
    }
    assert_eq!(count(&counts, REFRESH_PATH).await, 1);
    assert!(!refresher.is_refreshing());
    assert_eq!(store.access_token(), "fresh");

    // a later refresh starts a new request
    refresher.refresh_tokens().await.expect("refresh should succeed");
    assert_eq!(count(&counts, REFRESH_PATH).await, 2);
}

#[tokio::test]
async fn concurrent_refresh_calls_share_one_failure() {
    let client = MockClient { refresh_fails: true, ..Default::default() };
    let counts = Arc::clone(&client.counts);
    let store = MemoryTokenStore::new(credentials("expired"));
    let refresher =
        Arc::new(TokenRefreshService::new(BASE_URI, Arc::new(client), Arc::new(store.clone())));
    let handles = (0..3).map(|_| {
        let refresher = Arc::clone(&refresher);
        tokio::spawn(async move { refresher.refresh_tokens().await })
    });
    for result in futures::future::join_all(handles).await {
        let err = result.expect("task should be successfully executed").expect_err("must fail");
        assert!(matches!(err, RefreshError::Status(StatusCode::UNAUTHORIZED)), "got {err:?}");
    }
    assert_eq!(count(&counts, REFRESH_PATH).await, 1);
    assert!(!refresher.is_refreshing());
    assert_eq!(store.access_token(), "expired");

    // not stuck after a failure
    refresher.refresh_tokens().await.expect_err("must fail");
    assert_eq!(count(&counts, REFRESH_PATH).await, 2);
}

#[tokio::test]
async fn api_key_takes_precedence() {
    let client = MockClient::default();
    let requests = Arc::clone(&client.requests);
    let store = MemoryTokenStore::new(credentials("valid"));
    let service = FetchApiService::new(
        BASE_URI,
        client,
        AuthSecret {
            api_key: Some("key".into()),
            bearer_token: Some("bearer".into()),
            ..Default::default()
        },
    )
    .with_token_store(Arc::new(store));
    service.get("/api/v2.0/incomes", None, None).await.expect("get should succeed");
    let requests = requests.read().await;
    let headers = requests[0].headers();
    assert_eq!(headers.get("x-api-key"), Some(&HeaderValue::from_static("key")));
    assert!(headers.get(COOKIE).is_none());
    assert!(headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn auth_precedence_order() {
    async fn sent_headers(secret: AuthSecret, with_store: bool) -> HeaderMap {
        let client = MockClient::default();
        let requests = Arc::clone(&client.requests);
        let mut service = FetchApiService::new(BASE_URI, client, secret);
        if with_store {
            service = service.with_token_store(Arc::new(MemoryTokenStore::new(credentials("valid"))));
        }
        service.get("/", None, None).await.expect("get should succeed");
        let headers = requests.read().await[0].headers().clone();
        headers
    }

    let headers = sent_headers(
        AuthSecret {
            basic_token: Some("dXNlcjpwYXNz".into()),
            bearer_token: Some("bearer".into()),
            ..Default::default()
        },
        true,
    )
    .await;
    assert_eq!(headers.get(AUTHORIZATION), Some(&HeaderValue::from_static("Basic dXNlcjpwYXNz")));
    assert!(headers.get(COOKIE).is_none());

    let headers =
        sent_headers(AuthSecret { bearer_token: Some("bearer".into()), ..Default::default() }, true)
            .await;
    assert_eq!(headers.get(AUTHORIZATION), Some(&HeaderValue::from_static("Bearer bearer")));

    let headers = sent_headers(
        AuthSecret {
            cookies: Some(vec![("static".into(), "cookie".into())]),
            ..Default::default()
        },
        true,
    )
    .await;
    assert!(headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("X-Access-Token=valid")));

    let headers = sent_headers(
        AuthSecret {
            cookies: Some(vec![("static".into(), "cookie".into())]),
            ..Default::default()
        },
        false,
    )
    .await;
    assert_eq!(headers.get(COOKIE), Some(&HeaderValue::from_static("static=cookie")));

    let headers = sent_headers(AuthSecret::default(), false).await;
    assert!(headers.get(COOKIE).is_none());
    assert!(headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn default_headers_override_explicit_ones() {
    let client = MockClient::default();
    let requests = Arc::clone(&client.requests);
    let service = FetchApiService::new(BASE_URI, client, AuthSecret::default());
    let mut extra = HeaderMap::new();
    extra.insert(ACCEPT, HeaderValue::from_static("text/plain"));
    extra.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    extra.insert("x-request-id", HeaderValue::from_static("42"));

    service
        .post("/api/v2.0/incomes/add", &serde_json::json!({"income": "1"}), Some(&extra))
        .await
        .expect("post should succeed");
    service
        .put("/api/v2.0/incomes/1", &serde_json::json!({"income": "2"}), Some(&extra))
        .await
        .expect("put should succeed");
    service
        .post_form("/api/v2.0/upload", &[("name", "report"), ("year", "2025")][..], Some(&extra))
        .await
        .expect("post_form should succeed");
    service
        .post_form("/api/v2.0/upload", &[("name", "report")][..], None)
        .await
        .expect("post_form should succeed");

    let requests = requests.read().await;
    for request in &requests[..2] {
        assert_eq!(request.headers().get(ACCEPT), Some(&HeaderValue::from_static("application/json")));
        assert_eq!(
            request.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
        assert_eq!(request.headers().get("x-request-id"), Some(&HeaderValue::from_static("42")));
    }
    assert_eq!(requests[0].method(), http::Method::POST);
    assert_eq!(requests[0].body(), br#"{"income":"1"}"#);
    assert_eq!(requests[1].method(), http::Method::PUT);
    assert_eq!(requests[1].body(), br#"{"income":"2"}"#);
    assert_eq!(requests[2].headers().get(ACCEPT), Some(&HeaderValue::from_static("application/json")));
    assert_eq!(requests[2].headers().get(CONTENT_TYPE), Some(&HeaderValue::from_static("text/plain")));
    assert_eq!(requests[2].body(), b"name=report&year=2025");
    assert_eq!(
        requests[3].headers().get(CONTENT_TYPE),
        Some(&HeaderValue::from_static("application/x-www-form-urlencoded"))
    );
}

#[tokio::test]
async fn get_with_query_params() {
    let client = MockClient::default();
    let requests = Arc::clone(&client.requests);
    let service = FetchApiService::new(format!("{BASE_URI}/"), client, AuthSecret::default());
    service
        .get("/api/v2.0/incomes", Some(&[("year", "2025"), ("currency", "UAH")]), None)
        .await
        .expect("get should succeed");
    let requests = requests.read().await;
    assert_eq!(
        requests[0].uri().to_string(),
        "http://localhost:8080/api/v2.0/incomes?year=2025&currency=UAH"
    );
    assert_eq!(requests[0].method(), http::Method::GET);
    assert_eq!(
        requests[0].headers().get(CONTENT_TYPE),
        Some(&HeaderValue::from_static("application/json"))
    );
}

#[tokio::test]
async fn get_with_query_value_containing_space() {
    let client = MockClient::default();
    let requests = Arc::clone(&client.requests);
    let service = FetchApiService::new(BASE_URI, client, AuthSecret::default());
    let response = service
        .get("/api/v2.0/incomes", Some(&[("comment", "a b"), ("from", "2025-01-01")]), None)
        .await
        .expect("get should succeed");
    assert_eq!(response.status(), StatusCode::OK);
    let requests = requests.read().await;
    assert_eq!(
        requests[0].uri().to_string(),
        "http://localhost:8080/api/v2.0/incomes?comment=a%20b&from=2025-01-01"
    );
}

#[tokio::test]
async fn repeated_caller_headers_are_kept() {
    let client = MockClient::default();
    let requests = Arc::clone(&client.requests);
    let (service, _) = service(client, "valid");
    let mut extra = HeaderMap::new();
    extra.append("x-trace", HeaderValue::from_static("a"));
    extra.append("x-trace", HeaderValue::from_static("b"));
    service.get("/api/v2.0/incomes", None, Some(&extra)).await.expect("get should succeed");
    service
        .post_form("/api/v2.0/upload", &[("name", "report")][..], Some(&extra))
        .await
        .expect("post_form should succeed");

    let requests = requests.read().await;
    for request in requests.iter() {
        let values = request.headers().get_all("x-trace").iter().cloned().collect::<Vec<_>>();
        assert_eq!(values, vec![HeaderValue::from_static("a"), HeaderValue::from_static("b")]);
        assert_eq!(request.headers().get(ACCEPT), Some(&HeaderValue::from_static("application/json")));
        assert!(request.headers().get(COOKIE).is_some());
    }
    assert_eq!(requests[1].headers().get_all(CONTENT_TYPE).iter().count(), 1);
}

#[tokio::test]
async fn refresh_outlives_cancelled_caller() {
    let client = MockClient::default();
    let counts = Arc::clone(&client.counts);
    let store = MemoryTokenStore::new(credentials("expired"));
    let refresher = TokenRefreshService::new(BASE_URI, Arc::new(client), Arc::new(store.clone()));

    // the mock refresh takes 10ms
    let cancelled =
        tokio::time::timeout(std::time::Duration::from_millis(2), refresher.refresh_tokens()).await;
    assert!(cancelled.is_err());
    assert!(refresher.is_refreshing());

    refresher.refresh_tokens().await.expect("refresh should succeed");
    assert_eq!(count(&counts, REFRESH_PATH).await, 1);
    assert!(!refresher.is_refreshing());
    assert_eq!(store.access_token(), "fresh");
}

#[tokio::test]
async fn settled_failure_is_not_shared_with_later_callers() {
    let client = MockClient { refresh_fails: true, ..Default::default() };
    let counts = Arc::clone(&client.counts);
    let store = MemoryTokenStore::new(credentials("expired"));
    let refresher = TokenRefreshService::new(BASE_URI, Arc::new(client), Arc::new(store));
    refresher.refresh_tokens().await.expect_err("must fail");
    // the slot is already empty when the caller sees the result
    assert!(!refresher.is_refreshing());
    refresher.refresh_tokens().await.expect_err("must fail");
    assert_eq!(count(&counts, REFRESH_PATH).await, 2);
}

#[test]
fn expiry_predicate() {
    let response = |status: StatusCode, header: Option<&'static str>| {
        let mut builder = Response::builder().status(status);
        if let Some(value) = header {
            builder = builder.header("Token-Expired", value);
        }
        builder.body(()).expect("response")
    };
    assert!(crate::is_token_expired(&response(StatusCode::UNAUTHORIZED, None)));
    assert!(crate::is_token_expired(&response(StatusCode::FORBIDDEN, None)));
    assert!(crate::is_token_expired(&response(StatusCode::OK, Some("true"))));
    assert!(!crate::is_token_expired(&response(StatusCode::OK, Some("false"))));
    assert!(!crate::is_token_expired(&response(StatusCode::OK, None)));
    assert!(!crate::is_token_expired(&response(StatusCode::INTERNAL_SERVER_ERROR, None)));
    assert!(TokenRefreshService::<MockClient>::is_token_expired(&response(
        StatusCode::UNAUTHORIZED,
        None
    )));
}
