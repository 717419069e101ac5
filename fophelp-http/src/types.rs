use http::header::{HeaderMap, HeaderName, ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE};
use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

pub(crate) const APPLICATION_JSON: &str = "application/json";
pub(crate) const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Bytes that cannot appear in a URI. Reserved characters such as `&`, `=` and `?`
/// are left as they are.
const INVALID_URI_CHARS: &AsciiSet =
    &CONTROLS
        .add(b' ')
        .add(b'"')
        .add(b'#')
        .add(b'<')
        .add(b'>')
        .add(b'\\')
        .add(b'^')
        .add(b'`')
        .add(b'{')
        .add(b'|')
        .add(b'}');

/// HTTP headers which are set by this crate.
pub enum Header {
    ContentType,
    Accept,
    Authorization,
    Cookie,
    ApiKey,
    TokenExpired,
}

impl From<Header> for HeaderName {
    fn from(value: Header) -> Self {
        match value {
            Header::ContentType => CONTENT_TYPE,
            Header::Accept => ACCEPT,
            Header::Authorization => AUTHORIZATION,
            Header::Cookie => COOKIE,
            Header::ApiKey => HeaderName::from_static("x-api-key"),
            Header::TokenExpired => HeaderName::from_static("token-expired"),
        }
    }
}

/// Static authentication material.
///
/// At most one kind is applied per request, in this order: `api_key`,
/// `basic_token`, `bearer_token`, then the dynamic token store (if any), then
/// `cookies`. Empty values count as unset.
#[derive(Debug, Clone, Default)]
pub struct AuthSecret {
    pub api_key: Option<String>,
    pub basic_token: Option<String>,
    pub bearer_token: Option<String>,
    pub cookies: Option<Vec<(String, String)>>,
}

impl AuthSecret {
    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|s| !s.is_empty())
    }
    pub(crate) fn basic_token(&self) -> Option<&str> {
        self.basic_token.as_deref().filter(|s| !s.is_empty())
    }
    pub(crate) fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref().filter(|s| !s.is_empty())
    }
    pub(crate) fn cookie_header(&self) -> Option<String> {
        self.cookies.as_ref().map(|cookies| {
            cookies.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("; ")
        })
    }
}

/// Body encoding of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// JSON verbs: `Content-Type: application/json` is always sent.
    Json,
    /// URL-encoded form; the content type may be overridden by explicit headers.
    Form,
}

/// One logical request, replayable as many times as the retry protocol needs.
///
/// Authentication headers are not part of it: they are derived from the current
/// credentials every time the request is sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<Vec<(String, String)>>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub encoding: Encoding,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
            encoding: Encoding::Json,
        }
    }
    /// Query parameters, serialized as `key=value` pairs joined by `&` in the given order.
    ///
    /// Only bytes that would make the URI invalid (whitespace, controls, non-ASCII)
    /// are percent-encoded.
    pub fn query<K, V>(mut self, params: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: ToString,
    {
        self.query = Some(params.iter().map(|(k, v)| (k.as_ref().to_owned(), v.to_string())).collect());
        self
    }
    pub fn headers(mut self, headers: Option<&HeaderMap>) -> Self {
        if let Some(headers) = headers {
            self.headers = headers.clone();
        }
        self
    }
    pub fn json_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self.encoding = Encoding::Json;
        self
    }
    pub fn form_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self.encoding = Encoding::Form;
        self
    }
    /// The path with its query string, relative to the base URL.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(params) => format!(
                "{}?{}",
                self.path,
                params
                    .iter()
                    .map(|(k, v)| format!(
                        "{}={}",
                        utf8_percent_encode(k, INVALID_URI_CHARS),
                        utf8_percent_encode(v, INVALID_URI_CHARS)
                    ))
                    .collect::<Vec<_>>()
                    .join("&")
            ),
            None => self.path.clone(),
        }
    }
}
