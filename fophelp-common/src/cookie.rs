#![doc = "Extraction of the credential cookies from `Set-Cookie` response headers."]
use crate::types::{TokenField, TokenUpdate};
use http::header::{HeaderMap, SET_COOKIE};
use regex::Regex;
use std::sync::OnceLock;

static RE_COOKIE_SEPARATOR: OnceLock<Regex> = OnceLock::new();
static RE_TOKEN_COOKIES: OnceLock<Vec<(TokenField, Regex)>> = OnceLock::new();

/// Splits a comma-joined `Set-Cookie` value into one fragment per cookie.
///
/// Only commas followed by a `name=` pattern start a new cookie, so attribute
/// values such as `Expires=Wed, 09 Jun 2021 10:18:14 GMT` stay intact.
pub fn split_set_cookie(value: &str) -> Vec<&str> {
    let re = RE_COOKIE_SEPARATOR
        .get_or_init(|| Regex::new(r",\s*[\w-]+\s*=").expect("invalid regex"));
    let mut fragments = Vec::new();
    let mut start = 0;
    for m in re.find_iter(value) {
        fragments.push(&value[start..m.start()]);
        start = m.start() + 1;
    }
    fragments.push(&value[start..]);
    fragments
}

/// Extracts the value of the `field` cookie from a single `Set-Cookie` fragment.
fn extract(fragment: &str, field: TokenField) -> Option<&str> {
    let patterns = RE_TOKEN_COOKIES.get_or_init(|| {
        TokenField::ALL
            .into_iter()
            .map(|field| {
                let pattern = format!(r"(?:^|;)\s*{}=([^;]+)", regex::escape(field.cookie_name()));
                (field, Regex::new(&pattern).expect("invalid regex"))
            })
            .collect()
    });
    patterns
        .iter()
        .find(|(f, _)| *f == field)
        .and_then(|(_, re)| re.captures(fragment))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
}

/// Parses one or more (possibly comma-joined) `Set-Cookie` values.
///
/// Fields that cannot be located are left as `None`; later occurrences win.
pub fn parse_set_cookie<'a>(values: impl IntoIterator<Item = &'a str>) -> TokenUpdate {
    let mut update = TokenUpdate::default();
    for value in values {
        for fragment in split_set_cookie(value) {
            let fragment = fragment.trim();
            for field in TokenField::ALL {
                if !fragment.contains(field.cookie_name()) {
                    continue;
                }
                if let Some(token) = extract(fragment, field) {
                    update.set(field, token);
                }
            }
        }
    }
    update
}

/// Parses every `Set-Cookie` header of a response.
pub fn parse_set_cookie_headers(headers: &HeaderMap) -> TokenUpdate {
    parse_set_cookie(headers.get_all(SET_COOKIE).iter().filter_map(|value| value.to_str().ok()))
}
