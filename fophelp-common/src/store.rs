pub mod memory;

use crate::types::{CredentialSet, TokenField, TokenUpdate};

/// Holder of the current [`CredentialSet`] of one client.
///
/// Implementations are shared between the request layer, the refresh coordinator
/// and the login flow, so every method takes `&self`. Readers must tolerate the
/// values changing between two calls.
pub trait TokenStore: Send + Sync {
    /// A snapshot of the current credentials.
    fn credentials(&self) -> CredentialSet;
    /// Overwrites only the fields present in `update`.
    fn update_tokens(&self, update: TokenUpdate);

    fn access_token(&self) -> String {
        self.credentials().access_token
    }
    fn refresh_token(&self) -> String {
        self.credentials().refresh_token
    }
    fn username(&self) -> String {
        self.credentials().username
    }
    fn refresh_expires(&self) -> String {
        self.credentials().refresh_expires
    }
    fn session_user(&self) -> String {
        self.credentials().session_user
    }
    fn get(&self, field: TokenField) -> String {
        self.credentials().get(field).to_owned()
    }
    /// The five wire cookies with their current values.
    fn all_cookies(&self) -> Vec<(&'static str, String)> {
        self.credentials().cookies()
    }
    /// The `Cookie` header value built from [`all_cookies()`](TokenStore::all_cookies).
    fn cookie_header(&self) -> String {
        self.all_cookies()
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<T> TokenStore for std::sync::Arc<T>
where
    T: TokenStore + ?Sized,
{
    fn credentials(&self) -> CredentialSet {
        (**self).credentials()
    }
    fn update_tokens(&self, update: TokenUpdate) {
        (**self).update_tokens(update)
    }
}
