#![doc = "Credential Set and partial token updates."]
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five fields of a [`CredentialSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenField {
    AccessToken,
    RefreshToken,
    Username,
    RefreshExpires,
    SessionUser,
}

impl TokenField {
    /// All fields, in wire order.
    pub const ALL: [TokenField; 5] = [
        Self::AccessToken,
        Self::RefreshToken,
        Self::Username,
        Self::RefreshExpires,
        Self::SessionUser,
    ];

    /// The cookie name used on the wire.
    pub fn cookie_name(self) -> &'static str {
        match self {
            Self::AccessToken => "X-Access-Token",
            Self::RefreshToken => "X-Refresh-Token",
            Self::Username => "X-Username",
            Self::RefreshExpires => "X-Refresh-Expires",
            Self::SessionUser => "Session-User",
        }
    }
    /// The key used in `KEY=value` credential files and in the process environment.
    pub fn env_key(self) -> &'static str {
        match self {
            Self::AccessToken => "X_ACCESS_TOKEN",
            Self::RefreshToken => "X_REFRESH_TOKEN",
            Self::Username => "X_USERNAME",
            Self::RefreshExpires => "X_REFRESH_EXPIRES",
            Self::SessionUser => "SESSION_USER",
        }
    }
    /// The serialized field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
            Self::Username => "username",
            Self::RefreshExpires => "refreshExpires",
            Self::SessionUser => "sessionUser",
        }
    }
}

impl fmt::Display for TokenField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five-field bundle representing one authenticated session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSet {
    pub access_token: String,
    pub refresh_token: String,
    pub username: String,
    pub refresh_expires: String,
    pub session_user: String,
}

impl CredentialSet {
    pub fn get(&self, field: TokenField) -> &str {
        match field {
            TokenField::AccessToken => &self.access_token,
            TokenField::RefreshToken => &self.refresh_token,
            TokenField::Username => &self.username,
            TokenField::RefreshExpires => &self.refresh_expires,
            TokenField::SessionUser => &self.session_user,
        }
    }
    fn get_mut(&mut self, field: TokenField) -> &mut String {
        match field {
            TokenField::AccessToken => &mut self.access_token,
            TokenField::RefreshToken => &mut self.refresh_token,
            TokenField::Username => &mut self.username,
            TokenField::RefreshExpires => &mut self.refresh_expires,
            TokenField::SessionUser => &mut self.session_user,
        }
    }
    /// Whether every field is non-empty.
    pub fn is_complete(&self) -> bool {
        TokenField::ALL.iter().all(|field| !self.get(*field).is_empty())
    }
    /// Cookie name / value pairs in wire order.
    pub fn cookies(&self) -> Vec<(&'static str, String)> {
        TokenField::ALL
            .iter()
            .map(|field| (field.cookie_name(), self.get(*field).to_owned()))
            .collect()
    }
    /// Credential-file `KEY=value` pairs in wire order.
    pub fn env_entries(&self) -> Vec<(&'static str, String)> {
        TokenField::ALL.iter().map(|field| (field.env_key(), self.get(*field).to_owned())).collect()
    }
}

impl From<CredentialSet> for TokenUpdate {
    fn from(credentials: CredentialSet) -> Self {
        Self {
            access_token: Some(credentials.access_token),
            refresh_token: Some(credentials.refresh_token),
            username: Some(credentials.username),
            refresh_expires: Some(credentials.refresh_expires),
            session_user: Some(credentials.session_user),
        }
    }
}

/// A partial update of a [`CredentialSet`].
///
/// Fields left as `None` keep their current value when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_expires: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_user: Option<String>,
}

impl TokenUpdate {
    pub fn get(&self, field: TokenField) -> Option<&str> {
        match field {
            TokenField::AccessToken => self.access_token.as_deref(),
            TokenField::RefreshToken => self.refresh_token.as_deref(),
            TokenField::Username => self.username.as_deref(),
            TokenField::RefreshExpires => self.refresh_expires.as_deref(),
            TokenField::SessionUser => self.session_user.as_deref(),
        }
    }
    pub fn set(&mut self, field: TokenField, value: impl Into<String>) {
        let slot = match field {
            TokenField::AccessToken => &mut self.access_token,
            TokenField::RefreshToken => &mut self.refresh_token,
            TokenField::Username => &mut self.username,
            TokenField::RefreshExpires => &mut self.refresh_expires,
            TokenField::SessionUser => &mut self.session_user,
        };
        *slot = Some(value.into());
    }
    pub fn is_empty(&self) -> bool {
        TokenField::ALL.iter().all(|field| self.get(*field).is_none())
    }
    /// Fields carried by this update.
    pub fn fields(&self) -> Vec<TokenField> {
        TokenField::ALL.into_iter().filter(|field| self.get(*field).is_some()).collect()
    }
    /// Overwrites the fields present in `self`, leaving the rest untouched.
    pub fn merge_into(self, credentials: &mut CredentialSet) {
        for field in TokenField::ALL {
            if let Some(value) = self.get(field) {
                *credentials.get_mut(field) = value.to_owned();
            }
        }
    }
    /// Converts into a full [`CredentialSet`], failing with the first absent or empty field.
    pub fn into_credentials(self) -> Result<CredentialSet, TokenField> {
        if let Some(missing) = TokenField::ALL
            .into_iter()
            .find(|field| self.get(*field).map_or(true, str::is_empty))
        {
            return Err(missing);
        }
        let mut credentials = CredentialSet::default();
        self.merge_into(&mut credentials);
        Ok(credentials)
    }
}
