#![doc = include_str!("../README.md")]
pub mod auth;
pub mod env_file;
mod error;
pub mod incomes;
pub mod login;
pub mod taxes;
pub mod types;

pub use crate::auth::AuthApi;
pub use crate::error::{Error, Result};
pub use crate::incomes::IncomesApi;
pub use crate::login::{LoginService, LOGIN_PATH};
pub use crate::taxes::TaxesApi;

/// API version prefix used when none is configured.
pub const DEFAULT_API_VERSION: &str = "/api/v2.0";
