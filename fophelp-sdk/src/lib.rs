#![doc = include_str!("../README.md")]
mod client;
pub mod config;
mod error;

pub use crate::client::FophelpApiClient;
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use fophelp_api as api;
pub use fophelp_common as common;
pub use fophelp_http as http;
