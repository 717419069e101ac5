#![doc = include_str!("../README.md")]
pub mod reqwest;

pub use crate::reqwest::{ReqwestClient, ReqwestClientBuilder};
