#![doc = "Credential model, token store and cookie parsing shared by the FopHELP crates."]
pub mod cookie;
pub mod store;
pub mod types;

pub use crate::store::memory::MemoryTokenStore;
pub use crate::store::TokenStore;
pub use crate::types::{CredentialSet, TokenField, TokenUpdate};
