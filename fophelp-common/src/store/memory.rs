use super::TokenStore;
use crate::types::{CredentialSet, TokenUpdate};
use std::sync::{Arc, RwLock};

/// In-memory [`TokenStore`]. Clones share the same credentials.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<CredentialSet>>,
}

impl MemoryTokenStore {
    pub fn new(initial: CredentialSet) -> Self {
        Self { tokens: Arc::new(RwLock::new(initial)) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn credentials(&self) -> CredentialSet {
        self.tokens.read().expect("failed to read tokens").clone()
    }
    fn update_tokens(&self, update: TokenUpdate) {
        update.merge_into(&mut self.tokens.write().expect("failed to write tokens"));
    }
}
