//! Per-shop access-token storage.
//!
//! The pipeline only ever does a keyed lookup; writes happen in the OAuth
//! callback and the uninstall webhook. The trait keeps the HTTP handlers
//! independent of where tokens actually live.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Keyed credential store: one access token per shop domain.
pub trait TokenStore: Send + Sync {
    fn get(&self, shop: &str) -> Option<String>;
    fn set(&self, shop: &str, token: String);
    fn delete(&self, shop: &str);
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<String, String>>,
}

impl InMemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self, shop: &str) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(shop)
            .cloned()
    }

    fn set(&self, shop: &str, token: String) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(shop.to_owned(), token);
    }

    fn delete(&self, shop: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(shop);
    }
}
