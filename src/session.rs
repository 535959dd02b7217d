// src/session.rs
// Credential storage: the token and display username kept between runs

mod file;
mod memory;

pub use file::{FileStore, default_session_path};
pub use memory::MemoryStore;

use std::sync::Arc;

use crate::error::StoreError;

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Key holding the display username
pub const USERNAME_KEY: &str = "username";

/// Key/value storage for session credentials.
///
/// Implementations must be safe to share between concurrent requests;
/// each call is independent and no ordering between calls is promised.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Typed view over a [`CredentialStore`]
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Current bearer token, if any. Empty strings count as absent.
    pub fn token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    pub fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn username(&self) -> Result<Option<String>, StoreError> {
        self.store.get(USERNAME_KEY)
    }

    pub fn set_username(&self, username: &str) -> Result<(), StoreError> {
        self.store.set(USERNAME_KEY, username)
    }

    /// Drop the token only; used when the server rejects it
    pub fn evict_token(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)
    }

    /// Drop everything; used on logout
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.clear()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_token_lifecycle() {
        let session = session();
        assert!(session.token().unwrap().is_none());
        assert!(!session.is_authenticated());

        session.set_token("abc123").unwrap();
        assert_eq!(session.token().unwrap().as_deref(), Some("abc123"));
        assert!(session.is_authenticated());

        session.evict_token().unwrap();
        assert!(session.token().unwrap().is_none());
    }

    #[test]
    fn test_evict_keeps_username() {
        let session = session();
        session.set_token("abc123").unwrap();
        session.set_username("asha").unwrap();

        session.evict_token().unwrap();
        assert_eq!(session.username().unwrap().as_deref(), Some("asha"));

        session.clear().unwrap();
        assert!(session.username().unwrap().is_none());
    }

    #[test]
    fn test_empty_token_is_absent() {
        let session = session();
        session.set_token("").unwrap();
        assert!(session.token().unwrap().is_none());
    }
}
