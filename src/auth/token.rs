//! Bearer token management.
//!
//! This module provides [`TokenManager`], which owns the authentication
//! credential: it persists the token in durable client storage, mirrors it
//! into a cookie-style channel for backend session correlation, and pushes it
//! into the shared [`AuthState`] the HTTP client reads when building request
//! headers.
//!
//! All storage access is best-effort: a failed read or write degrades to
//! "no token" and is logged, never propagated. The invariant is that at most
//! one non-expired credential exists at a time: setting a token replaces the
//! previous one everywhere, and clearing removes it everywhere.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use storefront_api::auth::{MemoryStorage, TokenManager};
//!
//! let manager = TokenManager::new(Arc::new(MemoryStorage::new()));
//! assert!(manager.token().is_none());
//! assert!(TokenManager::is_token_expired("not-a-jwt"));
//! ```

use std::sync::{Arc, RwLock};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;

use crate::auth::storage::ClientStorage;

/// Storage key under which the bearer token is persisted.
pub const TOKEN_STORAGE_KEY: &str = "store_auth_token";

/// Name of the session cookie mirroring the bearer token.
pub const SESSION_COOKIE_NAME: &str = "connect.sid";

/// Shared authorization state read by the HTTP client.
///
/// Cloning an `AuthState` yields another handle to the same underlying slot;
/// the token manager writes it and every client clone observes the update.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    token: Arc<RwLock<Option<String>>>,
}

impl AuthState {
    /// Returns the current bearer token, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.token.read().map(|guard| guard.clone()).unwrap_or(None)
    }

    fn set(&self, token: &str) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

/// Owns the authentication credential and its persistence.
///
/// # Thread Safety
///
/// `TokenManager` is `Send + Sync`; share it via `Arc` between the HTTP
/// client and the auth state container.
pub struct TokenManager {
    storage: Arc<dyn ClientStorage>,
    state: AuthState,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Creates a manager over the given storage backend.
    ///
    /// A previously persisted, still unexpired token is loaded into the
    /// shared auth state immediately so API calls made before any login
    /// carry the surviving credential.
    #[must_use]
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        let manager = Self {
            storage,
            state: AuthState::default(),
        };

        if let Some(token) = manager.token() {
            if Self::is_token_expired(&token) {
                manager.clear_token();
            } else {
                manager.state.set(&token);
            }
        }

        manager
    }

    /// Returns a handle to the shared authorization state.
    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        self.state.clone()
    }

    /// Returns the persisted token, expired or not.
    ///
    /// Storage failures degrade to `None`.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self.storage.get(TOKEN_STORAGE_KEY) {
            Ok(token) => token,
            Err(error) => {
                tracing::error!(error = %error, "failed to read stored token");
                None
            }
        }
    }

    /// Returns the persisted token only when it has not expired.
    #[must_use]
    pub fn current_valid_token(&self) -> Option<String> {
        self.token().filter(|token| !Self::is_token_expired(token))
    }

    /// Returns `true` when a non-expired credential is present.
    #[must_use]
    pub fn has_valid_token(&self) -> bool {
        self.current_valid_token().is_some()
    }

    /// Returns the decoded session cookie value, if set.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        let raw = match self.storage.get_cookie(SESSION_COOKIE_NAME) {
            Ok(value) => value?,
            Err(error) => {
                tracing::error!(error = %error, "failed to read session cookie");
                return None;
            }
        };
        match urlencoding::decode(&raw) {
            Ok(decoded) => Some(decoded.into_owned()),
            Err(_) => Some(raw),
        }
    }

    /// Persists `token`, mirrors it into the session cookie, and pushes it
    /// into the shared auth state.
    ///
    /// Each step is best-effort: a storage failure is logged and the
    /// remaining steps still run.
    pub fn set_token(&self, token: &str) {
        if let Err(error) = self.storage.set(TOKEN_STORAGE_KEY, token) {
            tracing::error!(error = %error, "failed to persist token");
        }

        let encoded = urlencoding::encode(token);
        if let Err(error) = self.storage.set_cookie(SESSION_COOKIE_NAME, &encoded) {
            tracing::error!(error = %error, "failed to mirror token into session cookie");
        }

        self.state.set(token);
    }

    /// Removes the credential from storage, the cookie channel, and the
    /// shared auth state.
    pub fn clear_token(&self) {
        if let Err(error) = self.storage.remove(TOKEN_STORAGE_KEY) {
            tracing::error!(error = %error, "failed to remove stored token");
        }

        if let Err(error) = self.storage.clear_cookie(SESSION_COOKIE_NAME) {
            tracing::error!(error = %error, "failed to clear session cookie");
        }

        self.state.clear();
    }

    /// Reports whether `token` has expired.
    ///
    /// The middle segment is decoded as a base64url JSON payload and its
    /// `exp` claim (epoch seconds) compared to the current time. A token
    /// without an `exp` claim does not expire. Anything structurally
    /// malformed (wrong segment count, undecodable payload) is treated as
    /// expired.
    #[must_use]
    pub fn is_token_expired(token: &str) -> bool {
        decode_claims(token).map_or(true, |claims| {
            claims
                .get("exp")
                .and_then(serde_json::Value::as_i64)
                .is_some_and(|exp| exp < Utc::now().timestamp())
        })
    }
}

// Verify TokenManager is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenManager>();
    assert_send_sync::<AuthState>();
};

/// Decodes the JWT payload segment without verifying the signature.
///
/// The client has no signing secret; it only inspects the expiry claim.
fn decode_claims(token: &str) -> Option<serde_json::Value> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return None,
    };
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStorage;
    use crate::error::StorageError;

    fn make_token(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.signature")
    }

    fn token_expiring_in(seconds: i64) -> String {
        make_token(&serde_json::json!({ "exp": Utc::now().timestamp() + seconds }))
    }

    #[test]
    fn test_past_exp_is_expired() {
        assert!(TokenManager::is_token_expired(&token_expiring_in(-60)));
    }

    #[test]
    fn test_future_exp_is_not_expired() {
        assert!(!TokenManager::is_token_expired(&token_expiring_in(3600)));
    }

    #[test]
    fn test_missing_exp_claim_never_expires() {
        let token = make_token(&serde_json::json!({ "sub": "cus_01" }));
        assert!(!TokenManager::is_token_expired(&token));
    }

    #[test]
    fn test_wrong_segment_count_is_expired() {
        assert!(TokenManager::is_token_expired("only.two"));
        assert!(TokenManager::is_token_expired("one"));
        assert!(TokenManager::is_token_expired("a.b.c.d"));
        assert!(TokenManager::is_token_expired(""));
    }

    #[test]
    fn test_undecodable_payload_is_expired() {
        assert!(TokenManager::is_token_expired("head.!!!not-base64!!!.sig"));
    }

    #[test]
    fn test_set_token_persists_and_mirrors_cookie() {
        let storage = Arc::new(MemoryStorage::new());
        let manager = TokenManager::new(Arc::clone(&storage) as Arc<dyn ClientStorage>);
        let token = token_expiring_in(3600);

        manager.set_token(&token);

        assert_eq!(storage.get(TOKEN_STORAGE_KEY).unwrap(), Some(token.clone()));
        assert!(storage.get_cookie(SESSION_COOKIE_NAME).unwrap().is_some());
        assert_eq!(manager.session_cookie(), Some(token.clone()));
        assert_eq!(manager.auth_state().bearer_token(), Some(token));
    }

    #[test]
    fn test_clear_token_removes_everything() {
        let storage = Arc::new(MemoryStorage::new());
        let manager = TokenManager::new(Arc::clone(&storage) as Arc<dyn ClientStorage>);

        manager.set_token(&token_expiring_in(3600));
        manager.clear_token();

        assert_eq!(storage.get(TOKEN_STORAGE_KEY).unwrap(), None);
        assert_eq!(storage.get_cookie(SESSION_COOKIE_NAME).unwrap(), None);
        assert!(manager.auth_state().bearer_token().is_none());
        assert!(manager.token().is_none());
    }

    #[test]
    fn test_construction_loads_surviving_token() {
        let storage = Arc::new(MemoryStorage::new());
        let token = token_expiring_in(3600);
        storage.set(TOKEN_STORAGE_KEY, &token).unwrap();

        let manager = TokenManager::new(Arc::clone(&storage) as Arc<dyn ClientStorage>);

        assert_eq!(manager.auth_state().bearer_token(), Some(token));
    }

    #[test]
    fn test_construction_discards_expired_token() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(TOKEN_STORAGE_KEY, &token_expiring_in(-60))
            .unwrap();

        let manager = TokenManager::new(Arc::clone(&storage) as Arc<dyn ClientStorage>);

        assert!(manager.auth_state().bearer_token().is_none());
        assert_eq!(storage.get(TOKEN_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_current_valid_token_filters_expired() {
        let storage = Arc::new(MemoryStorage::new());
        let manager = TokenManager::new(Arc::clone(&storage) as Arc<dyn ClientStorage>);

        storage
            .set(TOKEN_STORAGE_KEY, &token_expiring_in(-60))
            .unwrap();
        assert!(manager.token().is_some());
        assert!(manager.current_valid_token().is_none());
        assert!(!manager.has_valid_token());
    }

    struct BrokenStorage;

    impl ClientStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable {
                reason: "offline".to_string(),
            })
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable {
                reason: "offline".to_string(),
            })
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable {
                reason: "offline".to_string(),
            })
        }
        fn get_cookie(&self, _name: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable {
                reason: "offline".to_string(),
            })
        }
        fn set_cookie(&self, _name: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable {
                reason: "offline".to_string(),
            })
        }
        fn clear_cookie(&self, _name: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable {
                reason: "offline".to_string(),
            })
        }
    }

    #[test]
    fn test_storage_failures_degrade_to_no_token() {
        let manager = TokenManager::new(Arc::new(BrokenStorage));

        assert!(manager.token().is_none());
        assert!(manager.session_cookie().is_none());

        // Writes must not panic; the in-memory state still updates.
        let token = token_expiring_in(3600);
        manager.set_token(&token);
        assert_eq!(manager.auth_state().bearer_token(), Some(token));

        manager.clear_token();
        assert!(manager.auth_state().bearer_token().is_none());
    }
}
