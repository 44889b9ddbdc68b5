//! Durable client storage abstraction.
//!
//! The storefront persists exactly three things between sessions: the bearer
//! token, the active cart id, and a session cookie mirroring the token.
//! [`ClientStorage`] abstracts over where those live so state containers can
//! be constructed with an isolated backend in tests, and [`MemoryStorage`]
//! provides the in-process implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StorageError;

/// Key/value storage with a separate cookie-style channel.
///
/// Implementations must be best-effort friendly: callers in this crate treat
/// any error as "value absent" rather than failing the operation that
/// triggered the access.
pub trait ClientStorage: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Reads the cookie named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the cookie channel cannot be read.
    fn get_cookie(&self, name: &str) -> Result<Option<String>, StorageError>;

    /// Sets the cookie named `name` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the cookie channel cannot be written.
    fn set_cookie(&self, name: &str, value: &str) -> Result<(), StorageError>;

    /// Clears the cookie named `name`, if set.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the cookie channel cannot be written.
    fn clear_cookie(&self, name: &str) -> Result<(), StorageError>;
}

/// In-process [`ClientStorage`] backed by two hash maps.
///
/// Values persist for the lifetime of the instance; multiple handles to the
/// same instance (via `Arc`) observe each other's writes with no further
/// coordination; last write wins, as in the browser storage it stands in for.
///
/// # Example
///
/// ```rust
/// use storefront_api::auth::{ClientStorage, MemoryStorage};
///
/// let storage = MemoryStorage::new();
/// storage.set("store_cart_id", "cart_01").unwrap();
/// assert_eq!(storage.get("store_cart_id").unwrap().as_deref(), Some("cart_01"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    cookies: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.remove(key);
        Ok(())
    }

    fn get_cookie(&self, name: &str) -> Result<Option<String>, StorageError> {
        let cookies = self.cookies.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(cookies.get(name).cloned())
    }

    fn set_cookie(&self, name: &str, value: &str) -> Result<(), StorageError> {
        let mut cookies = self.cookies.lock().map_err(|_| StorageError::Poisoned)?;
        cookies.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn clear_cookie(&self, name: &str) -> Result<(), StorageError> {
        let mut cookies = self.cookies.lock().map_err(|_| StorageError::Poisoned)?;
        cookies.remove(name);
        Ok(())
    }
}

// Verify MemoryStorage is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MemoryStorage>();
};
