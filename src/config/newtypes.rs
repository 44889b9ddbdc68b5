//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated storefront publishable API key.
///
/// This newtype ensures the key is non-empty and provides type safety to
/// prevent accidental misuse of raw strings. The key is sent on every request
/// in the `x-publishable-api-key` header.
///
/// # Example
///
/// ```rust
/// use storefront_api::PublishableKey;
///
/// let key = PublishableKey::new("pk_01ABCDEF").unwrap();
/// assert_eq!(key.as_ref(), "pk_01ABCDEF");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishableKey(String);

impl PublishableKey {
    /// Creates a new validated publishable key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPublishableKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyPublishableKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for PublishableKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated backend base URL.
///
/// The URL must carry an `http://` or `https://` scheme; a trailing slash is
/// stripped so paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use storefront_api::BaseUrl;
///
/// let url = BaseUrl::new("https://store.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://store.example.com");
///
/// assert!(BaseUrl::new("store.example.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is empty, lacks an
    /// `http`/`https` scheme, or has no host part.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim();

        let rest = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));

        match rest {
            Some(host) if !host.is_empty() => {
                Ok(Self(trimmed.trim_end_matches('/').to_string()))
            }
            _ => Err(ConfigError::InvalidBaseUrl { url }),
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
