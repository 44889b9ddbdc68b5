//! Configuration types for the storefront SDK.
//!
//! This module provides the core configuration types used to initialize
//! the SDK for communication with the commerce backend.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`StoreConfig`]: The main configuration struct holding all SDK settings
//! - [`StoreConfigBuilder`]: A builder for constructing [`StoreConfig`] instances
//! - [`BaseUrl`]: A validated backend base URL
//! - [`PublishableKey`]: A validated publishable API key newtype
//!
//! # Example
//!
//! ```rust
//! use storefront_api::{StoreConfig, BaseUrl, PublishableKey};
//!
//! let config = StoreConfig::builder()
//!     .base_url(BaseUrl::new("https://store.example.com").unwrap())
//!     .publishable_key(PublishableKey::new("pk_01ABCDEF").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, PublishableKey};

use crate::error::ConfigError;

/// Environment variable naming the backend base URL.
pub const BACKEND_URL_ENV: &str = "STORE_BACKEND_URL";

/// Environment variable naming the publishable API key.
pub const PUBLISHABLE_KEY_ENV: &str = "STORE_PUBLISHABLE_KEY";

/// Backend URL used when [`BACKEND_URL_ENV`] is unset.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:9000";

/// Configuration for the storefront SDK.
///
/// Holds the backend base URL and the optional publishable key. Configuration
/// is instance-based and passed explicitly; there is no global state.
///
/// # Thread Safety
///
/// `StoreConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use storefront_api::{StoreConfig, BaseUrl};
///
/// let config = StoreConfig::builder()
///     .base_url(BaseUrl::new("http://localhost:9000").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.base_url().as_ref(), "http://localhost:9000");
/// assert!(config.publishable_key().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct StoreConfig {
    base_url: BaseUrl,
    publishable_key: Option<PublishableKey>,
}

impl StoreConfig {
    /// Creates a new builder for constructing a `StoreConfig`.
    #[must_use]
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::new()
    }

    /// Builds a configuration from the process environment.
    ///
    /// Reads [`BACKEND_URL_ENV`] (falling back to [`DEFAULT_BACKEND_URL`])
    /// and [`PUBLISHABLE_KEY_ENV`] (an empty or unset value means no key).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the configured URL is not
    /// a valid `http`/`https` URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var(BACKEND_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let mut builder = Self::builder().base_url(BaseUrl::new(url)?);

        if let Some(key) = std::env::var(PUBLISHABLE_KEY_ENV)
            .ok()
            .filter(|v| !v.is_empty())
        {
            builder = builder.publishable_key(PublishableKey::new(key)?);
        }

        builder.build()
    }

    /// Returns the backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the publishable API key, if configured.
    #[must_use]
    pub const fn publishable_key(&self) -> Option<&PublishableKey> {
        self.publishable_key.as_ref()
    }
}

// Verify StoreConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StoreConfig>();
};

/// Builder for constructing [`StoreConfig`] instances.
///
/// The only required field is `base_url`; the publishable key is optional
/// because some backends accept anonymous catalog reads.
///
/// # Example
///
/// ```rust
/// use storefront_api::{StoreConfig, BaseUrl, PublishableKey};
///
/// let config = StoreConfig::builder()
///     .base_url(BaseUrl::new("https://store.example.com").unwrap())
///     .publishable_key(PublishableKey::new("pk_01ABCDEF").unwrap())
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    base_url: Option<BaseUrl>,
    publishable_key: Option<PublishableKey>,
}

impl StoreConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the publishable API key.
    #[must_use]
    pub fn publishable_key(mut self, key: PublishableKey) -> Self {
        self.publishable_key = Some(key);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` was not set.
    pub fn build(self) -> Result<StoreConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        Ok(StoreConfig {
            base_url,
            publishable_key: self.publishable_key,
        })
    }
}
