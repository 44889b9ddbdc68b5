//! Error types for SDK configuration and client storage.
//!
//! This module contains the error types used by configuration constructors
//! and by [`ClientStorage`](crate::auth::ClientStorage) implementations.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use storefront_api::{PublishableKey, ConfigError};
//!
//! let result = PublishableKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyPublishableKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Publishable API key cannot be empty.
    #[error("Publishable API key cannot be empty. Please provide a valid storefront publishable key.")]
    EmptyPublishableKey,

    /// Backend base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://store.example.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

/// Errors reported by [`ClientStorage`](crate::auth::ClientStorage) backends.
///
/// The token manager treats every storage failure as "value absent" rather
/// than propagating it, so these errors surface only through `tracing` logs
/// and to callers using a storage backend directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The storage backend could not be reached or refused the operation.
    #[error("Storage backend unavailable: {reason}")]
    Unavailable {
        /// Backend-specific description of the failure.
        reason: String,
    },

    /// The in-process storage lock was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_publishable_key_error_message() {
        let error = ConfigError::EmptyPublishableKey;
        let message = error.to_string();
        assert!(message.contains("Publishable API key cannot be empty"));
    }

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("valid URL with scheme"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "base_url" };
        let message = error.to_string();
        assert!(message.contains("base_url"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &ConfigError::EmptyPublishableKey;
        let _: &dyn std::error::Error = &StorageError::Poisoned;
    }
}
