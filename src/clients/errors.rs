//! Error types and classification for backend communication.
//!
//! This module contains the unified [`StoreError`] type produced by the HTTP
//! layer and the [`classify`] function that normalizes any failure into an
//! [`ApiError`] descriptor suitable for display.
//!
//! # Error Handling
//!
//! Raw failures are classified once, at the API-wrapper boundary:
//!
//! - [`StoreError`]: what actually went wrong (transport, HTTP response,
//!   decode failure, or an already classified error)
//! - [`ApiError`]: the normalized `{message, status, code, details}` form
//!   that state containers store in their `error` field
//! - [`ErrorCode`]: the stable code attached to each classified error
//!
//! # Example
//!
//! ```rust
//! use storefront_api::clients::{classify, ErrorCode, StoreError};
//!
//! let err = StoreError::Response {
//!     status: 404,
//!     message: "Product with id prod_123 was not found".to_string(),
//!     details: None,
//! };
//!
//! let classified = classify(&err);
//! assert_eq!(classified.code, ErrorCode::NotFound);
//! assert_eq!(classified.status, Some(404));
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Unified error type for all backend operations.
///
/// The HTTP client produces the `Network`, `Response`, and `Decode` variants;
/// endpoint wrappers that classify at their boundary re-throw as `Api`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or connection error from the transport layer.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A non-2xx HTTP response from the backend.
    #[error("HTTP {status}: {message}")]
    Response {
        /// The HTTP status code of the response.
        status: u16,
        /// The backend's error message, or the raw body when none was given.
        message: String,
        /// Structured error details, when the backend provided any.
        details: Option<serde_json::Value>,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A plain error message with no HTTP status attached.
    #[error("{0}")]
    Message(String),

    /// An error that has already been classified.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl StoreError {
    /// Creates a status-less error from a plain message.
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

/// Stable code identifying a class of failure.
///
/// Serializes to the wire-style name (e.g. `NETWORK_ERROR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Transport-level failure; no response was received.
    NetworkError,
    /// HTTP 401.
    Unauthorized,
    /// HTTP 403.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// HTTP 422.
    ValidationError,
    /// HTTP 500.
    InternalError,
    /// Any other non-2xx HTTP status.
    HttpError,
    /// The backend reported that no sellable regions exist.
    NoRegions,
    /// The backend rejected the credential.
    AuthError,
    /// The publishable API key is missing or misconfigured.
    ApiKeyError,
    /// Anything not covered above.
    UnknownError,
}

impl ErrorCode {
    /// Returns the wire-style name of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkError => "NETWORK_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
            Self::HttpError => "HTTP_ERROR",
            Self::NoRegions => "NO_REGIONS",
            Self::AuthError => "AUTH_ERROR",
            Self::ApiKeyError => "API_KEY_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized error descriptor.
///
/// This is the form state containers surface to the UI: a display message,
/// the HTTP status when one was present, a stable [`ErrorCode`], and any
/// structured details the backend attached (validation errors).
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable display message.
    pub message: String,
    /// The HTTP status code, when the failure had one (0 for network errors).
    pub status: Option<u16>,
    /// The stable error code.
    pub code: ErrorCode,
    /// Structured error details, when present.
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    fn new(message: impl Into<String>, status: Option<u16>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            status,
            code,
            details: None,
        }
    }
}

/// Classifies an arbitrary failure into a normalized [`ApiError`].
///
/// Pure function with no side effects. Classification order:
///
/// 1. transport failure → generic connectivity message
/// 2. HTTP status present → fixed message per status code
/// 3. backend-specific substring match on the message
/// 4. default → the original message passes through
///
/// Already-classified errors pass through unchanged.
///
/// # Example
///
/// ```rust
/// use storefront_api::clients::{classify, ErrorCode, StoreError};
///
/// let err = StoreError::message("No regions found for store");
/// assert_eq!(classify(&err).code, ErrorCode::NoRegions);
/// ```
#[must_use]
pub fn classify(error: &StoreError) -> ApiError {
    match error {
        StoreError::Network(_) => ApiError::new(
            "网络连接失败，请检查网络设置",
            Some(0),
            ErrorCode::NetworkError,
        ),
        StoreError::Response {
            status, details, ..
        } => classify_status(*status, details.clone()),
        StoreError::Message(message) => classify_message(message),
        StoreError::Decode(e) => classify_message(&e.to_string()),
        StoreError::Api(classified) => classified.clone(),
    }
}

fn classify_status(status: u16, details: Option<serde_json::Value>) -> ApiError {
    match status {
        401 => ApiError::new("认证失败，请重新登录", Some(401), ErrorCode::Unauthorized),
        403 => ApiError::new("权限不足，无法访问该资源", Some(403), ErrorCode::Forbidden),
        404 => ApiError::new("请求的资源不存在", Some(404), ErrorCode::NotFound),
        422 => ApiError {
            message: "请求参数有误，请检查输入信息".to_string(),
            status: Some(422),
            code: ErrorCode::ValidationError,
            details,
        },
        500 => ApiError::new(
            "服务器内部错误，请稍后重试",
            Some(500),
            ErrorCode::InternalError,
        ),
        _ => ApiError::new(
            format!("请求失败 ({status})"),
            Some(status),
            ErrorCode::HttpError,
        ),
    }
}

fn classify_message(message: &str) -> ApiError {
    if message.contains("No regions found") {
        return ApiError::new("暂无可用区域，请联系客服", None, ErrorCode::NoRegions);
    }

    if message.contains("Unauthorized") {
        return ApiError::new("认证失败，请检查API配置", None, ErrorCode::AuthError);
    }

    if message.contains("publishable") {
        return ApiError::new("API密钥配置错误，请联系管理员", None, ErrorCode::ApiKeyError);
    }

    let display = if message.is_empty() {
        "未知错误，请稍后重试"
    } else {
        message
    };
    ApiError::new(display, None, ErrorCode::UnknownError)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_error(status: u16) -> StoreError {
        StoreError::Response {
            status,
            message: "backend said no".to_string(),
            details: None,
        }
    }

    #[test]
    fn test_fixed_codes_for_known_statuses() {
        let cases = [
            (401, ErrorCode::Unauthorized, "认证失败，请重新登录"),
            (403, ErrorCode::Forbidden, "权限不足，无法访问该资源"),
            (404, ErrorCode::NotFound, "请求的资源不存在"),
            (422, ErrorCode::ValidationError, "请求参数有误，请检查输入信息"),
            (500, ErrorCode::InternalError, "服务器内部错误，请稍后重试"),
        ];

        for (status, code, message) in cases {
            let classified = classify(&response_error(status));
            assert_eq!(classified.code, code, "status {status}");
            assert_eq!(classified.status, Some(status));
            assert_eq!(classified.message, message);
        }
    }

    #[test]
    fn test_other_status_maps_to_http_error() {
        let classified = classify(&response_error(418));
        assert_eq!(classified.code, ErrorCode::HttpError);
        assert_eq!(classified.status, Some(418));
        assert_eq!(classified.message, "请求失败 (418)");
    }

    #[test]
    fn test_status_takes_precedence_over_message_contents() {
        let err = StoreError::Response {
            status: 404,
            message: "No regions found".to_string(),
            details: None,
        };
        assert_eq!(classify(&err).code, ErrorCode::NotFound);
    }

    #[test]
    fn test_validation_error_carries_details() {
        let err = StoreError::Response {
            status: 422,
            message: "invalid".to_string(),
            details: Some(serde_json::json!({"field": "email"})),
        };
        let classified = classify(&err);
        assert_eq!(classified.code, ErrorCode::ValidationError);
        assert_eq!(
            classified.details,
            Some(serde_json::json!({"field": "email"}))
        );
    }

    #[test]
    fn test_no_regions_substring() {
        let classified = classify(&StoreError::message("No regions found for this store"));
        assert_eq!(classified.code, ErrorCode::NoRegions);
        assert_eq!(classified.message, "暂无可用区域，请联系客服");
    }

    #[test]
    fn test_unauthorized_substring() {
        let classified = classify(&StoreError::message("Unauthorized request"));
        assert_eq!(classified.code, ErrorCode::AuthError);
    }

    #[test]
    fn test_publishable_key_substring() {
        let classified =
            classify(&StoreError::message("A valid publishable key is required"));
        assert_eq!(classified.code, ErrorCode::ApiKeyError);
    }

    #[test]
    fn test_default_passes_message_through() {
        let classified = classify(&StoreError::message("something odd happened"));
        assert_eq!(classified.code, ErrorCode::UnknownError);
        assert_eq!(classified.message, "something odd happened");
        assert_eq!(classified.status, None);
    }

    #[test]
    fn test_empty_message_gets_generic_text() {
        let classified = classify(&StoreError::message(""));
        assert_eq!(classified.code, ErrorCode::UnknownError);
        assert_eq!(classified.message, "未知错误，请稍后重试");
    }

    #[test]
    fn test_already_classified_passes_through() {
        let original = ApiError {
            message: "暂无可用区域，请联系客服".to_string(),
            status: None,
            code: ErrorCode::NoRegions,
            details: None,
        };
        let classified = classify(&StoreError::Api(original.clone()));
        assert_eq!(classified.code, original.code);
        assert_eq!(classified.message, original.message);
    }

    #[test]
    fn test_error_code_wire_names() {
        assert_eq!(ErrorCode::NetworkError.as_str(), "NETWORK_ERROR");
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::ApiKeyError.as_str(), "API_KEY_ERROR");
        assert_eq!(ErrorCode::UnknownError.to_string(), "UNKNOWN_ERROR");
    }

    #[test]
    fn test_store_error_implements_std_error() {
        let _: &dyn std::error::Error = &StoreError::message("x");
        let _: &dyn std::error::Error = &ApiError {
            message: "x".to_string(),
            status: None,
            code: ErrorCode::UnknownError,
            details: None,
        };
    }
}
