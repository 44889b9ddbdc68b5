//! HTTP communication layer: client, error classification, retry and fallback.
//!
//! Everything that touches the wire lives here. The [`HttpClient`] performs
//! the requests; failures come back as [`StoreError`] and are normalized by
//! [`classify`] into [`ApiError`] descriptors; [`RetryPolicy`] and the
//! fallback helpers wrap the calls made by the endpoint wrappers in
//! [`crate::store`].

mod errors;
mod http_client;
mod retry;

pub use errors::{classify, ApiError, ErrorCode, StoreError};
pub use http_client::{HttpClient, PUBLISHABLE_KEY_HEADER, SDK_VERSION};
pub use retry::{
    with_fallback, with_fallback_if, RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS,
};
