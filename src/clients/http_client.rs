//! HTTP client for commerce backend communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! JSON requests against the backend's REST endpoints.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::auth::TokenManager;
use crate::clients::errors::StoreError;
use crate::config::StoreConfig;

/// Header carrying the publishable API key.
pub const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for the commerce backend.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Per-request headers: publishable key, bearer token (only while
///   unexpired), and the mirrored `connect.sid` session cookie
/// - JSON decoding into typed response envelopes
/// - Mapping transport and response failures into [`StoreError`]
///
/// Headers are assembled for every request rather than once at construction,
/// so a login or logout through the shared [`TokenManager`] takes effect on
/// the next call without rebuilding the client.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use storefront_api::auth::{MemoryStorage, TokenManager};
/// use storefront_api::clients::HttpClient;
/// use storefront_api::StoreConfig;
///
/// let config = StoreConfig::from_env()?;
/// let tokens = Arc::new(TokenManager::new(Arc::new(MemoryStorage::new())));
/// let client = HttpClient::new(&config, tokens);
///
/// let regions: RegionListResponse = client.get("/store/regions", &[]).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    publishable_key: Option<String>,
    tokens: Arc<TokenManager>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new client from the configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: &StoreConfig, tokens: Arc<TokenManager>) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(format!("Storefront API Library v{SDK_VERSION} | Rust"))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url().as_ref().to_string(),
            publishable_key: config
                .publishable_key()
                .map(|key| key.as_ref().to_string()),
            tokens,
        }
    }

    /// Returns the backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the headers that would be attached to a request right now.
    ///
    /// The bearer token is included only while a stored, unexpired credential
    /// exists; the session cookie only while the mirror is set.
    #[must_use]
    pub fn default_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();

        if let Some(key) = &self.publishable_key {
            headers.push((PUBLISHABLE_KEY_HEADER.to_string(), key.clone()));
        }

        if let Some(token) = self.tokens.current_valid_token() {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        if let Some(cookie) = self.tokens.session_cookie() {
            headers.push((
                "Cookie".to_string(),
                format!(
                    "{}={}",
                    crate::auth::SESSION_COOKIE_NAME,
                    urlencoding::encode(&cookie)
                ),
            ));
        }

        headers
    }

    /// Sends a GET request and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Network`] on transport failure,
    /// [`StoreError::Response`] on a non-2xx status, and
    /// [`StoreError::Decode`] when the body does not match `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, StoreError> {
        let mut builder = self.client.get(self.url(path));
        if !query.is_empty() {
            builder = builder.query(query);
        }
        self.execute(builder).await
    }

    /// Sends a POST request with a JSON body and decodes the response.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let builder = self.client.post(self.url(path)).json(body);
        self.execute(builder).await
    }

    /// Sends a DELETE request and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let builder = self.client.delete(self.url(path));
        self.execute(builder).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        mut builder: reqwest::RequestBuilder,
    ) -> Result<T, StoreError> {
        for (name, value) in self.default_headers() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        if !(200..300).contains(&status) {
            let parsed: Option<serde_json::Value> = serde_json::from_str(&body).ok();
            let message = parsed
                .as_ref()
                .and_then(|value| value.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| {
                    if body.is_empty() {
                        format!("HTTP error! status: {status}")
                    } else {
                        body.clone()
                    }
                });
            return Err(StoreError::Response {
                status,
                message,
                details: parsed,
            });
        }

        if body.is_empty() {
            Ok(serde_json::from_value(serde_json::Value::Null)?)
        } else {
            Ok(serde_json::from_str(&body)?)
        }
    }
}
