//! Order endpoints.
//!
//! Orders require an authenticated session; the bearer token is attached by
//! the HTTP client whenever one is stored and unexpired.

use std::sync::Arc;

use crate::clients::{HttpClient, StoreError};
use crate::store::types::{OrderListResponse, OrderResponse};

/// Typed wrapper around the order endpoints.
#[derive(Debug, Clone)]
pub struct OrderApi {
    http: Arc<HttpClient>,
}

impl OrderApi {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists the authenticated customer's orders.
    ///
    /// # Errors
    ///
    /// Propagates the raw [`StoreError`].
    pub async fn list(&self) -> Result<OrderListResponse, StoreError> {
        let result = self.http.get("/store/orders", &[]).await;
        if let Err(error) = &result {
            tracing::error!(error = %error, "failed to fetch order list");
        }
        result
    }

    /// Retrieves a single order.
    ///
    /// # Errors
    ///
    /// Propagates the raw [`StoreError`].
    pub async fn retrieve(&self, order_id: &str) -> Result<OrderResponse, StoreError> {
        let result = self
            .http
            .get(&format!("/store/orders/{order_id}"), &[])
            .await;
        if let Err(error) = &result {
            tracing::error!(order_id, error = %error, "failed to fetch order");
        }
        result
    }
}
