//! Cart and line item endpoints.
//!
//! Every operation here classifies its failure at the boundary and re-throws
//! it as [`StoreError::Api`], so callers always observe a display-ready
//! message. Retry counts follow the storefront's behavior: creation gets the
//! full three attempts, everything else two.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::clients::{classify, HttpClient, RetryPolicy, StoreError};
use crate::store::types::{CartResponse, DeletedLineItemResponse, RegionListResponse};

/// Typed wrapper around the cart endpoints.
#[derive(Debug, Clone)]
pub struct CartApi {
    http: Arc<HttpClient>,
    retry_base_delay: Duration,
}

impl CartApi {
    pub(crate) fn new(http: Arc<HttpClient>, retry_base_delay: Duration) -> Self {
        Self {
            http,
            retry_base_delay,
        }
    }

    fn policy(&self, attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, self.retry_base_delay)
    }

    /// Creates a new cart.
    ///
    /// When `region_id` is `None`, the region list is fetched and the first
    /// region used; if that lookup fails the cart is created without a region
    /// and the backend picks its default.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] with the classified failure.
    pub async fn create(&self, region_id: Option<&str>) -> Result<CartResponse, StoreError> {
        self.policy(3)
            .run(|| async {
                let mut body = serde_json::Map::new();

                if let Some(id) = region_id {
                    body.insert("region_id".to_string(), json!(id));
                } else {
                    match self.http.get::<RegionListResponse>("/store/regions", &[]).await {
                        Ok(response) => {
                            if let Some(first) = response.regions.first() {
                                body.insert("region_id".to_string(), json!(first.id));
                            }
                        }
                        Err(error) => {
                            tracing::warn!(
                                error = %error,
                                "region lookup failed, creating cart without a region"
                            );
                        }
                    }
                }

                let result = self.http.post("/store/carts", &body).await;
                classify_boundary("create_cart", result)
            })
            .await
    }

    /// Retrieves an existing cart by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] with the classified failure.
    pub async fn retrieve(&self, cart_id: &str) -> Result<CartResponse, StoreError> {
        self.policy(2)
            .run(|| async {
                let result = self
                    .http
                    .get(&format!("/store/carts/{cart_id}"), &[])
                    .await;
                classify_boundary("get_cart", result)
            })
            .await
    }

    /// Appends a variant to the cart (or increments an existing line).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] with the classified failure.
    pub async fn add_line_item(
        &self,
        cart_id: &str,
        variant_id: &str,
        quantity: u32,
    ) -> Result<CartResponse, StoreError> {
        self.policy(2)
            .run(|| async {
                let body = json!({ "variant_id": variant_id, "quantity": quantity });
                let result = self
                    .http
                    .post(&format!("/store/carts/{cart_id}/line-items"), &body)
                    .await;
                classify_boundary("add_to_cart", result)
            })
            .await
    }

    /// Sets the quantity of an existing line item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] with the classified failure.
    pub async fn update_line_item(
        &self,
        cart_id: &str,
        line_item_id: &str,
        quantity: u32,
    ) -> Result<CartResponse, StoreError> {
        self.policy(2)
            .run(|| async {
                let body = json!({ "quantity": quantity });
                let result = self
                    .http
                    .post(
                        &format!("/store/carts/{cart_id}/line-items/{line_item_id}"),
                        &body,
                    )
                    .await;
                classify_boundary("update_cart_item", result)
            })
            .await
    }

    /// Removes a line item from the cart.
    ///
    /// The returned parent cart, when present, is not trusted; callers
    /// re-fetch the cart afterward.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] with the classified failure.
    pub async fn remove_line_item(
        &self,
        cart_id: &str,
        line_item_id: &str,
    ) -> Result<DeletedLineItemResponse, StoreError> {
        self.policy(2)
            .run(|| async {
                let result = self
                    .http
                    .delete(&format!("/store/carts/{cart_id}/line-items/{line_item_id}"))
                    .await;
                classify_boundary("remove_from_cart", result)
            })
            .await
    }
}

/// Classifies a failure once at the API boundary and re-throws it.
pub(crate) fn classify_boundary<T>(
    operation: &'static str,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    result.map_err(|error| {
        let classified = classify(&error);
        tracing::error!(
            operation,
            code = %classified.code,
            error = %error,
            "store API call failed"
        );
        StoreError::Api(classified)
    })
}
