//! Product and category endpoints.

use std::sync::Arc;
use std::time::Duration;

use crate::clients::{with_fallback, HttpClient, RetryPolicy, StoreError, DEFAULT_MAX_ATTEMPTS};
use crate::store::types::{CategoryListResponse, ProductListResponse, ProductResponse};

/// Filters for a product list query.
///
/// All fields are optional and combined by the backend, not the client.
///
/// # Example
///
/// ```rust
/// use storefront_api::store::ProductListParams;
///
/// let params = ProductListParams {
///     limit: Some(20),
///     q: Some("龙井".to_string()),
///     ..ProductListParams::default()
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProductListParams {
    /// Page size.
    pub limit: Option<u64>,
    /// Page offset.
    pub offset: Option<u64>,
    /// Restrict to these category ids.
    pub category_id: Vec<String>,
    /// Free-text search.
    pub q: Option<String>,
    /// Sort order (e.g. `created_at` or `-created_at`).
    pub order: Option<String>,
}

impl ProductListParams {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset".to_string(), offset.to_string()));
        }
        for id in &self.category_id {
            query.push(("category_id[]".to_string(), id.clone()));
        }
        if let Some(q) = &self.q {
            query.push(("q".to_string(), q.clone()));
        }
        if let Some(order) = &self.order {
            query.push(("order".to_string(), order.clone()));
        }
        query
    }
}

/// Query options for a single product detail fetch.
#[derive(Debug, Clone, Default)]
pub struct ProductDetailParams {
    /// Field selection expression.
    pub fields: Option<String>,
    /// Price products for this region.
    pub region_id: Option<String>,
    /// Price products in this currency.
    pub currency_code: Option<String>,
}

impl ProductDetailParams {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(fields) = &self.fields {
            query.push(("fields".to_string(), fields.clone()));
        }
        if let Some(region_id) = &self.region_id {
            query.push(("region_id".to_string(), region_id.clone()));
        }
        if let Some(currency_code) = &self.currency_code {
            query.push(("currency_code".to_string(), currency_code.clone()));
        }
        query
    }
}

/// Filters for a category list query.
#[derive(Debug, Clone, Default)]
pub struct CategoryListParams {
    /// Page size; defaults to 50 when unset.
    pub limit: Option<u64>,
    /// Page offset; defaults to 0 when unset.
    pub offset: Option<u64>,
    /// Free-text search.
    pub q: Option<String>,
    /// Restrict to children of this category.
    pub parent_category_id: Option<String>,
}

/// Typed wrapper around the product catalog endpoints.
#[derive(Debug, Clone)]
pub struct ProductApi {
    http: Arc<HttpClient>,
    retry_base_delay: Duration,
}

impl ProductApi {
    pub(crate) fn new(http: Arc<HttpClient>, retry_base_delay: Duration) -> Self {
        Self {
            http,
            retry_base_delay,
        }
    }

    fn policy(&self, attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, self.retry_base_delay)
    }

    /// Lists products matching `params`, with retries.
    ///
    /// # Errors
    ///
    /// Propagates the last [`StoreError`] after retries are exhausted.
    pub async fn list(&self, params: &ProductListParams) -> Result<ProductListResponse, StoreError> {
        let query = params.to_query();
        self.policy(DEFAULT_MAX_ATTEMPTS)
            .run(|| self.http.get("/store/products", &query))
            .await
    }

    /// Retrieves a single product detail record.
    ///
    /// No retry wrapper here: a detail fetch either resolves or the caller
    /// surfaces the failure immediately.
    ///
    /// # Errors
    ///
    /// Propagates the raw [`StoreError`].
    pub async fn retrieve(
        &self,
        product_id: &str,
        params: &ProductDetailParams,
    ) -> Result<ProductResponse, StoreError> {
        let result = self
            .http
            .get(&format!("/store/products/{product_id}"), &params.to_query())
            .await;
        if let Err(error) = &result {
            tracing::error!(product_id, error = %error, "failed to fetch product detail");
        }
        result
    }

    /// Lists product categories, with retries.
    ///
    /// # Errors
    ///
    /// Propagates the last [`StoreError`] after retries are exhausted.
    pub async fn categories(
        &self,
        params: &CategoryListParams,
    ) -> Result<CategoryListResponse, StoreError> {
        let mut query = vec![
            ("limit".to_string(), params.limit.unwrap_or(50).to_string()),
            ("offset".to_string(), params.offset.unwrap_or(0).to_string()),
        ];
        if let Some(q) = &params.q {
            query.push(("q".to_string(), q.clone()));
        }
        if let Some(parent) = &params.parent_category_id {
            query.push(("parent_category_id".to_string(), parent.clone()));
        }

        self.policy(DEFAULT_MAX_ATTEMPTS)
            .run(|| async {
                let result = self.http.get("/store/product-categories", &query).await;
                if let Err(error) = &result {
                    tracing::error!(error = %error, "failed to fetch categories");
                }
                result
            })
            .await
    }

    /// Counts the products in a category.
    ///
    /// Queries with `limit=1` and reads the total; any failure (after
    /// retries) falls back to 0 rather than propagating.
    pub async fn category_product_count(&self, category_id: &str) -> u64 {
        let query = vec![
            ("category_id[]".to_string(), category_id.to_string()),
            ("limit".to_string(), "1".to_string()),
            ("fields".to_string(), "id".to_string()),
        ];

        with_fallback(
            || async {
                self.policy(DEFAULT_MAX_ATTEMPTS)
                    .run(|| self.http.get::<ProductListResponse>("/store/products", &query))
                    .await
                    .map(|response| response.count)
            },
            0,
        )
        .await
    }
}
