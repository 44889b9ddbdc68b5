//! Typed access to the storefront's commerce endpoints.
//!
//! [`StoreClient`] is the entry point: it owns the HTTP transport and the
//! token manager, and hands out per-resource wrappers ([`ProductApi`],
//! [`CartApi`], [`AuthApi`], [`RegionApi`], [`OrderApi`]). Each wrapper
//! applies the retry budget appropriate for its endpoints and classifies
//! failures into [`ApiError`](crate::clients::ApiError) at the boundary.

pub mod carts;
pub mod customers;
pub mod orders;
pub mod products;
pub mod regions;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{ClientStorage, TokenManager};
use crate::clients::{HttpClient, DEFAULT_BASE_DELAY};
use crate::config::StoreConfig;

pub use carts::CartApi;
pub use customers::{AuthApi, LoginResult, RegisterRequest, RegisterResult};
pub use orders::OrderApi;
pub use products::{CategoryListParams, ProductApi, ProductDetailParams, ProductListParams};
pub use regions::RegionApi;
pub use types::{
    CalculatedPrice, Cart, CartResponse, CategoryListResponse, Country, Customer,
    CustomerResponse, DeletedLineItemResponse, LineItem, Order, OrderListResponse, OrderResponse,
    Product, ProductCategory, ProductListResponse, ProductResponse, ProductVariant, Region,
    RegionListResponse, RegionResponse, TokenResponse,
};

/// Client for a storefront commerce backend.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use storefront_api::auth::MemoryStorage;
/// use storefront_api::config::{BaseUrl, StoreConfig};
/// use storefront_api::store::StoreClient;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoreConfig::builder()
///     .base_url(BaseUrl::new("http://localhost:9000")?)
///     .build()?;
/// let client = StoreClient::new(&config, Arc::new(MemoryStorage::new()));
///
/// let products = client.products().list(&Default::default()).await?;
/// println!("{} products", products.count);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct StoreClient {
    http: Arc<HttpClient>,
    tokens: Arc<TokenManager>,
    storage: Arc<dyn ClientStorage>,
    retry_base_delay: Duration,
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("http", &self.http)
            .field("retry_base_delay", &self.retry_base_delay)
            .finish_non_exhaustive()
    }
}

impl StoreClient {
    /// Creates a client from a validated configuration and a storage backend.
    ///
    /// A credential surviving in `storage` from a previous session is loaded
    /// immediately; an expired one is discarded.
    #[must_use]
    pub fn new(config: &StoreConfig, storage: Arc<dyn ClientStorage>) -> Self {
        let tokens = Arc::new(TokenManager::new(Arc::clone(&storage)));
        let http = Arc::new(HttpClient::new(config, Arc::clone(&tokens)));

        Self {
            http,
            tokens,
            storage,
            retry_base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Overrides the base delay used between retry attempts.
    ///
    /// Mainly useful in tests, where waiting out the production backoff is
    /// wasted time.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// The token manager shared by every wrapper of this client.
    #[must_use]
    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    /// The storage backend this client persists into.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn ClientStorage> {
        &self.storage
    }

    /// Product and category endpoints.
    #[must_use]
    pub fn products(&self) -> ProductApi {
        ProductApi::new(Arc::clone(&self.http), self.retry_base_delay)
    }

    /// Cart and line-item endpoints.
    #[must_use]
    pub fn carts(&self) -> CartApi {
        CartApi::new(Arc::clone(&self.http), self.retry_base_delay)
    }

    /// Authentication and customer-profile endpoints.
    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(
            Arc::clone(&self.http),
            Arc::clone(&self.tokens),
            self.retry_base_delay,
        )
    }

    /// Region endpoints.
    #[must_use]
    pub fn regions(&self) -> RegionApi {
        RegionApi::new(Arc::clone(&self.http))
    }

    /// Order endpoints.
    #[must_use]
    pub fn orders(&self) -> OrderApi {
        OrderApi::new(Arc::clone(&self.http))
    }
}

const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StoreClient>();
};
