//! # Storefront API Rust SDK
//!
//! A Rust client for a Medusa-style storefront backend: product catalog,
//! carts, regions, orders and customer authentication, wrapped with retry,
//! fallback and error-classification logic plus session-state containers.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`StoreConfig`] and [`StoreConfigBuilder`]
//! - Validated newtypes for the backend URL and publishable API key
//! - A pluggable [`auth::ClientStorage`] backend for credentials and the
//!   persisted cart id, with [`auth::MemoryStorage`] included
//! - Bearer-token management with expiry detection via [`auth::TokenManager`]
//! - Typed endpoint wrappers with per-endpoint retry budgets via
//!   [`store::StoreClient`]
//! - Error classification into a stable code/message taxonomy via
//!   [`clients::classify`]
//! - Session-state containers ([`stores::RegionStore`], [`stores::CartStore`],
//!   [`stores::ProductStore`], [`stores::AuthStore`]) that surface failures
//!   as renderable messages instead of errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use storefront_api::auth::MemoryStorage;
//! use storefront_api::config::{BaseUrl, PublishableKey, StoreConfig};
//! use storefront_api::store::StoreClient;
//! use storefront_api::stores::{CartStore, RegionStore};
//!
//! let config = StoreConfig::builder()
//!     .base_url(BaseUrl::new("http://localhost:9000")?)
//!     .publishable_key(PublishableKey::new("pk_...")?)
//!     .build()?;
//!
//! let client = StoreClient::new(&config, Arc::new(MemoryStorage::new()));
//!
//! // Typed endpoint access
//! let products = client.products().list(&Default::default()).await?;
//!
//! // Or session-state containers on top
//! let regions = Arc::new(RegionStore::new(&client));
//! let cart = CartStore::new(&client, Arc::clone(&regions));
//! cart.add_to_cart("variant_123", 2).await;
//! assert_eq!(cart.item_count(), 2);
//! ```
//!
//! Configuration can also come from the environment:
//!
//! ```rust,no_run
//! use storefront_api::StoreConfig;
//!
//! // Reads STORE_BACKEND_URL (default http://localhost:9000)
//! // and STORE_PUBLISHABLE_KEY.
//! let config = StoreConfig::from_env().unwrap();
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: stores are explicit instances with injected
//!   dependencies, not module-level singletons
//! - **Fail-fast validation**: configuration newtypes validate on construction
//! - **Best-effort storage**: credential and cart-id persistence degrades to
//!   "not stored" rather than failing an operation
//! - **Thread-safe**: all types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod store;
pub mod stores;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, PublishableKey, StoreConfig, StoreConfigBuilder};
pub use error::{ConfigError, StorageError};

// Re-export HTTP client types
pub use clients::{classify, ApiError, ErrorCode, HttpClient, RetryPolicy, StoreError};

// Re-export the endpoint and state layers
pub use store::StoreClient;
pub use stores::{AuthStore, CartStore, ProductStore, RegionStore};
