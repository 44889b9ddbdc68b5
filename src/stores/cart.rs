//! The active cart: lazy creation, persisted id, derived totals.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::auth::ClientStorage;
use crate::store::{Cart, CartApi, StoreClient};
use crate::stores::{classified_message, RegionStore};

/// Storage key under which the active cart id persists across sessions.
pub const CART_ID_STORAGE_KEY: &str = "store_cart_id";

#[derive(Debug, Default)]
struct CartState {
    cart: Option<Cart>,
    cart_id: Option<String>,
    is_loading: bool,
    error: Option<String>,
}

/// Owns the single active cart of a session.
///
/// The persisted cart id is a cache key only: contents are always re-fetched
/// from the backend, never trusted from storage. The cart is created lazily
/// on the first add when none exists yet.
pub struct CartStore {
    api: CartApi,
    regions: Arc<RegionStore>,
    storage: Arc<dyn ClientStorage>,
    state: RwLock<CartState>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Creates a store backed by `client`'s cart endpoints.
    ///
    /// A cart id persisted by a previous session is picked up immediately;
    /// its contents are fetched on [`initialize_cart`](Self::initialize_cart).
    #[must_use]
    pub fn new(client: &StoreClient, regions: Arc<RegionStore>) -> Self {
        let storage = Arc::clone(client.storage());
        let persisted = storage.get(CART_ID_STORAGE_KEY).unwrap_or_else(|error| {
            tracing::error!(error = %error, "failed to read persisted cart id");
            None
        });

        Self {
            api: client.carts(),
            regions,
            storage,
            state: RwLock::new(CartState {
                cart_id: persisted,
                ..CartState::default()
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CartState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CartState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        let mut state = self.write();
        state.is_loading = true;
        state.error = None;
    }

    fn finish_ok(&self, cart: Cart) {
        let mut state = self.write();
        state.is_loading = false;
        state.cart_id = Some(cart.id.clone());
        state.cart = Some(cart);
    }

    fn finish_err(&self, message: String) {
        let mut state = self.write();
        state.is_loading = false;
        state.error = Some(message);
    }

    fn persist_cart_id(&self, id: &str) {
        if let Err(error) = self.storage.set(CART_ID_STORAGE_KEY, id) {
            tracing::error!(error = %error, "failed to persist cart id");
        }
    }

    fn drop_persisted_id(&self) {
        if let Err(error) = self.storage.remove(CART_ID_STORAGE_KEY) {
            tracing::error!(error = %error, "failed to remove persisted cart id");
        }
    }

    /// Ensures an active cart exists.
    ///
    /// Loads regions first when none is current, then either retrieves the
    /// cart behind a persisted id or creates a new one scoped to the current
    /// region. A persisted id whose cart can no longer be retrieved is
    /// discarded and replaced by a fresh cart.
    pub async fn initialize_cart(&self) {
        self.begin();

        if self.regions.current_region().is_none() {
            self.regions.fetch_regions().await;
        }

        let persisted = self.read().cart_id.clone();
        if let Some(id) = persisted {
            match self.api.retrieve(&id).await {
                Ok(response) => {
                    self.finish_ok(response.cart);
                    return;
                }
                Err(error) => {
                    tracing::warn!(
                        cart_id = %id,
                        error = %error,
                        "persisted cart no longer retrievable, creating a new one"
                    );
                    self.write().cart_id = None;
                    self.drop_persisted_id();
                }
            }
        }

        let region_id = self.regions.current_region().map(|region| region.id);
        match self.api.create(region_id.as_deref()).await {
            Ok(response) => {
                self.persist_cart_id(&response.cart.id);
                self.finish_ok(response.cart);
            }
            Err(error) => self.finish_err(classified_message(&error)),
        }
    }

    /// Adds `quantity` of `variant_id` to the cart.
    ///
    /// Initializes a cart first when none exists. When initialization fails
    /// the surfaced error is "购物车未初始化".
    pub async fn add_to_cart(&self, variant_id: &str, quantity: u32) {
        self.begin();

        let cart_id = match self.ensure_cart_id().await {
            Some(id) => id,
            None => {
                self.finish_err("购物车未初始化".to_string());
                return;
            }
        };
        // Lazy initialization above resets the flag when it finishes.
        self.write().is_loading = true;

        match self.api.add_line_item(&cart_id, variant_id, quantity).await {
            Ok(response) => self.finish_ok(response.cart),
            Err(error) => self.finish_err(classified_message(&error)),
        }
    }

    async fn ensure_cart_id(&self) -> Option<String> {
        let existing = self.read().cart_id.clone();
        if existing.is_some() {
            return existing;
        }
        self.initialize_cart().await;
        self.read().cart_id.clone()
    }

    /// Sets the quantity of an existing line item.
    pub async fn update_cart_item(&self, line_item_id: &str, quantity: u32) {
        self.begin();

        let cart_id = self.read().cart_id.clone();
        let Some(cart_id) = cart_id else {
            self.finish_err("购物车未初始化".to_string());
            return;
        };

        match self
            .api
            .update_line_item(&cart_id, line_item_id, quantity)
            .await
        {
            Ok(response) => self.finish_ok(response.cart),
            Err(error) => self.finish_err(classified_message(&error)),
        }
    }

    /// Removes a line item, then re-fetches the cart.
    ///
    /// The deletion response is not trusted as a cart snapshot; the refreshed
    /// cart is authoritative.
    pub async fn remove_from_cart(&self, line_item_id: &str) {
        self.begin();

        let cart_id = self.read().cart_id.clone();
        let Some(cart_id) = cart_id else {
            self.finish_err("购物车未初始化".to_string());
            return;
        };

        if let Err(error) = self.api.remove_line_item(&cart_id, line_item_id).await {
            self.finish_err(classified_message(&error));
            return;
        }

        match self.api.retrieve(&cart_id).await {
            Ok(response) => self.finish_ok(response.cart),
            Err(error) => self.finish_err(classified_message(&error)),
        }
    }

    /// Re-fetches the active cart from the backend.
    pub async fn refresh_cart(&self) {
        let cart_id = self.read().cart_id.clone();
        let Some(cart_id) = cart_id else {
            return;
        };
        self.begin();

        match self.api.retrieve(&cart_id).await {
            Ok(response) => self.finish_ok(response.cart),
            Err(error) => self.finish_err(classified_message(&error)),
        }
    }

    /// Resets the store locally and drops the persisted id.
    ///
    /// No backend call is made; the server-side cart is simply abandoned.
    pub fn clear_cart(&self) {
        {
            let mut state = self.write();
            state.cart = None;
            state.cart_id = None;
            state.error = None;
        }
        self.drop_persisted_id();
    }

    /// A snapshot of the active cart.
    #[must_use]
    pub fn cart(&self) -> Option<Cart> {
        self.read().cart.clone()
    }

    /// The active cart id, if one exists.
    #[must_use]
    pub fn cart_id(&self) -> Option<String> {
        self.read().cart_id.clone()
    }

    /// Sum of line item quantities in the current snapshot.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.read().cart.as_ref().map_or(0, Cart::item_count)
    }

    /// Backend-computed total of the current snapshot, or 0.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.read().cart.as_ref().map_or(0.0, Cart::total_amount)
    }

    /// Whether an operation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    /// The last failure's classified message, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Clears the surfaced error.
    pub fn clear_error(&self) {
        self.write().error = None;
    }
}
