//! Authenticated-customer state persisted across sessions.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::auth::{ClientStorage, TokenManager};
use crate::store::{AuthApi, Customer, RegisterRequest, StoreClient};
use crate::stores::classified_message;

/// Storage key under which the customer profile persists across sessions.
pub const PROFILE_STORAGE_KEY: &str = "store_auth_user";

#[derive(Debug, Default)]
struct AuthStoreState {
    customer: Option<Customer>,
    is_authenticated: bool,
    is_loading: bool,
    error: Option<String>,
}

/// Login, registration and session state for the current customer.
///
/// The profile is persisted alongside the credential so a reload can render
/// the signed-in state immediately; it is still re-validated against the
/// backend via [`get_current_user`](Self::get_current_user).
pub struct AuthStore {
    api: AuthApi,
    tokens: Arc<TokenManager>,
    storage: Arc<dyn ClientStorage>,
    state: RwLock<AuthStoreState>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("is_authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl AuthStore {
    /// Creates a store backed by `client`'s auth endpoints.
    ///
    /// A profile persisted by a previous session is reloaded when the stored
    /// credential is still valid; otherwise the stale profile is dropped.
    #[must_use]
    pub fn new(client: &StoreClient) -> Self {
        let tokens = Arc::clone(client.token_manager());
        let storage = Arc::clone(client.storage());

        let mut state = AuthStoreState::default();
        if tokens.has_valid_token() {
            state.customer = load_profile(&storage);
            state.is_authenticated = state.customer.is_some();
        } else if let Err(error) = storage.remove(PROFILE_STORAGE_KEY) {
            tracing::error!(error = %error, "failed to drop stale profile");
        }

        Self {
            api: client.auth(),
            tokens,
            storage,
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthStoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthStoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        let mut state = self.write();
        state.is_loading = true;
        state.error = None;
    }

    fn finish_authenticated(&self, customer: Customer) {
        self.persist_profile(&customer);
        let mut state = self.write();
        state.is_loading = false;
        state.customer = Some(customer);
        state.is_authenticated = true;
    }

    fn finish_err(&self, message: String) {
        let mut state = self.write();
        state.is_loading = false;
        state.error = Some(message);
        state.customer = None;
        state.is_authenticated = false;
    }

    fn persist_profile(&self, customer: &Customer) {
        match serde_json::to_string(customer) {
            Ok(json) => {
                if let Err(error) = self.storage.set(PROFILE_STORAGE_KEY, &json) {
                    tracing::error!(error = %error, "failed to persist profile");
                }
            }
            Err(error) => tracing::error!(error = %error, "failed to serialize profile"),
        }
    }

    fn drop_profile(&self) {
        if let Err(error) = self.storage.remove(PROFILE_STORAGE_KEY) {
            tracing::error!(error = %error, "failed to remove persisted profile");
        }
    }

    fn clear_session(&self) {
        self.drop_profile();
        let mut state = self.write();
        state.is_loading = false;
        state.customer = None;
        state.is_authenticated = false;
    }

    /// Logs in and marks the store authenticated.
    ///
    /// The credential lands in the token manager; the resolved profile is
    /// persisted and held here.
    pub async fn login(&self, email: &str, password: &str) {
        self.begin();

        match self.api.login(email, password).await {
            Ok(result) => self.finish_authenticated(result.customer),
            Err(error) => self.finish_err(classified_message(&error)),
        }
    }

    /// Registers a new customer and marks the store authenticated.
    pub async fn register(&self, request: &RegisterRequest) {
        self.begin();

        match self.api.register(request).await {
            Ok(result) => self.finish_authenticated(result.customer),
            Err(error) => self.finish_err(classified_message(&error)),
        }
    }

    /// Signs out.
    ///
    /// The backend call is best-effort; local credential and profile are
    /// cleared on every path, so the client can always sign out.
    pub async fn logout(&self) {
        self.begin();
        self.api.logout().await;
        self.clear_session();
    }

    /// Re-validates the session against the backend.
    ///
    /// Short-circuits to unauthenticated when no valid credential is stored.
    /// A fetch failure is treated as a stale credential: the session is
    /// cleared rather than retried.
    pub async fn get_current_user(&self) {
        if !self.tokens.has_valid_token() {
            self.clear_session();
            return;
        }
        self.begin();

        match self.api.current_customer().await {
            Ok(customer) => self.finish_authenticated(customer),
            Err(error) => {
                tracing::warn!(error = %error, "profile fetch failed, clearing session");
                self.tokens.clear_token();
                self.clear_session();
            }
        }
    }

    /// The signed-in customer's profile, if any.
    #[must_use]
    pub fn customer(&self) -> Option<Customer> {
        self.read().customer.clone()
    }

    /// Whether a customer is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
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

fn load_profile(storage: &Arc<dyn ClientStorage>) -> Option<Customer> {
    let json = storage
        .get(PROFILE_STORAGE_KEY)
        .unwrap_or_else(|error| {
            tracing::error!(error = %error, "failed to read persisted profile");
            None
        })?;
    match serde_json::from_str(&json) {
        Ok(customer) => Some(customer),
        Err(error) => {
            tracing::warn!(error = %error, "persisted profile is not decodable, dropping it");
            None
        }
    }
}
