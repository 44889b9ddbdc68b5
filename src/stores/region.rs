//! Region list cache with a synthetic fallback.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::store::{Region, RegionApi, StoreClient};
use crate::stores::classified_message;

#[derive(Debug, Default)]
struct RegionState {
    regions: Vec<Region>,
    current: Option<Region>,
    is_loading: bool,
    error: Option<String>,
}

/// Caches the sellable regions and designates one as current.
///
/// A region fetch never leaves the store empty: when the backend is
/// unreachable the store substitutes [`Region::fallback`] so cart creation
/// downstream is not blocked on region availability.
#[derive(Debug)]
pub struct RegionStore {
    api: RegionApi,
    state: RwLock<RegionState>,
}

impl RegionStore {
    /// Creates a store backed by `client`'s region endpoints.
    #[must_use]
    pub fn new(client: &StoreClient) -> Self {
        Self {
            api: client.regions(),
            state: RwLock::new(RegionState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads the region list from the backend.
    ///
    /// On success, the first region becomes current when none is set yet.
    /// On failure, the list and current region are replaced with the
    /// synthetic fallback and the classified message lands in [`error`].
    ///
    /// [`error`]: RegionStore::error
    pub async fn fetch_regions(&self) {
        {
            let mut state = self.write();
            state.is_loading = true;
            state.error = None;
        }

        let result = self.api.list().await;

        let mut state = self.write();
        state.is_loading = false;
        match result {
            Ok(response) => {
                state.regions = response.regions;
                if state.current.is_none() {
                    state.current = state.regions.first().cloned();
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "region fetch failed, using fallback region");
                state.error = Some(classified_message(&error));
                let fallback = Region::fallback();
                state.regions = vec![fallback.clone()];
                state.current = Some(fallback);
            }
        }
    }

    /// Designates `region` as the current region.
    pub fn set_current_region(&self, region: Region) {
        self.write().current = Some(region);
    }

    /// The current region, if one has been designated.
    #[must_use]
    pub fn current_region(&self) -> Option<Region> {
        self.read().current.clone()
    }

    /// A snapshot of the cached region list.
    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        self.read().regions.clone()
    }

    /// Whether a fetch is in flight.
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
