//! Injectable state containers over the endpoint wrappers.
//!
//! Each store owns a slice of client-side state (regions, the active cart,
//! catalog query state, the authenticated customer) behind an interior
//! `RwLock`, so callers share a store via `Arc` and call `&self` methods.
//! Guards are never held across an `.await`: overlapping calls race and the
//! last response to resolve wins the state update.
//!
//! Store methods do not return errors. Every operation sets `is_loading` for
//! its duration and, on failure, records the classified message in an
//! `error` slot the caller can render and clear.

pub mod auth;
pub mod cart;
pub mod product;
pub mod region;

pub use auth::{AuthStore, PROFILE_STORAGE_KEY};
pub use cart::{CartStore, CART_ID_STORAGE_KEY};
pub use product::ProductStore;
pub use region::RegionStore;

use crate::clients::{classify, StoreError};

/// The message a store surfaces for a failure.
pub(crate) fn classified_message(error: &StoreError) -> String {
    classify(error).message
}
