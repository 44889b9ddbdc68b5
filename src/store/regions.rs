//! Region endpoints.

use std::sync::Arc;

use crate::clients::{HttpClient, StoreError};
use crate::store::types::{RegionListResponse, RegionResponse};

/// Typed wrapper around the region endpoints.
///
/// Region reads carry no retry wrapper: the one caller that must not fail on
/// region unavailability ([`RegionStore`](crate::stores::RegionStore))
/// substitutes a synthetic fallback region instead.
#[derive(Debug, Clone)]
pub struct RegionApi {
    http: Arc<HttpClient>,
}

impl RegionApi {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists all sellable regions.
    ///
    /// # Errors
    ///
    /// Propagates the raw [`StoreError`]; classification is the caller's job.
    pub async fn list(&self) -> Result<RegionListResponse, StoreError> {
        let result = self.http.get("/store/regions", &[]).await;
        if let Err(error) = &result {
            tracing::error!(error = %error, "failed to fetch region list");
        }
        result
    }

    /// Retrieves a single region.
    ///
    /// # Errors
    ///
    /// Propagates the raw [`StoreError`].
    pub async fn retrieve(&self, region_id: &str) -> Result<RegionResponse, StoreError> {
        let result = self
            .http
            .get(&format!("/store/regions/{region_id}"), &[])
            .await;
        if let Err(error) = &result {
            tracing::error!(region_id, error = %error, "failed to fetch region");
        }
        result
    }
}
