//! Integration tests for the region state container.
//!
//! These tests cover the fallback-region substitution and its interaction
//! with cart creation.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_api::auth::MemoryStorage;
use storefront_api::config::{BaseUrl, StoreConfig};
use storefront_api::store::{Region, StoreClient};
use storefront_api::stores::{CartStore, RegionStore};

fn test_client(server: &MockServer) -> StoreClient {
    let config = StoreConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    StoreClient::new(&config, Arc::new(MemoryStorage::new()))
        .with_retry_delay(Duration::from_millis(1))
}

#[tokio::test]
async fn test_first_region_becomes_current() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "regions": [
                { "id": "reg_cn", "name": "China", "currency_code": "cny" },
                { "id": "reg_eu", "name": "Europe", "currency_code": "eur" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let store = RegionStore::new(&client);

    store.fetch_regions().await;

    assert_eq!(store.regions().len(), 2);
    assert_eq!(
        store.current_region().map(|region| region.id),
        Some("reg_cn".to_string())
    );
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_fetch_failure_substitutes_fallback_region() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let store = RegionStore::new(&client);

    store.fetch_regions().await;

    let current = store.current_region().unwrap();
    assert_eq!(current, Region::fallback());
    assert_eq!(current.id, "default-region");
    assert_eq!(current.name, "默认区域");
    assert_eq!(current.currency_code, "CNY");
    assert_eq!(store.error().as_deref(), Some("服务器内部错误，请稍后重试"));
}

#[tokio::test]
async fn test_cart_initializes_against_fallback_region() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/store/carts"))
        .and(body_partial_json(json!({ "region_id": "default-region" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cart": { "id": "cart_fallback", "region_id": "default-region" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let regions = Arc::new(RegionStore::new(&client));
    regions.fetch_regions().await;
    let cart = CartStore::new(&client, Arc::clone(&regions));

    cart.initialize_cart().await;

    assert_eq!(cart.cart_id().as_deref(), Some("cart_fallback"));
    assert!(cart.error().is_none());
}

#[tokio::test]
async fn test_set_current_region_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "regions": [
                { "id": "reg_cn", "name": "China", "currency_code": "cny" },
                { "id": "reg_eu", "name": "Europe", "currency_code": "eur" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let store = RegionStore::new(&client);
    store.fetch_regions().await;

    let europe = store
        .regions()
        .into_iter()
        .find(|region| region.id == "reg_eu")
        .unwrap();
    store.set_current_region(europe);

    assert_eq!(
        store.current_region().map(|region| region.id),
        Some("reg_eu".to_string())
    );
}
