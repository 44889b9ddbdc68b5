//! Integration tests for the catalog state container.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_api::auth::MemoryStorage;
use storefront_api::config::{BaseUrl, StoreConfig};
use storefront_api::store::{ProductDetailParams, StoreClient};
use storefront_api::stores::ProductStore;

fn test_client(server: &MockServer) -> StoreClient {
    let config = StoreConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    StoreClient::new(&config, Arc::new(MemoryStorage::new()))
        .with_retry_delay(Duration::from_millis(1))
}

#[tokio::test]
async fn test_fetch_products_applies_query_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .and(query_param("q", "oolong"))
        .and(query_param("category_id[]", "cat_oolong"))
        .and(query_param("order", "-created_at"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                { "id": "prod_1", "title": "Tieguanyin" },
                { "id": "prod_2", "title": "Da Hong Pao" }
            ],
            "count": 2,
            "offset": 0,
            "limit": 20
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let store = ProductStore::new(&client);
    store.set_search_query(Some("oolong".to_string()));
    store.set_selected_category(Some("cat_oolong".to_string()));
    store.set_sort_by("-created_at");

    store.fetch_products().await;

    assert!(store.error().is_none());
    assert_eq!(store.products().len(), 2);
    assert_eq!(store.count(), 2);
}

#[tokio::test]
async fn test_fetch_product_fills_detail_slot_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/products/prod_1"))
        .and(query_param("region_id", "reg_cn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product": { "id": "prod_1", "title": "Tieguanyin" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let store = ProductStore::new(&client);

    let params = ProductDetailParams {
        region_id: Some("reg_cn".to_string()),
        ..ProductDetailParams::default()
    };
    store.fetch_product("prod_1", &params).await;

    assert_eq!(
        store.current_product().map(|product| product.id),
        Some("prod_1".to_string())
    );
    // The list is untouched by a detail fetch.
    assert!(store.products().is_empty());
}

#[tokio::test]
async fn test_fetch_categories_replaces_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/product-categories"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product_categories": [
                { "id": "cat_green", "name": "绿茶" },
                { "id": "cat_oolong", "name": "乌龙茶" }
            ],
            "count": 2,
            "offset": 0,
            "limit": 50
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let store = ProductStore::new(&client);

    store.fetch_categories().await;

    assert_eq!(store.categories().len(), 2);
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_reset_products_clears_results_and_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{ "id": "prod_1", "title": "Tieguanyin" }],
            "count": 1,
            "offset": 0,
            "limit": 20
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/store/products/prod_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product": { "id": "prod_1", "title": "Tieguanyin" }
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let store = ProductStore::new(&client);
    store.set_search_query(Some("oolong".to_string()));
    store.set_selected_category(Some("cat_oolong".to_string()));
    store.set_sort_by("-created_at");
    store.fetch_products().await;
    store
        .fetch_product("prod_1", &ProductDetailParams::default())
        .await;

    store.reset_products();

    assert!(store.products().is_empty());
    assert_eq!(store.count(), 0);
    assert!(store.current_product().is_none());
    assert!(store.search_query().is_none());
    assert!(store.selected_category().is_none());
    // The sort order survives a reset.
    assert_eq!(store.sort_by(), "-created_at");
}

#[tokio::test]
async fn test_fetch_failure_surfaces_classified_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/products/prod_gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Product with id prod_gone was not found"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let store = ProductStore::new(&client);

    store
        .fetch_product("prod_gone", &ProductDetailParams::default())
        .await;

    assert_eq!(store.error().as_deref(), Some("请求的资源不存在"));
    assert!(store.current_product().is_none());
    assert!(!store.is_loading());
}
