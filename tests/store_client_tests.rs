//! Integration tests for the endpoint wrappers.
//!
//! These tests verify request shaping (headers, query parameters), the
//! per-endpoint retry budgets, and error classification against a mock
//! backend.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_api::auth::MemoryStorage;
use storefront_api::config::{BaseUrl, PublishableKey, StoreConfig};
use storefront_api::store::{ProductListParams, StoreClient};
use storefront_api::{classify, ErrorCode};

fn test_client(server: &MockServer) -> StoreClient {
    let config = StoreConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    StoreClient::new(&config, Arc::new(MemoryStorage::new()))
        .with_retry_delay(Duration::from_millis(1))
}

fn empty_product_page() -> serde_json::Value {
    json!({ "products": [], "count": 0, "offset": 0, "limit": 20 })
}

#[tokio::test]
async fn test_publishable_key_header_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .and(header("x-publishable-api-key", "pk_test_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_product_page()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = StoreConfig::builder()
        .base_url(BaseUrl::new(mock_server.uri()).unwrap())
        .publishable_key(PublishableKey::new("pk_test_123").unwrap())
        .build()
        .unwrap();
    let client = StoreClient::new(&config, Arc::new(MemoryStorage::new()));

    let result = client.products().list(&ProductListParams::default()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_product_list_builds_filter_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .and(query_param("limit", "12"))
        .and(query_param("offset", "24"))
        .and(query_param("category_id[]", "cat_tea"))
        .and(query_param("q", "龙井"))
        .and(query_param("order", "-created_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_product_page()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = ProductListParams {
        limit: Some(12),
        offset: Some(24),
        category_id: vec!["cat_tea".to_string()],
        q: Some("龙井".to_string()),
        order: Some("-created_at".to_string()),
    };

    let result = test_client(&mock_server).products().list(&params).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_product_list_retries_transient_failures() {
    let mock_server = MockServer::start().await;

    // Two failures, then success; the list budget is three attempts.
    Mock::given(method("GET"))
        .and(path("/store/products"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/store/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{ "id": "prod_1", "title": "Longjing" }],
            "count": 1,
            "offset": 0,
            "limit": 20
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = test_client(&mock_server)
        .products()
        .list(&ProductListParams::default())
        .await
        .unwrap();

    assert_eq!(response.count, 1);
    assert_eq!(response.products[0].id, "prod_1");
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "token invalid"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let error = test_client(&mock_server)
        .products()
        .list(&ProductListParams::default())
        .await
        .unwrap_err();

    let classified = classify(&error);
    assert_eq!(classified.status, Some(401));
    assert_eq!(classified.code, ErrorCode::Unauthorized);
    assert_eq!(classified.message, "认证失败，请重新登录");
}

#[tokio::test]
async fn test_cart_retrieve_surfaces_classified_not_found() {
    let mock_server = MockServer::start().await;

    // The retrieve budget is two attempts; both see the 404.
    Mock::given(method("GET"))
        .and(path("/store/carts/cart_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Cart with id cart_missing was not found"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let error = test_client(&mock_server)
        .carts()
        .retrieve("cart_missing")
        .await
        .unwrap_err();

    let classified = classify(&error);
    assert_eq!(classified.status, Some(404));
    assert_eq!(classified.code, ErrorCode::NotFound);
    assert_eq!(classified.message, "请求的资源不存在");
}

#[tokio::test]
async fn test_category_product_count_reads_total() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .and(query_param("category_id[]", "cat_green"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{ "id": "prod_1", "title": "Longjing" }],
            "count": 37,
            "offset": 0,
            "limit": 1
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let count = test_client(&mock_server)
        .products()
        .category_product_count("cat_green")
        .await;

    assert_eq!(count, 37);
}

#[tokio::test]
async fn test_category_product_count_falls_back_to_zero() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let count = test_client(&mock_server)
        .products()
        .category_product_count("cat_green")
        .await;

    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_cart_create_uses_first_region_when_none_given() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "regions": [{ "id": "reg_cn", "name": "China", "currency_code": "cny" }]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/store/carts"))
        .and(wiremock::matchers::body_partial_json(
            json!({ "region_id": "reg_cn" }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cart": { "id": "cart_1", "region_id": "reg_cn" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = test_client(&mock_server).carts().create(None).await.unwrap();
    assert_eq!(response.cart.id, "cart_1");
}
