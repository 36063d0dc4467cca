mod common;

use httpmock::prelude::*;
use serde_json::json;
use storefront_gateway_client::{ClientError, CompareRequest, RecommendRequest, SearchParams};

#[tokio::test]
async fn test_search_sends_all_filters_as_query_params() {
    let server = MockServer::start();
    let products = json!([{"id": "p1", "name": "Trail Runner", "score": 0.91}]);

    let search_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/rag/search")
            .query_param("query", "running shoes")
            .query_param("max_price", "120.5")
            .query_param("min_rating", "4")
            .query_param("category", "footwear")
            .query_param("top_k", "3");
        then.status(200).json_body(products.clone());
    });

    let storefront = common::storefront(&server);
    let params = SearchParams {
        query: "running shoes".to_string(),
        max_price: Some(120.5),
        min_rating: Some(4.0),
        category: Some("footwear".to_string()),
        top_k: Some(3),
    };
    let result = storefront.rag().search(&params).await.unwrap();

    search_mock.assert();
    assert_eq!(result, Some(products));
}

#[tokio::test]
async fn test_blank_search_is_not_sent() {
    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET).path("/api/rag/search");
        then.status(200).json_body(json!([]));
    });

    let storefront = common::storefront(&server);
    let result = storefront.rag().search(&SearchParams::new("   ")).await.unwrap();

    assert!(result.is_none());
    search_mock.assert_hits(0);
}

#[tokio::test]
async fn test_recommend_and_compare_bodies() {
    let server = MockServer::start();
    let recommend_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/rag/recommend")
            .json_body(json!({"preferences": "quiet keyboards", "budget": 80.0, "limit": 4}));
        then.status(200).json_body(json!({"recommendations": ["k1", "k2"]}));
    });
    let compare_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/rag/compare")
            .json_body(json!({"product_ids": ["k1", "k2"]}));
        then.status(200).json_body(json!({"winner": "k2"}));
    });

    let storefront = common::storefront(&server);
    let recommendations = storefront
        .rag()
        .recommend(&RecommendRequest {
            preferences: "quiet keyboards".to_string(),
            budget: Some(80.0),
            limit: Some(4),
        })
        .await
        .unwrap();
    let comparison = storefront
        .rag()
        .compare(&CompareRequest {
            product_ids: vec!["k1".to_string(), "k2".to_string()],
        })
        .await
        .unwrap();

    recommend_mock.assert();
    compare_mock.assert();
    assert_eq!(recommendations, json!({"recommendations": ["k1", "k2"]}));
    assert_eq!(comparison, json!({"winner": "k2"}));
}

#[tokio::test]
async fn test_reindex_invalidates_cached_status() {
    let server = MockServer::start();
    let status_mock = server.mock(|when, then| {
        when.method(GET).path("/api/rag/status");
        then.status(200).json_body(json!({"indexed": 1200}));
    });
    let reindex_mock = server.mock(|when, then| {
        when.method(POST).path("/api/rag/reindex");
        then.status(202).json_body(json!({"accepted": true}));
    });

    let storefront = common::storefront(&server);
    storefront.rag().status().await.unwrap();
    storefront.rag().status().await.unwrap();
    status_mock.assert_hits(1);

    let ack = storefront.rag().reindex().await.unwrap();
    assert_eq!(ack, json!({"accepted": true}));
    reindex_mock.assert();

    storefront.rag().status().await.unwrap();
    status_mock.assert_hits(2);
}

#[tokio::test]
async fn test_failed_reindex_keeps_cache() {
    let server = MockServer::start();
    let status_mock = server.mock(|when, then| {
        when.method(GET).path("/api/rag/status");
        then.status(200).json_body(json!({"indexed": 10}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/rag/reindex");
        then.status(409);
    });

    let storefront = common::storefront(&server);
    storefront.rag().status().await.unwrap();

    let err = storefront.rag().reindex().await.unwrap_err();
    assert_eq!(err.status(), Some(409));

    storefront.rag().status().await.unwrap();
    status_mock.assert_hits(1);
}

#[tokio::test]
async fn test_non_json_success_body_is_a_serialization_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/rag/status");
        then.status(200).body("<html>maintenance</html>");
    });

    let storefront = common::storefront(&server);
    let result = storefront.rag().status().await;
    assert!(matches!(result, Err(ClientError::Serialization(_))));
}
