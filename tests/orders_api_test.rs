mod common;

use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use storefront_gateway_client::{
    ApiClient, ClientError, ClientOptions, CreateOrderRequest, PaymentResult, QueryCache,
    Storefront,
};

fn sample_order() -> CreateOrderRequest {
    CreateOrderRequest {
        order_items: vec![json!({"product": "p1", "name": "Trail Runner", "qty": 1, "price": 89.99})],
        shipping_address: json!({"address": "1 Main St", "city": "Porto", "postalCode": "4000", "country": "PT"}),
        payment_method: "PayPal".to_string(),
        items_price: 89.99,
        tax_price: 13.5,
        shipping_price: 0.0,
        total_price: 103.49,
    }
}

#[tokio::test]
async fn test_create_order_posts_camel_case_body() -> Result<()> {
    let server = MockServer::start();
    let created = json!({"_id": "o-1", "isPaid": false, "totalPrice": 103.49});

    let create_mock = server.mock(|when, then| {
        when.method(POST).path("/api/orders").json_body(json!({
            "orderItems": [{"product": "p1", "name": "Trail Runner", "qty": 1, "price": 89.99}],
            "shippingAddress": {"address": "1 Main St", "city": "Porto", "postalCode": "4000", "country": "PT"},
            "paymentMethod": "PayPal",
            "itemsPrice": 89.99,
            "taxPrice": 13.5,
            "shippingPrice": 0.0,
            "totalPrice": 103.49
        }));
        then.status(201).json_body(created.clone());
    });

    let storefront = common::storefront(&server);
    let result = storefront.orders().create_order(&sample_order()).await?;

    create_mock.assert();
    assert_eq!(result, created);
    Ok(())
}

#[tokio::test]
async fn test_create_order_failure_is_logged_and_returned() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/orders");
        then.status(400).json_body(json!({"message": "No order items"}));
    });

    let storefront = common::storefront(&server);
    let (logs, _guard) = common::capture_logs();

    let err = storefront
        .orders()
        .create_order(&sample_order())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 400, .. }));
    let output = logs.contents();
    assert!(output.contains("ERROR"), "logs were: {}", output);
    assert!(output.contains("Order creation failed"), "logs were: {}", output);
}

#[tokio::test]
async fn test_order_mutations_invalidate_order_queries() -> Result<()> {
    let server = MockServer::start();
    let order_mock = server.mock(|when, then| {
        when.method(GET).path("/api/orders/o-1");
        then.status(200).json_body(json!({"_id": "o-1", "isPaid": false}));
    });
    let mine_mock = server.mock(|when, then| {
        when.method(GET).path("/api/orders/mine");
        then.status(200).json_body(json!([{"_id": "o-1"}]));
    });
    let pay_mock = server.mock(|when, then| {
        when.method(PUT).path("/api/orders/o-1/pay").json_body(json!({
            "id": "PAY-123",
            "status": "COMPLETED",
            "update_time": "2026-10-19T10:00:00Z",
            "email_address": "buyer@example.com"
        }));
        then.status(200).json_body(json!({"_id": "o-1", "isPaid": true}));
    });
    let deliver_mock = server.mock(|when, then| {
        when.method(PUT).path("/api/orders/o-1/deliver");
        then.status(200).json_body(json!({"_id": "o-1", "isDelivered": true}));
    });

    let storefront = common::storefront(&server);
    let orders = storefront.orders();

    orders.order("o-1").await?;
    orders.my_orders().await?;
    orders.order("o-1").await?;
    order_mock.assert_hits(1);
    mine_mock.assert_hits(1);

    let paid = orders
        .pay_order(
            "o-1",
            &PaymentResult {
                id: "PAY-123".to_string(),
                status: "COMPLETED".to_string(),
                update_time: "2026-10-19T10:00:00Z".to_string(),
                email_address: Some("buyer@example.com".to_string()),
            },
        )
        .await?;
    assert_eq!(paid["isPaid"], true);
    pay_mock.assert();

    orders.order("o-1").await?;
    orders.my_orders().await?;
    order_mock.assert_hits(2);
    mine_mock.assert_hits(2);

    orders.deliver_order("o-1").await?;
    deliver_mock.assert();
    orders.order("o-1").await?;
    order_mock.assert_hits(3);
    Ok(())
}

#[tokio::test]
async fn test_admin_list_and_empty_id() -> Result<()> {
    let server = MockServer::start();
    let all_mock = server.mock(|when, then| {
        when.method(GET).path("/api/orders");
        then.status(200).json_body(json!([{"_id": "o-1"}, {"_id": "o-2"}]));
    });

    let storefront = common::storefront(&server);
    let all = storefront.orders().all_orders().await?;
    assert_eq!(all.as_array().map(Vec::len), Some(2));
    all_mock.assert();

    assert_eq!(storefront.orders().order("").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_payment_provider_config() -> Result<()> {
    let server = MockServer::start();
    let paypal_mock = server.mock(|when, then| {
        when.method(GET).path("/api/orders/paypal");
        then.status(200).json_body(json!({"clientId": "sb-client"}));
    });
    let stripe_mock = server.mock(|when, then| {
        when.method(GET).path("/api/orders/stripe");
        then.status(200).json_body(json!({"publishableKey": "pk_test_123"}));
    });

    let storefront = common::storefront(&server);
    assert_eq!(
        storefront.orders().paypal_client_id().await?,
        json!({"clientId": "sb-client"})
    );
    assert_eq!(
        storefront.orders().stripe_publishable_key().await?,
        json!({"publishableKey": "pk_test_123"})
    );

    paypal_mock.assert();
    stripe_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base_url = format!("http://127.0.0.1:{}", port);
    let backend = Arc::new(ApiClient::new(&base_url, ClientOptions::default()).unwrap());
    let storefront = Storefront::with_clients(
        backend.clone(),
        backend,
        Arc::new(QueryCache::new(None)),
    );

    let err = storefront.orders().my_orders().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(storefront.cache().is_empty().await);
}

#[tokio::test]
async fn test_read_in_flight_during_payment_is_not_cached() -> Result<()> {
    let server = MockServer::start();
    let mine_mock = server.mock(|when, then| {
        when.method(GET).path("/api/orders/mine");
        then.status(200)
            .delay(std::time::Duration::from_millis(400))
            .json_body(json!([{"_id": "o-1", "isPaid": false}]));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/api/orders/o-1/pay");
        then.status(200).json_body(json!({"_id": "o-1", "isPaid": true}));
    });

    let storefront = common::storefront(&server);
    let pending_read = tokio::spawn({
        let storefront = storefront.clone();
        async move { storefront.orders().my_orders().await }
    });
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    storefront
        .orders()
        .pay_order(
            "o-1",
            &PaymentResult {
                id: "PAY-9".to_string(),
                status: "COMPLETED".to_string(),
                update_time: "2026-10-19T10:00:00Z".to_string(),
                email_address: None,
            },
        )
        .await?;

    // the caller still gets what the server sent
    assert_eq!(pending_read.await??, json!([{"_id": "o-1", "isPaid": false}]));

    storefront.orders().my_orders().await?;
    mine_mock.assert_hits(2);
    Ok(())
}
