use crate::core::cache::QueryCache;
use crate::core::client::ApiClient;
use crate::domain::model::{CreateOrderRequest, PaymentResult, QueryKey};
use crate::utils::error::Result;
use serde_json::Value;
use std::sync::Arc;

/// Order CRUD and payment-provider configuration.
#[derive(Debug, Clone)]
pub struct OrderService {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl OrderService {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    pub fn orders_key() -> QueryKey {
        QueryKey::new(["orders"])
    }

    /// Places an order. A rejected order is logged before the error is
    /// handed back; an accepted one invalidates every cached order query.
    pub async fn create_order(&self, order: &CreateOrderRequest) -> Result<Value> {
        match self.client.post(&["api", "orders"], order).await {
            Ok(created) => {
                self.cache.invalidate(&Self::orders_key()).await;
                Ok(created)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    status = ?e.status(),
                    items = order.order_items.len(),
                    "❌ Order creation failed"
                );
                Err(e)
            }
        }
    }

    /// Disabled for an empty id.
    pub async fn order(&self, order_id: &str) -> Result<Option<Value>> {
        let enabled = !order_id.trim().is_empty();
        self.cache
            .query(Self::orders_key().child(order_id), enabled, || async move {
                self.client.get(&["api", "orders", order_id], &[]).await
            })
            .await
    }

    pub async fn my_orders(&self) -> Result<Value> {
        self.cache
            .fetch(Self::orders_key().child("mine"), || async move {
                self.client.get(&["api", "orders", "mine"], &[]).await
            })
            .await
    }

    pub async fn all_orders(&self) -> Result<Value> {
        self.cache
            .fetch(Self::orders_key().child("all"), || async move {
                self.client.get(&["api", "orders"], &[]).await
            })
            .await
    }

    pub async fn pay_order(&self, order_id: &str, payment: &PaymentResult) -> Result<Value> {
        let paid = self
            .client
            .put(&["api", "orders", order_id, "pay"], payment)
            .await?;
        self.cache.invalidate(&Self::orders_key()).await;
        Ok(paid)
    }

    pub async fn deliver_order(&self, order_id: &str) -> Result<Value> {
        let delivered = self
            .client
            .put_empty(&["api", "orders", order_id, "deliver"])
            .await?;
        self.cache.invalidate(&Self::orders_key()).await;
        Ok(delivered)
    }

    pub async fn paypal_client_id(&self) -> Result<Value> {
        self.cache
            .fetch(QueryKey::new(["payment", "paypal"]), || async move {
                self.client.get(&["api", "orders", "paypal"], &[]).await
            })
            .await
    }

    pub async fn stripe_publishable_key(&self) -> Result<Value> {
        self.cache
            .fetch(QueryKey::new(["payment", "stripe"]), || async move {
                self.client.get(&["api", "orders", "stripe"], &[]).await
            })
            .await
    }
}
