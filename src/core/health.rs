use crate::core::cache::QueryCache;
use crate::core::client::ApiClient;
use crate::domain::model::QueryKey;
use crate::utils::error::Result;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct HealthService {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl HealthService {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    pub async fn health(&self) -> Result<Value> {
        self.cache
            .fetch(QueryKey::new(["health"]), || async move {
                self.client.get(&["api", "health"], &[]).await
            })
            .await
    }
}
