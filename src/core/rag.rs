use crate::core::cache::QueryCache;
use crate::core::client::ApiClient;
use crate::domain::model::{CompareRequest, QueryKey, RecommendRequest, SearchParams};
use crate::utils::error::Result;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RagService {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl RagService {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    pub fn root_key() -> QueryKey {
        QueryKey::new(["rag"])
    }

    /// Semantic product search. Disabled while the query is blank.
    pub async fn search(&self, params: &SearchParams) -> Result<Option<Value>> {
        let enabled = !params.query.trim().is_empty();
        let key = Self::root_key()
            .child("search")
            .child(serde_json::to_string(params)?);

        self.cache
            .query(key, enabled, || async move {
                self.client
                    .get(&["api", "rag", "search"], &params.to_query())
                    .await
            })
            .await
    }

    pub async fn recommend(&self, request: &RecommendRequest) -> Result<Value> {
        self.client.post(&["api", "rag", "recommend"], request).await
    }

    pub async fn compare(&self, request: &CompareRequest) -> Result<Value> {
        self.client.post(&["api", "rag", "compare"], request).await
    }

    pub async fn status(&self) -> Result<Value> {
        self.cache
            .fetch(Self::root_key().child("status"), || async move {
                self.client.get(&["api", "rag", "status"], &[]).await
            })
            .await
    }

    /// Triggers a rebuild of the search index; every cached RAG answer is
    /// dropped once the backend acknowledges it.
    pub async fn reindex(&self) -> Result<Value> {
        let ack = self.client.post_empty(&["api", "rag", "reindex"]).await?;
        self.cache.invalidate(&Self::root_key()).await;
        tracing::info!("RAG reindex requested");
        Ok(ack)
    }
}
