use crate::core::cache::QueryCache;
use crate::core::client::ApiClient;
use crate::domain::model::{
    AiChatRequest, AskRequest, CartSuggestionRequest, CompareRequest, ExplainRequest, QueryKey,
    RecommendRequest,
};
use crate::utils::error::Result;
use serde_json::Value;
use std::sync::Arc;

/// MCP catalog queries and AI tool calls.
///
/// Catalog reads are cached under `["mcp", "catalog", ..]`. AI calls are
/// generated per request and never cached.
#[derive(Debug, Clone)]
pub struct McpService {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl McpService {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    pub fn catalog_key() -> QueryKey {
        QueryKey::new(["mcp", "catalog"])
    }

    async fn catalog_get(&self, segments: &[&str], query: &[(&str, Option<String>)]) -> Result<Value> {
        let mut path = vec!["api", "mcp", "catalog"];
        path.extend_from_slice(segments);
        self.client.get(&path, query).await
    }

    pub async fn stats(&self) -> Result<Value> {
        self.cache
            .fetch(Self::catalog_key().child("stats"), || async move {
                self.catalog_get(&["stats"], &[]).await
            })
            .await
    }

    pub async fn categories(&self) -> Result<Value> {
        self.cache
            .fetch(Self::catalog_key().child("categories"), || async move {
                self.catalog_get(&["categories"], &[]).await
            })
            .await
    }

    pub async fn top_products(&self, limit: Option<u32>, category: Option<&str>) -> Result<Value> {
        // Serialized options keep `None` and `Some("")` apart.
        let key = Self::catalog_key()
            .child("top")
            .child(serde_json::to_string(&(limit, category))?);
        let query = [
            ("limit", limit.map(|l| l.to_string())),
            ("category", category.map(String::from)),
        ];

        self.cache
            .fetch(key, || async move { self.catalog_get(&["top"], &query).await })
            .await
    }

    /// Catalog keyword search. Disabled while the query is blank.
    pub async fn search(&self, query: &str, limit: Option<u32>) -> Result<Option<Value>> {
        let key = Self::catalog_key()
            .child("search")
            .child(serde_json::to_string(&(query, limit))?);
        let params = [
            ("query", Some(query.to_string())),
            ("limit", limit.map(|l| l.to_string())),
        ];

        self.cache
            .query(key, !query.trim().is_empty(), || async move {
                self.catalog_get(&["search"], &params).await
            })
            .await
    }

    /// Review sentiment for one product. Disabled for an empty id.
    pub async fn sentiment(&self, product_id: &str) -> Result<Option<Value>> {
        let key = Self::catalog_key().child("sentiment").child(product_id);
        self.cache
            .query(key, !product_id.trim().is_empty(), || async move {
                self.catalog_get(&["sentiment", product_id], &[]).await
            })
            .await
    }

    pub async fn recommend(&self, request: &RecommendRequest) -> Result<Value> {
        self.client
            .post(&["api", "mcp", "ai", "recommend"], request)
            .await
    }

    pub async fn compare(&self, request: &CompareRequest) -> Result<Value> {
        self.client.post(&["api", "mcp", "ai", "compare"], request).await
    }

    pub async fn cart_suggestion(&self, request: &CartSuggestionRequest) -> Result<Value> {
        self.client
            .post(&["api", "mcp", "ai", "cart-suggestion"], request)
            .await
    }

    pub async fn explain(&self, request: &ExplainRequest) -> Result<Value> {
        self.client.post(&["api", "mcp", "ai", "explain"], request).await
    }

    pub async fn ask(&self, request: &AskRequest) -> Result<Value> {
        self.client.post(&["api", "mcp", "ai", "ask"], request).await
    }

    pub async fn chat(&self, request: &AiChatRequest) -> Result<Value> {
        self.client.post(&["api", "mcp", "ai", "chat"], request).await
    }
}
