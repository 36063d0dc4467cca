use crate::core::cache::QueryCache;
use crate::core::client::ApiClient;
use crate::core::stream::ChatStream;
use crate::domain::model::{ChatRequest, QueryKey, StreamChatRequest};
use crate::utils::error::Result;
use serde_json::Value;
use std::sync::Arc;

/// Agent gateway: chat, streamed chat, thread history and status.
#[derive(Debug, Clone)]
pub struct AgentService {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl AgentService {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    pub fn threads_key() -> QueryKey {
        QueryKey::new(["agent", "threads"])
    }

    pub fn thread_key(thread_id: &str) -> QueryKey {
        QueryKey::new(["agent", "thread", thread_id])
    }

    /// Sends one chat turn. On success the thread list and the affected
    /// thread's history are invalidated; the thread id comes from the request
    /// or, for a new conversation, from the reply's `thread_id`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<Value> {
        let reply = self.client.post(&["api", "agent", "chat"], request).await?;

        self.cache.invalidate(&Self::threads_key()).await;
        let thread_id = request
            .thread_id
            .clone()
            .or_else(|| reply.get("thread_id").and_then(Value::as_str).map(String::from));
        if let Some(thread_id) = thread_id {
            self.cache.invalidate(&Self::thread_key(&thread_id)).await;
        }

        Ok(reply)
    }

    pub async fn chat_stream(&self, request: &StreamChatRequest) -> Result<ChatStream> {
        self.client
            .post_stream(&["api", "agent", "chat", "stream"], request)
            .await
    }

    /// Ordered messages of one thread. Disabled for an empty id.
    pub async fn thread_history(&self, thread_id: &str) -> Result<Option<Value>> {
        let enabled = !thread_id.trim().is_empty();
        self.cache
            .query(Self::thread_key(thread_id), enabled, || async move {
                self.client
                    .get(&["api", "agent", "thread", thread_id], &[])
                    .await
            })
            .await
    }

    /// Thread summaries for a user. Disabled for an empty user id.
    pub async fn threads(&self, user_id: &str) -> Result<Option<Value>> {
        let enabled = !user_id.trim().is_empty();
        self.cache
            .query(Self::threads_key().child(user_id), enabled, || async move {
                self.client
                    .get(
                        &["api", "agent", "threads"],
                        &[("user_id", Some(user_id.to_string()))],
                    )
                    .await
            })
            .await
    }

    pub async fn status(&self) -> Result<Value> {
        self.cache
            .fetch(QueryKey::new(["agent", "status"]), || async move {
                self.client.get(&["api", "agent", "status"], &[]).await
            })
            .await
    }
}
