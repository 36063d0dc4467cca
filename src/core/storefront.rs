use crate::core::agent::AgentService;
use crate::core::cache::QueryCache;
use crate::core::client::{ApiClient, ClientOptions};
use crate::core::health::HealthService;
use crate::core::mcp::McpService;
use crate::core::orders::OrderService;
use crate::core::rag::RagService;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use std::sync::Arc;

/// Entry point wiring both HTTP clients and the shared cache into the
/// per-domain services.
///
/// The agent gateway and MCP service share the gateway client, which carries
/// the configured overall timeout. RAG, orders and health go through the
/// backend client with no timeout.
#[derive(Debug, Clone)]
pub struct Storefront {
    cache: Arc<QueryCache>,
    agent: AgentService,
    rag: RagService,
    mcp: McpService,
    orders: OrderService,
    health: HealthService,
}

impl Storefront {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let session_cookie = config.session_cookie().map(String::from);

        let gateway = ApiClient::new(
            config.gateway_url(),
            ClientOptions {
                timeout: config.gateway_timeout(),
                include_credentials: config.include_credentials(),
                session_cookie: session_cookie.clone(),
                ..Default::default()
            },
        )?;
        let backend = ApiClient::new(
            config.backend_url(),
            ClientOptions {
                timeout: None,
                include_credentials: config.include_credentials(),
                session_cookie,
                ..Default::default()
            },
        )?;

        tracing::debug!(
            "Storefront client ready (gateway: {}, backend: {})",
            gateway.base_url(),
            backend.base_url()
        );

        let cache = Arc::new(QueryCache::new(config.cache_stale_after()));
        Ok(Self::with_clients(Arc::new(gateway), Arc::new(backend), cache))
    }

    pub fn with_clients(
        gateway: Arc<ApiClient>,
        backend: Arc<ApiClient>,
        cache: Arc<QueryCache>,
    ) -> Self {
        Self {
            agent: AgentService::new(gateway.clone(), cache.clone()),
            mcp: McpService::new(gateway, cache.clone()),
            rag: RagService::new(backend.clone(), cache.clone()),
            orders: OrderService::new(backend.clone(), cache.clone()),
            health: HealthService::new(backend, cache.clone()),
            cache,
        }
    }

    pub fn agent(&self) -> &AgentService {
        &self.agent
    }

    pub fn rag(&self) -> &RagService {
        &self.rag
    }

    pub fn mcp(&self) -> &McpService {
        &self.mcp
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    pub fn health(&self) -> &HealthService {
        &self.health
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
}
