use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    /// Base URL of the order/payment, RAG and health backend.
    fn backend_url(&self) -> &str;
    /// Base URL of the agent gateway and MCP service.
    fn gateway_url(&self) -> &str;
    /// Overall request timeout for the gateway client. `None` means unlimited.
    fn gateway_timeout(&self) -> Option<Duration>;
    fn include_credentials(&self) -> bool;
    fn session_cookie(&self) -> Option<&str>;
    /// Age after which cached responses are refetched. `None` keeps them until invalidated.
    fn cache_stale_after(&self) -> Option<Duration>;
}
