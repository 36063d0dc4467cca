pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::core::{
    agent::AgentService, cache::QueryCache, client::ApiClient, client::ClientOptions,
    health::HealthService, mcp::McpService, orders::OrderService, rag::RagService,
    storefront::Storefront, stream::ChatStream,
};
pub use crate::domain::model::*;
pub use crate::domain::ports::ConfigProvider;
pub use crate::utils::error::{ClientError, Result};
