pub mod agent;
pub mod cache;
pub mod client;
pub mod health;
pub mod mcp;
pub mod orders;
pub mod rag;
pub mod storefront;
pub mod stream;

pub use crate::domain::model::QueryKey;
pub use crate::domain::ports::ConfigProvider;
pub use crate::utils::error::Result;
