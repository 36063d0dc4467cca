use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "storefront")]
#[command(about = "Query the storefront agent, MCP, RAG and order services")]
pub struct CliConfig {
    #[arg(
        long,
        help = "Load settings from a TOML file instead of flags",
        conflicts_with_all = [
            "base_url",
            "gateway_url",
            "timeout_secs",
            "no_credentials",
            "session_cookie",
            "stale_secs",
        ]
    )]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "http://localhost:5000")]
    pub base_url: String,

    #[arg(long, help = "Agent gateway / MCP base URL (defaults to --base-url)")]
    pub gateway_url: Option<String>,

    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    #[arg(long, help = "Do not send session credentials")]
    pub no_credentials: bool,

    #[arg(long)]
    pub session_cookie: Option<String>,

    #[arg(long, help = "Seconds before a cached response is refetched")]
    pub stale_secs: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Backend health summary
    Health,
    #[command(subcommand)]
    Agent(AgentCommand),
    #[command(subcommand)]
    Rag(RagCommand),
    #[command(subcommand)]
    Mcp(McpCommand),
    #[command(subcommand)]
    Orders(OrderCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum AgentCommand {
    Chat(ChatArgs),
    /// Stream the reply to stdout as it arrives
    Stream(ChatArgs),
    Thread { thread_id: String },
    Threads { user_id: String },
    Status,
}

#[derive(Debug, Clone, Args)]
pub struct ChatArgs {
    pub message: String,
    #[arg(long)]
    pub thread_id: Option<String>,
    #[arg(long)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum RagCommand {
    Search {
        query: String,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        min_rating: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        top_k: Option<u32>,
    },
    Recommend {
        preferences: String,
        #[arg(long)]
        budget: Option<f64>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Compare {
        #[arg(required = true)]
        product_ids: Vec<String>,
    },
    Status,
    Reindex,
}

#[derive(Debug, Clone, Subcommand)]
pub enum McpCommand {
    Stats,
    Categories,
    Top {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        category: Option<String>,
    },
    Search {
        query: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    Sentiment { product_id: String },
    Ask {
        question: String,
        #[arg(long)]
        product_id: Option<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum OrderCommand {
    Get { order_id: String },
    Mine,
    Paypal,
    Stripe,
}

impl ConfigProvider for CliConfig {
    fn backend_url(&self) -> &str {
        &self.base_url
    }

    fn gateway_url(&self) -> &str {
        self.gateway_url.as_deref().unwrap_or(&self.base_url)
    }

    fn gateway_timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(self.timeout_secs))
    }

    fn include_credentials(&self) -> bool {
        !self.no_credentials
    }

    fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }

    fn cache_stale_after(&self) -> Option<Duration> {
        self.stale_secs.map(Duration::from_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        if let Some(gateway_url) = &self.gateway_url {
            validate_url("gateway_url", gateway_url)?;
        }
        validate_positive_number("timeout_secs", self.timeout_secs, 1)?;
        Ok(())
    }
}
