use clap::Parser;
use futures_util::StreamExt;
use serde_json::Value;
use std::io::Write;
use storefront_gateway_client::config::cli::{
    AgentCommand, ChatArgs, Command, McpCommand, OrderCommand, RagCommand,
};
use storefront_gateway_client::utils::error::ErrorSeverity;
use storefront_gateway_client::utils::validation::{validate_non_empty_string, Validate};
use storefront_gateway_client::utils::{error::Result, logger};
use storefront_gateway_client::{
    AskRequest, ChatRequest, CliConfig, CompareRequest, RecommendRequest, SearchParams,
    StreamChatRequest, Storefront, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn connect(config: &CliConfig) -> Result<Storefront> {
    match &config.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            let file_config = TomlConfig::from_file(path)?;
            file_config.validate()?;
            Storefront::from_config(&file_config)
        }
        None => {
            config.validate()?;
            Storefront::from_config(config)
        }
    }
}

async fn run(config: CliConfig) -> Result<()> {
    let storefront = connect(&config)?;

    match config.command {
        Command::Health => print_json(&storefront.health().health().await?),
        Command::Agent(command) => run_agent(&storefront, command).await,
        Command::Rag(command) => run_rag(&storefront, command).await,
        Command::Mcp(command) => run_mcp(&storefront, command).await,
        Command::Orders(command) => run_orders(&storefront, command).await,
    }
}

async fn run_agent(storefront: &Storefront, command: AgentCommand) -> Result<()> {
    let agent = storefront.agent();
    match command {
        AgentCommand::Chat(ChatArgs {
            message,
            thread_id,
            user_id,
        }) => {
            validate_non_empty_string("message", &message)?;
            let request = ChatRequest {
                message,
                thread_id,
                user_id,
            };
            print_json(&agent.chat(&request).await?)
        }
        AgentCommand::Stream(ChatArgs {
            message, thread_id, ..
        }) => {
            validate_non_empty_string("message", &message)?;
            let mut stream = agent
                .chat_stream(&StreamChatRequest { message, thread_id })
                .await?;

            let mut stdout = std::io::stdout();
            while let Some(chunk) = stream.next().await {
                stdout.write_all(chunk?.as_bytes())?;
                stdout.flush()?;
            }
            writeln!(stdout)?;
            Ok(())
        }
        AgentCommand::Thread { thread_id } => print_query(agent.thread_history(&thread_id).await?),
        AgentCommand::Threads { user_id } => print_query(agent.threads(&user_id).await?),
        AgentCommand::Status => print_json(&agent.status().await?),
    }
}

async fn run_rag(storefront: &Storefront, command: RagCommand) -> Result<()> {
    let rag = storefront.rag();
    match command {
        RagCommand::Search {
            query,
            max_price,
            min_rating,
            category,
            top_k,
        } => {
            let params = SearchParams {
                query,
                max_price,
                min_rating,
                category,
                top_k,
            };
            print_query(rag.search(&params).await?)
        }
        RagCommand::Recommend {
            preferences,
            budget,
            limit,
        } => {
            let request = RecommendRequest {
                preferences,
                budget,
                limit,
            };
            print_json(&rag.recommend(&request).await?)
        }
        RagCommand::Compare { product_ids } => {
            print_json(&rag.compare(&CompareRequest { product_ids }).await?)
        }
        RagCommand::Status => print_json(&rag.status().await?),
        RagCommand::Reindex => print_json(&rag.reindex().await?),
    }
}

async fn run_mcp(storefront: &Storefront, command: McpCommand) -> Result<()> {
    let mcp = storefront.mcp();
    match command {
        McpCommand::Stats => print_json(&mcp.stats().await?),
        McpCommand::Categories => print_json(&mcp.categories().await?),
        McpCommand::Top { limit, category } => {
            print_json(&mcp.top_products(limit, category.as_deref()).await?)
        }
        McpCommand::Search { query, limit } => print_query(mcp.search(&query, limit).await?),
        McpCommand::Sentiment { product_id } => print_query(mcp.sentiment(&product_id).await?),
        McpCommand::Ask {
            question,
            product_id,
        } => {
            validate_non_empty_string("question", &question)?;
            print_json(&mcp.ask(&AskRequest { question, product_id }).await?)
        }
    }
}

async fn run_orders(storefront: &Storefront, command: OrderCommand) -> Result<()> {
    let orders = storefront.orders();
    match command {
        OrderCommand::Get { order_id } => print_query(orders.order(&order_id).await?),
        OrderCommand::Mine => print_json(&orders.my_orders().await?),
        OrderCommand::Paypal => print_json(&orders.paypal_client_id().await?),
        OrderCommand::Stripe => print_json(&orders.stripe_publishable_key().await?),
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_query(value: Option<Value>) -> Result<()> {
    match value {
        Some(value) => print_json(&value),
        None => {
            eprintln!("Nothing to fetch: the identifier or query is empty");
            Ok(())
        }
    }
}
