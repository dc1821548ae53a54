mod export;
mod filter;
mod order;
mod reissue;
mod tag;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ordersweep_admin::AdminClient;
use ordersweep_core::AppConfig;
use tracing_subscriber::EnvFilter;

use crate::order::OrderCommands;
use crate::reissue::ReissueCommands;
use crate::tag::TagCommands;

#[derive(Debug, Parser)]
#[command(name = "ordersweep")]
#[command(about = "Bulk tag, filter, refund, cancel, and recreate Shopify orders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add tags to orders
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Write orders carrying a tag and a given line item to a JSON snapshot
    Filter {
        /// Tag the order listing is filtered by
        #[arg(long)]
        tag: String,
        /// Exact line item title an order must contain
        #[arg(long)]
        line_item: String,
        /// Keep orders that have discount codes applied
        #[arg(long)]
        allow_discounts: bool,
        #[arg(long, default_value = "matching_orders.json")]
        output: PathBuf,
    },
    /// Convert a JSON order snapshot into a spreadsheet
    Export {
        #[arg(long, default_value = "matching_orders.json")]
        input: PathBuf,
        #[arg(long, default_value = "matching_orders.xlsx")]
        output: PathBuf,
    },
    /// Recreate an order under a reissue profile
    Reissue {
        #[command(subcommand)]
        command: ReissueCommands,
    },
    /// Inspect or change a single order
    Order {
        #[command(subcommand)]
        command: OrderCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Usage errors and --help must not depend on a valid environment.
    let cli = Cli::parse();

    let config = ordersweep_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Export { input, output } => export::run_export(&input, &output),
        Commands::Tag { command } => tag::run(&config, &admin_client(&config)?, command).await,
        Commands::Filter {
            tag,
            line_item,
            allow_discounts,
            output,
        } => {
            let criteria = filter::FilterCriteria {
                tag,
                line_item,
                allow_discounts,
            };
            filter::run_filter(&config, &admin_client(&config)?, &criteria, &output).await
        }
        Commands::Reissue { command } => {
            reissue::run(&config, &admin_client(&config)?, command).await
        }
        Commands::Order { command } => order::run(&admin_client(&config)?, command).await,
    }
}

/// Builds the Admin API client from configuration. Deferred until a command
/// actually talks to the store so offline commands need no credentials.
fn admin_client(config: &AppConfig) -> anyhow::Result<AdminClient> {
    let endpoint = config.admin_endpoint()?;
    let client = AdminClient::new(
        &endpoint,
        config.request_timeout_secs,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;
    tracing::debug!(base_url = %client.base_url(), "admin client ready");
    Ok(client)
}
