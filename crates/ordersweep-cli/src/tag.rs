//! Tag command handlers.
//!
//! `sweep` walks a tag-filtered listing through the bulk mutator and writes the
//! outcome log even when the walk stops early. `order` and `snapshot` tag
//! explicitly listed orders.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use ordersweep_admin::tags::with_tag;
use ordersweep_admin::{
    AddTag, AdminClient, OrderMutation, OrderQuery, OrderStatus, Sweep, SweepOptions, MAX_PAGES,
};
use ordersweep_core::AppConfig;
use ordersweep_export::{
    read_snapshot, write_outcome_log, write_tag_tracking_workbook, MatchedOrder, TagTrackingRow,
};

/// Sub-commands available under `tag`.
#[derive(Debug, Subcommand)]
pub enum TagCommands {
    /// Add a tag to every order carrying another tag
    Sweep {
        /// Only orders with this tag are considered
        #[arg(long)]
        from_tag: String,
        /// Tag to add
        #[arg(long)]
        tag: String,
        /// Order status filter (any, open, closed, cancelled)
        #[arg(long, default_value = "any")]
        status: OrderStatus,
        /// Stop after this many update attempts
        #[arg(long)]
        max_updates: Option<usize>,
        /// CSV file receiving one row per attempted update
        #[arg(long, default_value = "order_tag_update_log.csv")]
        log: PathBuf,
    },
    /// Add a tag to one order
    Order {
        /// Order id
        id: i64,
        #[arg(long)]
        tag: String,
    },
    /// Add a tag to every order listed in a JSON snapshot
    Snapshot {
        #[arg(long, default_value = "matching_orders.json")]
        input: PathBuf,
        #[arg(long)]
        tag: String,
        /// Spreadsheet tracking each order's old and new tags
        #[arg(long, default_value = "updated_orders.xlsx")]
        output: PathBuf,
    },
}

pub(crate) async fn run(
    config: &AppConfig,
    client: &AdminClient,
    command: TagCommands,
) -> anyhow::Result<()> {
    match command {
        TagCommands::Sweep {
            from_tag,
            tag,
            status,
            max_updates,
            log,
        } => {
            let query = OrderQuery::default()
                .with_status(status)
                .with_tag(from_tag)
                .with_fields(&["id", "tags"])
                .with_limit(config.page_size);
            let options = SweepOptions {
                max_updates,
                inter_request_delay_ms: config.inter_request_delay_ms,
                max_pages: MAX_PAGES,
            };
            run_tag_sweep(client, query, options, &tag, &log).await
        }
        TagCommands::Order { id, tag } => run_tag_order(client, id, &tag).await,
        TagCommands::Snapshot { input, tag, output } => {
            run_tag_snapshot(client, &input, &tag, &output).await
        }
    }
}

async fn run_tag_sweep(
    client: &AdminClient,
    query: OrderQuery,
    options: SweepOptions,
    tag: &str,
    log: &Path,
) -> anyhow::Result<()> {
    tracing::info!(tag, filter = ?query.tag, cap = ?options.max_updates, "starting tag sweep");

    let report = Sweep::new(client, query, options)
        .run(&AddTag::new(tag))
        .await;

    // The log reflects every attempt, including those made before a failure.
    write_outcome_log(log, &report.outcomes)?;

    println!(
        "pages: {}  seen: {}  skipped: {}  updated: {}  failed: {}",
        report.pages,
        report.seen,
        report.skipped,
        report.updated_count(),
        report.failed_count()
    );
    println!("stopped: {}", report.stop);
    println!("log written to {}", log.display());

    if report.stop.is_failure() {
        anyhow::bail!("tag sweep did not finish: {}", report.stop);
    }
    Ok(())
}

async fn run_tag_order(client: &AdminClient, order_id: i64, tag: &str) -> anyhow::Result<()> {
    let order = client.get_order(order_id).await?;
    let mutation = AddTag::new(tag);

    if !mutation.needs_update(&order) {
        println!("order {order_id} already has tag {tag}");
        return Ok(());
    }

    mutation.apply(client, &order).await?;
    println!("order {order_id} tagged with {tag}");
    Ok(())
}

async fn run_tag_snapshot(
    client: &AdminClient,
    input: &Path,
    tag: &str,
    output: &Path,
) -> anyhow::Result<()> {
    let orders = read_snapshot(input)?;
    tracing::info!(orders = orders.len(), input = %input.display(), "tagging snapshot orders");

    let rows = tag_snapshot_orders(client, &orders, tag).await;

    write_tag_tracking_workbook(output, &rows)?;
    let failed = rows.iter().filter(|r| r.is_failure()).count();
    println!(
        "processed {} orders ({failed} failed); results written to {}",
        rows.len(),
        output.display()
    );
    Ok(())
}

/// One row per snapshot order, in input order. A failed update is recorded
/// and the remaining orders are still tagged.
async fn tag_snapshot_orders(
    client: &AdminClient,
    orders: &[MatchedOrder],
    tag: &str,
) -> Vec<TagTrackingRow> {
    let mut rows = Vec::with_capacity(orders.len());
    for order in orders {
        let row = match with_tag(&order.tags, tag) {
            None => TagTrackingRow::unchanged(order.order_id, &order.tags),
            Some(updated) => match client.update_order_tags(order.order_id, &updated).await {
                Ok(()) => TagTrackingRow::updated(order.order_id, &order.tags, updated),
                Err(e) => {
                    tracing::warn!(order_id = order.order_id, error = %e, "tag update failed");
                    TagTrackingRow::failed(order.order_id, &order.tags, &e.to_string())
                }
            },
        };
        rows.push(row);
    }
    rows
}
