use std::path::Path;

use ordersweep_admin::{AdminClient, Order, OrderQuery};
use ordersweep_core::AppConfig;
use ordersweep_export::{write_snapshot, MatchedOrder};

#[derive(Debug, Clone)]
pub(crate) struct FilterCriteria {
    pub tag: String,
    pub line_item: String,
    pub allow_discounts: bool,
}

/// Local re-check on top of the remote tag filter. The tag test is a plain
/// substring match on the tag string.
pub(crate) fn order_matches(order: &Order, criteria: &FilterCriteria) -> bool {
    if !order.tags.contains(criteria.tag.as_str()) {
        return false;
    }
    if !criteria.allow_discounts && !order.discount_codes.is_empty() {
        return false;
    }
    order
        .line_items
        .iter()
        .any(|item| item.title == criteria.line_item)
}

pub(crate) async fn run_filter(
    config: &AppConfig,
    client: &AdminClient,
    criteria: &FilterCriteria,
    output: &Path,
) -> anyhow::Result<()> {
    let query = OrderQuery::default()
        .with_tag(criteria.tag.clone())
        .with_fields(&["id", "tags", "line_items", "discount_codes"])
        .with_limit(config.page_size);

    let orders = client
        .fetch_all_orders(&query, config.inter_request_delay_ms)
        .await?;

    let matching: Vec<MatchedOrder> = orders
        .iter()
        .filter(|o| order_matches(o, criteria))
        .map(MatchedOrder::from)
        .collect();

    tracing::info!(
        fetched = orders.len(),
        matching = matching.len(),
        "filtered orders"
    );
    write_snapshot(output, &matching)?;
    println!(
        "{} of {} orders matched; written to {}",
        matching.len(),
        orders.len(),
        output.display()
    );
    Ok(())
}
