//! Reissue command handlers: recreate an order under a profile, optionally
//! refunding or cancelling the original first.
//!
//! The original is only ever touched before the new order is created, and a
//! failure there aborts the run so no duplicate order is placed.

use clap::{Args, Subcommand};
use ordersweep_admin::{
    AdminClient, DiscountCode, NewLineItem, NewOrder, Order, RefundRequest, RefundTransaction,
    Transaction,
};
use ordersweep_admin::types::CustomerRef;
use ordersweep_core::{AppConfig, ReissueProfile};

#[derive(Debug, Args)]
pub struct ReissueArgs {
    /// Id of the order being replaced
    pub id: i64,
    /// Profile name from the reissue profiles file
    #[arg(long)]
    pub profile: String,
    /// Print the requests that would be sent without changing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Sub-commands available under `reissue`.
#[derive(Debug, Subcommand)]
pub enum ReissueCommands {
    /// Refund the original's sale transaction, then recreate it
    Refund(ReissueArgs),
    /// Cancel the original, then recreate it
    Cancel(ReissueArgs),
    /// Recreate the order and leave the original untouched
    Copy(ReissueArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prelude {
    Refund,
    Cancel,
    None,
}

pub(crate) async fn run(
    config: &AppConfig,
    client: &AdminClient,
    command: ReissueCommands,
) -> anyhow::Result<()> {
    let (prelude, args) = match command {
        ReissueCommands::Refund(args) => (Prelude::Refund, args),
        ReissueCommands::Cancel(args) => (Prelude::Cancel, args),
        ReissueCommands::Copy(args) => (Prelude::None, args),
    };

    let profiles = ordersweep_core::load_profiles(&config.profiles_path)?;
    let profile = profiles.get(&args.profile)?;
    run_reissue(client, profile, prelude, args.id, args.dry_run).await
}

async fn run_reissue(
    client: &AdminClient,
    profile: &ReissueProfile,
    prelude: Prelude,
    order_id: i64,
    dry_run: bool,
) -> anyhow::Result<()> {
    let original = client.get_order(order_id).await?;
    let new_order = build_reissue_order(&original, profile);

    match prelude {
        Prelude::Refund => {
            let transactions = client.list_transactions(order_id).await?;
            let refund = build_refund_request(profile, &transactions).ok_or_else(|| {
                anyhow::anyhow!("order {order_id} has no sale transaction to refund against")
            })?;
            if dry_run {
                print_payload("refund", &serde_json::json!({ "refund": refund }))?;
            } else {
                let created = client.create_refund(order_id, &refund).await.map_err(|e| {
                    anyhow::anyhow!("refund of order {order_id} failed, new order not created: {e}")
                })?;
                tracing::info!(order_id, refund_id = created.id, "original order refunded");
            }
        }
        Prelude::Cancel => {
            if dry_run {
                println!("would cancel order {order_id}");
            } else {
                client.cancel_order(order_id, None).await.map_err(|e| {
                    anyhow::anyhow!("cancel of order {order_id} failed, new order not created: {e}")
                })?;
                tracing::info!(order_id, "original order cancelled");
            }
        }
        Prelude::None => {}
    }

    if dry_run {
        return print_payload("order", &serde_json::json!({ "order": new_order }));
    }

    let created = client.create_order(&new_order).await?;
    println!(
        "created order {} ({}) replacing {order_id}",
        created.id,
        created.name.as_deref().unwrap_or("unnamed")
    );
    Ok(())
}

fn print_payload(label: &str, payload: &serde_json::Value) -> anyhow::Result<()> {
    println!("{label}:\n{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

/// Copies the original's buyer, items, addresses, and currency into a new
/// order carrying the profile's discount, status, and name suffix.
pub(crate) fn build_reissue_order(original: &Order, profile: &ReissueProfile) -> NewOrder {
    NewOrder {
        name: original
            .name
            .as_ref()
            .map(|name| format!("{name}{}", profile.name_suffix)),
        email: original.email.clone(),
        financial_status: Some(profile.financial_status.clone()),
        fulfillment_status: profile.mark_fulfilled.then(|| "fulfilled".to_string()),
        send_receipt: profile.send_receipt,
        send_fulfillment_receipt: profile.send_fulfillment_receipt,
        line_items: original.line_items.iter().map(NewLineItem::from).collect(),
        shipping_address: original.shipping_address.clone(),
        billing_address: original.billing_address.clone(),
        discount_codes: vec![DiscountCode {
            code: profile.discount.code.clone(),
            amount: Some(profile.discount.amount),
            kind: Some(profile.discount.kind.to_string()),
        }],
        currency: original.currency.clone(),
        customer: original.customer.as_ref().map(|c| CustomerRef { id: c.id }),
        note: profile.note.clone(),
    }
}

/// Refund against the first successful sale, or `None` when the order has
/// no sale to act as parent.
pub(crate) fn build_refund_request(
    profile: &ReissueProfile,
    transactions: &[Transaction],
) -> Option<RefundRequest> {
    let sale = transactions.iter().find(|t| t.is_sale())?;
    Some(RefundRequest {
        notify: profile.refund.notify,
        note: None,
        currency: None,
        transactions: vec![RefundTransaction::refund(
            profile.refund.gateway.clone(),
            Some(sale.id),
            profile.refund.amount,
        )],
    })
}
