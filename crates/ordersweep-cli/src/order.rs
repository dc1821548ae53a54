//! Single-order commands: inspection, refund, cancellation, and draft orders.

use clap::Subcommand;
use ordersweep_admin::{
    AdminClient, DraftOrderInput, NewLineItem, Order, RefundRequest, RefundTransaction,
};
use rust_decimal::Decimal;

/// Sub-commands available under `order`.
#[derive(Debug, Subcommand)]
pub enum OrderCommands {
    /// Print an order's details
    Show {
        id: i64,
        /// Only report whether a line item with this exact title is present
        #[arg(long)]
        line_item: Option<String>,
    },
    /// Print an order's payment transactions
    Transactions { id: i64 },
    /// Refund part of an order
    Refund {
        id: i64,
        #[arg(long)]
        amount: Decimal,
        #[arg(long, default_value = "manual")]
        gateway: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Cancel an order
    Cancel {
        id: i64,
        /// customer, fraud, inventory, declined, or other
        #[arg(long)]
        reason: Option<String>,
    },
    /// Create a draft order for one variant and complete it
    Draft {
        #[arg(long)]
        variant_id: i64,
        #[arg(long, default_value = "1")]
        quantity: u32,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Leave the draft open instead of completing it
        #[arg(long)]
        no_complete: bool,
    },
}

pub(crate) async fn run(client: &AdminClient, command: OrderCommands) -> anyhow::Result<()> {
    match command {
        OrderCommands::Show { id, line_item } => {
            let order = client.get_order(id).await?;
            match line_item {
                Some(title) => {
                    let found = order.line_items.iter().any(|i| i.title == title);
                    println!(
                        "order {id} {} line item \"{title}\"",
                        if found { "contains" } else { "does not contain" }
                    );
                }
                None => print_order(&order),
            }
            Ok(())
        }
        OrderCommands::Transactions { id } => {
            let transactions = client.list_transactions(id).await?;
            if transactions.is_empty() {
                println!("order {id} has no transactions");
            }
            for t in &transactions {
                println!(
                    "{:<16} {:<14} {:<10} {:>10} {}",
                    t.id,
                    t.kind,
                    t.status.as_deref().unwrap_or("-"),
                    t.amount.map_or_else(|| "-".to_string(), |a| a.to_string()),
                    t.gateway.as_deref().unwrap_or("-"),
                );
            }
            Ok(())
        }
        OrderCommands::Refund {
            id,
            amount,
            gateway,
            note,
        } => {
            let transactions = client.list_transactions(id).await?;
            let parent_id = transactions.iter().find(|t| t.is_sale()).map(|t| t.id);
            if parent_id.is_none() {
                tracing::warn!(order_id = id, "no sale transaction found; refunding without parent");
            }
            let request = RefundRequest {
                notify: false,
                note,
                currency: None,
                transactions: vec![RefundTransaction::refund(gateway, parent_id, amount)],
            };
            let refund = client.create_refund(id, &request).await?;
            println!("refund {} issued for order {id} ({amount})", refund.id);
            Ok(())
        }
        OrderCommands::Cancel { id, reason } => {
            let order = client.cancel_order(id, reason.as_deref()).await?;
            println!(
                "order {id} cancelled at {}",
                order
                    .cancelled_at
                    .map_or_else(|| "unknown time".to_string(), |t| t.to_rfc3339())
            );
            Ok(())
        }
        OrderCommands::Draft {
            variant_id,
            quantity,
            price,
            currency,
            email,
            no_complete,
        } => {
            let input = DraftOrderInput {
                line_items: vec![NewLineItem {
                    variant_id: Some(variant_id),
                    title: None,
                    quantity,
                    price,
                }],
                currency,
                email,
                ..DraftOrderInput::default()
            };
            let draft = client.create_draft_order(&input).await?;
            println!("draft order {} created", draft.id);
            if no_complete {
                return Ok(());
            }
            let completed = client.complete_draft_order(draft.id).await?;
            match completed.order_id {
                Some(order_id) => println!("draft {} completed as order {order_id}", draft.id),
                None => println!("draft {} completed", draft.id),
            }
            Ok(())
        }
    }
}

fn print_order(order: &Order) {
    println!("Order: {} ({})", order.id, order.name.as_deref().unwrap_or("-"));
    println!("Email: {}", order.email.as_deref().unwrap_or("-"));
    println!(
        "Status: {} / {}",
        order.financial_status.as_deref().unwrap_or("-"),
        order.fulfillment_status.as_deref().unwrap_or("unfulfilled")
    );
    if let Some(total) = order.total_price {
        println!(
            "Total: {total} {}",
            order.currency.as_deref().unwrap_or_default()
        );
    }
    println!("Tags: {}", order.tags);
    for item in &order.line_items {
        println!("  {} x{} @ {}", item.title, item.quantity, item.price);
    }
    for code in &order.discount_codes {
        println!("  discount {}", code.code);
    }
}
