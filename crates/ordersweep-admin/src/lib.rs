pub mod client;
pub mod error;
pub mod pagination;
pub mod query;
pub mod sweep;
pub mod tags;
pub mod types;

mod rate_limit;

pub use client::{AdminClient, OrderPage, MAX_PAGES};
pub use error::AdminError;
pub use pagination::{extract_next_link, PageCursor};
pub use query::{OrderQuery, OrderStatus};
pub use sweep::{AddTag, OrderMutation, Sweep, SweepOptions, SweepReport, SweepStop};
pub use types::{
    Customer, DiscountCode, DraftOrder, DraftOrderInput, LineItem, NewLineItem, NewOrder, Order,
    Refund, RefundRequest, RefundTransaction, Transaction,
};
