//! Admin REST API wire types for orders, transactions, refunds, and draft
//! orders.
//!
//! ### Tags
//! Orders carry tags as a single comma-separated string (`"vip, silicone_fix"`),
//! unlike the storefront product endpoint. Helpers in [`crate::tags`] split and
//! rejoin it.
//!
//! ### Money
//! Prices and amounts arrive as decimal strings (`"12.99"`). They are modelled
//! as [`Decimal`] and serialized back as strings.
//!
//! ### Field projection
//! List calls usually pass `fields=id,tags,...`, so every field except `id`
//! tolerates absence. Collections and the tag string also tolerate `null`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,

    /// Display name such as `"#1001"`.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub discount_codes: Vec<DiscountCode>,

    #[serde(default)]
    pub financial_status: Option<String>,

    #[serde(default)]
    pub fulfillment_status: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub total_price: Option<Decimal>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub customer: Option<Customer>,

    /// Passed through untouched when an order is recreated.
    #[serde(default)]
    pub shipping_address: Option<Value>,

    #[serde(default)]
    pub billing_address: Option<Value>,

    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub title: String,

    /// Title plus variant title, e.g. `"Silicone Base - Large"`.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub quantity: u32,

    #[serde(default)]
    pub price: Decimal,

    #[serde(default)]
    pub variant_id: Option<i64>,

    #[serde(default)]
    pub sku: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountCode {
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// `fixed_amount`, `percentage`, or `shipping`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,

    /// `sale`, `authorization`, `capture`, `refund`, or `void`.
    pub kind: String,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub gateway: Option<String>,

    #[serde(default)]
    pub amount: Option<Decimal>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub parent_id: Option<i64>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// A `sale` that did not explicitly fail; `status` is absent on some
    /// manual-gateway transactions.
    #[must_use]
    pub fn is_sale(&self) -> bool {
        self.kind == "sale" && self.status.as_deref().is_none_or(|s| s == "success")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    pub id: i64,
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<Transaction>,
}

/// Body of `POST orders/{id}/refunds.json` (sent wrapped in `{"refund": …}`).
#[derive(Debug, Clone, Serialize)]
pub struct RefundRequest {
    pub notify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub transactions: Vec<RefundTransaction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefundTransaction {
    pub kind: String,
    pub gateway: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub amount: Decimal,
}

impl RefundTransaction {
    #[must_use]
    pub fn refund(gateway: impl Into<String>, parent_id: Option<i64>, amount: Decimal) -> Self {
        Self {
            kind: "refund".to_string(),
            gateway: gateway.into(),
            parent_id,
            amount,
        }
    }
}

/// Body of `POST orders.json` (sent wrapped in `{"order": …}`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_status: Option<String>,
    pub send_receipt: bool,
    pub send_fulfillment_receipt: bool,
    pub line_items: Vec<NewLineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub discount_codes: Vec<DiscountCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerRef {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewLineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

impl From<&LineItem> for NewLineItem {
    fn from(item: &LineItem) -> Self {
        Self {
            variant_id: item.variant_id,
            title: item.variant_id.is_none().then(|| item.title.clone()),
            quantity: item.quantity,
            price: Some(item.price),
        }
    }
}

/// Body of `POST draft_orders.json` (sent wrapped in `{"draft_order": …}`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct DraftOrderInput {
    pub line_items: Vec<NewLineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOrder {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Set once the draft has been completed into a real order.
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderResponse {
    pub order: Order,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefundResponse {
    pub refund: Refund,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DraftOrderResponse {
    pub draft_order: DraftOrder,
}

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
