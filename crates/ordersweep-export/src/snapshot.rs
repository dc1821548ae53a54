//! JSON order snapshots (`matching_orders.json`).
//!
//! A snapshot is a pretty-printed array of
//! `{order_id, tags, line_items, discount_codes}`. Hand-made snapshots that
//! only list `order_id` and `tags` are accepted; the collections default to
//! empty.

use std::path::Path;

use ordersweep_admin::{DiscountCode, LineItem, Order};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedOrder {
    pub order_id: i64,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub discount_codes: Vec<DiscountCode>,
}

impl From<&Order> for MatchedOrder {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            tags: order.tags.clone(),
            line_items: order.line_items.clone(),
            discount_codes: order.discount_codes.clone(),
        }
    }
}

/// # Errors
///
/// [`ExportError::Io`] if the file cannot be written, [`ExportError::Json`]
/// if serialization fails.
pub fn write_snapshot(path: &Path, orders: &[MatchedOrder]) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(orders).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), orders = orders.len(), "wrote order snapshot");
    Ok(())
}

/// # Errors
///
/// [`ExportError::Io`] if the file cannot be read, [`ExportError::Json`] if
/// it is not a snapshot array.
pub fn read_snapshot(path: &Path) -> Result<Vec<MatchedOrder>, ExportError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })
}
