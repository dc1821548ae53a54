//! XLSX workbooks for matched orders and tag-update tracking.
//!
//! Rows are built as plain structs first so their contents can be checked
//! without opening a spreadsheet; the writers only lay them out.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::ExportError;
use crate::snapshot::MatchedOrder;

pub const MATCHED_ORDERS_SHEET: &str = "Matching Orders";
pub const MATCHED_ORDERS_HEADERS: [&str; 6] = [
    "Order_ID",
    "Tags",
    "Line_Item_Title",
    "Line_Item_Quantity",
    "Line_Item_Price",
    "Discount_Codes",
];

pub const TAG_TRACKING_SHEET: &str = "Order Tags Update";
pub const TAG_TRACKING_HEADERS: [&str; 4] = ["Order_ID", "Existing_Tags", "Updated_Tags", "Status"];

const JOIN: &str = ", ";

/// One spreadsheet row per matched order; multi-valued cells are joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedOrderRow {
    pub order_id: i64,
    pub tags: String,
    pub titles: String,
    pub quantities: String,
    pub prices: String,
    pub discount_codes: String,
}

#[must_use]
pub fn matched_order_row(order: &MatchedOrder) -> MatchedOrderRow {
    let join = |values: Vec<String>| values.join(JOIN);
    MatchedOrderRow {
        order_id: order.order_id,
        tags: order.tags.clone(),
        titles: join(order.line_items.iter().map(|i| i.title.clone()).collect()),
        quantities: join(order.line_items.iter().map(|i| i.quantity.to_string()).collect()),
        prices: join(order.line_items.iter().map(|i| i.price.to_string()).collect()),
        discount_codes: join(order.discount_codes.iter().map(|d| d.code.clone()).collect()),
    }
}

/// What happened to one snapshot order's tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagUpdate {
    /// Carries the tag string that was sent.
    Updated(String),
    AlreadyTagged,
    /// Carries the error text.
    Failed(String),
}

/// Result of tagging one order listed in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTrackingRow {
    pub order_id: i64,
    pub existing_tags: String,
    pub update: TagUpdate,
}

impl TagTrackingRow {
    #[must_use]
    pub fn updated(order_id: i64, existing_tags: &str, updated_tags: String) -> Self {
        Self::new(order_id, existing_tags, TagUpdate::Updated(updated_tags))
    }

    #[must_use]
    pub fn unchanged(order_id: i64, existing_tags: &str) -> Self {
        Self::new(order_id, existing_tags, TagUpdate::AlreadyTagged)
    }

    #[must_use]
    pub fn failed(order_id: i64, existing_tags: &str, reason: &str) -> Self {
        Self::new(order_id, existing_tags, TagUpdate::Failed(reason.to_owned()))
    }

    fn new(order_id: i64, existing_tags: &str, update: TagUpdate) -> Self {
        Self {
            order_id,
            existing_tags: existing_tags.to_owned(),
            update,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.update, TagUpdate::Failed(_))
    }

    /// `Updated_Tags` cell: the tags now on the order, or `Failed`.
    #[must_use]
    pub fn updated_tags_cell(&self) -> &str {
        match &self.update {
            TagUpdate::Updated(tags) => tags,
            TagUpdate::AlreadyTagged => &self.existing_tags,
            TagUpdate::Failed(_) => "Failed",
        }
    }

    /// `Status` cell.
    #[must_use]
    pub fn status_cell(&self) -> String {
        match &self.update {
            TagUpdate::Updated(_) => "Updated".to_owned(),
            TagUpdate::AlreadyTagged => "Already tagged".to_owned(),
            TagUpdate::Failed(reason) => format!("Failed: {reason}"),
        }
    }
}

/// # Errors
///
/// [`ExportError::Xlsx`] if the workbook cannot be built or saved.
pub fn write_matched_orders_workbook(
    path: &Path,
    orders: &[MatchedOrder],
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(MATCHED_ORDERS_SHEET)?;
    write_headers(sheet, &MATCHED_ORDERS_HEADERS)?;

    for (row, order) in (1u32..).zip(orders) {
        let cells = matched_order_row(order);
        // Ids exceed f64's exact integer range on some stores; keep them text.
        sheet.write_string(row, 0, cells.order_id.to_string())?;
        sheet.write_string(row, 1, &cells.tags)?;
        sheet.write_string(row, 2, &cells.titles)?;
        sheet.write_string(row, 3, &cells.quantities)?;
        sheet.write_string(row, 4, &cells.prices)?;
        sheet.write_string(row, 5, &cells.discount_codes)?;
    }

    sheet.autofit();
    workbook.save(path)?;
    tracing::info!(path = %path.display(), rows = orders.len(), "wrote matched orders workbook");
    Ok(())
}

/// # Errors
///
/// [`ExportError::Xlsx`] if the workbook cannot be built or saved.
pub fn write_tag_tracking_workbook(path: &Path, rows: &[TagTrackingRow]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(TAG_TRACKING_SHEET)?;
    write_headers(sheet, &TAG_TRACKING_HEADERS)?;

    for (row, entry) in (1u32..).zip(rows) {
        sheet.write_string(row, 0, entry.order_id.to_string())?;
        sheet.write_string(row, 1, &entry.existing_tags)?;
        sheet.write_string(row, 2, entry.updated_tags_cell())?;
        sheet.write_string(row, 3, entry.status_cell())?;
    }

    sheet.autofit();
    workbook.save(path)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote tag tracking workbook");
    Ok(())
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), ExportError> {
    let bold = Format::new().set_bold();
    for (col, header) in (0u16..).zip(headers) {
        sheet.write_string_with_format(0, col, *header, &bold)?;
    }
    Ok(())
}
