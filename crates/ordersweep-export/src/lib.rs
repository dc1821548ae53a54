//! Local artifacts produced and consumed by order workflows: the CSV outcome
//! log, JSON order snapshots, and XLSX workbooks.

mod error;
mod outcome_log;
mod snapshot;
mod workbook;

pub use error::ExportError;
pub use outcome_log::{render_outcome_log, write_outcome_log};
pub use snapshot::{read_snapshot, write_snapshot, MatchedOrder};
pub use workbook::{
    matched_order_row, write_matched_orders_workbook, write_tag_tracking_workbook,
    MatchedOrderRow, TagTrackingRow, TagUpdate, MATCHED_ORDERS_HEADERS, MATCHED_ORDERS_SHEET,
    TAG_TRACKING_HEADERS, TAG_TRACKING_SHEET,
};
