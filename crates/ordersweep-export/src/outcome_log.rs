use std::io::Write;
use std::path::Path;

use ordersweep_core::OutcomeRecord;

use crate::error::ExportError;

/// Writes `records` as CSV with the header `order_id,status,reason`.
///
/// The header is written even when `records` is empty.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if serialization or the underlying write
/// fails.
pub fn render_outcome_log<W: Write>(writer: W, records: &[OutcomeRecord]) -> Result<(), ExportError> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(["order_id", "status", "reason"])?;
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the outcome log into it.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the file cannot be created, or
/// [`ExportError::Csv`] on write failure.
pub fn write_outcome_log(path: &Path, records: &[OutcomeRecord]) -> Result<(), ExportError> {
    let file = std::fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    render_outcome_log(file, records)?;
    tracing::info!(path = %path.display(), records = records.len(), "wrote outcome log");
    Ok(())
}
