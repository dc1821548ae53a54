use std::path::Path;

use ordersweep_export::{read_snapshot, write_matched_orders_workbook};

pub(crate) fn run_export(input: &Path, output: &Path) -> anyhow::Result<()> {
    let orders = read_snapshot(input)?;
    write_matched_orders_workbook(output, &orders)?;
    println!(
        "exported {} orders from {} to {}",
        orders.len(),
        input.display(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_snapshot_file_to_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("matching_orders.json");
        let output = dir.path().join("matching_orders.xlsx");
        std::fs::write(
            &input,
            r#"[{"order_id": 10, "tags": "silicone_fix", "line_items": [], "discount_codes": []}]"#,
        )
        .unwrap();

        run_export(&input, &output).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_export(&dir.path().join("absent.json"), &dir.path().join("out.xlsx"));
        assert!(result.is_err());
    }
}
