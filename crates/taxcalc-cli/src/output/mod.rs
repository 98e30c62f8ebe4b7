pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;
use std::io::{self, Write};

pub type OutputResult = Result<(), Box<dyn std::error::Error>>;

/// Column order for amortization rows, matching the printed schedule.
pub const SCHEDULE_COLUMNS: [&str; 7] = [
    "month",
    "opening_balance",
    "installment",
    "principal_component",
    "interest_component",
    "prepayment",
    "closing_balance",
];

/// Render `value` to stdout in the requested format.
pub fn format_output(format: &OutputFormat, value: &Value) -> OutputResult {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => json::write_json(value, &mut out)?,
        OutputFormat::Table => table::write_table(value, &mut out)?,
        OutputFormat::Csv => csv_out::write_csv(value, &mut out)?,
        OutputFormat::Minimal => minimal::write_minimal(value, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

/// Header for a list of row objects: the schedule order when the rows are
/// amortization months, otherwise the keys of the first row.
pub(crate) fn row_columns(rows: &[Value]) -> Vec<String> {
    let Some(Value::Object(first)) = rows.first() else {
        return Vec::new();
    };
    if SCHEDULE_COLUMNS.iter().all(|c| first.contains_key(*c)) {
        SCHEDULE_COLUMNS.iter().map(|c| c.to_string()).collect()
    } else {
        first.keys().cloned().collect()
    }
}

/// Plain-text rendering of a scalar; nested values fall back to compact JSON.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_rows_use_fixed_column_order() {
        let rows = vec![json!({
            "closing_balance": "0", "installment": "10", "interest_component": "1",
            "month": 1, "opening_balance": "9", "prepayment": "0", "principal_component": "9",
        })];
        assert_eq!(row_columns(&rows), SCHEDULE_COLUMNS.to_vec());
    }

    #[test]
    fn test_other_rows_use_their_own_keys() {
        let rows = vec![json!({"b": 1, "a": 2})];
        let cols = row_columns(&rows);
        assert_eq!(cols.len(), 2);
        assert!(cols.contains(&"a".to_string()));
        assert!(row_columns(&[]).is_empty());
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell(&json!("12667.58")), "12667.58");
        assert_eq!(cell(&Value::Null), "");
        assert_eq!(cell(&json!(["a", "b"])), r#"["a","b"]"#);
    }
}
