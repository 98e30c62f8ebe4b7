use serde_json::{Map, Value};
use std::io::Write;
use tabled::{builder::Builder, Table};

use super::{cell, row_columns, OutputResult};

/// Bordered tables for terminal reading: the result as field/value pairs, or
/// the schedule rows followed by their totals, then warnings and methodology.
pub fn write_table<W: Write>(value: &Value, out: &mut W) -> OutputResult {
    let Value::Object(map) = value else {
        writeln!(out, "{}", cell(value))?;
        return Ok(());
    };

    match (map.get("result"), map.get("results")) {
        (Some(Value::Object(result)), _) => write_pairs(out, result)?,
        (Some(Value::Array(rows)), _) | (None, Some(Value::Array(rows))) => {
            write_rows(out, rows)?;
            if let Some(Value::Object(summary)) = map.get("summary") {
                writeln!(out)?;
                write_pairs(out, summary)?;
            }
        }
        _ => write_pairs(out, map)?,
    }

    write_notes(out, map)
}

fn write_pairs<W: Write>(out: &mut W, map: &Map<String, Value>) -> OutputResult {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.replace('_', " "), display(val)]);
    }
    writeln!(out, "{}", Table::from(builder))?;
    Ok(())
}

fn write_rows<W: Write>(out: &mut W, rows: &[Value]) -> OutputResult {
    let columns = row_columns(rows);
    if columns.is_empty() {
        for item in rows {
            writeln!(out, "{}", display(item))?;
        }
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.replace('_', " ")));
    for item in rows {
        builder.push_record(
            columns
                .iter()
                .map(|c| item.get(c.as_str()).map(display).unwrap_or_default()),
        );
    }
    writeln!(out, "{}", Table::from(builder))?;
    Ok(())
}

fn write_notes<W: Write>(out: &mut W, envelope: &Map<String, Value>) -> OutputResult {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            writeln!(out, "\nWarnings:")?;
            for w in warnings.iter().filter_map(Value::as_str) {
                writeln!(out, "  - {}", w)?;
            }
        }
    }
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        writeln!(out, "\nMethodology: {}", meth)?;
    }
    Ok(())
}

/// Like `cell`, but lists read as comma-separated and nulls as a dash.
fn display(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(", "),
        _ => cell(value),
    }
}
