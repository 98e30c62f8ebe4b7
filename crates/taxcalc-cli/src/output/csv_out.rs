use serde_json::{Map, Value};
use std::io::Write;

use super::{cell, row_columns, OutputResult};

/// CSV rendering of a command envelope.
///
/// Schedules print one line per month followed by a blank line and a
/// `field,value` summary block. Single results print as `field,value` pairs.
pub fn write_csv<W: Write>(value: &Value, out: &mut W) -> OutputResult {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(&mut *out);

    match value {
        Value::Object(map) => match (map.get("result"), map.get("results")) {
            (Some(Value::Object(result)), _) => write_fields(&mut wtr, result.iter())?,
            (Some(Value::Array(rows)), _) | (None, Some(Value::Array(rows))) => {
                write_rows(&mut wtr, rows)?;
                let summary = summary_fields(map);
                if !summary.is_empty() {
                    wtr.flush()?;
                    let inner = wtr.into_inner().map_err(|e| e.into_error())?;
                    inner.write_all(b"\n")?;
                    wtr = csv::WriterBuilder::new().flexible(true).from_writer(inner);
                    write_fields(&mut wtr, summary.into_iter())?;
                }
            }
            _ => write_fields(&mut wtr, map.iter())?,
        },
        Value::Array(rows) => write_rows(&mut wtr, rows)?,
        other => wtr.write_record([cell(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

/// Scalars that accompany a row listing: the top-level installment, then the
/// entries of `summary`.
fn summary_fields(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut fields: Vec<(&String, &Value)> = map
        .iter()
        .filter(|(k, v)| k.as_str() == "installment" && !v.is_object())
        .collect();
    if let Some(Value::Object(summary)) = map.get("summary") {
        fields.extend(summary.iter());
    }
    fields
}

fn write_fields<'a, W: Write>(
    wtr: &mut csv::Writer<W>,
    fields: impl Iterator<Item = (&'a String, &'a Value)>,
) -> OutputResult {
    wtr.write_record(["field", "value"])?;
    for (key, val) in fields {
        wtr.write_record([key.as_str(), &cell(val)])?;
    }
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> OutputResult {
    let columns = row_columns(rows);
    if columns.is_empty() {
        for item in rows {
            wtr.write_record([cell(item)])?;
        }
        return Ok(());
    }

    wtr.write_record(&columns)?;
    for item in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|c| item.get(c.as_str()).map(cell).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    Ok(())
}
