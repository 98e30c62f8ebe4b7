use serde_json::Value;
use std::io::Write;

use super::OutputResult;

/// Pretty-printed envelope, newline terminated.
pub fn write_json<W: Write>(value: &Value, out: &mut W) -> OutputResult {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_writes_pretty_json_with_trailing_newline() {
        let mut buf = Vec::new();
        write_json(&json!({"result": {"installment": "12667.58"}}), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"result\""));
    }
}
