use serde_json::Value;
use std::io::{self, Read};

/// JSON piped on stdin, e.g. `cat profile.json | taxcalc income-tax`.
///
/// Returns None when stdin is a terminal or the pipe is empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| format!("Invalid JSON on stdin: {e}"))?;
    tracing::debug!(bytes = trimmed.len(), "Read input from stdin");
    Ok(Some(value))
}
