use serde_json::Value;
use std::io::Write;

use super::{cell, OutputResult};

/// Headline figure of each command, in lookup order.
const HEADLINE_KEYS: [&str; 19] = [
    "final_tax_payable",
    "recommended",
    "tax",
    "required_sip",
    "installment",
    "interest_saved",
    "new_installment",
    "final_value",
    "future_value",
    "maturity_amount",
    "cagr_pct",
    "future_cost",
    "corpus_needed",
    "monthly_take_home",
    "total_score",
    "risk_profile",
    "max_allowable_remuneration",
    "holder_label",
    "target_installment",
];

/// Print only the headline figure of the result, or `key: value` for the first
/// field when none of the known headline keys is present.
pub fn write_minimal<W: Write>(value: &Value, out: &mut W) -> OutputResult {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let line = match result {
        Value::Object(map) => HEADLINE_KEYS
            .iter()
            .find_map(|k| map.get(*k).filter(|v| !v.is_null()).map(cell))
            .or_else(|| map.iter().next().map(|(k, v)| format!("{}: {}", k, cell(v))))
            .unwrap_or_default(),
        other => cell(other),
    };
    writeln!(out, "{}", line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_minimal(value, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_headline_key_wins() {
        let v = json!({"result": {"basic_tax": "60000", "final_tax_payable": "0"}});
        assert_eq!(render(&v), "0\n");
    }

    #[test]
    fn test_null_headline_skipped() {
        let v = json!({"result": {"tax": null, "installment": "12667.58"}});
        assert_eq!(render(&v), "12667.58\n");
    }

    #[test]
    fn test_falls_back_to_first_field() {
        let v = json!({"result": {"alpha": 1}});
        assert_eq!(render(&v), "alpha: 1\n");
    }
}
