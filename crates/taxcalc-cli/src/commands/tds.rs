use clap::Args;
use serde_json::Value;

use taxcalc_core::tds;

#[derive(Args)]
pub struct PanArgs {
    /// Permanent Account Number, e.g. ABCPE1234F
    pub pan: String,
}

#[derive(Args)]
pub struct TanArgs {
    /// Tax Deduction Account Number, e.g. DELM12345A
    pub tan: String,
}

pub fn run_pan(args: PanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let details = tds::parse_pan(&args.pan)?;
    Ok(serde_json::json!({ "result": details }))
}

pub fn run_tan(args: TanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tan = tds::parse_tan(&args.tan)?;
    Ok(serde_json::json!({ "result": { "tan": tan.as_str() } }))
}
