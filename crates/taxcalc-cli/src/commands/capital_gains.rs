use clap::Args;
use serde_json::Value;

use taxcalc_core::capital_gains::engine::{self, CapitalGainTransaction};

use crate::input;

/// Arguments for capital gains computation
#[derive(Args)]
pub struct CapitalGainsArgs {
    /// Path to JSON/YAML transaction file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_capital_gains(args: CapitalGainsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tx: CapitalGainTransaction = input::read_structured(args.input.as_deref())?
        .ok_or("--input <file.json> or piped JSON required for capital gains")?;
    let result = engine::calculate_capital_gains(&tx)?;
    Ok(serde_json::to_value(result)?)
}
