use clap::Args;
use serde_json::Value;

use taxcalc_core::partnership::{self, PartnershipInput};

use crate::input;

/// Arguments for partnership firm distribution
#[derive(Args)]
pub struct PartnershipArgs {
    /// Path to JSON/YAML file with the firm's profit, rate and partners
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_partnership(args: PartnershipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let firm: PartnershipInput = input::read_structured(args.input.as_deref())?
        .ok_or("--input <file.json> or piped JSON required for partnership")?;
    let result = partnership::calculate_partnership(&firm)?;
    Ok(serde_json::to_value(result)?)
}
