use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use taxcalc_core::allocation::{self, PortfolioAllocation};

use crate::input;

/// Arguments for asset allocation analysis
#[derive(Args)]
pub struct AllocationArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "0")]
    pub equity: Decimal,

    #[arg(long, default_value = "0")]
    pub debt: Decimal,

    #[arg(long, default_value = "0")]
    pub gold: Decimal,

    /// Real estate and REIT holdings
    #[arg(long, default_value = "0")]
    pub reit: Decimal,

    /// Cash and liquid funds
    #[arg(long, default_value = "0")]
    pub cash: Decimal,
}

pub fn run_allocation(args: AllocationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let portfolio: PortfolioAllocation = match input::read_structured(args.input.as_deref())? {
        Some(p) => p,
        None => PortfolioAllocation {
            equity: args.equity,
            debt: args.debt,
            gold: args.gold,
            reit: args.reit,
            cash: args.cash,
        },
    };
    let result = allocation::analyze_allocation(&portfolio)?;
    Ok(serde_json::to_value(result)?)
}
