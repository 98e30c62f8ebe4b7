use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use taxcalc_core::planning::health::{self, HealthInput};
use taxcalc_core::planning::salary::{self, SalaryInput};

use crate::input;

/// Arguments for a CTC breakup
#[derive(Args)]
pub struct SalaryArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual cost to company
    #[arg(long)]
    pub ctc: Option<Decimal>,

    /// Basic pay as a percent of CTC
    #[arg(long, default_value = "40")]
    pub basic_pct: Decimal,

    /// Annual HRA (defaults to half of basic)
    #[arg(long)]
    pub hra: Option<Decimal>,

    /// Annual special allowance (defaults to the CTC balance)
    #[arg(long)]
    pub special_allowance: Option<Decimal>,

    #[arg(long, default_value = "0")]
    pub bonus: Decimal,

    /// Not a provident fund member
    #[arg(long)]
    pub no_pf: bool,

    /// Annual professional tax
    #[arg(long, default_value = "2400")]
    pub professional_tax: Decimal,
}

pub fn run_salary(args: SalaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let salary_input: SalaryInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => SalaryInput {
            ctc: args.ctc.ok_or("--ctc is required (or provide --input)")?,
            basic_pct: args.basic_pct,
            hra: args.hra,
            special_allowance: args.special_allowance,
            bonus: args.bonus,
            pf: !args.no_pf,
            professional_tax: args.professional_tax,
        },
    };
    let result = salary::calculate_salary(&salary_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the financial health score
#[derive(Args)]
pub struct HealthArgs {
    /// Path to JSON/YAML file with income, expenses, holdings and insurance
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_financial_health(args: HealthArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let household: HealthInput = input::read_structured(args.input.as_deref())?
        .ok_or("--input <file.json> or piped JSON required for financial-health")?;
    let result = health::calculate_financial_health(&household)?;
    Ok(serde_json::to_value(result)?)
}
