use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use taxcalc_core::investments::deposit::{self, Compounding, DepositInput};
use taxcalc_core::investments::growth::{
    self, CagrInput, InflationInput, MutualFundInput,
};
use taxcalc_core::investments::retirement::{self, RetirementInput};
use taxcalc_core::investments::sip::{self, InvestmentInput, InvestmentPlan};
use taxcalc_core::investments::swp::{self, SwpInput};

use crate::input;

fn required<T>(value: Option<T>, flag: &str) -> Result<T, Box<dyn std::error::Error>> {
    value.ok_or_else(|| format!("--{flag} is required (or provide --input)").into())
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PlanArg {
    Sip,
    Lumpsum,
    StepUpSip,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompoundingArg {
    Simple,
    Monthly,
    Quarterly,
    Yearly,
}

impl From<CompoundingArg> for Compounding {
    fn from(c: CompoundingArg) -> Self {
        match c {
            CompoundingArg::Simple => Compounding::Simple,
            CompoundingArg::Monthly => Compounding::Monthly,
            CompoundingArg::Quarterly => Compounding::Quarterly,
            CompoundingArg::Yearly => Compounding::Yearly,
        }
    }
}

/// Arguments for SIP, lump sum and step-up SIP projections
#[derive(Args)]
pub struct SipArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, value_enum, default_value = "sip")]
    pub mode: PlanArg,

    /// Monthly investment, or the one-time amount for a lump sum
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Yearly increase in the monthly investment, percent
    #[arg(long, default_value = "10")]
    pub step_up: Decimal,

    /// Expected return, percent per annum
    #[arg(long = "return", default_value = "12")]
    pub annual_return: Decimal,

    #[arg(long, default_value = "10")]
    pub years: u32,
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sip_input: InvestmentInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => {
            let amount = required(args.amount, "amount")?;
            let plan = match args.mode {
                PlanArg::Sip => InvestmentPlan::Sip {
                    monthly_investment: amount,
                },
                PlanArg::Lumpsum => InvestmentPlan::Lumpsum { amount },
                PlanArg::StepUpSip => InvestmentPlan::StepUpSip {
                    monthly_investment: amount,
                    step_up_pct: args.step_up,
                },
            };
            InvestmentInput {
                plan,
                annual_return_pct: args.annual_return,
                years: args.years,
            }
        }
    };
    let result = sip::calculate_investment_growth(&sip_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for a systematic withdrawal plan
#[derive(Args)]
pub struct SwpArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Corpus at the start
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Amount withdrawn at the end of each month
    #[arg(long)]
    pub withdrawal: Option<Decimal>,

    /// Expected return, percent per annum
    #[arg(long = "return", default_value = "12")]
    pub annual_return: Decimal,

    #[arg(long, default_value = "10")]
    pub years: u32,
}

pub fn run_swp(args: SwpArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let swp_input: SwpInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => SwpInput {
            initial_investment: required(args.investment, "investment")?,
            monthly_withdrawal: required(args.withdrawal, "withdrawal")?,
            annual_return_pct: args.annual_return,
            years: args.years,
        },
    };
    let result = swp::calculate_swp(&swp_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for fixed deposit maturity
#[derive(Args)]
pub struct FdArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Interest rate, percent per annum
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in years (0.25 steps for quarters)
    #[arg(long, default_value = "1")]
    pub tenure: Decimal,

    #[arg(long, value_enum, default_value = "quarterly")]
    pub compounding: CompoundingArg,
}

pub fn run_fd(args: FdArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fd_input: DepositInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => DepositInput {
            principal: required(args.principal, "principal")?,
            annual_rate_pct: required(args.rate, "rate")?,
            tenure_years: args.tenure,
            compounding: args.compounding.into(),
        },
    };
    let result = deposit::calculate_fixed_deposit(&fd_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for compound annual growth rate
#[derive(Args)]
pub struct CagrArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub initial: Option<Decimal>,

    #[arg(long = "final")]
    pub final_value: Option<Decimal>,

    /// Holding period in years
    #[arg(long)]
    pub years: Option<Decimal>,
}

pub fn run_cagr(args: CagrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cagr_input: CagrInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => CagrInput {
            initial_value: required(args.initial, "initial")?,
            final_value: required(args.final_value, "final")?,
            years: required(args.years, "years")?,
        },
    };
    let result = growth::calculate_cagr(&cagr_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the future cost of today's expenses
#[derive(Args)]
pub struct InflationArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Cost today
    #[arg(long)]
    pub cost: Option<Decimal>,

    /// Inflation, percent per annum
    #[arg(long, default_value = "6")]
    pub inflation: Decimal,

    #[arg(long, default_value = "10")]
    pub years: u32,
}

pub fn run_inflation(args: InflationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inflation_input: InflationInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => InflationInput {
            current_cost: required(args.cost, "cost")?,
            annual_inflation_pct: args.inflation,
            years: args.years,
        },
    };
    let result = growth::calculate_inflation(&inflation_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for mutual fund returns net of exit load
#[derive(Args)]
pub struct MutualFundArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Expected return, percent per annum
    #[arg(long = "return", default_value = "12")]
    pub annual_return: Decimal,

    #[arg(long, default_value = "5")]
    pub years: u32,

    /// Exit load in percent of the redemption value
    #[arg(long, default_value = "1")]
    pub exit_load: Decimal,
}

pub fn run_mutual_fund(args: MutualFundArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fund_input: MutualFundInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => MutualFundInput {
            investment_amount: required(args.amount, "amount")?,
            annual_return_pct: args.annual_return,
            years: args.years,
            exit_load_pct: args.exit_load,
        },
    };
    let result = growth::calculate_mutual_fund(&fund_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for retirement corpus planning
#[derive(Args)]
pub struct RetirementArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "30")]
    pub current_age: u32,

    #[arg(long, default_value = "60")]
    pub retirement_age: u32,

    #[arg(long, default_value = "80")]
    pub life_expectancy: u32,

    /// Today's monthly expenses
    #[arg(long)]
    pub monthly_expense: Option<Decimal>,

    /// Inflation, percent per annum
    #[arg(long, default_value = "6")]
    pub inflation: Decimal,

    /// Expected return, percent per annum
    #[arg(long = "return", default_value = "12")]
    pub annual_return: Decimal,
}

pub fn run_retirement(args: RetirementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan_input: RetirementInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => RetirementInput {
            current_age: args.current_age,
            retirement_age: args.retirement_age,
            life_expectancy: args.life_expectancy,
            monthly_expense: required(args.monthly_expense, "monthly-expense")?,
            inflation_pct: args.inflation,
            annual_return_pct: args.annual_return,
        },
    };
    let result = retirement::calculate_retirement(&plan_input)?;
    Ok(serde_json::to_value(result)?)
}
