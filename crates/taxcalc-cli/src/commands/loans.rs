use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use taxcalc_core::loans::amortization::{self, ScheduleInput};
use taxcalc_core::loans::emi::{self, EmiInput, EmiSolveInput, InterestMethod, LoanTerms};
use taxcalc_core::loans::prepayment::{
    self, ExistingLoanInput, PrepaymentBenefitInput, PrepaymentStrategy,
};
use taxcalc_core::loans::sip_offset::{self, SipOffsetInput};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// Flat interest on the original principal
    Fixed,
    /// Interest on the outstanding balance
    ReducingBalance,
}

impl From<MethodArg> for InterestMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Fixed => InterestMethod::Fixed,
            MethodArg::ReducingBalance => InterestMethod::ReducingBalance,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    ReduceTenure,
    ReduceInstallment,
}

impl From<StrategyArg> for PrepaymentStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::ReduceTenure => PrepaymentStrategy::ReduceTenure,
            StrategyArg::ReduceInstallment => PrepaymentStrategy::ReduceInstallment,
        }
    }
}

/// Loan terms shared by the EMI-family commands
#[derive(Args)]
pub struct LoanTermArgs {
    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 9 for 9%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in years
    #[arg(long)]
    pub tenure: Option<u32>,

    /// Interest method
    #[arg(long, value_enum, default_value = "reducing-balance")]
    pub method: MethodArg,
}

impl LoanTermArgs {
    fn to_terms(&self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        Ok(LoanTerms {
            principal: self
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: self.rate.ok_or("--rate is required (or provide --input)")?,
            tenure_years: self.tenure.ok_or("--tenure is required (or provide --input)")?,
            method: self.method.into(),
        })
    }
}

/// Arguments for EMI calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub terms: LoanTermArgs,

    /// Installment you would like to pay; adds tenure/principal/rate suggestions
    #[arg(long)]
    pub desired_installment: Option<Decimal>,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input: EmiInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => EmiInput {
            terms: args.terms.to_terms()?,
            desired_installment: args.desired_installment,
        },
    };
    let result = emi::calculate_emi(&emi_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the inverse EMI solve
#[derive(Args)]
pub struct EmiSolveArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub terms: LoanTermArgs,

    /// Target monthly installment
    #[arg(long)]
    pub target: Option<Decimal>,

    /// Fail instead of returning a best-effort rate when bisection does not converge
    #[arg(long)]
    pub strict: bool,
}

pub fn run_emi_solve(args: EmiSolveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let solve_input: EmiSolveInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => EmiSolveInput {
            terms: args.terms.to_terms()?,
            target_installment: args
                .target
                .ok_or("--target is required (or provide --input)")?,
        },
    };
    let result = emi::calculate_emi_solve(&solve_input)?;

    if args.strict {
        if let Some(rate) = result.result.rate.clone() {
            rate.require_converged()?;
        }
    }
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct AmortizationArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub terms: LoanTermArgs,

    /// Installment actually paid (defaults to the computed EMI)
    #[arg(long)]
    pub installment: Option<Decimal>,

    /// Pay one extra installment every 12th month
    #[arg(long)]
    pub show_prepayment: bool,

    /// Print only the totals
    #[arg(long)]
    pub summary_only: bool,
}

pub fn run_amortization(args: AmortizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => ScheduleInput {
            terms: args.terms.to_terms()?,
            installment: args.installment,
            show_prepayment: args.show_prepayment,
        },
    };
    let result = amortization::build_schedule(&schedule_input)?;

    if args.summary_only {
        return Ok(serde_json::json!({
            "result": result.result.summary,
            "methodology": result.methodology,
            "warnings": result.warnings,
        }));
    }
    // No "result" key, so table and csv output print the rows
    Ok(serde_json::json!({
        "results": result.result.rows,
        "installment": result.result.installment,
        "summary": result.result.summary,
        "methodology": result.methodology,
        "warnings": result.warnings,
        "metadata": result.metadata,
    }))
}

/// Arguments for the yearly prepayment benefit
#[derive(Args)]
pub struct PrepaymentBenefitArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub terms: LoanTermArgs,

    /// Installment paid (defaults to the computed EMI)
    #[arg(long)]
    pub installment: Option<Decimal>,
}

pub fn run_prepayment_benefit(
    args: PrepaymentBenefitArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let benefit_input: PrepaymentBenefitInput =
        match input::read_structured(args.input.as_deref())? {
            Some(i) => i,
            None => PrepaymentBenefitInput {
                terms: args.terms.to_terms()?,
                installment: args.installment,
            },
        };
    let result = prepayment::calculate_prepayment_benefit(&benefit_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for a part prepayment on a running loan
#[derive(Args)]
pub struct LoanPrepayArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding principal
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Current monthly installment
    #[arg(long)]
    pub installment: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Months left on the loan
    #[arg(long)]
    pub remaining_months: Option<u32>,

    /// Lump sum paid now
    #[arg(long)]
    pub prepayment: Option<Decimal>,

    #[arg(long, value_enum, default_value = "reduce-tenure")]
    pub strategy: StrategyArg,
}

pub fn run_loan_prepay(args: LoanPrepayArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: ExistingLoanInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => ExistingLoanInput {
            current_balance: args.balance.ok_or("--balance is required (or provide --input)")?,
            current_installment: args
                .installment
                .ok_or("--installment is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            remaining_months: args
                .remaining_months
                .ok_or("--remaining-months is required (or provide --input)")?,
            prepayment_amount: args
                .prepayment
                .ok_or("--prepayment is required (or provide --input)")?,
            strategy: args.strategy.into(),
        },
    };
    let result = prepayment::calculate_loan_restructure(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for sizing a SIP against loan interest
#[derive(Args)]
pub struct EmiSipOffsetArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub terms: LoanTermArgs,

    /// Expected SIP return in percent per annum
    #[arg(long, default_value = "12")]
    pub sip_return: Decimal,

    /// Years into the loan before the SIP starts
    #[arg(long, default_value = "2")]
    pub sip_start_after: u32,

    /// Monthly SIP actually invested (defaults to the required SIP)
    #[arg(long)]
    pub sip_amount: Option<Decimal>,
}

pub fn run_emi_sip_offset(args: EmiSipOffsetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let offset_input: SipOffsetInput = match input::read_structured(args.input.as_deref())? {
        Some(i) => i,
        None => SipOffsetInput {
            terms: args.terms.to_terms()?,
            sip_return_pct: args.sip_return,
            sip_start_after_years: args.sip_start_after,
            sip_amount: args.sip_amount,
        },
    };
    let result = sip_offset::calculate_sip_offset(&offset_input)?;
    Ok(serde_json::to_value(result)?)
}
