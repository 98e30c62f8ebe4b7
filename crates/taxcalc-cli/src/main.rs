mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::allocation::AllocationArgs;
use commands::capital_gains::CapitalGainsArgs;
use commands::income_tax::IncomeTaxArgs;
use commands::investments::{
    CagrArgs, FdArgs, InflationArgs, MutualFundArgs, RetirementArgs, SipArgs, SwpArgs,
};
use commands::loans::{
    AmortizationArgs, EmiArgs, EmiSipOffsetArgs, EmiSolveArgs, LoanPrepayArgs,
    PrepaymentBenefitArgs,
};
use commands::partnership::PartnershipArgs;
use commands::planning::{HealthArgs, SalaryArgs};
use commands::tds::{PanArgs, TanArgs};

/// Indian income tax, loan and investment calculations
#[derive(Parser)]
#[command(
    name = "taxcalc",
    version,
    about = "Indian income tax, loan and investment calculations",
    long_about = "A CLI for personal finance and tax calculations with decimal precision. \
                  Supports EMI and amortization, loan prepayment, income tax under both \
                  regimes, capital gains, SIP/SWP/FD and retirement projections, salary \
                  breakups, asset allocation, partnership firms and PAN/TAN checks."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly installment for a loan
    Emi(EmiArgs),
    /// Tenure, principal or rate needed for a target installment
    EmiSolve(EmiSolveArgs),
    /// Month-by-month amortization schedule
    Amortization(AmortizationArgs),
    /// Savings from one extra installment per year
    PrepaymentBenefit(PrepaymentBenefitArgs),
    /// Part prepayment on a running loan
    LoanPrepay(LoanPrepayArgs),
    /// SIP whose returns pay back the loan interest
    EmiSipOffset(EmiSipOffsetArgs),
    /// Income tax for one regime
    IncomeTax(IncomeTaxArgs),
    /// Compare the old and new tax regimes
    RegimeCompare(IncomeTaxArgs),
    /// Capital gains tax on a single sale
    CapitalGains(CapitalGainsArgs),
    /// SIP, lump sum or step-up SIP projection
    Sip(SipArgs),
    /// Systematic withdrawal plan
    Swp(SwpArgs),
    /// Fixed deposit maturity
    Fd(FdArgs),
    /// Compound annual growth rate
    Cagr(CagrArgs),
    /// Future cost of today's expenses
    Inflation(InflationArgs),
    /// Mutual fund returns net of exit load
    MutualFund(MutualFundArgs),
    /// Retirement corpus and the SIP to build it
    Retirement(RetirementArgs),
    /// CTC breakup and take-home pay
    Salary(SalaryArgs),
    /// Household financial health score
    FinancialHealth(HealthArgs),
    /// Actual vs ideal asset allocation
    Allocation(AllocationArgs),
    /// Partnership firm interest, remuneration and profit split
    Partnership(PartnershipArgs),
    /// Validate a PAN and identify the holder type
    Pan(PanArgs),
    /// Validate a TAN
    Tan(TanArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loans::run_emi(args),
        Commands::EmiSolve(args) => commands::loans::run_emi_solve(args),
        Commands::Amortization(args) => commands::loans::run_amortization(args),
        Commands::PrepaymentBenefit(args) => commands::loans::run_prepayment_benefit(args),
        Commands::LoanPrepay(args) => commands::loans::run_loan_prepay(args),
        Commands::EmiSipOffset(args) => commands::loans::run_emi_sip_offset(args),
        Commands::IncomeTax(args) => commands::income_tax::run_income_tax(args),
        Commands::RegimeCompare(args) => commands::income_tax::run_regime_compare(args),
        Commands::CapitalGains(args) => commands::capital_gains::run_capital_gains(args),
        Commands::Sip(args) => commands::investments::run_sip(args),
        Commands::Swp(args) => commands::investments::run_swp(args),
        Commands::Fd(args) => commands::investments::run_fd(args),
        Commands::Cagr(args) => commands::investments::run_cagr(args),
        Commands::Inflation(args) => commands::investments::run_inflation(args),
        Commands::MutualFund(args) => commands::investments::run_mutual_fund(args),
        Commands::Retirement(args) => commands::investments::run_retirement(args),
        Commands::Salary(args) => commands::planning::run_salary(args),
        Commands::FinancialHealth(args) => commands::planning::run_financial_health(args),
        Commands::Allocation(args) => commands::allocation::run_allocation(args),
        Commands::Partnership(args) => commands::partnership::run_partnership(args),
        Commands::Pan(args) => commands::tds::run_pan(args),
        Commands::Tan(args) => commands::tds::run_tan(args),
        Commands::Version => {
            println!("taxcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    let outcome = result.and_then(|value| output::format_output(&cli.output, &value));
    if let Err(e) = outcome {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }
}
