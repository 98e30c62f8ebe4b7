use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use taxcalc_core::loans::emi::EmiSolveInput;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::loans::emi::EmiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::loans::emi::calculate_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct EmiSolveRequest {
    #[serde(flatten)]
    solve: EmiSolveInput,
    #[serde(default)]
    strict: bool,
}

#[napi]
pub fn solve_emi(input_json: String) -> NapiResult<String> {
    let req: EmiSolveRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        taxcalc_core::loans::emi::calculate_emi_solve(&req.solve).map_err(to_napi_error)?;
    if req.strict {
        if let Some(rate) = output.result.rate.clone() {
            rate.require_converged().map_err(to_napi_error)?;
        }
    }
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::loans::amortization::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        taxcalc_core::loans::amortization::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn prepayment_benefit(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::loans::prepayment::PrepaymentBenefitInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::loans::prepayment::calculate_prepayment_benefit(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_prepay(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::loans::prepayment::ExistingLoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::loans::prepayment::calculate_loan_restructure(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn emi_sip_offset(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::loans::sip_offset::SipOffsetInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        taxcalc_core::loans::sip_offset::calculate_sip_offset(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Income tax
// ---------------------------------------------------------------------------

#[napi]
pub fn income_tax(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::income_tax::engine::TaxProfile =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        taxcalc_core::income_tax::engine::calculate_income_tax(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_regimes(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::income_tax::engine::TaxProfile =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        taxcalc_core::income_tax::engine::compare_tax_regimes(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Capital gains
// ---------------------------------------------------------------------------

#[napi]
pub fn capital_gains(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::capital_gains::engine::CapitalGainTransaction =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::capital_gains::engine::calculate_capital_gains(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Savings and investments
// ---------------------------------------------------------------------------

#[napi]
pub fn investment_growth(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::investments::sip::InvestmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::investments::sip::calculate_investment_growth(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn swp(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::investments::swp::SwpInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::investments::swp::calculate_swp(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn fixed_deposit(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::investments::deposit::DepositInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::investments::deposit::calculate_fixed_deposit(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn cagr(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::investments::growth::CagrInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        taxcalc_core::investments::growth::calculate_cagr(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn inflation(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::investments::growth::InflationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        taxcalc_core::investments::growth::calculate_inflation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn mutual_fund(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::investments::growth::MutualFundInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::investments::growth::calculate_mutual_fund(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn retirement(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::investments::retirement::RetirementInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::investments::retirement::calculate_retirement(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Household planning
// ---------------------------------------------------------------------------

#[napi]
pub fn salary(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::planning::salary::SalaryInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        taxcalc_core::planning::salary::calculate_salary(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn financial_health(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::planning::health::HealthInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::planning::health::calculate_financial_health(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Allocation and firms
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_allocation(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::allocation::PortfolioAllocation =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::allocation::analyze_allocation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn partnership(input_json: String) -> NapiResult<String> {
    let input: taxcalc_core::partnership::PartnershipInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = taxcalc_core::partnership::calculate_partnership(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

#[napi]
pub fn parse_pan(pan: String) -> NapiResult<String> {
    let details = taxcalc_core::tds::parse_pan(&pan).map_err(to_napi_error)?;
    serde_json::to_string(&details).map_err(to_napi_error)
}

#[napi]
pub fn parse_tan(tan: String) -> NapiResult<String> {
    let tan = taxcalc_core::tds::parse_tan(&tan).map_err(to_napi_error)?;
    serde_json::to_string(&tan).map_err(to_napi_error)
}
