use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::investments::require_pct;
use crate::time_value;
use crate::types::{require_positive, round_rupees, with_metadata, ComputationOutput, Money, Percent};
use crate::TaxCalcResult;

const MAX_AGE: u32 = 120;

/// Input parameters for retirement corpus planning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    /// Today's monthly expenses
    pub monthly_expense: Money,
    /// Percent per annum
    pub inflation_pct: Percent,
    /// Expected return on investments, percent per annum, before and after retirement
    pub annual_return_pct: Percent,
}

impl RetirementInput {
    pub fn validate(&self) -> TaxCalcResult<()> {
        if self.retirement_age <= self.current_age {
            return Err(TaxCalcError::invalid(
                "retirement_age",
                "Must be after current_age",
            ));
        }
        if self.life_expectancy <= self.retirement_age || self.life_expectancy > MAX_AGE {
            return Err(TaxCalcError::invalid(
                "life_expectancy",
                format!("Must be after retirement_age and at most {MAX_AGE}"),
            ));
        }
        require_positive("monthly_expense", self.monthly_expense)?;
        require_pct("inflation_pct", self.inflation_pct, dec!(50))?;
        require_pct("annual_return_pct", self.annual_return_pct, dec!(100))
    }
}

/// Top-level output from `plan_retirement`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementPlan {
    pub years_to_retirement: u32,
    pub years_in_retirement: u32,
    /// Today's monthly expense inflated to the retirement date
    pub future_monthly_expense: Money,
    /// Present value at retirement of every retirement year's expenses
    pub corpus_needed: Money,
    /// Start-of-month SIP that grows to the corpus by retirement
    pub monthly_sip: Money,
}

/// Corpus needed at retirement and the SIP that builds it.
///
/// Year y of retirement costs 12 * E_r * (1+i)^y and is discounted by
/// (1+g)^y, where E_r is the monthly expense at retirement. The SIP is the
/// corpus divided by the start-of-month annuity factor over the saving years.
pub fn plan_retirement(input: &RetirementInput) -> TaxCalcResult<RetirementPlan> {
    input.validate()?;

    let years_to_retirement = input.retirement_age - input.current_age;
    let years_in_retirement = input.life_expectancy - input.retirement_age;
    let inflation = input.inflation_pct / dec!(100);
    let growth = input.annual_return_pct / dec!(100);

    let future_monthly_expense =
        time_value::lump_sum_future_value(input.monthly_expense, inflation, years_to_retirement)?;
    let first_year_expense = time_value::mul(future_monthly_expense, dec!(12), "retirement expense")?;

    let mut corpus = Decimal::ZERO;
    for year in 0..years_in_retirement {
        let expense = time_value::lump_sum_future_value(first_year_expense, inflation, year)?;
        let discounted = expense / time_value::growth_factor(growth, year)?;
        corpus = time_value::add(corpus, discounted, "retirement corpus")?;
    }

    let sip_factor = time_value::annuity_due_factor(
        time_value::monthly_rate(input.annual_return_pct),
        years_to_retirement * 12,
    )?;
    let monthly_sip = corpus / sip_factor;

    Ok(RetirementPlan {
        years_to_retirement,
        years_in_retirement,
        future_monthly_expense: round_rupees(future_monthly_expense),
        corpus_needed: round_rupees(corpus),
        monthly_sip: round_rupees(monthly_sip),
    })
}

pub fn calculate_retirement(
    input: &RetirementInput,
) -> TaxCalcResult<ComputationOutput<RetirementPlan>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let plan = plan_retirement(input)?;
    if input.annual_return_pct <= input.inflation_pct {
        warnings.push(format!(
            "Return of {}% does not beat inflation of {}%; the corpus shrinks in real terms",
            input.annual_return_pct, input.inflation_pct
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Inflation-adjusted expenses discounted at the expected return; SIP via annuity due",
        &serde_json::json!({
            "current_age": input.current_age,
            "retirement_age": input.retirement_age,
            "life_expectancy": input.life_expectancy,
            "inflation_pct": input.inflation_pct.to_string(),
            "annual_return_pct": input.annual_return_pct.to_string(),
            "contribution_timing": "start of month",
        }),
        warnings,
        elapsed,
        plan,
    ))
}
