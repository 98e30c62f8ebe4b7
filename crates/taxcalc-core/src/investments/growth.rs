use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::investments::{require_pct, require_years, MAX_HORIZON_YEARS};
use crate::time_value;
use crate::types::{
    require_non_negative, require_positive, round_rupees, with_metadata, ComputationOutput, Money,
    Percent, Years,
};
use crate::TaxCalcResult;

// ---------------------------------------------------------------------------
// CAGR
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CagrInput {
    pub initial_value: Money,
    pub final_value: Money,
    /// Holding period in years; fractions allowed
    pub years: Years,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CagrOutput {
    /// Compound annual growth rate, percent, 2 dp
    pub cagr_pct: Percent,
    /// Total change over the period, percent, 2 dp
    pub absolute_return_pct: Percent,
}

/// ((final / initial)^(1/years) - 1) * 100
pub fn compound_annual_growth(input: &CagrInput) -> TaxCalcResult<CagrOutput> {
    require_positive("initial_value", input.initial_value)?;
    require_non_negative("final_value", input.final_value)?;
    if input.years <= Decimal::ZERO || input.years > Decimal::from(MAX_HORIZON_YEARS) {
        return Err(TaxCalcError::invalid(
            "years",
            format!("Must be above 0 and at most {MAX_HORIZON_YEARS}"),
        ));
    }

    let ratio = input.final_value / input.initial_value;
    let annual_factor = if ratio.is_zero() {
        Decimal::ZERO
    } else {
        ratio
            .checked_powd(Decimal::ONE / input.years)
            .ok_or_else(|| {
                TaxCalcError::FinancialImpossibility(format!(
                    "Growth multiple {ratio} over {} years is out of range",
                    input.years
                ))
            })?
    };

    Ok(CagrOutput {
        cagr_pct: ((annual_factor - Decimal::ONE) * dec!(100)).round_dp(2),
        absolute_return_pct: ((ratio - Decimal::ONE) * dec!(100)).round_dp(2),
    })
}

pub fn calculate_cagr(input: &CagrInput) -> TaxCalcResult<ComputationOutput<CagrOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = compound_annual_growth(input)?;
    if input.years < Decimal::ONE {
        warnings.push("Period under a year; CAGR annualises the return".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Compound annual growth rate",
        &serde_json::json!({
            "initial_value": input.initial_value.to_string(),
            "final_value": input.final_value.to_string(),
            "years": input.years.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Inflation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationInput {
    pub current_cost: Money,
    /// Inflation, percent per annum
    pub annual_inflation_pct: Percent,
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationOutput {
    pub future_cost: Money,
    pub total_increase: Money,
}

/// Cost of the same basket after `years` of inflation.
pub fn inflate(input: &InflationInput) -> TaxCalcResult<InflationOutput> {
    require_positive("current_cost", input.current_cost)?;
    require_pct("annual_inflation_pct", input.annual_inflation_pct, dec!(100))?;
    require_years("years", input.years)?;

    let future_cost = time_value::lump_sum_future_value(
        input.current_cost,
        input.annual_inflation_pct / dec!(100),
        input.years,
    )?;
    Ok(InflationOutput {
        future_cost: round_rupees(future_cost),
        total_increase: round_rupees(future_cost - input.current_cost),
    })
}

pub fn calculate_inflation(
    input: &InflationInput,
) -> TaxCalcResult<ComputationOutput<InflationOutput>> {
    let start = Instant::now();
    let output = inflate(input)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annual compounding of the inflation rate",
        &serde_json::json!({
            "current_cost": input.current_cost.to_string(),
            "annual_inflation_pct": input.annual_inflation_pct.to_string(),
            "years": input.years,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Mutual fund with exit load
// ---------------------------------------------------------------------------

fn default_exit_load_pct() -> Percent {
    dec!(1)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutualFundInput {
    pub investment_amount: Money,
    /// Expected return, percent per annum
    pub annual_return_pct: Percent,
    pub years: u32,
    /// Charged on the redemption value
    #[serde(default = "default_exit_load_pct")]
    pub exit_load_pct: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutualFundOutput {
    pub invested: Money,
    pub future_value: Money,
    pub returns: Money,
    pub exit_load_amount: Money,
    /// Redemption proceeds after exit load
    pub final_value: Money,
}

pub fn mutual_fund_returns(input: &MutualFundInput) -> TaxCalcResult<MutualFundOutput> {
    require_positive("investment_amount", input.investment_amount)?;
    require_pct("annual_return_pct", input.annual_return_pct, dec!(100))?;
    require_pct("exit_load_pct", input.exit_load_pct, dec!(100))?;
    require_years("years", input.years)?;

    let future_value = time_value::lump_sum_future_value(
        input.investment_amount,
        input.annual_return_pct / dec!(100),
        input.years,
    )?;
    let exit_load = future_value * input.exit_load_pct / dec!(100);

    Ok(MutualFundOutput {
        invested: input.investment_amount,
        future_value: round_rupees(future_value),
        returns: round_rupees(future_value - input.investment_amount),
        exit_load_amount: round_rupees(exit_load),
        final_value: round_rupees(future_value - exit_load),
    })
}

pub fn calculate_mutual_fund(
    input: &MutualFundInput,
) -> TaxCalcResult<ComputationOutput<MutualFundOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = mutual_fund_returns(input)?;
    if output.final_value < output.invested {
        warnings.push("Exit load exceeds the gains; redemption returns less than invested".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annual compounding, exit load charged on redemption value",
        &serde_json::json!({
            "investment_amount": input.investment_amount.to_string(),
            "annual_return_pct": input.annual_return_pct.to_string(),
            "years": input.years,
            "exit_load_pct": input.exit_load_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cagr_doubling_in_five_years() {
        let out = compound_annual_growth(&CagrInput {
            initial_value: dec!(100000),
            final_value: dec!(200000),
            years: dec!(5),
        })
        .unwrap();
        // 2^(1/5) = 1.148698
        assert_eq!(out.cagr_pct, dec!(14.87));
        assert_eq!(out.absolute_return_pct, dec!(100));
    }

    #[test]
    fn test_cagr_total_loss() {
        let out = compound_annual_growth(&CagrInput {
            initial_value: dec!(100000),
            final_value: Decimal::ZERO,
            years: dec!(3),
        })
        .unwrap();
        assert_eq!(out.cagr_pct, dec!(-100));
        assert_eq!(out.absolute_return_pct, dec!(-100));
    }

    #[test]
    fn test_cagr_zero_initial_rejected() {
        assert!(compound_annual_growth(&CagrInput {
            initial_value: Decimal::ZERO,
            final_value: dec!(1),
            years: dec!(1),
        })
        .is_err());
    }

    #[test]
    fn test_inflation_ten_years_at_six_percent() {
        // 1.06^10 = 1.790848
        let out = inflate(&InflationInput {
            current_cost: dec!(100000),
            annual_inflation_pct: dec!(6),
            years: 10,
        })
        .unwrap();
        assert_eq!(out.future_cost, dec!(179085));
        assert_eq!(out.total_increase, dec!(79085));
    }

    #[test]
    fn test_mutual_fund_exit_load() {
        // 1.12^5 = 1.762342
        let out = mutual_fund_returns(&MutualFundInput {
            investment_amount: dec!(100000),
            annual_return_pct: dec!(12),
            years: 5,
            exit_load_pct: dec!(1),
        })
        .unwrap();
        assert_eq!(out.future_value, dec!(176234));
        assert_eq!(out.returns, dec!(76234));
        assert_eq!(out.exit_load_amount, dec!(1762));
        assert_eq!(out.final_value, dec!(174472));
    }

    #[test]
    fn test_exit_load_defaults_to_one_percent() {
        let input: MutualFundInput = serde_json::from_str(
            r#"{"investment_amount":"100000","annual_return_pct":"12","years":5}"#,
        )
        .unwrap();
        assert_eq!(input.exit_load_pct, dec!(1));
    }
}
