use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::investments::{require_pct, require_years};
use crate::time_value;
use crate::types::{require_positive, round_rupees, with_metadata, ComputationOutput, Money, Percent};
use crate::TaxCalcResult;

/// Systematic withdrawal plan: a corpus that earns a monthly return while a
/// fixed amount is taken out at the end of every month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwpInput {
    pub initial_investment: Money,
    pub monthly_withdrawal: Money,
    /// Expected return, percent per annum
    pub annual_return_pct: Percent,
    pub years: u32,
}

impl SwpInput {
    pub fn validate(&self) -> TaxCalcResult<()> {
        require_positive("initial_investment", self.initial_investment)?;
        require_positive("monthly_withdrawal", self.monthly_withdrawal)?;
        require_pct("annual_return_pct", self.annual_return_pct, dec!(100))?;
        require_years("years", self.years)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwpOutput {
    pub initial_investment: Money,
    pub total_withdrawn: Money,
    /// Corpus left at the end, zero once exhausted
    pub final_value: Money,
    pub months_lasted: u32,
    pub exhausted: bool,
}

/// Run the plan month by month until the horizon or until the corpus runs out.
pub fn simulate_withdrawals(input: &SwpInput) -> TaxCalcResult<SwpOutput> {
    input.validate()?;

    let growth = Decimal::ONE + time_value::monthly_rate(input.annual_return_pct);
    let months = input.years * 12;
    let mut balance = input.initial_investment;

    for month in 1..=months {
        balance = time_value::mul(balance, growth, "SWP balance")? - input.monthly_withdrawal;
        if balance <= Decimal::ZERO {
            return Ok(SwpOutput {
                initial_investment: input.initial_investment,
                total_withdrawn: input.monthly_withdrawal * Decimal::from(month),
                final_value: Decimal::ZERO,
                months_lasted: month,
                exhausted: true,
            });
        }
    }

    Ok(SwpOutput {
        initial_investment: input.initial_investment,
        total_withdrawn: input.monthly_withdrawal * Decimal::from(months),
        final_value: round_rupees(balance),
        months_lasted: months,
        exhausted: false,
    })
}

pub fn calculate_swp(input: &SwpInput) -> TaxCalcResult<ComputationOutput<SwpOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = simulate_withdrawals(input)?;
    if output.exhausted {
        warnings.push(format!(
            "Corpus runs out after {} months ({} years) of the planned {}",
            output.months_lasted,
            (Decimal::from(output.months_lasted) / dec!(12)).round_dp(1),
            input.years * 12
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly compounding with end-of-month withdrawals",
        &serde_json::json!({
            "initial_investment": input.initial_investment.to_string(),
            "monthly_withdrawal": input.monthly_withdrawal.to_string(),
            "annual_return_pct": input.annual_return_pct.to_string(),
            "years": input.years,
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
    fn test_withdrawal_equal_to_return_preserves_corpus() {
        // 1% a month on 10 lakh is exactly the 10,000 withdrawn
        let out = simulate_withdrawals(&SwpInput {
            initial_investment: dec!(1000000),
            monthly_withdrawal: dec!(10000),
            annual_return_pct: dec!(12),
            years: 10,
        })
        .unwrap();
        assert_eq!(out.final_value, dec!(1000000));
        assert_eq!(out.total_withdrawn, dec!(1200000));
        assert_eq!(out.months_lasted, 120);
        assert!(!out.exhausted);
    }

    #[test]
    fn test_corpus_exhausted_early() {
        let out = calculate_swp(&SwpInput {
            initial_investment: dec!(100000),
            monthly_withdrawal: dec!(10000),
            annual_return_pct: Decimal::ZERO,
            years: 5,
        })
        .unwrap();
        assert!(out.result.exhausted);
        assert_eq!(out.result.months_lasted, 10);
        assert_eq!(out.result.total_withdrawn, dec!(100000));
        assert_eq!(out.result.final_value, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_zero_withdrawal_rejected() {
        assert!(simulate_withdrawals(&SwpInput {
            initial_investment: dec!(100000),
            monthly_withdrawal: Decimal::ZERO,
            annual_return_pct: dec!(8),
            years: 5,
        })
        .is_err());
    }
}
