use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::investments::{require_pct, MAX_HORIZON_YEARS};
use crate::time_value;
use crate::types::{require_positive, round_rupees, with_metadata, ComputationOutput, Money, Percent, Years};
use crate::TaxCalcResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    /// No compounding: P * (1 + r*t)
    Simple,
    Monthly,
    #[default]
    Quarterly,
    Yearly,
}

impl Compounding {
    /// Compounding periods per year, `None` for simple interest.
    pub fn periods_per_year(self) -> Option<u32> {
        match self {
            Compounding::Simple => None,
            Compounding::Monthly => Some(12),
            Compounding::Quarterly => Some(4),
            Compounding::Yearly => Some(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositInput {
    pub principal: Money,
    /// Interest rate, percent per annum
    pub annual_rate_pct: Percent,
    /// Tenure in years; fractions allowed (0.25 = one quarter)
    pub tenure_years: Years,
    #[serde(default)]
    pub compounding: Compounding,
}

impl DepositInput {
    pub fn validate(&self) -> TaxCalcResult<()> {
        require_positive("principal", self.principal)?;
        require_pct("annual_rate_pct", self.annual_rate_pct, dec!(100))?;
        if self.tenure_years <= Decimal::ZERO
            || self.tenure_years > Decimal::from(MAX_HORIZON_YEARS)
        {
            return Err(TaxCalcError::invalid(
                "tenure_years",
                format!("Must be above 0 and at most {MAX_HORIZON_YEARS}"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositOutput {
    pub principal: Money,
    pub maturity_amount: Money,
    pub interest_earned: Money,
}

/// Maturity value of a fixed deposit.
pub fn maturity(input: &DepositInput) -> TaxCalcResult<DepositOutput> {
    input.validate()?;

    let rate = input.annual_rate_pct / dec!(100);
    let maturity_amount = match input.compounding.periods_per_year() {
        None => time_value::mul(
            input.principal,
            Decimal::ONE + rate * input.tenure_years,
            "deposit maturity",
        )?,
        Some(n) => {
            let n = Decimal::from(n);
            let factor = time_value::growth_factor_frac(rate / n, n * input.tenure_years)?;
            time_value::mul(input.principal, factor, "deposit maturity")?
        }
    };

    Ok(DepositOutput {
        principal: input.principal,
        maturity_amount: round_rupees(maturity_amount),
        interest_earned: round_rupees(maturity_amount - input.principal),
    })
}

pub fn calculate_fixed_deposit(
    input: &DepositInput,
) -> TaxCalcResult<ComputationOutput<DepositOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = maturity(input)?;
    if let Some(n) = input.compounding.periods_per_year() {
        if !(input.tenure_years * Decimal::from(n)).fract().is_zero() {
            warnings.push(format!(
                "Tenure of {} years is not a whole number of {:?} periods; \
                 the last partial period compounds fractionally",
                input.tenure_years, input.compounding
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        match input.compounding {
            Compounding::Simple => "Simple interest P(1 + rt)",
            _ => "Compound interest P(1 + r/n)^(nt)",
        },
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "tenure_years": input.tenure_years.to_string(),
            "compounding": input.compounding,
        }),
        warnings,
        elapsed,
        output,
    ))
}
