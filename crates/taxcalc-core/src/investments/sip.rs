use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::investments::{require_pct, require_years};
use crate::time_value;
use crate::types::{require_positive, with_metadata, ComputationOutput, Money, Percent};
use crate::TaxCalcResult;

const MAX_RETURN_PCT: Percent = dec!(100);
const MAX_STEP_UP_PCT: Percent = dec!(100);

/// How the money goes in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InvestmentPlan {
    /// Level monthly investment at the start of each month
    Sip { monthly_investment: Money },
    /// One-time investment compounded annually
    Lumpsum { amount: Money },
    /// Monthly investment raised by `step_up_pct` at the start of every year
    StepUpSip {
        monthly_investment: Money,
        step_up_pct: Percent,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentInput {
    #[serde(flatten)]
    pub plan: InvestmentPlan,
    /// Expected return, percent per annum
    pub annual_return_pct: Percent,
    pub years: u32,
}

impl InvestmentInput {
    pub fn validate(&self) -> TaxCalcResult<()> {
        match &self.plan {
            InvestmentPlan::Sip { monthly_investment } => {
                require_positive("monthly_investment", *monthly_investment)?
            }
            InvestmentPlan::Lumpsum { amount } => require_positive("amount", *amount)?,
            InvestmentPlan::StepUpSip {
                monthly_investment,
                step_up_pct,
            } => {
                require_positive("monthly_investment", *monthly_investment)?;
                require_pct("step_up_pct", *step_up_pct, MAX_STEP_UP_PCT)?;
            }
        }
        require_pct("annual_return_pct", self.annual_return_pct, MAX_RETURN_PCT)?;
        require_years("years", self.years)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentGrowth {
    pub invested: Money,
    pub returns: Money,
    pub future_value: Money,
}

impl InvestmentGrowth {
    fn new(invested: Money, future_value: Money) -> Self {
        InvestmentGrowth {
            invested: invested.round_dp(2),
            returns: (future_value - invested).round_dp(2),
            future_value: future_value.round_dp(2),
        }
    }
}

/// M * ((1+r)^n - 1) / r * (1+r) with r monthly and n in months.
pub fn sip_future_value(
    monthly_investment: Money,
    annual_return_pct: Percent,
    years: u32,
) -> TaxCalcResult<Money> {
    let rate = time_value::monthly_rate(annual_return_pct);
    let factor = time_value::annuity_due_factor(rate, years * 12)?;
    time_value::mul(monthly_investment, factor, "SIP future value")
}

/// Returns (future value, total invested). The monthly amount rises once a
/// year and each month's balance compounds at the monthly rate.
pub fn step_up_future_value(
    monthly_investment: Money,
    step_up_pct: Percent,
    annual_return_pct: Percent,
    years: u32,
) -> TaxCalcResult<(Money, Money)> {
    let growth = Decimal::ONE + time_value::monthly_rate(annual_return_pct);
    let step = Decimal::ONE + step_up_pct / dec!(100);

    let mut monthly = monthly_investment;
    let mut total = Decimal::ZERO;
    let mut invested = Decimal::ZERO;
    for year in 0..years {
        if year > 0 {
            monthly = time_value::mul(monthly, step, "stepped-up installment")?;
        }
        for _ in 0..12 {
            let deposited = time_value::add(total, monthly, "step-up SIP balance")?;
            total = time_value::mul(deposited, growth, "step-up SIP balance")?;
            invested = time_value::add(invested, monthly, "step-up SIP contributions")?;
        }
    }
    Ok((total, invested))
}

/// Project an investment plan to the end of its horizon.
pub fn project(input: &InvestmentInput) -> TaxCalcResult<InvestmentGrowth> {
    input.validate()?;

    let growth = match &input.plan {
        InvestmentPlan::Sip { monthly_investment } => {
            let fv = sip_future_value(*monthly_investment, input.annual_return_pct, input.years)?;
            let invested = *monthly_investment * Decimal::from(input.years * 12);
            InvestmentGrowth::new(invested, fv)
        }
        InvestmentPlan::Lumpsum { amount } => {
            let fv = time_value::lump_sum_future_value(
                *amount,
                input.annual_return_pct / dec!(100),
                input.years,
            )?;
            InvestmentGrowth::new(*amount, fv)
        }
        InvestmentPlan::StepUpSip {
            monthly_investment,
            step_up_pct,
        } => {
            let (fv, invested) = step_up_future_value(
                *monthly_investment,
                *step_up_pct,
                input.annual_return_pct,
                input.years,
            )?;
            InvestmentGrowth::new(invested, fv)
        }
    };
    Ok(growth)
}

pub fn calculate_investment_growth(
    input: &InvestmentInput,
) -> TaxCalcResult<ComputationOutput<InvestmentGrowth>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let growth = project(input)?;
    if input.annual_return_pct.is_zero() {
        warnings.push("Zero expected return; future value equals the amount invested".into());
    }

    let methodology = match input.plan {
        InvestmentPlan::Sip { .. } => "SIP future value, monthly compounding, start-of-month",
        InvestmentPlan::Lumpsum { .. } => "Lump sum compounded annually",
        InvestmentPlan::StepUpSip { .. } => {
            "Step-up SIP, yearly increase in the monthly amount, monthly compounding"
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "plan": input.plan,
            "annual_return_pct": input.annual_return_pct.to_string(),
            "years": input.years,
        }),
        warnings,
        elapsed,
        growth,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sip(monthly: Money, years: u32) -> InvestmentInput {
        InvestmentInput {
            plan: InvestmentPlan::Sip {
                monthly_investment: monthly,
            },
            annual_return_pct: dec!(12),
            years,
        }
    }

    #[test]
    fn test_sip_ten_years_at_twelve_percent() {
        let g = project(&sip(dec!(5000), 10)).unwrap();
        assert_eq!(g.invested, dec!(600000));
        assert!((g.future_value - dec!(1161695.38)).abs() <= dec!(0.01), "got {}", g.future_value);
        assert_eq!(g.returns, g.future_value - g.invested);
    }

    #[test]
    fn test_lumpsum_compounds_yearly() {
        let g = project(&InvestmentInput {
            plan: InvestmentPlan::Lumpsum {
                amount: dec!(100000),
            },
            annual_return_pct: dec!(12),
            years: 10,
        })
        .unwrap();
        assert_eq!(g.future_value, dec!(310584.82));
        assert_eq!(g.invested, dec!(100000));
    }

    #[test]
    fn test_zero_step_up_matches_plain_sip() {
        let (fv, invested) = step_up_future_value(dec!(5000), Decimal::ZERO, dec!(12), 10).unwrap();
        let plain = sip_future_value(dec!(5000), dec!(12), 10).unwrap();
        assert!((fv - plain).abs() < dec!(0.01));
        assert_eq!(invested, dec!(600000));
    }

    #[test]
    fn test_step_up_raises_second_year() {
        let (_, invested) = step_up_future_value(dec!(5000), dec!(10), dec!(12), 2).unwrap();
        assert_eq!(invested, dec!(126000));
    }

    #[test]
    fn test_zero_return_warns() {
        let mut input = sip(dec!(1000), 1);
        input.annual_return_pct = Decimal::ZERO;
        let out = calculate_investment_growth(&input).unwrap();
        assert_eq!(out.result.future_value, dec!(12000));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_invalid_plans_rejected() {
        assert!(project(&sip(Decimal::ZERO, 10)).is_err());
        assert!(project(&sip(dec!(5000), 0)).is_err());
        let mut input = sip(dec!(5000), 10);
        input.plan = InvestmentPlan::StepUpSip {
            monthly_investment: dec!(5000),
            step_up_pct: dec!(-5),
        };
        assert!(project(&input).is_err());
    }

    #[test]
    fn test_plan_mode_tag() {
        let input: InvestmentInput = serde_json::from_str(
            r#"{"mode":"step_up_sip","monthly_investment":"5000","step_up_pct":"10",
                "annual_return_pct":"12","years":5}"#,
        )
        .unwrap();
        assert!(matches!(input.plan, InvestmentPlan::StepUpSip { .. }));
    }
}
