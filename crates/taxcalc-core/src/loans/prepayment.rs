use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::loans::emi::{compute_installment, InterestMethod, LoanTerms, MAX_TENURE_YEARS};
use crate::time_value;
use crate::types::{
    require_non_negative, require_positive, with_metadata, ComputationOutput, Money, Percent,
    Years,
};
use crate::TaxCalcResult;

/// The simulated loan is considered repaid once less than a rupee remains.
const RESIDUAL_BALANCE: Decimal = dec!(1);

// ---------------------------------------------------------------------------
// Yearly extra-installment benefit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentBenefitInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    /// Installment paid each month; defaults to the computed EMI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentBenefit {
    pub months_without_prepayment: u32,
    pub months_with_prepayment: u32,
    pub months_saved: u32,
    pub years_saved: Years,
    pub interest_without_prepayment: Money,
    pub interest_with_prepayment: Money,
    pub interest_saved: Money,
}

/// Effect of paying one extra installment at the end of every loan year.
///
/// Only meaningful for reducing-balance loans; flat-interest loans charge the
/// same interest regardless of early repayment, so every figure is zero.
pub fn prepayment_benefit(terms: &LoanTerms, installment: Money) -> TaxCalcResult<PrepaymentBenefit> {
    terms.validate()?;
    require_positive("installment", installment)?;

    if terms.method == InterestMethod::Fixed {
        return Ok(PrepaymentBenefit::default());
    }

    let rate = terms.monthly_rate();
    if installment <= terms.principal * rate {
        return Err(TaxCalcError::FinancialImpossibility(
            "Installment does not cover the first month's interest".into(),
        ));
    }

    let (months_normal, interest_normal) = simulate(terms, installment, false);
    let (months_prepaid, interest_prepaid) = simulate(terms, installment, true);

    let months_saved = months_normal.saturating_sub(months_prepaid);
    Ok(PrepaymentBenefit {
        months_without_prepayment: months_normal,
        months_with_prepayment: months_prepaid,
        months_saved,
        years_saved: Decimal::from(months_saved) / dec!(12),
        interest_without_prepayment: interest_normal,
        interest_with_prepayment: interest_prepaid,
        interest_saved: (interest_normal - interest_prepaid).max(Decimal::ZERO),
    })
}

fn simulate(terms: &LoanTerms, installment: Money, prepay_yearly: bool) -> (u32, Money) {
    let rate = terms.monthly_rate();
    let limit = terms.total_months();
    let mut balance = terms.principal;
    let mut months = 0u32;
    let mut total_interest = Decimal::ZERO;

    while balance > RESIDUAL_BALANCE && months < limit {
        let interest = balance * rate;
        balance -= installment - interest;
        total_interest += interest;
        months += 1;

        if prepay_yearly && months % 12 == 0 && balance > installment {
            balance -= installment;
        }
    }

    (months, total_interest)
}

pub fn calculate_prepayment_benefit(
    input: &PrepaymentBenefitInput,
) -> TaxCalcResult<ComputationOutput<PrepaymentBenefit>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let installment = match input.installment {
        Some(i) => i,
        None => compute_installment(&input.terms)?,
    };
    if input.terms.method == InterestMethod::Fixed {
        warnings.push("Flat-interest loans gain nothing from yearly prepayment".into());
    }

    let output = prepayment_benefit(&input.terms, installment)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Yearly extra-installment prepayment vs regular repayment",
        &serde_json::json!({
            "principal": input.terms.principal.to_string(),
            "annual_rate_pct": input.terms.annual_rate_pct.to_string(),
            "tenure_years": input.terms.tenure_years,
            "installment": installment.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Part prepayment of a running loan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepaymentStrategy {
    /// Keep the installment, finish sooner
    #[default]
    ReduceTenure,
    /// Keep the remaining tenure, pay less each month
    ReduceInstallment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingLoanInput {
    pub current_balance: Money,
    pub current_installment: Money,
    pub annual_rate_pct: Percent,
    pub remaining_months: u32,
    pub prepayment_amount: Money,
    #[serde(default)]
    pub strategy: PrepaymentStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRestructure {
    pub strategy: PrepaymentStrategy,
    pub new_balance: Money,
    pub new_installment: Money,
    pub new_months: u32,
    pub months_saved: u32,
    pub interest_saved: Money,
    pub loan_closed: bool,
}

fn validate_existing(input: &ExistingLoanInput) -> TaxCalcResult<()> {
    require_positive("current_balance", input.current_balance)?;
    require_positive("current_installment", input.current_installment)?;
    require_positive("prepayment_amount", input.prepayment_amount)?;
    require_non_negative("annual_rate_pct", input.annual_rate_pct)?;
    if input.annual_rate_pct > dec!(100) {
        return Err(TaxCalcError::invalid("annual_rate_pct", "Must be at most 100"));
    }
    if input.remaining_months == 0 || input.remaining_months > MAX_TENURE_YEARS * 12 {
        return Err(TaxCalcError::invalid(
            "remaining_months",
            format!("Must be between 1 and {}", MAX_TENURE_YEARS * 12),
        ));
    }
    Ok(())
}

/// Re-plan a running loan after a lump-sum part prepayment.
pub fn restructure_after_prepayment(input: &ExistingLoanInput) -> TaxCalcResult<LoanRestructure> {
    validate_existing(input)?;

    let rate = time_value::monthly_rate(input.annual_rate_pct);
    let remaining = Decimal::from(input.remaining_months);
    let old_interest = input.current_installment * remaining - input.current_balance;
    let new_principal = input.current_balance - input.prepayment_amount;

    if new_principal <= Decimal::ZERO {
        return Ok(LoanRestructure {
            strategy: input.strategy,
            new_balance: Decimal::ZERO,
            new_installment: Decimal::ZERO,
            new_months: 0,
            months_saved: input.remaining_months,
            interest_saved: old_interest,
            loan_closed: true,
        });
    }

    match input.strategy {
        PrepaymentStrategy::ReduceTenure => {
            let periods = time_value::periods_to_repay(new_principal, input.current_installment, rate)
                .ok_or_else(|| {
                    TaxCalcError::FinancialImpossibility(
                        "Current installment does not cover the monthly interest".into(),
                    )
                })?;
            let new_months = periods
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u32()
                .unwrap_or(input.remaining_months);
            let new_interest = input.current_installment * periods - new_principal;

            Ok(LoanRestructure {
                strategy: input.strategy,
                new_balance: new_principal,
                new_installment: input.current_installment,
                new_months,
                months_saved: input.remaining_months.saturating_sub(new_months),
                interest_saved: old_interest - new_interest,
                loan_closed: false,
            })
        }
        PrepaymentStrategy::ReduceInstallment => {
            let new_installment =
                time_value::installment(new_principal, rate, input.remaining_months)?;
            let new_interest = new_installment * remaining - new_principal;

            Ok(LoanRestructure {
                strategy: input.strategy,
                new_balance: new_principal,
                new_installment,
                new_months: input.remaining_months,
                months_saved: 0,
                interest_saved: old_interest - new_interest,
                loan_closed: false,
            })
        }
    }
}

pub fn calculate_loan_restructure(
    input: &ExistingLoanInput,
) -> TaxCalcResult<ComputationOutput<LoanRestructure>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = restructure_after_prepayment(input)?;
    if output.loan_closed {
        warnings.push("Prepayment clears the outstanding balance; the loan closes".into());
    } else if output.interest_saved < Decimal::ZERO {
        warnings.push(
            "Current installment and balance are inconsistent with the remaining tenure; \
             interest saved is negative"
                .into(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Part prepayment of an existing reducing-balance loan",
        &serde_json::json!({
            "current_balance": input.current_balance.to_string(),
            "current_installment": input.current_installment.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "remaining_months": input.remaining_months,
            "prepayment_amount": input.prepayment_amount.to_string(),
            "strategy": input.strategy,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn home_loan() -> LoanTerms {
        LoanTerms {
            principal: dec!(1000000),
            annual_rate_pct: dec!(9),
            tenure_years: 10,
            method: InterestMethod::ReducingBalance,
        }
    }

    #[test]
    fn test_prepayment_benefit_saves_time_and_interest() {
        let terms = home_loan();
        let emi = compute_installment(&terms).unwrap();
        let benefit = prepayment_benefit(&terms, emi).unwrap();

        assert!(benefit.months_without_prepayment >= 119);
        assert!(benefit.months_saved > 0);
        assert!(benefit.interest_saved > Decimal::ZERO);
        assert_eq!(
            benefit.years_saved,
            Decimal::from(benefit.months_saved) / dec!(12)
        );
    }

    #[test]
    fn test_prepayment_benefit_fixed_is_zero() {
        let mut terms = home_loan();
        terms.method = InterestMethod::Fixed;
        let benefit = prepayment_benefit(&terms, dec!(15833)).unwrap();
        assert_eq!(benefit, PrepaymentBenefit::default());
    }

    fn running_loan(strategy: PrepaymentStrategy) -> ExistingLoanInput {
        ExistingLoanInput {
            current_balance: dec!(1000000),
            current_installment: dec!(12667.58),
            annual_rate_pct: dec!(9),
            remaining_months: 120,
            prepayment_amount: dec!(200000),
            strategy,
        }
    }

    #[test]
    fn test_reduce_tenure() {
        let out = restructure_after_prepayment(&running_loan(PrepaymentStrategy::ReduceTenure))
            .unwrap();
        assert_eq!(out.new_installment, dec!(12667.58));
        assert!(out.new_months < 120);
        assert_eq!(out.months_saved, 120 - out.new_months);
        assert!(out.interest_saved > Decimal::ZERO);
    }

    #[test]
    fn test_reduce_installment() {
        let out =
            restructure_after_prepayment(&running_loan(PrepaymentStrategy::ReduceInstallment))
                .unwrap();
        assert_eq!(out.new_months, 120);
        // 8 lakh over the same 120 months is 80% of the original EMI
        assert!((out.new_installment - dec!(10134.06)).abs() < dec!(0.01));
        assert!(out.interest_saved > Decimal::ZERO);
    }

    #[test]
    fn test_full_prepayment_closes_loan() {
        let mut input = running_loan(PrepaymentStrategy::ReduceTenure);
        input.prepayment_amount = dec!(1000000);
        let out = restructure_after_prepayment(&input).unwrap();
        assert!(out.loan_closed);
        assert_eq!(out.new_months, 0);
        assert_eq!(out.months_saved, 120);
    }

    #[test]
    fn test_interest_only_installment_rejected() {
        let mut input = running_loan(PrepaymentStrategy::ReduceTenure);
        input.current_installment = dec!(5000);
        assert!(restructure_after_prepayment(&input).is_err());
    }
}
