use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::loans::emi::{compute_installment, InterestMethod, LoanTerms};
use crate::types::{require_positive, with_metadata, ComputationOutput, Money};
use crate::TaxCalcResult;

/// A closing balance below one paisa is treated as settled.
const SETTLEMENT_TOLERANCE: Decimal = dec!(0.01);

/// One month of a repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub opening_balance: Money,
    pub installment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// Lump sum paid on top of the installment (every 12th month when enabled)
    pub prepayment: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub months: u32,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_prepayment: Money,
    pub total_paid: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    /// Installment actually paid; defaults to the computed EMI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment: Option<Money>,
    #[serde(default)]
    pub show_prepayment: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub installment: Money,
    pub summary: ScheduleSummary,
    pub rows: Vec<AmortizationRow>,
}

/// Month-by-month repayment schedule.
///
/// Fixed method: constant principal P/n and constant interest on the original
/// principal; `actual_installment` is not used. Reducing balance: interest on
/// the outstanding balance, principal is the installment less interest, clipped
/// to the balance. With `show_prepayment`, one extra installment is paid at
/// every 12th month while the balance exceeds it.
///
/// The schedule ends when the balance reaches zero or after tenure × 12 rows.
pub fn generate_schedule(
    terms: &LoanTerms,
    actual_installment: Money,
    show_prepayment: bool,
) -> TaxCalcResult<Vec<AmortizationRow>> {
    terms.validate()?;

    match terms.method {
        InterestMethod::Fixed => Ok(fixed_schedule(terms)),
        InterestMethod::ReducingBalance => {
            require_positive("installment", actual_installment)?;
            let first_interest = terms.principal * terms.monthly_rate();
            if actual_installment <= first_interest {
                return Err(TaxCalcError::FinancialImpossibility(format!(
                    "Installment {actual_installment} does not cover the first month's \
                     interest of {first_interest}"
                )));
            }
            Ok(reducing_schedule(terms, actual_installment, show_prepayment))
        }
    }
}

fn fixed_schedule(terms: &LoanTerms) -> Vec<AmortizationRow> {
    let months = terms.total_months();
    let monthly_principal = terms.principal / Decimal::from(months);
    let monthly_interest = terms.principal * terms.annual_rate_pct / dec!(100) / dec!(12);
    let installment = monthly_principal + monthly_interest;

    let mut rows = Vec::with_capacity(months as usize);
    let mut balance = terms.principal;

    for month in 1..=months {
        if balance <= Decimal::ZERO {
            break;
        }
        let opening = balance;
        let mut principal_part = monthly_principal.min(balance);
        balance -= principal_part;
        if balance < SETTLEMENT_TOLERANCE {
            principal_part += balance;
            balance = Decimal::ZERO;
        }

        rows.push(AmortizationRow {
            month,
            opening_balance: opening,
            installment,
            principal_component: principal_part,
            interest_component: monthly_interest,
            prepayment: Decimal::ZERO,
            closing_balance: balance.max(Decimal::ZERO),
        });
    }

    rows
}

fn reducing_schedule(
    terms: &LoanTerms,
    installment: Money,
    show_prepayment: bool,
) -> Vec<AmortizationRow> {
    let months = terms.total_months();
    let rate = terms.monthly_rate();

    let mut rows = Vec::with_capacity(months as usize);
    let mut balance = terms.principal;

    for month in 1..=months {
        if balance <= Decimal::ZERO {
            break;
        }
        let opening = balance;
        let interest = balance * rate;
        let mut principal_part = (installment - interest).min(balance);
        balance -= principal_part;
        if balance < SETTLEMENT_TOLERANCE {
            principal_part += balance;
            balance = Decimal::ZERO;
        }

        let mut prepayment = Decimal::ZERO;
        if show_prepayment && month % 12 == 0 && balance > installment {
            prepayment = installment;
            balance -= prepayment;
        }

        rows.push(AmortizationRow {
            month,
            opening_balance: opening,
            installment,
            principal_component: principal_part,
            interest_component: interest,
            prepayment,
            closing_balance: balance.max(Decimal::ZERO),
        });
    }

    rows
}

/// Totals over a schedule.
pub fn summarize(rows: &[AmortizationRow]) -> ScheduleSummary {
    let total_principal: Money = rows.iter().map(|r| r.principal_component).sum();
    let total_interest: Money = rows.iter().map(|r| r.interest_component).sum();
    let total_prepayment: Money = rows.iter().map(|r| r.prepayment).sum();

    ScheduleSummary {
        months: rows.len() as u32,
        total_principal,
        total_interest,
        total_prepayment,
        total_paid: total_principal + total_interest + total_prepayment,
        closing_balance: rows
            .last()
            .map(|r| r.closing_balance)
            .unwrap_or(Decimal::ZERO),
    }
}

/// Full amortization schedule with totals.
pub fn build_schedule(input: &ScheduleInput) -> TaxCalcResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let computed = compute_installment(&input.terms)?;
    let installment = input.installment.unwrap_or(computed);

    if input.terms.method == InterestMethod::Fixed {
        if input.installment.is_some() {
            warnings.push(
                "Flat-interest schedules use the constant principal plus interest; \
                 the supplied installment is ignored"
                    .into(),
            );
        }
        if input.show_prepayment {
            warnings.push("Yearly prepayment applies to reducing-balance loans only".into());
        }
    }

    let rows = generate_schedule(&input.terms, installment, input.show_prepayment)?;
    let summary = summarize(&rows);

    if summary.closing_balance > Decimal::ZERO {
        warnings.push(format!(
            "Balance of {} remains after {} months: the installment is below the \
             amortizing EMI of {}",
            summary.closing_balance, summary.months, computed
        ));
    }

    let output = ScheduleOutput {
        installment: rows.first().map(|r| r.installment).unwrap_or(installment),
        summary,
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortization schedule (monthly rests)",
        &serde_json::json!({
            "principal": input.terms.principal.to_string(),
            "annual_rate_pct": input.terms.annual_rate_pct.to_string(),
            "tenure_years": input.terms.tenure_years,
            "method": input.terms.method,
            "show_prepayment": input.show_prepayment,
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
    use rust_decimal_macros::dec;

    fn terms(method: InterestMethod) -> LoanTerms {
        LoanTerms {
            principal: dec!(1000000),
            annual_rate_pct: dec!(9),
            tenure_years: 10,
            method,
        }
    }

    #[test]
    fn test_reducing_schedule_conserves_principal() {
        let t = terms(InterestMethod::ReducingBalance);
        let emi = compute_installment(&t).unwrap();
        let rows = generate_schedule(&t, emi, false).unwrap();

        assert_eq!(rows.len(), 120);
        let summary = summarize(&rows);
        assert!((summary.total_principal - dec!(1000000)).abs() < dec!(0.01));
        assert_eq!(summary.closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_first_row_interest() {
        let t = terms(InterestMethod::ReducingBalance);
        let emi = compute_installment(&t).unwrap();
        let rows = generate_schedule(&t, emi, false).unwrap();
        assert_eq!(rows[0].interest_component, dec!(7500));
        assert_eq!(rows[0].opening_balance, dec!(1000000));
    }

    #[test]
    fn test_rows_chain_balances() {
        let t = terms(InterestMethod::ReducingBalance);
        let emi = compute_installment(&t).unwrap();
        let rows = generate_schedule(&t, emi, true).unwrap();
        for pair in rows.windows(2) {
            assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        }
    }

    #[test]
    fn test_prepayment_shortens_schedule() {
        let t = terms(InterestMethod::ReducingBalance);
        let emi = compute_installment(&t).unwrap();
        let rows = generate_schedule(&t, emi, true).unwrap();

        assert!(rows.len() < 120, "expected early closure, got {}", rows.len());
        assert_eq!(rows[11].prepayment, emi);
        assert_eq!(rows[10].prepayment, Decimal::ZERO);
        assert_eq!(rows.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_fixed_schedule_flat_interest() {
        let t = terms(InterestMethod::Fixed);
        let rows = generate_schedule(&t, Decimal::ZERO, false).unwrap();

        assert_eq!(rows.len(), 120);
        // Interest never declines under the flat method
        assert_eq!(rows[0].interest_component, dec!(7500));
        assert_eq!(rows[119].interest_component, dec!(7500));
        let summary = summarize(&rows);
        assert!((summary.total_principal - dec!(1000000)).abs() < dec!(0.000001));
        assert_eq!(summary.total_interest, dec!(900000));
        assert_eq!(summary.closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_installment_below_interest_rejected() {
        let t = terms(InterestMethod::ReducingBalance);
        assert!(generate_schedule(&t, dec!(7500), false).is_err());
    }

    #[test]
    fn test_build_schedule_warns_on_underpayment() {
        let input = ScheduleInput {
            terms: terms(InterestMethod::ReducingBalance),
            installment: Some(dec!(10000)),
            show_prepayment: false,
        };
        let out = build_schedule(&input).unwrap();
        assert_eq!(out.result.rows.len(), 120);
        assert!(out.result.summary.closing_balance > Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }
}
