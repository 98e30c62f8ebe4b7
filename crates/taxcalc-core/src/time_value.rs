use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::TaxCalcError;
use crate::types::{Money, Percent, Rate};
use crate::TaxCalcResult;

/// Monthly periodic rate from an annual percentage (9.0 -> 0.0075)
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    annual_rate_pct / dec!(12) / dec!(100)
}

fn overflow(context: &str) -> TaxCalcError {
    TaxCalcError::FinancialImpossibility(format!("{context} exceeds the representable range"))
}

/// `a * b`, or `FinancialImpossibility` when the product overflows.
pub(crate) fn mul(a: Decimal, b: Decimal, context: &str) -> TaxCalcResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(context))
}

/// `a + b`, or `FinancialImpossibility` when the sum overflows.
pub(crate) fn add(a: Decimal, b: Decimal, context: &str) -> TaxCalcResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(context))
}

/// Compound growth factor (1 + r)^n over whole periods.
pub fn growth_factor(rate: Rate, periods: u32) -> TaxCalcResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(i64::from(periods))
        .ok_or_else(|| {
            TaxCalcError::FinancialImpossibility(format!(
                "Growth factor overflows at rate {rate} over {periods} periods"
            ))
        })
}

/// Compound growth factor (1 + r)^t for a fractional number of periods.
pub fn growth_factor_frac(rate: Rate, periods: Decimal) -> TaxCalcResult<Decimal> {
    (Decimal::ONE + rate).checked_powd(periods).ok_or_else(|| {
        TaxCalcError::FinancialImpossibility(format!(
            "Growth factor overflows at rate {rate} over {periods} periods"
        ))
    })
}

/// Level installment that repays `principal` over `periods` at periodic `rate`.
///
/// P * r * (1+r)^n / ((1+r)^n - 1), falling back to P / n at a zero rate.
/// The ratio is formed before scaling by P so large loans stay in range.
pub fn installment(principal: Money, rate: Rate, periods: u32) -> TaxCalcResult<Money> {
    if periods == 0 {
        return Err(TaxCalcError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let factor = growth_factor(rate, periods)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(TaxCalcError::DivisionByZero {
            context: "installment annuity factor".into(),
        });
    }

    let per_rupee = mul(rate, factor / denominator, "installment annuity factor")?;
    mul(principal, per_rupee, "installment")
}

/// Principal that a level `payment` repays over `periods` at periodic `rate`.
pub fn present_value(payment: Money, rate: Rate, periods: u32) -> TaxCalcResult<Money> {
    if rate.is_zero() {
        return mul(payment, Decimal::from(periods), "present value");
    }

    let factor = growth_factor(rate, periods)?;
    let denominator = mul(rate, factor, "present value discount factor")?;
    if denominator.is_zero() {
        return Err(TaxCalcError::DivisionByZero {
            context: "present value discount factor".into(),
        });
    }

    mul(payment, (factor - Decimal::ONE) / denominator, "present value")
}

/// Future value of a lump sum compounded over whole periods.
pub fn lump_sum_future_value(amount: Money, rate: Rate, periods: u32) -> TaxCalcResult<Money> {
    mul(amount, growth_factor(rate, periods)?, "lump sum future value")
}

/// Future value per rupee of a level payment made at the start of each period
/// (annuity due): ((1+r)^n - 1) / r * (1+r), or n at a zero rate.
pub fn annuity_due_factor(rate: Rate, periods: u32) -> TaxCalcResult<Decimal> {
    if rate.is_zero() {
        return Ok(Decimal::from(periods));
    }
    let factor = growth_factor(rate, periods)?;
    mul(
        (factor - Decimal::ONE) / rate,
        Decimal::ONE + rate,
        "annuity due factor",
    )
}

/// Number of periods (possibly fractional) for `payment` to repay `principal`.
///
/// n = ln(E / (E - P*r)) / ln(1 + r). Returns `None` when the payment does not
/// cover the first period's interest, in which case the loan never amortizes.
pub fn periods_to_repay(principal: Money, payment: Money, rate: Rate) -> Option<Decimal> {
    if payment <= Decimal::ZERO || principal <= Decimal::ZERO {
        return None;
    }

    if rate.is_zero() {
        return Some(principal / payment);
    }

    let first_interest = principal.checked_mul(rate)?;
    if payment <= first_interest {
        return None;
    }

    let ratio = payment / (payment - first_interest);
    let log_growth = (Decimal::ONE + rate).ln();
    if log_growth <= Decimal::ZERO {
        return None;
    }

    Some(ratio.ln() / log_growth)
}
