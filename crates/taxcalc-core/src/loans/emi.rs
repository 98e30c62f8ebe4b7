use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::time_value;
use crate::types::{require_positive, with_metadata, ComputationOutput, Money, Percent, Rate, Years};
use crate::TaxCalcResult;

/// Longest loan the engine will amortize.
pub const MAX_TENURE_YEARS: u32 = 50;

/// Suggestions outside these open ranges are reported as unavailable.
const MAX_SUGGESTED_TENURE_YEARS: Decimal = dec!(50);
const MAX_SUGGESTED_PRINCIPAL: Decimal = dec!(100000000);
const MAX_SUGGESTED_RATE_PCT: Decimal = dec!(30);

/// Bisection bracket for the rate solve, in percent per annum.
const RATE_SEARCH_LOW_PCT: Decimal = dec!(0.1);
const RATE_SEARCH_HIGH_PCT: Decimal = dec!(30);
const MAX_BISECTION_ITERATIONS: u32 = 50;
/// A trial installment within one rupee of the target counts as converged.
const INSTALLMENT_TOLERANCE: Decimal = dec!(1);

/// A desired installment this close to the computed one replaces it.
const DESIRED_INSTALLMENT_SNAP: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestMethod {
    /// Flat (add-on) interest: interest is charged on the original principal
    /// for every month of the tenure.
    Fixed,
    /// Interest on the outstanding balance, standard annuity installment.
    #[default]
    ReducingBalance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual interest rate in percent (9.0 = 9% p.a.)
    pub annual_rate_pct: Percent,
    pub tenure_years: u32,
    #[serde(default)]
    pub method: InterestMethod,
}

impl LoanTerms {
    pub fn validate(&self) -> TaxCalcResult<()> {
        require_positive("principal", self.principal)?;
        if self.annual_rate_pct < Decimal::ZERO || self.annual_rate_pct > dec!(100) {
            return Err(TaxCalcError::invalid(
                "annual_rate_pct",
                "Must be between 0 and 100",
            ));
        }
        if self.tenure_years == 0 || self.tenure_years > MAX_TENURE_YEARS {
            return Err(TaxCalcError::invalid(
                "tenure_years",
                format!("Must be between 1 and {MAX_TENURE_YEARS}"),
            ));
        }
        Ok(())
    }

    pub fn total_months(&self) -> u32 {
        self.tenure_years * 12
    }

    pub fn monthly_rate(&self) -> Rate {
        time_value::monthly_rate(self.annual_rate_pct)
    }
}

/// Outcome of solving for the interest rate that produces a target installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateSolve {
    /// Closed-form solution (flat-interest loans).
    Exact { annual_rate_pct: Percent },
    /// Bisection reached the one-rupee tolerance.
    Converged {
        annual_rate_pct: Percent,
        iterations: u32,
    },
    /// Iteration budget exhausted; the last midpoint is returned as an estimate.
    BestEffort {
        annual_rate_pct: Percent,
        iterations: u32,
        last_delta: Money,
    },
}

impl RateSolve {
    pub fn annual_rate_pct(&self) -> Percent {
        match self {
            RateSolve::Exact { annual_rate_pct }
            | RateSolve::Converged {
                annual_rate_pct, ..
            }
            | RateSolve::BestEffort {
                annual_rate_pct, ..
            } => *annual_rate_pct,
        }
    }

    pub fn is_converged(&self) -> bool {
        !matches!(self, RateSolve::BestEffort { .. })
    }

    /// Treat a best-effort estimate as a failure.
    pub fn require_converged(self) -> TaxCalcResult<Percent> {
        match self {
            RateSolve::BestEffort {
                iterations,
                last_delta,
                ..
            } => Err(TaxCalcError::ConvergenceFailure {
                function: "EMI rate bisection".into(),
                iterations,
                last_delta,
            }),
            other => Ok(other.annual_rate_pct()),
        }
    }
}

/// What each of the three loan levers would have to be for a target installment,
/// holding the other two at their current values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiSuggestions {
    pub target_installment: Money,
    pub tenure_years: Option<Years>,
    pub principal: Option<Money>,
    pub rate: Option<RateSolve>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    /// Installment the borrower would like to pay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_installment: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOutput {
    pub method: InterestMethod,
    pub computed_installment: Money,
    /// Installment used for totals: the desired one when it is close enough
    pub installment: Money,
    pub tenure_years: Years,
    pub total_payment: Money,
    pub total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<EmiSuggestions>,
}

// ---------------------------------------------------------------------------
// Forward calculation
// ---------------------------------------------------------------------------

/// Periodic installment for the given loan terms.
///
/// Fixed: (P + P*R*T/100) / (T*12).
/// Reducing balance: P*r*(1+r)^n / ((1+r)^n - 1) with r monthly and n in months.
pub fn compute_installment(terms: &LoanTerms) -> TaxCalcResult<Money> {
    terms.validate()?;
    installment_unchecked(
        terms.principal,
        terms.annual_rate_pct,
        terms.total_months(),
        terms.method,
    )
}

fn installment_unchecked(
    principal: Money,
    annual_rate_pct: Percent,
    months: u32,
    method: InterestMethod,
) -> TaxCalcResult<Money> {
    match method {
        InterestMethod::Fixed => {
            let years = Decimal::from(months) / dec!(12);
            let total_interest = principal * annual_rate_pct * years / dec!(100);
            Ok((principal + total_interest) / Decimal::from(months))
        }
        InterestMethod::ReducingBalance => {
            time_value::installment(principal, time_value::monthly_rate(annual_rate_pct), months)
        }
    }
}

// ---------------------------------------------------------------------------
// Inverse solves
// ---------------------------------------------------------------------------

/// Tenure in years at which `target` repays `principal`. `None` when no
/// feasible tenure exists inside (0, 50) years.
pub fn solve_tenure(
    principal: Money,
    annual_rate_pct: Percent,
    target: Money,
    method: InterestMethod,
) -> Option<Years> {
    let years = match method {
        InterestMethod::Fixed => {
            let denominator = target * dec!(12) - principal * annual_rate_pct / dec!(100);
            if denominator <= Decimal::ZERO {
                return None;
            }
            principal / denominator
        }
        InterestMethod::ReducingBalance => {
            let rate = time_value::monthly_rate(annual_rate_pct);
            time_value::periods_to_repay(principal, target, rate)? / dec!(12)
        }
    };

    (years > Decimal::ZERO && years < MAX_SUGGESTED_TENURE_YEARS).then_some(years)
}

/// Principal that `target` repays over `tenure_years`. `None` outside (0, 10 crore).
pub fn solve_principal(
    annual_rate_pct: Percent,
    tenure_years: u32,
    target: Money,
    method: InterestMethod,
) -> Option<Money> {
    let months = tenure_years * 12;
    let principal = match method {
        InterestMethod::Fixed => {
            let years = Decimal::from(tenure_years);
            target * Decimal::from(months) / (Decimal::ONE + annual_rate_pct * years / dec!(100))
        }
        InterestMethod::ReducingBalance => {
            time_value::present_value(target, time_value::monthly_rate(annual_rate_pct), months).ok()?
        }
    };

    (principal > Decimal::ZERO && principal < MAX_SUGGESTED_PRINCIPAL).then_some(principal)
}

/// Annual rate at which `principal` over `tenure_years` costs `target` a month.
///
/// Flat-interest loans invert in closed form. Reducing-balance loans are solved
/// by bisection over [0.1%, 30%]; the installment is monotonic in the rate so
/// each step halves the bracket. After the iteration budget the last midpoint
/// is returned as `RateSolve::BestEffort`.
pub fn solve_rate(
    principal: Money,
    tenure_years: u32,
    target: Money,
    method: InterestMethod,
) -> Option<RateSolve> {
    if principal <= Decimal::ZERO || tenure_years == 0 {
        return None;
    }

    let solve = match method {
        InterestMethod::Fixed => {
            let years = Decimal::from(tenure_years);
            let annual_rate_pct =
                (target * years * dec!(12) - principal) * dec!(100) / (principal * years);
            RateSolve::Exact { annual_rate_pct }
        }
        InterestMethod::ReducingBalance => {
            bisect_rate(principal, tenure_years * 12, target)?
        }
    };

    let rate = solve.annual_rate_pct();
    (rate > Decimal::ZERO && rate < MAX_SUGGESTED_RATE_PCT).then_some(solve)
}

fn bisect_rate(principal: Money, months: u32, target: Money) -> Option<RateSolve> {
    let mut low = RATE_SEARCH_LOW_PCT;
    let mut high = RATE_SEARCH_HIGH_PCT;
    let mut guess = (low + high) / dec!(2);
    let mut delta = Decimal::ZERO;

    for iteration in 1..=MAX_BISECTION_ITERATIONS {
        guess = (low + high) / dec!(2);
        let trial =
            time_value::installment(principal, time_value::monthly_rate(guess), months).ok()?;
        delta = trial - target;

        if delta.abs() < INSTALLMENT_TOLERANCE {
            tracing::debug!(rate_pct = %guess, iteration, "EMI rate bisection converged");
            return Some(RateSolve::Converged {
                annual_rate_pct: guess,
                iterations: iteration,
            });
        }

        if trial > target {
            high = guess;
        } else {
            low = guess;
        }
    }

    tracing::warn!(
        rate_pct = %guess,
        last_delta = %delta,
        "EMI rate bisection exhausted its iteration budget"
    );
    Some(RateSolve::BestEffort {
        annual_rate_pct: guess,
        iterations: MAX_BISECTION_ITERATIONS,
        last_delta: delta,
    })
}

/// Solve all three levers for a target installment against the current terms.
pub fn suggest(terms: &LoanTerms, target: Money) -> TaxCalcResult<EmiSuggestions> {
    terms.validate()?;
    require_positive("desired_installment", target)?;

    Ok(EmiSuggestions {
        target_installment: target,
        tenure_years: solve_tenure(terms.principal, terms.annual_rate_pct, target, terms.method),
        principal: solve_principal(terms.annual_rate_pct, terms.tenure_years, target, terms.method),
        rate: solve_rate(terms.principal, terms.tenure_years, target, terms.method),
    })
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

fn suggestion_warnings(terms: &LoanTerms, s: &EmiSuggestions, warnings: &mut Vec<String>) {
    if s.tenure_years.is_none() {
        warnings.push(format!(
            "No feasible tenure repays {} at an installment of {}",
            terms.principal, s.target_installment
        ));
    }
    if s.principal.is_none() {
        warnings.push("No principal in range matches the target installment".into());
    }
    match &s.rate {
        None => warnings.push("No rate between 0% and 30% matches the target installment".into()),
        Some(rate) if !rate.is_converged() => warnings.push(
            "Rate suggestion is a best-effort estimate: bisection did not reach \
             the one-rupee tolerance"
                .into(),
        ),
        Some(_) => {}
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiSolveInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    pub target_installment: Money,
}

/// Tenure, principal and rate that would each reach the target installment.
pub fn calculate_emi_solve(
    input: &EmiSolveInput,
) -> TaxCalcResult<ComputationOutput<EmiSuggestions>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let suggestions = suggest(&input.terms, input.target_installment)?;
    suggestion_warnings(&input.terms, &suggestions, &mut warnings);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Closed-form tenure and principal; bisection over 0.1%-30% for rate",
        &serde_json::json!({
            "principal": input.terms.principal.to_string(),
            "annual_rate_pct": input.terms.annual_rate_pct.to_string(),
            "tenure_years": input.terms.tenure_years,
            "max_bisection_iterations": MAX_BISECTION_ITERATIONS,
            "installment_tolerance": INSTALLMENT_TOLERANCE.to_string(),
        }),
        warnings,
        elapsed,
        suggestions,
    ))
}

/// EMI calculation with totals and, when a desired installment is given,
/// suggestions for reaching it.
///
/// A desired installment within ₹100 of the computed one is adopted as the
/// installment, and the tenure is stretched or shortened to match it.
pub fn calculate_emi(input: &EmiInput) -> TaxCalcResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let terms = &input.terms;

    let computed = compute_installment(terms)?;

    let suggestions = match input.desired_installment {
        Some(target) => Some(suggest(terms, target)?),
        None => None,
    };

    let mut installment = computed;
    let mut tenure_years = Decimal::from(terms.tenure_years);

    if let (Some(target), Some(s)) = (input.desired_installment, suggestions.as_ref()) {
        if (target - computed).abs() < DESIRED_INSTALLMENT_SNAP {
            installment = target;
            if let Some(t) = s.tenure_years {
                tenure_years = t;
            }
        }
        suggestion_warnings(terms, s, &mut warnings);
    }

    let total_payment = (installment * tenure_years * dec!(12))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let total_interest = (total_payment - terms.principal)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let output = EmiOutput {
        method: terms.method,
        computed_installment: computed,
        installment,
        tenure_years,
        total_payment,
        total_interest,
        suggestions,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        match terms.method {
            InterestMethod::Fixed => "EMI (flat interest on original principal)",
            InterestMethod::ReducingBalance => "EMI (reducing balance annuity)",
        },
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "annual_rate_pct": terms.annual_rate_pct.to_string(),
            "tenure_years": terms.tenure_years,
            "desired_installment": input.desired_installment.map(|d| d.to_string()),
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

    fn home_loan(method: InterestMethod) -> LoanTerms {
        LoanTerms {
            principal: dec!(1000000),
            annual_rate_pct: dec!(9),
            tenure_years: 10,
            method,
        }
    }

    #[test]
    fn test_reducing_balance_installment() {
        let emi = compute_installment(&home_loan(InterestMethod::ReducingBalance)).unwrap();
        assert!((emi - dec!(12667.58)).abs() < dec!(0.01), "got {emi}");
    }

    #[test]
    fn test_fixed_installment() {
        // (10,00,000 + 9,00,000) / 120
        let emi = compute_installment(&home_loan(InterestMethod::Fixed)).unwrap();
        assert!((emi - dec!(15833.3333)).abs() < dec!(0.001), "got {emi}");
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let mut terms = home_loan(InterestMethod::ReducingBalance);
        terms.principal = Decimal::ZERO;
        assert!(compute_installment(&terms).is_err());

        let mut terms = home_loan(InterestMethod::ReducingBalance);
        terms.tenure_years = 0;
        assert!(compute_installment(&terms).is_err());

        let mut terms = home_loan(InterestMethod::ReducingBalance);
        terms.annual_rate_pct = dec!(-1);
        assert!(compute_installment(&terms).is_err());
    }

    #[test]
    fn test_zero_rate_reducing_balance() {
        let mut terms = home_loan(InterestMethod::ReducingBalance);
        terms.annual_rate_pct = Decimal::ZERO;
        let emi = compute_installment(&terms).unwrap();
        assert!((emi - dec!(8333.3333)).abs() < dec!(0.001));
    }

    #[test]
    fn test_solve_rate_converges() {
        let solve = solve_rate(dec!(1000000), 10, dec!(12668), InterestMethod::ReducingBalance)
            .unwrap();
        assert!(solve.is_converged());
        assert!((solve.annual_rate_pct() - dec!(9)).abs() < dec!(0.01));
    }

    #[test]
    fn test_solve_rate_fixed_closed_form() {
        // Flat 9%: 15,833.33/month over 10 years
        let solve = solve_rate(dec!(1000000), 10, dec!(15833.3333333333), InterestMethod::Fixed)
            .unwrap();
        assert!(matches!(solve, RateSolve::Exact { .. }));
        assert!((solve.annual_rate_pct() - dec!(9)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_solve_rate_below_bracket_is_best_effort() {
        // Below the zero-interest installment: bisection walks to the floor of the bracket
        let solve = solve_rate(dec!(1000000), 10, dec!(5000), InterestMethod::ReducingBalance)
            .unwrap();
        assert!(!solve.is_converged());
        assert!(solve.annual_rate_pct() < dec!(0.11));
        assert!(solve.require_converged().is_err());
    }

    #[test]
    fn test_solve_tenure_infeasible() {
        assert!(solve_tenure(dec!(1000000), dec!(9), dec!(7000), InterestMethod::ReducingBalance)
            .is_none());
        assert!(solve_tenure(dec!(1000000), dec!(9), dec!(7000), InterestMethod::Fixed).is_none());
    }

    #[test]
    fn test_solve_principal_out_of_range() {
        assert!(
            solve_principal(dec!(9), 30, dec!(10000000), InterestMethod::ReducingBalance)
                .is_none()
        );
    }

    #[test]
    fn test_calculate_emi_snaps_desired_installment() {
        let input = EmiInput {
            terms: home_loan(InterestMethod::ReducingBalance),
            desired_installment: Some(dec!(12700)),
        };
        let out = calculate_emi(&input).unwrap();
        assert_eq!(out.result.installment, dec!(12700));
        assert!(out.result.tenure_years < dec!(10));
        assert!(out.result.suggestions.is_some());
    }

    #[test]
    fn test_calculate_emi_far_desired_installment_keeps_computed() {
        let input = EmiInput {
            terms: home_loan(InterestMethod::ReducingBalance),
            desired_installment: Some(dec!(20000)),
        };
        let out = calculate_emi(&input).unwrap();
        assert_eq!(out.result.installment, out.result.computed_installment);
        assert_eq!(out.result.tenure_years, dec!(10));
        let s = out.result.suggestions.unwrap();
        assert!(s.tenure_years.unwrap() < dec!(10));
        assert!(s.principal.unwrap() > dec!(1000000));
    }
}
