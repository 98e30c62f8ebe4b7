use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::types::{require_non_negative, with_metadata, ComputationOutput, Money, Percent};
use crate::TaxCalcResult;

/// Six areas scored 1 to 5.
pub const MAX_SCORE: u8 = 30;

/// Investment products currently held.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Holdings {
    #[serde(default)]
    pub fixed_deposits: bool,
    #[serde(default)]
    pub mutual_funds: bool,
    #[serde(default)]
    pub shares: bool,
    #[serde(default)]
    pub provident_fund: bool,
    #[serde(default)]
    pub ppf: bool,
    #[serde(default)]
    pub others: bool,
}

impl Holdings {
    pub fn count(&self) -> usize {
        [
            self.fixed_deposits,
            self.mutual_funds,
            self.shares,
            self.provident_fund,
            self.ppf,
            self.others,
        ]
        .iter()
        .filter(|held| **held)
        .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthInput {
    pub monthly_income: Money,
    pub monthly_expenses: Money,
    pub emergency_fund: Money,
    #[serde(default)]
    pub monthly_emis: Money,
    /// Self-assessed, 1 (volatile) to 5 (very stable)
    pub income_stability: u8,
    #[serde(default)]
    pub holdings: Holdings,
    #[serde(default)]
    pub regular_investments: bool,
    #[serde(default)]
    pub health_insurance: bool,
    #[serde(default)]
    pub life_insurance: bool,
}

impl HealthInput {
    pub fn validate(&self) -> TaxCalcResult<()> {
        require_non_negative("monthly_income", self.monthly_income)?;
        require_non_negative("monthly_expenses", self.monthly_expenses)?;
        require_non_negative("emergency_fund", self.emergency_fund)?;
        require_non_negative("monthly_emis", self.monthly_emis)?;
        if !(1..=5).contains(&self.income_stability) {
            return Err(TaxCalcError::invalid("income_stability", "Must be between 1 and 5"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScores {
    pub income_stability: u8,
    pub expense_management: u8,
    pub emergency_fund: u8,
    pub debt_management: u8,
    pub investments: u8,
    pub insurance: u8,
}

impl HealthScores {
    pub fn total(&self) -> u8 {
        self.income_stability
            + self.expense_management
            + self.emergency_fund
            + self.debt_management
            + self.investments
            + self.insurance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Average,
    NeedsAttention,
}

impl HealthStatus {
    pub fn from_total(total: u8) -> Self {
        match total {
            26.. => HealthStatus::Excellent,
            21..=25 => HealthStatus::Good,
            15..=20 => HealthStatus::Average,
            _ => HealthStatus::NeedsAttention,
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            HealthStatus::Excellent => "Excellent Financial Health",
            HealthStatus::Good => "Good, scope for optimization",
            HealthStatus::Average => "Average, needs improvement",
            HealthStatus::NeedsAttention => "Financial stress zone",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub scores: HealthScores,
    pub total_score: u8,
    pub max_score: u8,
    pub status: HealthStatus,
    pub interpretation: String,
    pub savings_ratio_pct: Percent,
    pub emergency_cover_months: Decimal,
    pub debt_ratio_pct: Percent,
}

/// Higher is better: first threshold met from the top scores 5.
fn score_at_least(value: Decimal, thresholds: [Decimal; 4]) -> u8 {
    let met = thresholds.iter().take_while(|t| value < **t).count();
    5 - met as u8
}

/// Lower is better: first ceiling met from the top scores 5.
fn score_at_most(value: Decimal, ceilings: [Decimal; 4]) -> u8 {
    let missed = ceilings.iter().take_while(|c| value > **c).count();
    5 - missed as u8
}

/// Score six areas of household finances.
///
/// Ratios against a zero income or zero expenses count as zero.
pub fn assess(input: &HealthInput) -> TaxCalcResult<HealthReport> {
    input.validate()?;

    let ratio = |num: Money, den: Money, scale: Decimal| -> TaxCalcResult<Decimal> {
        if den.is_zero() {
            return Ok(Decimal::ZERO);
        }
        num.checked_div(den)
            .and_then(|r| r.checked_mul(scale))
            .ok_or_else(|| {
                TaxCalcError::FinancialImpossibility(format!(
                    "Ratio of {num} to {den} is out of range"
                ))
            })
    };
    let savings_ratio_pct = ratio(
        input.monthly_income - input.monthly_expenses,
        input.monthly_income,
        dec!(100),
    )?;
    let emergency_cover_months =
        ratio(input.emergency_fund, input.monthly_expenses, Decimal::ONE)?;
    let debt_ratio_pct = ratio(input.monthly_emis, input.monthly_income, dec!(100))?;

    let held = input.holdings.count();
    let investments = match (held, input.regular_investments) {
        (3.., true) => 5,
        (2, true) => 4,
        (1.., _) => 3,
        (0, _) => 1,
    };
    let insurance = match (input.health_insurance, input.life_insurance) {
        (true, true) => 5,
        (true, false) | (false, true) => 3,
        (false, false) => 1,
    };

    let scores = HealthScores {
        income_stability: input.income_stability,
        expense_management: score_at_least(
            savings_ratio_pct,
            [dec!(30), dec!(20), dec!(10), dec!(1)],
        ),
        emergency_fund: score_at_least(emergency_cover_months, [dec!(6), dec!(4), dec!(3), dec!(1)]),
        debt_management: score_at_most(debt_ratio_pct, [dec!(20), dec!(30), dec!(40), dec!(50)]),
        investments,
        insurance,
    };
    let total_score = scores.total();
    let status = HealthStatus::from_total(total_score);

    Ok(HealthReport {
        scores,
        total_score,
        max_score: MAX_SCORE,
        status,
        interpretation: status.interpretation().to_string(),
        savings_ratio_pct: savings_ratio_pct.round_dp(2),
        emergency_cover_months: emergency_cover_months.round_dp(1),
        debt_ratio_pct: debt_ratio_pct.round_dp(2),
    })
}

pub fn calculate_financial_health(
    input: &HealthInput,
) -> TaxCalcResult<ComputationOutput<HealthReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let report = assess(input)?;
    if input.monthly_income.is_zero() {
        warnings.push("No monthly income given; savings and debt ratios read as zero".into());
    }
    if input.monthly_expenses.is_zero() {
        warnings.push("No monthly expenses given; emergency cover reads as zero".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Six areas scored 1-5: stability, savings ratio, emergency months, EMI ratio, investments, insurance",
        &serde_json::json!({
            "savings_ratio_thresholds_pct": [30, 20, 10, 1],
            "emergency_month_thresholds": [6, 4, 3, 1],
            "debt_ratio_ceilings_pct": [20, 30, 40, 50],
            "status_bands": { "excellent": 26, "good": 21, "average": 15 },
        }),
        warnings,
        elapsed,
        report,
    ))
}
