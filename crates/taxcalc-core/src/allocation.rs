use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::types::{require_non_negative, with_metadata, ComputationOutput, Money, Percent};
use crate::TaxCalcResult;

/// Deviation, in percentage points, tolerated before a class is off target.
pub const BALANCE_BAND_PCT: Decimal = dec!(2);

const AGGRESSIVE_EQUITY_PCT: Decimal = dec!(55);
const MODERATE_EQUITY_PCT: Decimal = dec!(40);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Equity,
    Debt,
    Gold,
    Reit,
    Cash,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Equity,
        AssetClass::Debt,
        AssetClass::Gold,
        AssetClass::Reit,
        AssetClass::Cash,
    ];

    /// Target weight in percent.
    pub fn ideal_pct(self) -> Percent {
        match self {
            AssetClass::Equity => dec!(50),
            AssetClass::Debt => dec!(27.5),
            AssetClass::Gold => dec!(7.5),
            AssetClass::Reit => dec!(7.5),
            AssetClass::Cash => dec!(5),
        }
    }

    /// Acceptable (min, max) weight in percent.
    pub fn ideal_range(self) -> (Percent, Percent) {
        match self {
            AssetClass::Equity => (dec!(40), dec!(60)),
            AssetClass::Debt => (dec!(20), dec!(35)),
            AssetClass::Gold | AssetClass::Reit => (dec!(5), dec!(10)),
            AssetClass::Cash => (dec!(5), dec!(5)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetClass::Equity => "Equities",
            AssetClass::Debt => "Debt",
            AssetClass::Gold => "Gold/Precious Metals",
            AssetClass::Reit => "Real Estate/REITs",
            AssetClass::Cash => "Cash/Liquid Funds",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioAllocation {
    #[serde(default)]
    pub equity: Money,
    #[serde(default)]
    pub debt: Money,
    #[serde(default)]
    pub gold: Money,
    #[serde(default)]
    pub reit: Money,
    #[serde(default)]
    pub cash: Money,
}

impl PortfolioAllocation {
    pub fn amount(&self, class: AssetClass) -> Money {
        match class {
            AssetClass::Equity => self.equity,
            AssetClass::Debt => self.debt,
            AssetClass::Gold => self.gold,
            AssetClass::Reit => self.reit,
            AssetClass::Cash => self.cash,
        }
    }

    pub fn total(&self) -> Money {
        AssetClass::ALL.iter().map(|c| self.amount(*c)).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Surplus,
    Deficit,
    Balanced,
}

impl AllocationStatus {
    pub fn from_delta(delta_pct: Percent) -> Self {
        if delta_pct > BALANCE_BAND_PCT {
            AllocationStatus::Surplus
        } else if delta_pct < -BALANCE_BAND_PCT {
            AllocationStatus::Deficit
        } else {
            AllocationStatus::Balanced
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub fn from_equity_pct(equity_pct: Percent) -> Self {
        if equity_pct >= AGGRESSIVE_EQUITY_PCT {
            RiskProfile::Aggressive
        } else if equity_pct >= MODERATE_EQUITY_PCT {
            RiskProfile::Moderate
        } else {
            RiskProfile::Conservative
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassAnalysis {
    pub asset_class: AssetClass,
    pub amount: Money,
    pub actual_pct: Percent,
    pub ideal_pct: Percent,
    pub ideal_min_pct: Percent,
    pub ideal_max_pct: Percent,
    pub delta_pct: Percent,
    pub status: AllocationStatus,
    /// Rupee amount above (positive) or below (negative) the ideal weight
    pub amount_delta: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationAnalysis {
    pub total: Money,
    pub risk_profile: RiskProfile,
    pub classes: Vec<ClassAnalysis>,
    pub recommendations: Vec<String>,
}

/// Compare actual weights with the ideal allocation.
pub fn analyze(allocation: &PortfolioAllocation) -> TaxCalcResult<AllocationAnalysis> {
    for class in AssetClass::ALL {
        require_non_negative(&format!("{class:?}").to_lowercase(), allocation.amount(class))?;
    }
    let total = allocation.total();
    if total.is_zero() {
        return Err(TaxCalcError::DivisionByZero {
            context: "portfolio total is zero".into(),
        });
    }

    let classes: Vec<ClassAnalysis> = AssetClass::ALL
        .iter()
        .map(|&class| {
            let amount = allocation.amount(class);
            let actual_pct = amount / total * dec!(100);
            let ideal_pct = class.ideal_pct();
            let delta_pct = actual_pct - ideal_pct;
            let (ideal_min_pct, ideal_max_pct) = class.ideal_range();
            ClassAnalysis {
                asset_class: class,
                amount,
                actual_pct,
                ideal_pct,
                ideal_min_pct,
                ideal_max_pct,
                delta_pct,
                status: AllocationStatus::from_delta(delta_pct),
                amount_delta: total * delta_pct / dec!(100),
            }
        })
        .collect();

    let equity_pct = classes
        .iter()
        .find(|c| c.asset_class == AssetClass::Equity)
        .map(|c| c.actual_pct)
        .unwrap_or(Decimal::ZERO);

    let recommendations = classes
        .iter()
        .filter_map(|c| {
            let verb = match c.status {
                AllocationStatus::Surplus => "reducing",
                AllocationStatus::Deficit => "increasing",
                AllocationStatus::Balanced => return None,
            };
            Some(format!(
                "Consider {verb} {} by {} ({}%)",
                c.asset_class.label(),
                c.amount_delta.abs().round_dp(2),
                c.delta_pct.abs().round_dp(1)
            ))
        })
        .collect();

    Ok(AllocationAnalysis {
        total,
        risk_profile: RiskProfile::from_equity_pct(equity_pct),
        classes,
        recommendations,
    })
}

pub fn analyze_allocation(
    allocation: &PortfolioAllocation,
) -> TaxCalcResult<ComputationOutput<AllocationAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let analysis = analyze(allocation)?;
    for c in &analysis.classes {
        if c.actual_pct < c.ideal_min_pct || c.actual_pct > c.ideal_max_pct {
            warnings.push(format!(
                "{} at {}% is outside the {}-{}% range",
                c.asset_class.label(),
                c.actual_pct.round_dp(1),
                c.ideal_min_pct,
                c.ideal_max_pct
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Actual vs ideal asset allocation (50/27.5/7.5/7.5/5), +/-2pp band",
        &serde_json::json!({
            "balance_band_pct": BALANCE_BAND_PCT.to_string(),
            "ideal": AssetClass::ALL
                .iter()
                .map(|c| (format!("{c:?}").to_lowercase(), c.ideal_pct().to_string()))
                .collect::<std::collections::BTreeMap<_, _>>(),
        }),
        warnings,
        elapsed,
        analysis,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn portfolio(equity: Money, debt: Money) -> PortfolioAllocation {
        PortfolioAllocation {
            equity,
            debt,
            gold: dec!(7.5),
            reit: dec!(7.5),
            cash: dec!(5),
        }
    }

    #[test]
    fn test_ideal_portfolio_is_balanced() {
        let a = analyze(&portfolio(dec!(50), dec!(27.5))).unwrap();
        assert!(a.classes.iter().all(|c| c.status == AllocationStatus::Balanced));
        assert!(a.recommendations.is_empty());
        assert_eq!(a.risk_profile, RiskProfile::Moderate);
    }

    #[test]
    fn test_surplus_and_deficit() {
        let a = analyze(&portfolio(dec!(70), dec!(10))).unwrap();
        assert_eq!(a.classes[0].status, AllocationStatus::Surplus);
        assert_eq!(a.classes[0].amount_delta, dec!(20));
        assert_eq!(a.classes[1].status, AllocationStatus::Deficit);
        assert_eq!(a.risk_profile, RiskProfile::Aggressive);
        assert_eq!(a.recommendations.len(), 2);
    }

    #[test]
    fn test_risk_profile_thresholds() {
        assert_eq!(RiskProfile::from_equity_pct(dec!(55)), RiskProfile::Aggressive);
        assert_eq!(RiskProfile::from_equity_pct(dec!(54.99)), RiskProfile::Moderate);
        assert_eq!(RiskProfile::from_equity_pct(dec!(40)), RiskProfile::Moderate);
        assert_eq!(RiskProfile::from_equity_pct(dec!(39.99)), RiskProfile::Conservative);
    }

    #[test]
    fn test_empty_portfolio_rejected() {
        assert!(analyze(&PortfolioAllocation::default()).is_err());
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(analyze(&portfolio(dec!(-1), dec!(50))).is_err());
    }
}
