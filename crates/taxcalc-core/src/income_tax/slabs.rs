//! Statutory tables for FY 2025-26 (AY 2026-27).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Section 115BAC default regime
    #[default]
    New,
    /// Opt-in regime with Chapter VI-A deductions
    Old,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    BelowSixty,
    /// 60 to 79
    Senior,
    /// 80 and above
    SuperSenior,
}

impl AgeBand {
    pub fn from_age(age: u32) -> Self {
        if age >= 80 {
            AgeBand::SuperSenior
        } else if age >= 60 {
            AgeBand::Senior
        } else {
            AgeBand::BelowSixty
        }
    }
}

/// One bracket of a progressive schedule. `upper_limit` of `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slab {
    pub upper_limit: Option<Money>,
    pub rate: Rate,
}

const fn slab(upper_limit: Decimal, rate: Decimal) -> Slab {
    Slab {
        upper_limit: Some(upper_limit),
        rate,
    }
}

const fn top_slab(rate: Decimal) -> Slab {
    Slab {
        upper_limit: None,
        rate,
    }
}

/// New regime brackets apply at every age.
pub const NEW_REGIME_SLABS: [Slab; 7] = [
    slab(dec!(400000), dec!(0)),
    slab(dec!(800000), dec!(0.05)),
    slab(dec!(1200000), dec!(0.10)),
    slab(dec!(1600000), dec!(0.15)),
    slab(dec!(2000000), dec!(0.20)),
    slab(dec!(2400000), dec!(0.25)),
    top_slab(dec!(0.30)),
];

pub const OLD_REGIME_SLABS: [Slab; 4] = [
    slab(dec!(250000), dec!(0)),
    slab(dec!(500000), dec!(0.05)),
    slab(dec!(1000000), dec!(0.20)),
    top_slab(dec!(0.30)),
];

pub const OLD_REGIME_SENIOR_SLABS: [Slab; 4] = [
    slab(dec!(300000), dec!(0)),
    slab(dec!(500000), dec!(0.05)),
    slab(dec!(1000000), dec!(0.20)),
    top_slab(dec!(0.30)),
];

pub const OLD_REGIME_SUPER_SENIOR_SLABS: [Slab; 3] = [
    slab(dec!(500000), dec!(0)),
    slab(dec!(1000000), dec!(0.20)),
    top_slab(dec!(0.30)),
];

pub fn slabs_for(regime: TaxRegime, age_band: AgeBand) -> &'static [Slab] {
    match (regime, age_band) {
        (TaxRegime::New, _) => &NEW_REGIME_SLABS,
        (TaxRegime::Old, AgeBand::BelowSixty) => &OLD_REGIME_SLABS,
        (TaxRegime::Old, AgeBand::Senior) => &OLD_REGIME_SENIOR_SLABS,
        (TaxRegime::Old, AgeBand::SuperSenior) => &OLD_REGIME_SUPER_SENIOR_SLABS,
    }
}

/// Tax attributable to one bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabBand {
    pub lower_limit: Money,
    pub upper_limit: Option<Money>,
    pub rate: Rate,
    pub taxable_amount: Money,
    pub tax: Money,
}

/// Per-bracket breakdown; each rate applies only to income inside its bracket.
pub fn slab_breakdown(income: Money, slabs: &[Slab]) -> Vec<SlabBand> {
    let mut bands = Vec::new();
    let mut last_limit = Decimal::ZERO;

    for s in slabs {
        if income <= last_limit {
            break;
        }
        let span_top = match s.upper_limit {
            Some(limit) => income.min(limit),
            None => income,
        };
        let taxable_amount = span_top - last_limit;
        bands.push(SlabBand {
            lower_limit: last_limit,
            upper_limit: s.upper_limit,
            rate: s.rate,
            taxable_amount,
            tax: taxable_amount * s.rate,
        });
        match s.upper_limit {
            Some(limit) => last_limit = limit,
            None => break,
        }
    }

    bands
}

/// Progressive bracket sum.
pub fn slab_tax(income: Money, slabs: &[Slab]) -> Money {
    slab_breakdown(income, slabs).iter().map(|b| b.tax).sum()
}

// ---------------------------------------------------------------------------
// Deductions from heads of income
// ---------------------------------------------------------------------------

pub const STANDARD_DEDUCTION_NEW: Money = dec!(75000);
pub const STANDARD_DEDUCTION_OLD: Money = dec!(50000);

pub fn standard_deduction(regime: TaxRegime, is_salaried: bool) -> Money {
    match (is_salaried, regime) {
        (false, _) => Decimal::ZERO,
        (true, TaxRegime::New) => STANDARD_DEDUCTION_NEW,
        (true, TaxRegime::Old) => STANDARD_DEDUCTION_OLD,
    }
}

/// Section 24(a) flat deduction on gross rent
pub const RENT_STANDARD_DEDUCTION_RATE: Rate = dec!(0.30);
/// Maximum house property loss set off against other heads
pub const HOUSE_PROPERTY_LOSS_FLOOR: Money = dec!(-200000);

// ---------------------------------------------------------------------------
// Special-rate incomes
// ---------------------------------------------------------------------------

pub const LTCG_112A_EXEMPTION: Money = dec!(125000);
pub const LTCG_112A_RATE: Rate = dec!(0.125);
pub const STCG_111A_RATE: Rate = dec!(0.20);
pub const LTCG_OTHER_RATE: Rate = dec!(0.125);
pub const WINNINGS_RATE: Rate = dec!(0.30);

// ---------------------------------------------------------------------------
// Rebate, surcharge, cess
// ---------------------------------------------------------------------------

pub const NEW_REBATE_INCOME_LIMIT: Money = dec!(1200000);
pub const NEW_REBATE_MAX: Money = dec!(60000);
/// Upper edge of the Section 87A marginal relief band (new regime)
pub const NEW_REBATE_RELIEF_LIMIT: Money = dec!(1270000);
pub const OLD_REBATE_INCOME_LIMIT: Money = dec!(500000);
pub const OLD_REBATE_MAX: Money = dec!(12500);

/// Surcharge on capital gains taxed under 111A/112/112A never exceeds 15%.
pub const SPECIAL_SURCHARGE_CAP: Rate = dec!(0.15);
pub const CESS_RATE: Rate = dec!(0.04);

/// Income strictly above `threshold` attracts `rate` on the tax.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurchargeBand {
    pub threshold: Money,
    pub rate: Rate,
}

/// Surcharge bands, highest threshold first.
pub fn surcharge_bands(regime: TaxRegime) -> [SurchargeBand; 4] {
    let top_rate = match regime {
        TaxRegime::Old => dec!(0.37),
        TaxRegime::New => dec!(0.25),
    };
    [
        SurchargeBand {
            threshold: dec!(50000000),
            rate: top_rate,
        },
        SurchargeBand {
            threshold: dec!(20000000),
            rate: dec!(0.25),
        },
        SurchargeBand {
            threshold: dec!(10000000),
            rate: dec!(0.15),
        },
        SurchargeBand {
            threshold: dec!(5000000),
            rate: dec!(0.10),
        },
    ]
}

/// Surcharge rate on normal-rate tax for a given total income.
pub fn surcharge_rate(regime: TaxRegime, total_income: Money) -> Rate {
    surcharge_bands(regime)
        .iter()
        .find(|b| total_income > b.threshold)
        .map(|b| b.rate)
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_age_bands() {
        assert_eq!(AgeBand::from_age(59), AgeBand::BelowSixty);
        assert_eq!(AgeBand::from_age(60), AgeBand::Senior);
        assert_eq!(AgeBand::from_age(79), AgeBand::Senior);
        assert_eq!(AgeBand::from_age(80), AgeBand::SuperSenior);
    }

    #[test]
    fn test_new_regime_slab_tax() {
        // 4L-8L @5% = 20,000; 8L-12L @10% = 40,000
        assert_eq!(slab_tax(dec!(1200000), &NEW_REGIME_SLABS), dec!(60000));
        // + 12L-16L @15% = 60,000; 16L-20L @20% = 80,000; 20L-24L @25% = 100,000; 6L @30%
        assert_eq!(slab_tax(dec!(3000000), &NEW_REGIME_SLABS), dec!(480000));
    }

    #[test]
    fn test_old_regime_slab_tax_by_age() {
        let income = dec!(1000000);
        assert_eq!(slab_tax(income, slabs_for(TaxRegime::Old, AgeBand::BelowSixty)), dec!(112500));
        assert_eq!(slab_tax(income, slabs_for(TaxRegime::Old, AgeBand::Senior)), dec!(110000));
        assert_eq!(slab_tax(income, slabs_for(TaxRegime::Old, AgeBand::SuperSenior)), dec!(100000));
    }

    #[test]
    fn test_slab_breakdown_stops_at_income() {
        let bands = slab_breakdown(dec!(500000), &NEW_REGIME_SLABS);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[1].taxable_amount, dec!(100000));
        assert_eq!(bands[1].tax, dec!(5000));
        assert!(slab_breakdown(Decimal::ZERO, &NEW_REGIME_SLABS).is_empty());
    }

    #[test]
    fn test_surcharge_rate_thresholds_are_exclusive() {
        assert_eq!(surcharge_rate(TaxRegime::New, dec!(5000000)), Decimal::ZERO);
        assert_eq!(surcharge_rate(TaxRegime::New, dec!(5000001)), dec!(0.10));
        assert_eq!(surcharge_rate(TaxRegime::New, dec!(10000001)), dec!(0.15));
        assert_eq!(surcharge_rate(TaxRegime::New, dec!(20000001)), dec!(0.25));
        assert_eq!(surcharge_rate(TaxRegime::New, dec!(60000000)), dec!(0.25));
        assert_eq!(surcharge_rate(TaxRegime::Old, dec!(60000000)), dec!(0.37));
    }
}
