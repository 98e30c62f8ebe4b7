use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use taxcalc_core::income_tax::engine::{
    compare_tax_regimes, compute_tax, DeductionSection, IncomeByHead, RebateOutcome,
    SpecialIncome, TaxProfile,
};
use taxcalc_core::income_tax::slabs::TaxRegime;

fn profile(regime: TaxRegime, age: u32, other_sources: Decimal) -> TaxProfile {
    TaxProfile {
        regime,
        age,
        is_salaried: false,
        income: IncomeByHead {
            salary: Decimal::ZERO,
            house_property: Decimal::ZERO,
            other_sources,
        },
        special_income: SpecialIncome::default(),
        deductions: BTreeMap::new(),
    }
}

fn tax_before_cess(regime: TaxRegime, age: u32, income: Decimal) -> Decimal {
    compute_tax(&profile(regime, age, income)).unwrap().tax_before_cess
}

// ===========================================================================
// Section 87A boundaries (new regime)
// ===========================================================================

#[test]
fn test_rebate_fully_offsets_at_twelve_lakh() {
    assert_eq!(tax_before_cess(TaxRegime::New, 30, dec!(1200000)), Decimal::ZERO);
}

#[test]
fn test_no_rebate_just_above_relief_band() {
    let r = compute_tax(&profile(TaxRegime::New, 30, dec!(1270001))).unwrap();
    assert_eq!(r.rebate, RebateOutcome::NotEligible);
    assert!(r.tax_after_rebate > dec!(70000));
}

// ===========================================================================
// Monotonicity in normal income
// ===========================================================================

fn assert_monotone(regime: TaxRegime, age: u32, from: i64, to: i64, step: i64) {
    let mut previous = Decimal::ZERO;
    let mut income = from;
    while income <= to {
        let tax = compute_tax(&profile(regime, age, Decimal::from(income)))
            .unwrap()
            .final_tax_payable;
        assert!(
            tax >= previous,
            "{regime:?}/{age}: tax fell to {tax} at income {income} (was {previous})"
        );
        previous = tax;
        income += step;
    }
}

#[test]
fn test_tax_monotone_across_rebate_band() {
    assert_monotone(TaxRegime::New, 30, 1_150_000, 1_300_000, 1_000);
    assert_monotone(TaxRegime::Old, 30, 450_000, 550_000, 1_000);
}

#[test]
fn test_tax_monotone_across_surcharge_thresholds() {
    for threshold in [5_000_000_i64, 10_000_000, 20_000_000, 50_000_000] {
        for regime in [TaxRegime::New, TaxRegime::Old] {
            assert_monotone(regime, 45, threshold - 200_000, threshold + 2_000_000, 10_000);
        }
    }
}

#[test]
fn test_tax_monotone_for_senior_slabs() {
    assert_monotone(TaxRegime::Old, 65, 0, 2_000_000, 25_000);
    assert_monotone(TaxRegime::Old, 85, 0, 2_000_000, 25_000);
}

// ===========================================================================
// Regime comparison
// ===========================================================================

#[test]
fn test_comparison_ignores_claims_outside_regime() {
    let mut p = profile(TaxRegime::New, 40, Decimal::ZERO);
    p.is_salaried = true;
    p.income.salary = dec!(900000);
    p.deductions.insert(DeductionSection::Section80C, dec!(150000));
    p.deductions.insert(DeductionSection::Section80Ccd1B, dec!(50000));
    p.deductions.insert(DeductionSection::Section80D, dec!(75000));
    p.deductions.insert(DeductionSection::HomeLoanInterest, dec!(200000));

    let out = compare_tax_regimes(&p).unwrap();
    // New regime: 8.25L taxable, fully rebated
    assert_eq!(out.result.new_regime.final_tax_payable, Decimal::ZERO);
    // Old regime: 8.5L less 2L house property loss less 2.75L of VI-A, rebated
    assert_eq!(out.result.old_regime.net_normal_income, dec!(375000));
    assert_eq!(out.result.old_regime.final_tax_payable, Decimal::ZERO);
    // Ties go to the default regime
    assert_eq!(out.result.recommended, TaxRegime::New);
    assert_eq!(out.result.savings, Decimal::ZERO);
    // Every old-regime claim is ignored under the new regime
    assert_eq!(out.warnings.len(), 4);
}

#[test]
fn test_over_cap_claim_only_fails_where_applied() {
    let mut p = profile(TaxRegime::New, 40, dec!(1000000));
    p.deductions.insert(DeductionSection::Section80C, dec!(200000));

    let new = compute_tax(&p).unwrap();
    assert_eq!(new.ignored_deductions, vec![DeductionSection::Section80C]);

    // The comparison also evaluates the old regime, where 80C is capped
    assert!(compare_tax_regimes(&p).is_err());
}
