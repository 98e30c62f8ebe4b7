use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use taxcalc_core::allocation::{analyze, analyze_allocation, AllocationStatus, PortfolioAllocation};

fn with_equity_and_debt(equity: rust_decimal::Decimal, debt: rust_decimal::Decimal) -> PortfolioAllocation {
    // Gold, REITs and cash at 7.5 / 7.5 / 7.5 so amounts read as percentages
    PortfolioAllocation {
        equity,
        debt,
        gold: dec!(7.5),
        reit: dec!(7.5),
        cash: dec!(7.5),
    }
}

#[test]
fn test_exactly_two_points_above_is_balanced() {
    let a = analyze(&with_equity_and_debt(dec!(52), dec!(25.5))).unwrap();
    assert_eq!(a.total, dec!(100));
    assert_eq!(a.classes[0].delta_pct, dec!(2));
    assert_eq!(a.classes[0].status, AllocationStatus::Balanced);
}

#[test]
fn test_just_over_two_points_is_surplus() {
    let a = analyze(&with_equity_and_debt(dec!(52.01), dec!(25.49))).unwrap();
    assert_eq!(a.classes[0].status, AllocationStatus::Surplus);
    // Cash sits 2.5 points over its 5% target
    assert_eq!(a.classes[4].status, AllocationStatus::Surplus);
}

#[test]
fn test_envelope_flags_out_of_range_classes() {
    let out = analyze_allocation(&with_equity_and_debt(dec!(70), dec!(7.5))).unwrap();
    // equity above 60, debt below 20, cash above 5
    assert_eq!(out.warnings.len(), 3);
}
