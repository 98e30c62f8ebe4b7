use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use taxcalc_core::capital_gains::engine::{
    calculate_capital_gains, compute_gain, AssetClass, CapitalGainTransaction, GainResult,
    TaxpayerStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn equity(purchase: NaiveDate, sale: NaiveDate) -> CapitalGainTransaction {
    CapitalGainTransaction {
        asset_class: AssetClass::Equity,
        purchase_date: purchase,
        sale_date: sale,
        purchase_price: dec!(100000),
        sale_price: dec!(250000),
        cost_of_improvement: Decimal::ZERO,
        improvement_year: None,
        is_grandfathered: false,
        fmv_jan_2018: None,
        taxpayer_status: TaxpayerStatus::Individual,
    }
}

#[test]
fn test_grandfathered_equity_tax() {
    let mut tx = equity(date(2016, 5, 10), date(2025, 6, 1));
    tx.is_grandfathered = true;
    tx.fmv_jan_2018 = Some(dec!(120000));
    let result = compute_gain(&tx).unwrap();
    assert_eq!(result.tax(), Some(dec!(625)));
}

#[test]
fn test_equity_holding_boundary() {
    // 2024 is a leap year: 2024-01-01 + 365 days = 2024-12-31
    let short = compute_gain(&equity(date(2024, 1, 1), date(2024, 12, 31))).unwrap();
    assert!(matches!(short, GainResult::EquityShortTerm { .. }));

    let long = compute_gain(&equity(date(2024, 1, 1), date(2025, 1, 1))).unwrap();
    assert!(matches!(long, GainResult::EquityLongTerm { .. }));
}

#[test]
fn test_indexed_property_is_deterministic() {
    let tx = CapitalGainTransaction {
        asset_class: AssetClass::Property,
        purchase_date: date(2015, 6, 1),
        sale_date: date(2025, 6, 1),
        purchase_price: dec!(2000000),
        sale_price: dec!(5000000),
        cost_of_improvement: dec!(300000),
        improvement_year: Some("2020-21".into()),
        is_grandfathered: false,
        fmv_jan_2018: None,
        taxpayer_status: TaxpayerStatus::Individual,
    };
    let first = compute_gain(&tx).unwrap();
    for _ in 0..10 {
        assert_eq!(compute_gain(&tx).unwrap(), first);
    }
    match first {
        GainResult::PropertyLongTerm {
            indexed: Some(indexed),
            ..
        } => {
            assert_eq!(indexed.improvement_index, Some(301));
            assert_eq!(
                indexed.indexed_cost_of_improvement,
                dec!(300000) * dec!(380) / dec!(301)
            );
        }
        other => panic!("expected long-term property, got {other:?}"),
    }
}

#[test]
fn test_slab_gain_envelope_warns() {
    let tx = CapitalGainTransaction {
        asset_class: AssetClass::Other,
        ..equity(date(2024, 1, 1), date(2025, 1, 1))
    };
    let out = calculate_capital_gains(&tx).unwrap();
    assert!(matches!(out.result, GainResult::SlabShortTerm { .. }));
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_sale_before_purchase_rejected() {
    assert!(compute_gain(&equity(date(2025, 1, 2), date(2025, 1, 1))).is_err());
}
