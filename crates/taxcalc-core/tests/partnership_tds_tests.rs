use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use taxcalc_core::partnership::{calculate_partnership, Partner, PartnershipInput};
use taxcalc_core::tds::{parse_pan, parse_tan, DeducteeCategory, HolderType};

#[test]
fn test_partnership_from_json() {
    let json = r#"{
        "firm_name": "Shah & Mehta",
        "annual_net_profit": "1500000",
        "interest_rate_pct": "12",
        "partners": [
            {"name": "Shah", "profit_share_pct": "50", "monthly_capital": ["200000", "200000"]},
            {"name": "Mehta", "profit_share_pct": "50"}
        ]
    }"#;
    let input: PartnershipInput = serde_json::from_str(json).unwrap();
    let out = calculate_partnership(&input).unwrap();

    assert_eq!(out.result.total_interest, dec!(4000));
    assert_eq!(out.result.partners[0].monthly.len(), 2);
    assert_eq!(out.result.partners[0].monthly[1].month, "May");
    assert_eq!(out.result.partners[1].interest_on_capital, Decimal::ZERO);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_thirteen_months_rejected() {
    let input = PartnershipInput {
        firm_name: None,
        annual_net_profit: dec!(1000000),
        interest_rate_pct: dec!(10),
        partners: vec![
            Partner {
                name: "A".into(),
                profit_share_pct: dec!(50),
                monthly_capital: vec![dec!(1); 13],
            },
            Partner {
                name: "B".into(),
                profit_share_pct: dec!(50),
                monthly_capital: vec![],
            },
        ],
    };
    assert!(calculate_partnership(&input).is_err());
}

#[test]
fn test_pan_categories() {
    let huf = parse_pan("AAAHA1234B").unwrap();
    assert_eq!(huf.holder_type, HolderType::Huf);
    assert_eq!(huf.category, DeducteeCategory::IndividualOrHuf);

    let firm = parse_pan("AAAFA1234B").unwrap();
    assert_eq!(firm.category, DeducteeCategory::CompanyFirmOrOther);

    assert!(parse_tan("MUMA12345B").is_ok());
}
