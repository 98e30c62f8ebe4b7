use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use taxcalc_core::planning::health::{calculate_financial_health, HealthInput, HealthStatus};
use taxcalc_core::planning::salary::{calculate_salary, SalaryInput};

#[test]
fn test_salary_defaults_from_json() {
    let input: SalaryInput = serde_json::from_str(r#"{"ctc":"1200000"}"#).unwrap();
    let out = calculate_salary(&input).unwrap();
    assert_eq!(out.result.basic, dec!(480000));
    assert_eq!(out.result.professional_tax, dec!(2400));
    assert_eq!(out.result.monthly_take_home, dec!(95000));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_bonus_comes_out_of_special_allowance() {
    let input: SalaryInput =
        serde_json::from_str(r#"{"ctc":"1200000","bonus":"100000"}"#).unwrap();
    let out = calculate_salary(&input).unwrap();
    assert_eq!(out.result.special_allowance, dec!(380000));
    assert_eq!(out.result.gross_salary, dec!(1200000));
}

#[test]
fn test_health_report_from_json() {
    let input: HealthInput = serde_json::from_str(
        r#"{
            "monthly_income": "80000",
            "monthly_expenses": "56000",
            "emergency_fund": "200000",
            "monthly_emis": "20000",
            "income_stability": 4,
            "holdings": {"fixed_deposits": true, "provident_fund": true},
            "regular_investments": true,
            "health_insurance": true
        }"#,
    )
    .unwrap();
    let out = calculate_financial_health(&input).unwrap();
    let s = &out.result.scores;
    // 30% saved, 3.6 months cover, 25% of income on EMIs
    assert_eq!(s.expense_management, 5);
    assert_eq!(s.emergency_fund, 3);
    assert_eq!(s.debt_management, 4);
    assert_eq!(s.investments, 4);
    assert_eq!(s.insurance, 3);
    assert_eq!(out.result.total_score, 23);
    assert_eq!(out.result.status, HealthStatus::Good);
}

#[test]
fn test_zero_income_warns() {
    let input: HealthInput = serde_json::from_str(
        r#"{"monthly_income":"0","monthly_expenses":"10000","emergency_fund":"0",
            "income_stability":3}"#,
    )
    .unwrap();
    let out = calculate_financial_health(&input).unwrap();
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.result.scores.debt_management, 5);
}
