//! Partnership firm interest on capital and partner remuneration, Section 40(b).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::types::{require_non_negative, with_metadata, ComputationOutput, Money, Percent};
use crate::TaxCalcResult;

/// Interest on capital above this rate is disallowed under 40(b)(iv).
pub const MAX_ALLOWED_INTEREST_PCT: Percent = dec!(12);

const REMUNERATION_FIRST_SLAB: Money = dec!(600000);
const REMUNERATION_FIRST_RATE: Decimal = dec!(0.90);
const REMUNERATION_EXCESS_RATE: Decimal = dec!(0.60);
const REMUNERATION_MINIMUM: Money = dec!(300000);

const FIRM_TAX_RATE: Decimal = dec!(0.30);
const FIRM_SURCHARGE_THRESHOLD: Money = dec!(10000000);
const FIRM_SURCHARGE_RATE: Decimal = dec!(0.12);
const CESS_RATE: Decimal = dec!(0.04);

const SHARE_TOLERANCE_PCT: Percent = dec!(0.1);
const MONTHS_IN_YEAR: usize = 12;

pub const MONTHS: [&str; MONTHS_IN_YEAR] = [
    "April", "May", "June", "July", "August", "September", "October", "November", "December",
    "January", "February", "March",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub name: String,
    pub profit_share_pct: Percent,
    /// Month-end capital balances, April first; missing months count as zero
    #[serde(default)]
    pub monthly_capital: Vec<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnershipInput {
    #[serde(default)]
    pub firm_name: Option<String>,
    pub annual_net_profit: Money,
    /// Annual rate of interest on capital, in percent
    pub interest_rate_pct: Percent,
    pub partners: Vec<Partner>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyInterest {
    pub month: String,
    pub capital: Money,
    pub interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerDistribution {
    pub name: String,
    pub profit_share_pct: Percent,
    pub interest_on_capital: Money,
    pub remuneration: Money,
    pub profit_share: Money,
    pub total_earnings: Money,
    pub monthly: Vec<MonthlyInterest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmTax {
    pub taxable_profit: Money,
    pub income_tax: Money,
    pub surcharge: Money,
    pub cess: Money,
    pub total_tax: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnershipResult {
    pub firm_name: Option<String>,
    pub total_interest: Money,
    pub book_profit: Money,
    pub max_allowable_remuneration: Money,
    pub firm_tax: FirmTax,
    pub distributable_profit: Money,
    pub partners: Vec<PartnerDistribution>,
}

/// Remuneration deductible against book profit.
///
/// 90% of the first 6,00,000 and 60% of the rest, raised to the lower of
/// 3,00,000 and book profit when positive, never above book profit.
pub fn max_remuneration(book_profit: Money) -> Money {
    if book_profit <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let mut remuneration = if book_profit <= REMUNERATION_FIRST_SLAB {
        book_profit * REMUNERATION_FIRST_RATE
    } else {
        REMUNERATION_FIRST_SLAB * REMUNERATION_FIRST_RATE
            + (book_profit - REMUNERATION_FIRST_SLAB) * REMUNERATION_EXCESS_RATE
    };

    let floor = REMUNERATION_MINIMUM.min(book_profit);
    if remuneration > Decimal::ZERO && remuneration < floor {
        remuneration = floor;
    }
    remuneration.min(book_profit).max(Decimal::ZERO)
}

fn firm_tax(taxable_profit: Money) -> FirmTax {
    let income_tax = if taxable_profit > Decimal::ZERO {
        taxable_profit * FIRM_TAX_RATE
    } else {
        Decimal::ZERO
    };
    let surcharge = if taxable_profit > FIRM_SURCHARGE_THRESHOLD {
        income_tax * FIRM_SURCHARGE_RATE
    } else {
        Decimal::ZERO
    };
    let cess = (income_tax + surcharge) * CESS_RATE;
    FirmTax {
        taxable_profit,
        income_tax,
        surcharge,
        cess,
        total_tax: income_tax + surcharge + cess,
    }
}

fn validate(input: &PartnershipInput) -> TaxCalcResult<()> {
    if input.partners.len() < 2 {
        return Err(TaxCalcError::invalid("partners", "A firm needs at least two partners"));
    }
    require_non_negative("interest_rate_pct", input.interest_rate_pct)?;
    if input.interest_rate_pct > dec!(100) {
        return Err(TaxCalcError::invalid("interest_rate_pct", "Must be at most 100"));
    }
    // Losses are allowed; only the magnitude is bounded.
    require_non_negative("annual_net_profit", input.annual_net_profit.abs())?;

    for (i, p) in input.partners.iter().enumerate() {
        if p.name.trim().is_empty() {
            return Err(TaxCalcError::invalid(&format!("partners[{i}].name"), "Must not be empty"));
        }
        require_non_negative(&format!("partners[{i}].profit_share_pct"), p.profit_share_pct)?;
        if p.monthly_capital.len() > MONTHS_IN_YEAR {
            return Err(TaxCalcError::invalid(
                &format!("partners[{i}].monthly_capital"),
                "At most 12 monthly balances (April to March)",
            ));
        }
        for (m, capital) in p.monthly_capital.iter().enumerate() {
            require_non_negative(&format!("partners[{i}].monthly_capital[{m}]"), *capital)?;
        }
    }

    let total_share: Percent = input.partners.iter().map(|p| p.profit_share_pct).sum();
    if (total_share - dec!(100)).abs() > SHARE_TOLERANCE_PCT {
        return Err(TaxCalcError::invalid(
            "partners",
            format!("Profit shares total {total_share}%, expected 100%"),
        ));
    }
    Ok(())
}

pub fn compute_partnership(input: &PartnershipInput) -> TaxCalcResult<PartnershipResult> {
    validate(input)?;

    let monthly_rate = input.interest_rate_pct / dec!(12) / dec!(100);

    let with_interest: Vec<(&Partner, Vec<MonthlyInterest>, Money)> = input
        .partners
        .iter()
        .map(|p| {
            let monthly: Vec<MonthlyInterest> = p
                .monthly_capital
                .iter()
                .zip(MONTHS.iter())
                .map(|(capital, month)| MonthlyInterest {
                    month: (*month).to_string(),
                    capital: *capital,
                    interest: *capital * monthly_rate,
                })
                .collect();
            let total = monthly.iter().map(|m| m.interest).sum();
            (p, monthly, total)
        })
        .collect();

    let total_interest: Money = with_interest.iter().map(|(_, _, i)| *i).sum();
    let book_profit = input.annual_net_profit - total_interest;
    let remuneration = max_remuneration(book_profit);
    let tax = firm_tax(book_profit - remuneration);
    let distributable_profit = tax.taxable_profit - tax.total_tax;

    tracing::debug!(
        %book_profit,
        %remuneration,
        total_tax = %tax.total_tax,
        "Partnership remuneration and firm tax computed"
    );

    let partners = with_interest
        .into_iter()
        .map(|(p, monthly, interest)| {
            let share = p.profit_share_pct / dec!(100);
            let partner_remuneration = remuneration * share;
            let profit_share = distributable_profit * share;
            PartnerDistribution {
                name: p.name.clone(),
                profit_share_pct: p.profit_share_pct,
                interest_on_capital: interest,
                remuneration: partner_remuneration,
                profit_share,
                total_earnings: interest + partner_remuneration + profit_share,
                monthly,
            }
        })
        .collect();

    Ok(PartnershipResult {
        firm_name: input.firm_name.clone(),
        total_interest,
        book_profit,
        max_allowable_remuneration: remuneration,
        firm_tax: tax,
        distributable_profit,
        partners,
    })
}

pub fn calculate_partnership(
    input: &PartnershipInput,
) -> TaxCalcResult<ComputationOutput<PartnershipResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.interest_rate_pct > MAX_ALLOWED_INTEREST_PCT {
        warnings.push(format!(
            "Interest on capital above {MAX_ALLOWED_INTEREST_PCT}% p.a. is not deductible under Section 40(b)"
        ));
    }

    let result = compute_partnership(input)?;
    if result.book_profit <= Decimal::ZERO {
        warnings.push("Interest on capital exceeds net profit; no remuneration is allowable".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Section 40(b): monthly interest on capital, remuneration cap, firm tax at 30%",
        &serde_json::json!({
            "annual_net_profit": input.annual_net_profit.to_string(),
            "interest_rate_pct": input.interest_rate_pct.to_string(),
            "partners": input.partners.len(),
            "firm_tax_rate": FIRM_TAX_RATE.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn partner(name: &str, share: Money, capital: Money) -> Partner {
        Partner {
            name: name.into(),
            profit_share_pct: share,
            monthly_capital: vec![capital; 12],
        }
    }

    fn input(profit: Money) -> PartnershipInput {
        PartnershipInput {
            firm_name: Some("Test & Co".into()),
            annual_net_profit: profit,
            interest_rate_pct: dec!(12),
            partners: vec![
                partner("A", dec!(60), dec!(500000)),
                partner("B", dec!(40), dec!(500000)),
            ],
        }
    }

    #[test]
    fn test_remuneration_slabs() {
        assert_eq!(max_remuneration(dec!(-5)), Decimal::ZERO);
        // 90% of 2L is 1.8L, raised to the lower of 3L and book profit
        assert_eq!(max_remuneration(dec!(200000)), dec!(200000));
        assert_eq!(max_remuneration(dec!(500000)), dec!(450000));
        assert_eq!(max_remuneration(dec!(1000000)), dec!(780000));
    }

    #[test]
    fn test_interest_on_capital() {
        let r = compute_partnership(&input(dec!(2000000))).unwrap();
        // 5L x 1% x 12 months each
        assert_eq!(r.partners[0].interest_on_capital, dec!(60000));
        assert_eq!(r.total_interest, dec!(120000));
        assert_eq!(r.book_profit, dec!(1880000));
    }

    #[test]
    fn test_distribution_adds_up() {
        let r = compute_partnership(&input(dec!(2000000))).unwrap();
        // 5.4L + 12.8L x 60%
        assert_eq!(r.max_allowable_remuneration, dec!(1308000));
        assert_eq!(r.firm_tax.taxable_profit, dec!(572000));
        assert_eq!(r.firm_tax.income_tax, dec!(171600));
        assert_eq!(r.firm_tax.surcharge, Decimal::ZERO);

        let paid: Money = r.partners.iter().map(|p| p.total_earnings).sum();
        assert_eq!(paid + r.firm_tax.total_tax, dec!(2000000));
    }

    #[test]
    fn test_surcharge_above_one_crore() {
        let r = compute_partnership(&input(dec!(50000000))).unwrap();
        assert!(r.firm_tax.taxable_profit > dec!(10000000));
        assert_eq!(r.firm_tax.surcharge, r.firm_tax.income_tax * dec!(0.12));
    }

    #[test]
    fn test_shares_must_total_hundred() {
        let mut i = input(dec!(1000000));
        i.partners[1].profit_share_pct = dec!(39.8);
        assert!(compute_partnership(&i).is_err());
        i.partners[1].profit_share_pct = dec!(39.95);
        assert!(compute_partnership(&i).is_ok());
    }

    #[test]
    fn test_single_partner_rejected() {
        let mut i = input(dec!(1000000));
        i.partners.truncate(1);
        assert!(compute_partnership(&i).is_err());
    }

    #[test]
    fn test_high_interest_rate_warns() {
        let mut i = input(dec!(2000000));
        i.interest_rate_pct = dec!(15);
        let out = calculate_partnership(&i).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_out_of_range_amounts_rejected() {
        let mut i = input(Decimal::MIN);
        assert!(compute_partnership(&i).is_err());
        i = input(dec!(1000000));
        i.interest_rate_pct = dec!(1000);
        assert!(compute_partnership(&i).is_err());
        i = input(dec!(-500000));
        assert!(compute_partnership(&i).is_ok());
    }
}
