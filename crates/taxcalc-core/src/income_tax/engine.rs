use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::income_tax::slabs::{self, AgeBand, SlabBand, TaxRegime};
use crate::types::{require_non_negative, with_metadata, ComputationOutput, Money, Rate};
use crate::TaxCalcResult;

const MAX_AGE: u32 = 130;
const SENIOR_AGE: u32 = 60;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Income under the heads taxed at slab rates, before head-level deductions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeByHead {
    #[serde(default)]
    pub salary: Money,
    /// Gross annual rent received
    #[serde(default)]
    pub house_property: Money,
    #[serde(default)]
    pub other_sources: Money,
}

/// Income taxed at flat rates outside the slabs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialIncome {
    /// Listed equity LTCG, Section 112A
    #[serde(default)]
    pub ltcg_112a: Money,
    /// Listed equity STCG, Section 111A
    #[serde(default)]
    pub stcg_111a: Money,
    #[serde(default)]
    pub ltcg_other: Money,
    /// Lottery, game show and online game winnings
    #[serde(default)]
    pub winnings: Money,
}

impl SpecialIncome {
    pub fn total(&self) -> Money {
        self.ltcg_112a + self.stcg_111a + self.ltcg_other + self.winnings
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeductionSection {
    /// Employer NPS contribution
    #[serde(rename = "80ccd2")]
    Section80Ccd2,
    /// Section 57(iia)
    #[serde(rename = "family_pension")]
    FamilyPension,
    #[serde(rename = "80c")]
    Section80C,
    /// NPS self contribution
    #[serde(rename = "80ccd1b")]
    Section80Ccd1B,
    /// Medical insurance premium
    #[serde(rename = "80d")]
    Section80D,
    /// Section 24(b), set off within house property
    #[serde(rename = "home_loan_interest")]
    HomeLoanInterest,
    /// Savings account interest, below 60
    #[serde(rename = "80tta")]
    Section80Tta,
    /// Deposit interest, 60 and above
    #[serde(rename = "80ttb")]
    Section80Ttb,
    /// Education loan interest
    #[serde(rename = "80e")]
    Section80E,
}

impl DeductionSection {
    /// Statutory ceiling, `None` where the section is uncapped.
    pub fn cap(self) -> Option<Money> {
        match self {
            DeductionSection::FamilyPension => Some(dec!(15000)),
            DeductionSection::Section80C => Some(dec!(150000)),
            DeductionSection::Section80Ccd1B => Some(dec!(50000)),
            DeductionSection::HomeLoanInterest => Some(dec!(200000)),
            DeductionSection::Section80Tta => Some(dec!(10000)),
            DeductionSection::Section80Ttb => Some(dec!(50000)),
            DeductionSection::Section80Ccd2
            | DeductionSection::Section80D
            | DeductionSection::Section80E => None,
        }
    }

    pub fn allowed_in(self, regime: TaxRegime) -> bool {
        match regime {
            TaxRegime::New => matches!(
                self,
                DeductionSection::Section80Ccd2 | DeductionSection::FamilyPension
            ),
            TaxRegime::Old => !matches!(self, DeductionSection::FamilyPension),
        }
    }

    /// Home loan interest reduces house property income instead.
    pub fn is_chapter_via(self) -> bool {
        !matches!(self, DeductionSection::HomeLoanInterest)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxProfile {
    #[serde(default)]
    pub regime: TaxRegime,
    pub age: u32,
    #[serde(default = "default_salaried")]
    pub is_salaried: bool,
    #[serde(default)]
    pub income: IncomeByHead,
    #[serde(default)]
    pub special_income: SpecialIncome,
    /// Claimed amounts by section; sections the regime does not allow are ignored.
    #[serde(default)]
    pub deductions: BTreeMap<DeductionSection, Money>,
}

fn default_salaried() -> bool {
    true
}

impl TaxProfile {
    pub fn validate(&self) -> TaxCalcResult<()> {
        if self.age > MAX_AGE {
            return Err(TaxCalcError::invalid("age", format!("Must be at most {MAX_AGE}")));
        }
        require_non_negative("income.salary", self.income.salary)?;
        require_non_negative("income.house_property", self.income.house_property)?;
        require_non_negative("income.other_sources", self.income.other_sources)?;
        require_non_negative("special_income.ltcg_112a", self.special_income.ltcg_112a)?;
        require_non_negative("special_income.stcg_111a", self.special_income.stcg_111a)?;
        require_non_negative("special_income.ltcg_other", self.special_income.ltcg_other)?;
        require_non_negative("special_income.winnings", self.special_income.winnings)?;

        for (&section, &amount) in &self.deductions {
            let field = format!("deductions.{}", section_key(section));
            require_non_negative(&field, amount)?;
            // Claims the regime ignores are reported, not checked
            if !section.allowed_in(self.regime) {
                continue;
            }
            if let Some(cap) = section.cap() {
                if amount > cap {
                    return Err(TaxCalcError::invalid(&field, format!("Exceeds the limit of {cap}")));
                }
            }
            if amount > Decimal::ZERO {
                match section {
                    DeductionSection::Section80Tta if self.age >= SENIOR_AGE => {
                        return Err(TaxCalcError::invalid(
                            &field,
                            "Available only below age 60; claim 80TTB instead",
                        ));
                    }
                    DeductionSection::Section80Ttb if self.age < SENIOR_AGE => {
                        return Err(TaxCalcError::invalid(&field, "Available only from age 60"));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn claimed(&self, section: DeductionSection) -> Money {
        if section.allowed_in(self.regime) {
            self.deductions.get(&section).copied().unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }

    fn ignored_deductions(&self) -> Vec<DeductionSection> {
        self.deductions
            .iter()
            .filter(|(s, a)| **a > Decimal::ZERO && !s.allowed_in(self.regime))
            .map(|(s, _)| *s)
            .collect()
    }
}

fn section_key(section: DeductionSection) -> String {
    serde_json::to_value(section)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadIncome {
    pub standard_deduction: Money,
    pub net_salary: Money,
    pub rent_standard_deduction: Money,
    pub home_loan_interest_allowed: Money,
    /// Negative when the home loan interest exceeds net rent
    pub net_house_property: Money,
    pub other_sources: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialTax {
    pub ltcg_112a: Money,
    pub stcg_111a: Money,
    pub ltcg_other: Money,
    pub winnings: Money,
}

impl SpecialTax {
    /// Tax on income whose surcharge rate is capped.
    pub fn capped(&self) -> Money {
        self.ltcg_112a + self.stcg_111a + self.ltcg_other
    }

    pub fn total(&self) -> Money {
        self.capped() + self.winnings
    }
}

/// Section 87A outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RebateOutcome {
    NotEligible,
    Full { rebate: Money },
    /// Tax limited to the income above the rebate limit
    MarginalRelief { relief: Money },
}

impl RebateOutcome {
    pub fn amount(&self) -> Money {
        match self {
            RebateOutcome::NotEligible => Decimal::ZERO,
            RebateOutcome::Full { rebate } => *rebate,
            RebateOutcome::MarginalRelief { relief } => *relief,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurchargeOutcome {
    pub normal_rate: Rate,
    pub special_capped_rate: Rate,
    pub surcharge: Money,
    /// Threshold whose marginal relief was tested
    pub relief_threshold: Option<Money>,
    pub marginal_relief: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxResult {
    pub regime: TaxRegime,
    pub age_band: AgeBand,
    pub heads: HeadIncome,
    pub normal_income: Money,
    pub special_income: Money,
    pub gross_total_income: Money,
    pub chapter_via_claimed: Money,
    pub deductions_applied: Money,
    pub ignored_deductions: Vec<DeductionSection>,
    pub net_normal_income: Money,
    pub total_taxable_income: Money,
    pub slab_breakdown: Vec<SlabBand>,
    pub tax_on_normal: Money,
    pub special_tax: SpecialTax,
    pub basic_tax: Money,
    pub rebate: RebateOutcome,
    pub tax_after_rebate: Money,
    pub surcharge: SurchargeOutcome,
    pub tax_before_cess: Money,
    pub cess: Money,
    pub final_tax_payable: Money,
    /// Final tax over total taxable income
    pub effective_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub new_regime: TaxResult,
    pub old_regime: TaxResult,
    pub recommended: TaxRegime,
    pub savings: Money,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Tax liability for one profile.
///
/// Stages run in a fixed order: head incomes, gross total income, Chapter
/// VI-A deductions (limited to normal income), slab tax, flat tax on special
/// income, Section 87A rebate, surcharge, marginal relief on surcharge, cess.
pub fn compute_tax(profile: &TaxProfile) -> TaxCalcResult<TaxResult> {
    profile.validate()?;

    let regime = profile.regime;
    let age_band = AgeBand::from_age(profile.age);

    // ---- Net income per head ----
    let standard_deduction = slabs::standard_deduction(regime, profile.is_salaried);
    let net_salary = (profile.income.salary - standard_deduction).max(Decimal::ZERO);

    let rent = profile.income.house_property;
    let rent_standard_deduction = rent * slabs::RENT_STANDARD_DEDUCTION_RATE;
    let home_loan_interest = profile.claimed(DeductionSection::HomeLoanInterest);
    let net_house_property = (rent - rent_standard_deduction - home_loan_interest)
        .max(slabs::HOUSE_PROPERTY_LOSS_FLOOR.min(rent - rent_standard_deduction));
    let home_loan_interest_allowed = rent - rent_standard_deduction - net_house_property;

    let heads = HeadIncome {
        standard_deduction: profile.income.salary.min(standard_deduction),
        net_salary,
        rent_standard_deduction,
        home_loan_interest_allowed,
        net_house_property,
        other_sources: profile.income.other_sources,
    };

    // ---- Gross total income ----
    let normal_income = net_salary + net_house_property + profile.income.other_sources;
    let special_income = profile.special_income.total();
    let gross_total_income = normal_income + special_income;

    // ---- Chapter VI-A ----
    let chapter_via_claimed: Money = profile
        .deductions
        .keys()
        .filter(|s| s.is_chapter_via())
        .map(|s| profile.claimed(*s))
        .sum();
    let deductions_applied = chapter_via_claimed.min(normal_income.max(Decimal::ZERO));
    let net_normal_income = (normal_income - deductions_applied).max(Decimal::ZERO);
    let total_taxable_income = net_normal_income + special_income;

    // ---- Slab and flat taxes ----
    let schedule = slabs::slabs_for(regime, age_band);
    let slab_breakdown = slabs::slab_breakdown(net_normal_income, schedule);
    let tax_on_normal: Money = slab_breakdown.iter().map(|b| b.tax).sum();

    let special = &profile.special_income;
    let special_tax = SpecialTax {
        ltcg_112a: (special.ltcg_112a - slabs::LTCG_112A_EXEMPTION).max(Decimal::ZERO)
            * slabs::LTCG_112A_RATE,
        stcg_111a: special.stcg_111a * slabs::STCG_111A_RATE,
        ltcg_other: special.ltcg_other * slabs::LTCG_OTHER_RATE,
        winnings: special.winnings * slabs::WINNINGS_RATE,
    };
    let basic_tax = tax_on_normal + special_tax.total();

    tracing::debug!(
        ?regime,
        %net_normal_income,
        %tax_on_normal,
        special_tax = %special_tax.total(),
        "Slab and special-rate tax computed"
    );

    // ---- Rebate ----
    let rebate = rebate_87a(regime, total_taxable_income, basic_tax);
    let tax_after_rebate = basic_tax - rebate.amount();

    // ---- Surcharge ----
    let surcharge = if tax_after_rebate > Decimal::ZERO {
        surcharge_with_relief(
            regime,
            schedule,
            total_taxable_income,
            tax_on_normal,
            &special_tax,
            tax_after_rebate,
        )
    } else {
        SurchargeOutcome::default()
    };

    // ---- Cess ----
    let tax_before_cess = tax_after_rebate + surcharge.surcharge - surcharge.marginal_relief;
    let cess = tax_before_cess * slabs::CESS_RATE;
    let final_tax_payable = tax_before_cess + cess;

    let effective_rate = if total_taxable_income > Decimal::ZERO {
        final_tax_payable / total_taxable_income
    } else {
        Decimal::ZERO
    };

    Ok(TaxResult {
        regime,
        age_band,
        heads,
        normal_income,
        special_income,
        gross_total_income,
        chapter_via_claimed,
        deductions_applied,
        ignored_deductions: profile.ignored_deductions(),
        net_normal_income,
        total_taxable_income,
        slab_breakdown,
        tax_on_normal,
        special_tax,
        basic_tax,
        rebate,
        tax_after_rebate,
        surcharge,
        tax_before_cess,
        cess,
        final_tax_payable,
        effective_rate,
    })
}

/// Section 87A. Eligibility is tested on total taxable income, special
/// income included.
fn rebate_87a(regime: TaxRegime, total_taxable_income: Money, basic_tax: Money) -> RebateOutcome {
    match regime {
        TaxRegime::New => {
            if total_taxable_income <= slabs::NEW_REBATE_INCOME_LIMIT {
                RebateOutcome::Full {
                    rebate: basic_tax.min(slabs::NEW_REBATE_MAX),
                }
            } else if total_taxable_income <= slabs::NEW_REBATE_RELIEF_LIMIT {
                let income_over_limit = total_taxable_income - slabs::NEW_REBATE_INCOME_LIMIT;
                if basic_tax > income_over_limit {
                    tracing::debug!(%income_over_limit, "Section 87A marginal relief applied");
                    RebateOutcome::MarginalRelief {
                        relief: basic_tax - income_over_limit,
                    }
                } else {
                    RebateOutcome::NotEligible
                }
            } else {
                RebateOutcome::NotEligible
            }
        }
        TaxRegime::Old => {
            if total_taxable_income <= slabs::OLD_REBATE_INCOME_LIMIT {
                RebateOutcome::Full {
                    rebate: basic_tax.min(slabs::OLD_REBATE_MAX),
                }
            } else {
                RebateOutcome::NotEligible
            }
        }
    }
}

/// Surcharge on the tax components, then marginal relief against the highest
/// threshold crossed: tax plus surcharge may exceed the slab tax (with
/// surcharge) at the threshold by no more than the income above it.
fn surcharge_with_relief(
    regime: TaxRegime,
    schedule: &[slabs::Slab],
    total_taxable_income: Money,
    tax_on_normal: Money,
    special_tax: &SpecialTax,
    tax_after_rebate: Money,
) -> SurchargeOutcome {
    let normal_rate = slabs::surcharge_rate(regime, total_taxable_income);
    let special_capped_rate = normal_rate.min(slabs::SPECIAL_SURCHARGE_CAP);

    let surcharge = (tax_on_normal + special_tax.winnings) * normal_rate
        + special_tax.capped() * special_capped_rate;

    let crossed = slabs::surcharge_bands(regime)
        .into_iter()
        .find(|b| total_taxable_income > b.threshold);

    let (relief_threshold, marginal_relief) = match crossed {
        Some(band) => {
            let tax_at_threshold = slabs::slab_tax(band.threshold, schedule);
            let rate_at_threshold = slabs::surcharge_rate(regime, band.threshold);
            let max_payable = tax_at_threshold * (Decimal::ONE + rate_at_threshold)
                + (total_taxable_income - band.threshold);
            let excess = tax_after_rebate + surcharge - max_payable;
            // Relief only ever gives back surcharge
            let relief = excess.max(Decimal::ZERO).min(surcharge);
            if relief > Decimal::ZERO {
                tracing::debug!(
                    threshold = %band.threshold,
                    %relief,
                    "Marginal relief on surcharge applied"
                );
            }
            (Some(band.threshold), relief)
        }
        None => (None, Decimal::ZERO),
    };

    SurchargeOutcome {
        normal_rate,
        special_capped_rate,
        surcharge,
        relief_threshold,
        marginal_relief,
    }
}

/// Evaluate the same profile under both regimes.
pub fn compare_regimes(profile: &TaxProfile) -> TaxCalcResult<RegimeComparison> {
    let under = |regime: TaxRegime| {
        let mut p = profile.clone();
        p.regime = regime;
        compute_tax(&p)
    };
    let new_regime = under(TaxRegime::New)?;
    let old_regime = under(TaxRegime::Old)?;

    let (recommended, savings) = if old_regime.final_tax_payable < new_regime.final_tax_payable {
        (
            TaxRegime::Old,
            new_regime.final_tax_payable - old_regime.final_tax_payable,
        )
    } else {
        (
            TaxRegime::New,
            old_regime.final_tax_payable - new_regime.final_tax_payable,
        )
    };

    Ok(RegimeComparison {
        new_regime,
        old_regime,
        recommended,
        savings,
    })
}

fn ignored_warnings(result: &TaxResult) -> Vec<String> {
    result
        .ignored_deductions
        .iter()
        .map(|s| {
            format!(
                "Deduction {} is not available under the {:?} regime and was ignored",
                section_key(*s),
                result.regime
            )
        })
        .collect()
}

fn profile_assumptions(profile: &TaxProfile) -> serde_json::Value {
    serde_json::json!({
        "assessment_year": "2026-27",
        "regime": profile.regime,
        "age": profile.age,
        "is_salaried": profile.is_salaried,
        "cess_rate": slabs::CESS_RATE.to_string(),
    })
}

pub fn calculate_income_tax(profile: &TaxProfile) -> TaxCalcResult<ComputationOutput<TaxResult>> {
    let start = Instant::now();

    let result = compute_tax(profile)?;
    let warnings = ignored_warnings(&result);
    for w in &warnings {
        tracing::warn!("{w}");
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Progressive slab tax with Section 87A rebate, surcharge marginal relief and 4% cess",
        &profile_assumptions(profile),
        warnings,
        elapsed,
        result,
    ))
}

pub fn compare_tax_regimes(
    profile: &TaxProfile,
) -> TaxCalcResult<ComputationOutput<RegimeComparison>> {
    let start = Instant::now();

    let comparison = compare_regimes(profile)?;
    let mut warnings = ignored_warnings(&comparison.new_regime);
    warnings.extend(ignored_warnings(&comparison.old_regime));

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Old vs new regime comparison on identical income and claims",
        &profile_assumptions(profile),
        warnings,
        elapsed,
        comparison,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn profile(regime: TaxRegime, other_sources: Money) -> TaxProfile {
        TaxProfile {
            regime,
            age: 35,
            is_salaried: false,
            income: IncomeByHead {
                other_sources,
                ..Default::default()
            },
            special_income: SpecialIncome::default(),
            deductions: BTreeMap::new(),
        }
    }

    #[test]
    fn test_full_rebate_at_twelve_lakh() {
        let r = compute_tax(&profile(TaxRegime::New, dec!(1200000))).unwrap();
        assert_eq!(r.basic_tax, dec!(60000));
        assert_eq!(r.rebate, RebateOutcome::Full { rebate: dec!(60000) });
        assert_eq!(r.final_tax_payable, Decimal::ZERO);
    }

    #[test]
    fn test_salaried_standard_deduction_new_regime() {
        let mut p = profile(TaxRegime::New, Decimal::ZERO);
        p.is_salaried = true;
        p.income.salary = dec!(1275000);
        let r = compute_tax(&p).unwrap();
        assert_eq!(r.heads.net_salary, dec!(1200000));
        assert_eq!(r.final_tax_payable, Decimal::ZERO);
    }

    #[test]
    fn test_rebate_marginal_relief_band() {
        let r = compute_tax(&profile(TaxRegime::New, dec!(1250000))).unwrap();
        // basic 67,500; tax limited to the 50,000 above the limit
        assert_eq!(r.rebate, RebateOutcome::MarginalRelief { relief: dec!(17500) });
        assert_eq!(r.tax_after_rebate, dec!(50000));
        assert_eq!(r.final_tax_payable, dec!(52000));
    }

    #[test]
    fn test_no_rebate_above_relief_band() {
        let r = compute_tax(&profile(TaxRegime::New, dec!(1270001))).unwrap();
        assert_eq!(r.rebate, RebateOutcome::NotEligible);
        assert_eq!(r.tax_after_rebate, dec!(70500.15));
    }

    #[test]
    fn test_old_regime_with_80c() {
        let mut p = profile(TaxRegime::Old, Decimal::ZERO);
        p.is_salaried = true;
        p.income.salary = dec!(1000000);
        p.deductions.insert(DeductionSection::Section80C, dec!(150000));
        let r = compute_tax(&p).unwrap();
        assert_eq!(r.net_normal_income, dec!(800000));
        // 12,500 + 3,00,000 @ 20%
        assert_eq!(r.basic_tax, dec!(72500));
        assert_eq!(r.final_tax_payable, dec!(75400));
    }

    #[test]
    fn test_old_regime_rebate_at_five_lakh() {
        let r = compute_tax(&profile(TaxRegime::Old, dec!(500000))).unwrap();
        assert_eq!(r.rebate, RebateOutcome::Full { rebate: dec!(12500) });
        assert_eq!(r.final_tax_payable, Decimal::ZERO);
    }

    #[test]
    fn test_deduction_over_cap_rejected() {
        let mut p = profile(TaxRegime::Old, dec!(1000000));
        p.deductions.insert(DeductionSection::Section80C, dec!(150001));
        assert!(compute_tax(&p).is_err());
    }

    #[test]
    fn test_80ttb_requires_senior() {
        let mut p = profile(TaxRegime::Old, dec!(1000000));
        p.deductions.insert(DeductionSection::Section80Ttb, dec!(10000));
        assert!(compute_tax(&p).is_err());
        p.age = 65;
        assert!(compute_tax(&p).is_ok());
    }

    #[test]
    fn test_negative_income_rejected() {
        assert!(compute_tax(&profile(TaxRegime::New, dec!(-1))).is_err());
    }

    #[test]
    fn test_other_regime_deductions_ignored() {
        let mut p = profile(TaxRegime::New, dec!(1500000));
        p.deductions.insert(DeductionSection::Section80C, dec!(150000));
        let r = compute_tax(&p).unwrap();
        assert_eq!(r.deductions_applied, Decimal::ZERO);
        assert_eq!(r.ignored_deductions, vec![DeductionSection::Section80C]);

        let out = calculate_income_tax(&p).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_over_cap_claim_ignored_under_new_regime() {
        let mut p = profile(TaxRegime::New, dec!(1500000));
        p.deductions.insert(DeductionSection::Section80C, dec!(200000));
        p.deductions.insert(DeductionSection::Section80Ttb, dec!(80000));
        let r = compute_tax(&p).unwrap();
        assert_eq!(r.deductions_applied, Decimal::ZERO);
        assert_eq!(
            r.ignored_deductions,
            vec![DeductionSection::Section80C, DeductionSection::Section80Ttb]
        );

        // The same claims are still checked where the regime applies them
        p.regime = TaxRegime::Old;
        assert!(compute_tax(&p).is_err());
    }

    #[test]
    fn test_house_property_loss_floor() {
        let mut p = profile(TaxRegime::Old, dec!(1000000));
        p.deductions.insert(DeductionSection::HomeLoanInterest, dec!(200000));
        p.income.house_property = dec!(100000);
        let r = compute_tax(&p).unwrap();
        // 70,000 net rent less 2,00,000 interest
        assert_eq!(r.heads.net_house_property, dec!(-130000));
        assert_eq!(r.normal_income, dec!(870000));

        p.regime = TaxRegime::New;
        let r = compute_tax(&p).unwrap();
        assert_eq!(r.heads.net_house_property, dec!(70000));
        assert_eq!(r.heads.home_loan_interest_allowed, Decimal::ZERO);
    }

    #[test]
    fn test_deductions_limited_to_normal_income() {
        let mut p = profile(TaxRegime::Old, dec!(100000));
        p.special_income.stcg_111a = dec!(600000);
        p.deductions.insert(DeductionSection::Section80C, dec!(150000));
        let r = compute_tax(&p).unwrap();
        assert_eq!(r.deductions_applied, dec!(100000));
        assert_eq!(r.net_normal_income, Decimal::ZERO);
        assert_eq!(r.total_taxable_income, dec!(600000));
        assert_eq!(r.basic_tax, dec!(120000));
    }

    #[test]
    fn test_ltcg_112a_exemption() {
        let mut p = profile(TaxRegime::New, dec!(2000000));
        p.special_income.ltcg_112a = dec!(225000);
        let r = compute_tax(&p).unwrap();
        assert_eq!(r.special_tax.ltcg_112a, dec!(12500));
    }

    #[test]
    fn test_surcharge_marginal_relief_above_fifty_lakh() {
        let r = compute_tax(&profile(TaxRegime::New, dec!(5010000))).unwrap();
        assert_eq!(r.tax_on_normal, dec!(1083000));
        assert_eq!(r.surcharge.surcharge, dec!(108300));
        // Tax at 50L is 10,80,000; payable capped at that plus the 10,000 excess
        assert_eq!(r.surcharge.marginal_relief, dec!(101300));
        assert_eq!(r.tax_before_cess, dec!(1090000));
        assert_eq!(r.final_tax_payable, dec!(1133600));
    }

    #[test]
    fn test_surcharge_without_relief() {
        let r = compute_tax(&profile(TaxRegime::New, dec!(6000000))).unwrap();
        assert_eq!(r.surcharge.normal_rate, dec!(0.10));
        assert_eq!(r.surcharge.surcharge, dec!(138000));
        assert_eq!(r.surcharge.marginal_relief, Decimal::ZERO);
    }

    #[test]
    fn test_special_surcharge_capped_at_fifteen_percent() {
        let mut p = profile(TaxRegime::New, dec!(30000000));
        p.special_income.stcg_111a = dec!(1000000);
        p.special_income.winnings = dec!(1000000);
        let r = compute_tax(&p).unwrap();
        assert_eq!(r.surcharge.normal_rate, dec!(0.25));
        assert_eq!(r.surcharge.special_capped_rate, dec!(0.15));
        let expected = (r.tax_on_normal + dec!(300000)) * dec!(0.25) + dec!(200000) * dec!(0.15);
        assert_eq!(r.surcharge.surcharge, expected);
    }

    #[test]
    fn test_compare_regimes_recommends_lower() {
        let mut p = profile(TaxRegime::New, Decimal::ZERO);
        p.is_salaried = true;
        p.income.salary = dec!(1500000);
        let cmp = compare_regimes(&p).unwrap();
        assert_eq!(cmp.recommended, TaxRegime::New);
        assert_eq!(
            cmp.savings,
            cmp.old_regime.final_tax_payable - cmp.new_regime.final_tax_payable
        );
    }

    #[test]
    fn test_deduction_section_serde_keys() {
        let json = r#"{"age": 40, "deductions": {"80c": "150000", "80ccd1b": "50000"}}"#;
        let p: TaxProfile = serde_json::from_str(json).unwrap();
        assert!(p.is_salaried);
        assert_eq!(p.deductions.get(&DeductionSection::Section80C), Some(&dec!(150000)));
        assert_eq!(section_key(DeductionSection::Section80Ccd1B), "80ccd1b");
    }
}
