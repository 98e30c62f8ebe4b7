use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::loans::emi::{compute_installment, LoanTerms};
use crate::time_value;
use crate::types::{
    require_non_negative, round_rupees, with_metadata, ComputationOutput, Money, Percent,
};
use crate::TaxCalcResult;

fn default_sip_return_pct() -> Percent {
    dec!(12)
}

fn default_sip_start_after_years() -> u32 {
    2
}

/// A monthly SIP run alongside a loan, sized so its returns repay the loan's
/// total interest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipOffsetInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    /// Expected SIP return, percent per annum
    #[serde(default = "default_sip_return_pct")]
    pub sip_return_pct: Percent,
    /// Years into the loan before the SIP starts; it runs until the loan ends
    #[serde(default = "default_sip_start_after_years")]
    pub sip_start_after_years: u32,
    /// SIP actually invested; defaults to the required SIP
    #[serde(default)]
    pub sip_amount: Option<Money>,
}

impl SipOffsetInput {
    pub fn validate(&self) -> TaxCalcResult<()> {
        self.terms.validate()?;
        if self.sip_return_pct < Decimal::ZERO || self.sip_return_pct > dec!(100) {
            return Err(TaxCalcError::invalid(
                "sip_return_pct",
                "Must be between 0 and 100",
            ));
        }
        if let Some(amount) = self.sip_amount {
            require_non_negative("sip_amount", amount)?;
        }
        Ok(())
    }

    pub fn sip_months(&self) -> u32 {
        self.terms
            .tenure_years
            .saturating_sub(self.sip_start_after_years)
            * 12
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipOffsetOutput {
    pub installment: Money,
    pub total_interest: Money,
    pub sip_months: u32,
    /// Smallest whole-rupee SIP whose returns cover the total interest;
    /// `None` when the SIP window earns nothing
    pub required_sip: Option<Money>,
    pub sip_amount: Money,
    pub sip_corpus: Money,
    pub total_invested: Money,
    pub sip_returns: Money,
    /// SIP returns less loan interest
    pub net_benefit: Money,
    pub can_cover_interest: bool,
}

/// Size a SIP whose gains offset the interest paid on a loan.
///
/// The SIP is invested at the start of each month (annuity due), so a rupee a
/// month returns ((1+r)^n - 1) / r * (1+r) - n over n months.
pub fn sip_offset(input: &SipOffsetInput) -> TaxCalcResult<SipOffsetOutput> {
    input.validate()?;

    let installment = compute_installment(&input.terms)?;
    let total_paid = time_value::mul(
        installment,
        Decimal::from(input.terms.total_months()),
        "total loan payment",
    )?;
    let total_interest = total_paid - input.terms.principal;

    let months = input.sip_months();
    let rate = time_value::monthly_rate(input.sip_return_pct);
    let corpus_factor = time_value::annuity_due_factor(rate, months)?;
    let returns_factor = corpus_factor - Decimal::from(months);

    let required_sip = if returns_factor > Decimal::ZERO {
        Some((total_interest / returns_factor).ceil())
    } else {
        None
    };
    let sip_amount = input
        .sip_amount
        .or(required_sip)
        .unwrap_or(Decimal::ZERO);

    let sip_corpus = time_value::mul(sip_amount, corpus_factor, "SIP corpus")?;
    let total_invested = sip_amount * Decimal::from(months);
    let sip_returns = sip_corpus - total_invested;

    Ok(SipOffsetOutput {
        installment,
        total_interest: round_rupees(total_interest),
        sip_months: months,
        required_sip,
        sip_amount,
        sip_corpus: round_rupees(sip_corpus),
        total_invested: round_rupees(total_invested),
        sip_returns: round_rupees(sip_returns),
        net_benefit: round_rupees(sip_returns - total_interest),
        can_cover_interest: sip_returns >= total_interest,
    })
}

pub fn calculate_sip_offset(
    input: &SipOffsetInput,
) -> TaxCalcResult<ComputationOutput<SipOffsetOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = sip_offset(input)?;
    if output.sip_months == 0 {
        warnings.push(format!(
            "SIP would start after the {}-year loan ends; nothing is invested",
            input.terms.tenure_years
        ));
    } else if output.required_sip.is_none() {
        warnings.push("SIP earns no return at 0%; interest cannot be offset".into());
    }
    if !output.can_cover_interest && output.sip_months > 0 {
        warnings.push(format!(
            "SIP returns fall short of loan interest by {}",
            -output.net_benefit
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly SIP (annuity due) sized so corpus minus contributions equals total loan interest",
        &serde_json::json!({
            "principal": input.terms.principal.to_string(),
            "annual_rate_pct": input.terms.annual_rate_pct.to_string(),
            "tenure_years": input.terms.tenure_years,
            "sip_return_pct": input.sip_return_pct.to_string(),
            "sip_start_after_years": input.sip_start_after_years,
            "contribution_timing": "start of month",
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loans::emi::InterestMethod;
    use pretty_assertions::assert_eq;

    fn input(sip_amount: Option<Money>) -> SipOffsetInput {
        SipOffsetInput {
            terms: LoanTerms {
                principal: dec!(1000000),
                annual_rate_pct: dec!(9),
                tenure_years: 10,
                method: InterestMethod::ReducingBalance,
            },
            sip_return_pct: dec!(12),
            sip_start_after_years: 2,
            sip_amount,
        }
    }

    #[test]
    fn test_required_sip_covers_interest() {
        let out = sip_offset(&input(None)).unwrap();
        assert_eq!(out.sip_months, 96);
        // 10 lakh at 9% over 10 years pays about 5.2 lakh of interest
        assert!(out.total_interest > dec!(520000) && out.total_interest < dec!(521000));
        let required = out.required_sip.unwrap();
        assert!(required > dec!(7900) && required < dec!(8000), "got {required}");
        assert_eq!(out.sip_amount, required);
        assert!(out.can_cover_interest);
        // Rounding up adds less than one rupee a month of returns
        assert!(out.net_benefit >= Decimal::ZERO && out.net_benefit < dec!(70));
    }

    #[test]
    fn test_small_sip_falls_short() {
        let out = calculate_sip_offset(&input(Some(dec!(1000)))).unwrap();
        assert!(!out.result.can_cover_interest);
        assert!(out.result.net_benefit < Decimal::ZERO);
        assert_eq!(out.result.total_invested, dec!(96000));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_sip_starting_after_loan_invests_nothing() {
        let mut i = input(None);
        i.sip_start_after_years = 12;
        let out = calculate_sip_offset(&i).unwrap();
        assert_eq!(out.result.sip_months, 0);
        assert_eq!(out.result.required_sip, None);
        assert_eq!(out.result.sip_corpus, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_zero_return_has_no_required_sip() {
        let mut i = input(None);
        i.sip_return_pct = Decimal::ZERO;
        let out = calculate_sip_offset(&i).unwrap();
        assert_eq!(out.result.required_sip, None);
        assert!(out.warnings[0].contains("no return"));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut i = input(Some(dec!(-1)));
        assert!(sip_offset(&i).is_err());
        i.sip_amount = None;
        i.sip_return_pct = dec!(101);
        assert!(sip_offset(&i).is_err());
    }
}
