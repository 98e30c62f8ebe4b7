use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxCalcError;
use crate::types::{
    require_non_negative, require_positive, round_rupees, with_metadata, ComputationOutput, Money,
    Percent,
};
use crate::TaxCalcResult;

/// Provident fund, employee and employer share each, as a fraction of basic.
pub const PF_RATE: Decimal = dec!(0.12);
/// Gratuity accrual as a fraction of basic (15/26 days per 12 months).
pub const GRATUITY_RATE: Decimal = dec!(0.0481);
/// HRA when none is given, as a fraction of basic.
const DEFAULT_HRA_RATE: Decimal = dec!(0.5);

fn default_basic_pct() -> Percent {
    dec!(40)
}

fn default_pf() -> bool {
    true
}

fn default_professional_tax() -> Money {
    dec!(2400)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryInput {
    /// Annual cost to company
    pub ctc: Money,
    #[serde(default = "default_basic_pct")]
    pub basic_pct: Percent,
    /// Annual HRA; half of basic when absent
    #[serde(default)]
    pub hra: Option<Money>,
    /// Annual special allowance; the CTC balance when absent
    #[serde(default)]
    pub special_allowance: Option<Money>,
    #[serde(default)]
    pub bonus: Money,
    #[serde(default = "default_pf")]
    pub pf: bool,
    /// Annual professional tax
    #[serde(default = "default_professional_tax")]
    pub professional_tax: Money,
}

impl SalaryInput {
    pub fn validate(&self) -> TaxCalcResult<()> {
        require_positive("ctc", self.ctc)?;
        if self.basic_pct <= Decimal::ZERO || self.basic_pct > dec!(100) {
            return Err(TaxCalcError::invalid("basic_pct", "Must be above 0 and at most 100"));
        }
        if let Some(hra) = self.hra {
            require_non_negative("hra", hra)?;
        }
        if let Some(special) = self.special_allowance {
            require_non_negative("special_allowance", special)?;
        }
        require_non_negative("bonus", self.bonus)?;
        require_non_negative("professional_tax", self.professional_tax)
    }
}

/// Annual components, whole rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryBreakup {
    pub basic: Money,
    pub hra: Money,
    pub special_allowance: Money,
    pub bonus: Money,
    pub gross_salary: Money,
    pub employee_pf: Money,
    pub employer_pf: Money,
    pub gratuity: Money,
    pub professional_tax: Money,
    /// Employee PF plus professional tax
    pub total_deductions: Money,
    pub annual_take_home: Money,
    pub monthly_gross: Money,
    pub monthly_take_home: Money,
}

/// Split a CTC into salary components and take-home pay.
///
/// Employer PF and gratuity are reported but not subtracted from gross.
/// Income tax is not deducted.
pub fn salary_breakup(input: &SalaryInput) -> TaxCalcResult<SalaryBreakup> {
    input.validate()?;

    let basic = input.ctc * input.basic_pct / dec!(100);
    let hra = input.hra.unwrap_or(basic * DEFAULT_HRA_RATE);
    let special_allowance = match input.special_allowance {
        Some(s) => s,
        None => {
            let balance = input.ctc - basic - hra - input.bonus;
            if balance < Decimal::ZERO {
                return Err(TaxCalcError::invalid(
                    "ctc",
                    format!("Basic, HRA and bonus exceed the CTC by {}", round_rupees(-balance)),
                ));
            }
            balance
        }
    };

    let pf = if input.pf { basic * PF_RATE } else { Decimal::ZERO };
    let gratuity = basic * GRATUITY_RATE;
    let gross = basic + hra + special_allowance + input.bonus;
    let deductions = pf + input.professional_tax;
    let take_home = gross - deductions;

    Ok(SalaryBreakup {
        basic: round_rupees(basic),
        hra: round_rupees(hra),
        special_allowance: round_rupees(special_allowance),
        bonus: round_rupees(input.bonus),
        gross_salary: round_rupees(gross),
        employee_pf: round_rupees(pf),
        employer_pf: round_rupees(pf),
        gratuity: round_rupees(gratuity),
        professional_tax: round_rupees(input.professional_tax),
        total_deductions: round_rupees(deductions),
        annual_take_home: round_rupees(take_home),
        monthly_gross: round_rupees(gross / dec!(12)),
        monthly_take_home: round_rupees(take_home / dec!(12)),
    })
}

pub fn calculate_salary(input: &SalaryInput) -> TaxCalcResult<ComputationOutput<SalaryBreakup>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let breakup = salary_breakup(input)?;
    if breakup.gross_salary > input.ctc {
        warnings.push(format!(
            "Components add up to {}, above the CTC of {}",
            breakup.gross_salary, input.ctc
        ));
    }
    if breakup.annual_take_home < Decimal::ZERO {
        warnings.push("Deductions exceed gross salary".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "CTC breakup: basic share, HRA at half of basic unless given, special allowance as balance",
        &serde_json::json!({
            "pf_rate": PF_RATE.to_string(),
            "gratuity_rate": GRATUITY_RATE.to_string(),
            "default_hra_rate": DEFAULT_HRA_RATE.to_string(),
            "income_tax_deducted": false,
        }),
        warnings,
        elapsed,
        breakup,
    ))
}
