use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;

use taxcalc_core::income_tax::engine::{self, IncomeByHead, SpecialIncome, TaxProfile};
use taxcalc_core::income_tax::slabs::TaxRegime;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RegimeArg {
    New,
    Old,
}

impl From<RegimeArg> for TaxRegime {
    fn from(r: RegimeArg) -> Self {
        match r {
            RegimeArg::New => TaxRegime::New,
            RegimeArg::Old => TaxRegime::Old,
        }
    }
}

/// Arguments for income tax computation
///
/// Deductions and special-rate income need a full profile via `--input`;
/// the flags cover a plain salaried return.
#[derive(Args)]
pub struct IncomeTaxArgs {
    /// Path to JSON/YAML tax profile (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Age at the end of the financial year
    #[arg(long)]
    pub age: Option<u32>,

    /// Gross salary
    #[arg(long, default_value = "0")]
    pub salary: Decimal,

    /// Gross annual rent received
    #[arg(long, default_value = "0")]
    pub rent: Decimal,

    /// Income from other sources
    #[arg(long, default_value = "0")]
    pub other_sources: Decimal,

    #[arg(long, value_enum, default_value = "new")]
    pub regime: RegimeArg,

    /// Do not apply the salary standard deduction
    #[arg(long)]
    pub not_salaried: bool,
}

impl IncomeTaxArgs {
    fn to_profile(&self) -> Result<TaxProfile, Box<dyn std::error::Error>> {
        Ok(TaxProfile {
            regime: self.regime.into(),
            age: self.age.ok_or("--age is required (or provide --input)")?,
            is_salaried: !self.not_salaried,
            income: IncomeByHead {
                salary: self.salary,
                house_property: self.rent,
                other_sources: self.other_sources,
            },
            special_income: SpecialIncome::default(),
            deductions: BTreeMap::new(),
        })
    }

    fn resolve(&self) -> Result<TaxProfile, Box<dyn std::error::Error>> {
        match input::read_structured(self.input.as_deref())? {
            Some(profile) => Ok(profile),
            None => self.to_profile(),
        }
    }
}

pub fn run_income_tax(args: IncomeTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.resolve()?;
    let result = engine::calculate_income_tax(&profile)?;
    Ok(serde_json::to_value(result)?)
}

/// The `--regime` flag (or profile field) is ignored: both regimes are computed.
pub fn run_regime_compare(args: IncomeTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.resolve()?;
    let result = engine::compare_tax_regimes(&profile)?;
    Ok(serde_json::to_value(result)?)
}
