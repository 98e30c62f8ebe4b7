use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::capital_gains::cii;
use crate::capital_gains::holding::{holding_period, HoldingPeriod};
use crate::error::TaxCalcError;
use crate::types::{require_non_negative, with_metadata, ComputationOutput, Money, Rate};
use crate::TaxCalcResult;

/// Listed equity held longer than this many days is long term.
pub const EQUITY_LONG_TERM_DAYS: i64 = 365;
/// Property and other assets held longer than this many months are long term.
pub const OTHER_LONG_TERM_MONTHS: u32 = 24;

pub const EQUITY_STCG_RATE: Rate = dec!(0.20);
pub const EQUITY_LTCG_RATE: Rate = dec!(0.125);
pub const EQUITY_LTCG_EXEMPTION: Money = dec!(125000);
pub const INDEXED_LTCG_RATE: Rate = dec!(0.20);
pub const FLAT_LTCG_RATE: Rate = dec!(0.125);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Listed shares and equity-oriented funds
    Equity,
    /// Land and buildings
    Property,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxpayerStatus {
    #[default]
    Individual,
    /// Firms, LLPs and companies: no indexation option
    Firm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalGainTransaction {
    pub asset_class: AssetClass,
    pub purchase_date: NaiveDate,
    pub sale_date: NaiveDate,
    pub purchase_price: Money,
    pub sale_price: Money,
    #[serde(default)]
    pub cost_of_improvement: Money,
    /// Financial year of the improvement, e.g. "2020-21"
    #[serde(default)]
    pub improvement_year: Option<String>,
    #[serde(default)]
    pub is_grandfathered: bool,
    /// Fair market value on 31 January 2018
    #[serde(default)]
    pub fmv_jan_2018: Option<Money>,
    #[serde(default)]
    pub taxpayer_status: TaxpayerStatus,
}

impl CapitalGainTransaction {
    pub fn validate(&self) -> TaxCalcResult<()> {
        require_non_negative("purchase_price", self.purchase_price)?;
        require_non_negative("sale_price", self.sale_price)?;
        require_non_negative("cost_of_improvement", self.cost_of_improvement)?;
        if self.sale_date < self.purchase_date {
            return Err(TaxCalcError::invalid(
                "sale_date",
                "Must not be before the purchase date",
            ));
        }
        if self.is_grandfathered {
            match self.fmv_jan_2018 {
                Some(fmv) => require_non_negative("fmv_jan_2018", fmv)?,
                None => {
                    return Err(TaxCalcError::invalid(
                        "fmv_jan_2018",
                        "Required when grandfathering is claimed",
                    ))
                }
            }
        }
        Ok(())
    }
}

/// Long-term property gain with CII-indexed cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedOption {
    pub purchase_index: u32,
    pub sale_index: u32,
    pub improvement_index: Option<u32>,
    pub indexed_cost_of_acquisition: Money,
    pub indexed_cost_of_improvement: Money,
    pub gain: Money,
    pub tax_rate: Rate,
    pub tax: Money,
}

/// Long-term property gain on historical cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnindexedOption {
    pub gain: Money,
    pub tax_rate: Rate,
    pub tax: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyOption {
    Indexed,
    Unindexed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GainResult {
    /// Equity held 365 days or less, flat 20%
    EquityShortTerm {
        holding: HoldingPeriod,
        gain: Money,
        tax_rate: Rate,
        tax: Money,
    },
    /// Equity held over 365 days, 12.5% above the annual exemption
    EquityLongTerm {
        holding: HoldingPeriod,
        cost_of_acquisition: Money,
        grandfathered: bool,
        gain: Money,
        exemption: Money,
        taxable_gain: Money,
        tax_rate: Rate,
        tax: Money,
    },
    /// Property or other asset held 24 months or less; taxed with slab income
    SlabShortTerm {
        asset_class: AssetClass,
        holding: HoldingPeriod,
        gain: Money,
    },
    PropertyLongTerm {
        holding: HoldingPeriod,
        taxpayer_status: TaxpayerStatus,
        /// Not offered to firms
        indexed: Option<IndexedOption>,
        unindexed: UnindexedOption,
        recommended: PropertyOption,
        /// Tax difference between the two options
        savings: Money,
    },
    OtherLongTerm {
        holding: HoldingPeriod,
        gain: Money,
        tax_rate: Rate,
        tax: Money,
    },
}

impl GainResult {
    /// Tax computed here; `None` for gains added to slab income.
    pub fn tax(&self) -> Option<Money> {
        match self {
            GainResult::EquityShortTerm { tax, .. }
            | GainResult::EquityLongTerm { tax, .. }
            | GainResult::OtherLongTerm { tax, .. } => Some(*tax),
            GainResult::SlabShortTerm { .. } => None,
            GainResult::PropertyLongTerm {
                indexed,
                unindexed,
                recommended,
                ..
            } => match (recommended, indexed) {
                (PropertyOption::Indexed, Some(i)) => Some(i.tax),
                _ => Some(unindexed.tax),
            },
        }
    }

    pub fn is_long_term(&self) -> bool {
        !matches!(
            self,
            GainResult::EquityShortTerm { .. } | GainResult::SlabShortTerm { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Classify and tax one sale.
pub fn compute_gain(tx: &CapitalGainTransaction) -> TaxCalcResult<GainResult> {
    evaluate(tx, &mut Vec::new())
}

fn evaluate(tx: &CapitalGainTransaction, warnings: &mut Vec<String>) -> TaxCalcResult<GainResult> {
    tx.validate()?;
    let holding = holding_period(tx.purchase_date, tx.sale_date)?;

    let result = match tx.asset_class {
        AssetClass::Equity => equity_gain(tx, holding),
        AssetClass::Property => {
            if holding.total_months <= OTHER_LONG_TERM_MONTHS {
                GainResult::SlabShortTerm {
                    asset_class: AssetClass::Property,
                    holding,
                    gain: tx.sale_price - tx.purchase_price - tx.cost_of_improvement,
                }
            } else {
                property_long_term(tx, holding, warnings)?
            }
        }
        AssetClass::Other => {
            let gain = tx.sale_price - tx.purchase_price - tx.cost_of_improvement;
            if holding.total_months <= OTHER_LONG_TERM_MONTHS {
                GainResult::SlabShortTerm {
                    asset_class: AssetClass::Other,
                    holding,
                    gain,
                }
            } else {
                GainResult::OtherLongTerm {
                    holding,
                    gain,
                    tax_rate: FLAT_LTCG_RATE,
                    tax: gain.max(Decimal::ZERO) * FLAT_LTCG_RATE,
                }
            }
        }
    };

    tracing::debug!(
        asset_class = ?tx.asset_class,
        total_days = holding.total_days,
        long_term = result.is_long_term(),
        "Capital gain classified"
    );
    Ok(result)
}

fn equity_gain(tx: &CapitalGainTransaction, holding: HoldingPeriod) -> GainResult {
    if holding.total_days <= EQUITY_LONG_TERM_DAYS {
        let gain = tx.sale_price - tx.purchase_price;
        return GainResult::EquityShortTerm {
            holding,
            gain,
            tax_rate: EQUITY_STCG_RATE,
            tax: gain.max(Decimal::ZERO) * EQUITY_STCG_RATE,
        };
    }

    // Grandfathered cost: higher of actual cost and FMV capped at the sale price
    let cost_of_acquisition = match (tx.is_grandfathered, tx.fmv_jan_2018) {
        (true, Some(fmv)) => tx.purchase_price.max(fmv.min(tx.sale_price)),
        _ => tx.purchase_price,
    };
    let gain = tx.sale_price - cost_of_acquisition;
    let taxable_gain = (gain - EQUITY_LTCG_EXEMPTION).max(Decimal::ZERO);

    GainResult::EquityLongTerm {
        holding,
        cost_of_acquisition,
        grandfathered: tx.is_grandfathered,
        gain,
        exemption: EQUITY_LTCG_EXEMPTION,
        taxable_gain,
        tax_rate: EQUITY_LTCG_RATE,
        tax: taxable_gain * EQUITY_LTCG_RATE,
    }
}

fn property_long_term(
    tx: &CapitalGainTransaction,
    holding: HoldingPeriod,
    warnings: &mut Vec<String>,
) -> TaxCalcResult<GainResult> {
    let unindexed_gain = tx.sale_price - tx.purchase_price - tx.cost_of_improvement;
    let unindexed = UnindexedOption {
        gain: unindexed_gain,
        tax_rate: FLAT_LTCG_RATE,
        tax: unindexed_gain.max(Decimal::ZERO) * FLAT_LTCG_RATE,
    };

    let indexed = match tx.taxpayer_status {
        TaxpayerStatus::Firm => None,
        TaxpayerStatus::Individual => Some(indexed_option(tx, warnings)?),
    };

    let (recommended, savings) = match &indexed {
        Some(i) if i.tax < unindexed.tax => (PropertyOption::Indexed, unindexed.tax - i.tax),
        Some(i) => (PropertyOption::Unindexed, i.tax - unindexed.tax),
        None => (PropertyOption::Unindexed, Decimal::ZERO),
    };

    Ok(GainResult::PropertyLongTerm {
        holding,
        taxpayer_status: tx.taxpayer_status,
        indexed,
        unindexed,
        recommended,
        savings,
    })
}

fn indexed_option(
    tx: &CapitalGainTransaction,
    warnings: &mut Vec<String>,
) -> TaxCalcResult<IndexedOption> {
    let sale_fy = cii::financial_year(tx.sale_date);
    let sale_index = cii::index_for_year(&sale_fy).unwrap_or_else(|| {
        warnings.push(format!(
            "No CII notified for {sale_fy}; using the latest index {}",
            cii::LATEST_INDEX
        ));
        cii::LATEST_INDEX
    });

    let base = cii::base_date()
        .ok_or_else(|| TaxCalcError::DateError("Invalid CII base date".into()))?;
    let purchase_index = if tx.purchase_date < base {
        cii::BASE_INDEX
    } else {
        let purchase_fy = cii::financial_year(tx.purchase_date);
        cii::index_for_year(&purchase_fy).unwrap_or_else(|| {
            warnings.push(format!(
                "No CII notified for {purchase_fy}; using the base index {}",
                cii::BASE_INDEX
            ));
            cii::BASE_INDEX
        })
    };

    let sale_cii = Decimal::from(sale_index);
    let indexed_cost_of_acquisition =
        tx.purchase_price * sale_cii / Decimal::from(purchase_index);

    let (improvement_index, indexed_cost_of_improvement) = if tx.cost_of_improvement > Decimal::ZERO
    {
        let index = tx
            .improvement_year
            .as_deref()
            .and_then(cii::index_for_year)
            .unwrap_or(sale_index);
        (
            Some(index),
            tx.cost_of_improvement * sale_cii / Decimal::from(index),
        )
    } else {
        (None, Decimal::ZERO)
    };

    let gain = tx.sale_price - indexed_cost_of_acquisition - indexed_cost_of_improvement;

    Ok(IndexedOption {
        purchase_index,
        sale_index,
        improvement_index,
        indexed_cost_of_acquisition,
        indexed_cost_of_improvement,
        gain,
        tax_rate: INDEXED_LTCG_RATE,
        tax: gain.max(Decimal::ZERO) * INDEXED_LTCG_RATE,
    })
}

/// Capital gain with classification, options and recommendation.
pub fn calculate_capital_gains(
    tx: &CapitalGainTransaction,
) -> TaxCalcResult<ComputationOutput<GainResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = evaluate(tx, &mut warnings)?;

    if let GainResult::SlabShortTerm { .. } = result {
        warnings.push("Short-term gain is added to slab income; no flat tax computed".into());
    }
    if tx.is_grandfathered && tx.asset_class != AssetClass::Equity {
        warnings.push("Grandfathering applies to listed equity only and was ignored".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Holding-period classification with CII indexation (base 2001-02)",
        &serde_json::json!({
            "asset_class": tx.asset_class,
            "purchase_date": tx.purchase_date.to_string(),
            "sale_date": tx.sale_date.to_string(),
            "purchase_price": tx.purchase_price.to_string(),
            "sale_price": tx.sale_price.to_string(),
            "taxpayer_status": tx.taxpayer_status,
        }),
        warnings,
        elapsed,
        result,
    ))
}
