use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TaxCalcError;
use crate::TaxCalcResult;

/// All monetary values, in rupees. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Percentage points (9.0 = 9%). Used where the user enters a percentage,
/// e.g. an annual loan rate or a portfolio weight.
pub type Percent = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Largest amount any engine accepts (1,00,000 crore). Products of two
/// bounded inputs stay inside `Decimal` range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000);

fn require_bounded(field: &str, value: Money) -> TaxCalcResult<()> {
    if value > MAX_AMOUNT {
        return Err(TaxCalcError::invalid(field, format!("Must be at most {MAX_AMOUNT}")));
    }
    Ok(())
}

/// Reject negative and oversized amounts at the engine boundary.
pub(crate) fn require_non_negative(field: &str, value: Money) -> TaxCalcResult<()> {
    if value < Decimal::ZERO {
        return Err(TaxCalcError::invalid(field, "Must be zero or positive"));
    }
    require_bounded(field, value)
}

/// Reject zero, negative and oversized amounts at the engine boundary.
pub(crate) fn require_positive(field: &str, value: Money) -> TaxCalcResult<()> {
    if value <= Decimal::ZERO {
        return Err(TaxCalcError::invalid(field, "Must be positive"));
    }
    require_bounded(field, value)
}

/// Whole rupees, halves away from zero.
pub(crate) fn round_rupees(value: Money) -> Money {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
