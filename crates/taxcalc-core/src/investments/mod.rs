pub mod deposit;
pub mod growth;
pub mod retirement;
pub mod sip;
pub mod swp;

use rust_decimal::Decimal;

use crate::error::TaxCalcError;
use crate::types::Percent;
use crate::TaxCalcResult;

/// Longest horizon a projection runs for.
pub const MAX_HORIZON_YEARS: u32 = 50;

/// Percentage within `0..=max`.
pub(crate) fn require_pct(field: &str, value: Percent, max: Percent) -> TaxCalcResult<()> {
    if value < Decimal::ZERO || value > max {
        return Err(TaxCalcError::invalid(
            field,
            format!("Must be between 0 and {max}"),
        ));
    }
    Ok(())
}

/// Whole years within `1..=MAX_HORIZON_YEARS`.
pub(crate) fn require_years(field: &str, years: u32) -> TaxCalcResult<()> {
    if years == 0 || years > MAX_HORIZON_YEARS {
        return Err(TaxCalcError::invalid(
            field,
            format!("Must be between 1 and {MAX_HORIZON_YEARS}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_shared_bounds() {
        assert!(require_pct("rate", dec!(100), dec!(100)).is_ok());
        assert!(require_pct("rate", dec!(-0.1), dec!(100)).is_err());
        assert!(require_years("years", 50).is_ok());
        assert!(require_years("years", 51).is_err());
        assert!(require_years("years", 0).is_err());
    }
}
