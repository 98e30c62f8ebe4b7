pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "loans")]
pub mod loans;

#[cfg(feature = "income_tax")]
pub mod income_tax;

#[cfg(feature = "capital_gains")]
pub mod capital_gains;

#[cfg(feature = "allocation")]
pub mod allocation;

#[cfg(feature = "partnership")]
pub mod partnership;

#[cfg(feature = "tds")]
pub mod tds;

#[cfg(feature = "investments")]
pub mod investments;

#[cfg(feature = "planning")]
pub mod planning;

pub use error::TaxCalcError;
pub use types::*;

/// Standard result type for all taxcalc operations
pub type TaxCalcResult<T> = Result<T, TaxCalcError>;
