pub mod allocation;
pub mod capital_gains;
pub mod income_tax;
pub mod investments;
pub mod loans;
pub mod partnership;
pub mod planning;
pub mod tds;
