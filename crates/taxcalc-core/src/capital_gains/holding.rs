use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::TaxCalcError;
use crate::TaxCalcResult;

/// Calendar difference between purchase and sale, plus the raw day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingPeriod {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub total_days: i64,
    pub total_months: u32,
}

/// Days in the month before `date`'s month.
fn days_in_previous_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

/// Holding period by calendar arithmetic: a negative day difference borrows
/// the length of the month preceding the sale month.
pub fn holding_period(purchase: NaiveDate, sale: NaiveDate) -> TaxCalcResult<HoldingPeriod> {
    if sale < purchase {
        return Err(TaxCalcError::DateError(format!(
            "Sale date {sale} is before purchase date {purchase}"
        )));
    }

    let mut years = sale.year() - purchase.year();
    let mut months = sale.month() as i32 - purchase.month() as i32;
    let mut days = sale.day() as i32 - purchase.day() as i32;

    if days < 0 {
        months -= 1;
        days += days_in_previous_month(sale) as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    let years = years.max(0) as u32;
    let months = months.max(0) as u32;

    Ok(HoldingPeriod {
        years,
        months,
        days: days.max(0) as u32,
        total_days: (sale - purchase).num_days(),
        total_months: years * 12 + months,
    })
}
