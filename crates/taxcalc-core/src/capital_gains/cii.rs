//! Cost Inflation Index, base year 2001-02 = 100.

use chrono::{Datelike, NaiveDate};

/// Notified index per financial year, oldest first.
pub const CII_TABLE: [(&str, u32); 25] = [
    ("2001-02", 100),
    ("2002-03", 105),
    ("2003-04", 109),
    ("2004-05", 113),
    ("2005-06", 117),
    ("2006-07", 122),
    ("2007-08", 129),
    ("2008-09", 137),
    ("2009-10", 148),
    ("2010-11", 167),
    ("2011-12", 184),
    ("2012-13", 200),
    ("2013-14", 220),
    ("2014-15", 240),
    ("2015-16", 254),
    ("2016-17", 264),
    ("2017-18", 272),
    ("2018-19", 280),
    ("2019-20", 289),
    ("2020-21", 301),
    ("2021-22", 317),
    ("2022-23", 331),
    ("2023-24", 348),
    ("2024-25", 363),
    ("2025-26", 380),
];

/// Index of the base year; assets bought earlier use it as their cost index.
pub const BASE_INDEX: u32 = 100;

/// Most recent notified index, used when the sale year is not yet tabulated.
pub const LATEST_INDEX: u32 = CII_TABLE[CII_TABLE.len() - 1].1;

/// First day of the base year.
pub fn base_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2001, 4, 1)
}

/// Financial year label (April to March), e.g. 2025-06-01 -> "2025-26".
pub fn financial_year(date: NaiveDate) -> String {
    let start = if date.month() >= 4 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}-{:02}", start, (start + 1).rem_euclid(100))
}

pub fn index_for_year(fy: &str) -> Option<u32> {
    CII_TABLE
        .iter()
        .find(|(year, _)| *year == fy)
        .map(|(_, index)| *index)
}

pub fn index_for_date(date: NaiveDate) -> Option<u32> {
    index_for_year(&financial_year(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_financial_year_boundaries() {
        assert_eq!(financial_year(date(2025, 4, 1)), "2025-26");
        assert_eq!(financial_year(date(2025, 3, 31)), "2024-25");
        assert_eq!(financial_year(date(1999, 12, 1)), "1999-00");
    }

    #[test]
    fn test_index_lookup() {
        assert_eq!(index_for_year("2001-02"), Some(100));
        assert_eq!(index_for_year("2015-16"), Some(254));
        assert_eq!(index_for_date(date(2025, 6, 1)), Some(380));
        assert_eq!(index_for_year("2030-31"), None);
        assert_eq!(LATEST_INDEX, 380);
    }
}
