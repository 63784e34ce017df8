//! Pure accounting functions.
//!
//! Month arithmetic over `YYYY-MM` labels, product code formatting and net
//! profit. Nothing in here touches the database.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate};
use std::{fmt, str::FromStr};

/// A calendar month, displayed and persisted as `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    year: i32,
    month: u32,
}

impl MonthYear {
    /// Builds a month, rejecting months outside 1-12 and years outside 1-9999.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return Err(Error::InvalidMonth {
                value: format!("{year}-{month}"),
            });
        }
        Ok(Self { year, month })
    }

    /// Month containing `date`.
    #[must_use]
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Month of the local clock.
    #[must_use]
    pub fn current() -> Self {
        Self::from_date(&chrono::Local::now().date_naive())
    }

    /// Calendar year
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month number, 1-12
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The following month; December rolls into January of the next year.
    ///
    /// # Errors
    /// * `Error::InvalidMonth` - There is no month after `9999-12`
    pub fn next(self) -> Result<Self> {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Whether `date` falls inside this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// `YYYYMM`, as used inside product codes.
    #[must_use]
    pub fn compact(self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthYear {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth {
            value: s.to_string(),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).map_err(|_| invalid())
    }
}

/// Next month of a `YYYY-MM` label.
pub fn next_month_year(month_year: &str) -> Result<String> {
    Ok(month_year.parse::<MonthYear>()?.next()?.to_string())
}

/// Common start of every code issued for `prefix` in `month`: `PREFIX-YYYYMM-`.
#[must_use]
pub fn code_stem(prefix: &str, month: MonthYear) -> String {
    format!("{prefix}-{}-", month.compact())
}

/// `PREFIX-YYYYMM-XXXX`. The sequence is zero-padded to four digits and widens
/// past 9999 rather than wrapping.
#[must_use]
pub fn format_product_code(prefix: &str, month: MonthYear, sequence: u32) -> String {
    format!("{}{sequence:04}", code_stem(prefix, month))
}

/// Sequence number of `code` when it was issued under `stem`.
#[must_use]
pub fn parse_code_sequence(code: &str, stem: &str) -> Option<u32> {
    code.strip_prefix(stem)?.parse().ok()
}

/// Net profit of a single-unit sale without accessories: `sale - (purchase + cost)`.
#[must_use]
pub fn net_profit(sale_price: f64, purchase_price: f64, cost: f64) -> f64 {
    sale_price - (purchase_price + cost)
}

/// Net profit of a sale: `sale - (purchase * quantity + cost + accessory_cost)`.
#[must_use]
pub fn net_profit_with_accessories(
    sale_price: f64,
    purchase_price: f64,
    quantity: i32,
    cost: f64,
    accessory_cost: f64,
) -> f64 {
    sale_price - (purchase_price * f64::from(quantity) + cost + accessory_cost)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_next_month_rolls_year_in_december() {
        assert_eq!(next_month_year("2024-12").unwrap(), "2025-01");
    }

    #[test]
    fn test_next_month_within_year() {
        assert_eq!(next_month_year("2024-05").unwrap(), "2024-06");
    }

    #[test]
    fn test_next_month_stops_at_last_representable_month() {
        let last = MonthYear::new(9999, 12).unwrap();
        assert!(matches!(last.next(), Err(Error::InvalidMonth { .. })));
        assert!(matches!(
            next_month_year("9999-12"),
            Err(Error::InvalidMonth { .. })
        ));
        assert_eq!(
            MonthYear::new(9999, 11).unwrap().next().unwrap().to_string(),
            "9999-12"
        );
    }

    #[test]
    fn test_parse_accepts_single_digit_month() {
        let month: MonthYear = "2024-5".parse().unwrap();
        assert_eq!(month.to_string(), "2024-05");
    }

    #[test]
    fn test_parse_rejects_malformed_months() {
        for bad in ["", "2024", "2024-13", "2024-00", "24-05", "2024-05-01", "abcd-ef"] {
            assert!(
                matches!(bad.parse::<MonthYear>(), Err(Error::InvalidMonth { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_month_contains_date() {
        let month = MonthYear::new(2024, 2).unwrap();
        assert!(month.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()));
    }

    #[test]
    fn test_month_ordering_follows_calendar() {
        let dec = MonthYear::new(2024, 12).unwrap();
        assert!(dec < dec.next().unwrap());
        assert!(MonthYear::new(2024, 2).unwrap() < MonthYear::new(2024, 10).unwrap());
    }

    #[test]
    fn test_format_product_code() {
        let month = MonthYear::new(2024, 3).unwrap();
        assert_eq!(format_product_code("AOGZ", month, 7), "AOGZ-202403-0007");
        assert_eq!(format_product_code("AOGZ", month, 12345), "AOGZ-202403-12345");
    }

    #[test]
    fn test_parse_code_sequence() {
        let month = MonthYear::new(2024, 3).unwrap();
        let stem = code_stem("AOGZ", month);
        assert_eq!(parse_code_sequence("AOGZ-202403-0042", &stem), Some(42));
        assert_eq!(parse_code_sequence("AOGZ-202404-0042", &stem), None);
        assert_eq!(parse_code_sequence("AOGZ-202403-abcd", &stem), None);
    }

    #[test]
    fn test_net_profit_simple() {
        assert_eq!(net_profit(1500.0, 1000.0, 50.0), 450.0);
    }

    #[test]
    fn test_net_profit_with_accessories() {
        // 1500 - (1000 * 1 + 50 + 0) = 450
        assert_eq!(net_profit_with_accessories(1500.0, 1000.0, 1, 50.0, 0.0), 450.0);
        // 3000 - (1000 * 2 + 100 + 75) = 825
        assert_eq!(
            net_profit_with_accessories(3000.0, 1000.0, 2, 100.0, 75.0),
            825.0
        );
    }

    #[test]
    fn test_net_profit_can_be_negative() {
        assert_eq!(net_profit_with_accessories(900.0, 1000.0, 1, 0.0, 0.0), -100.0);
    }
}
