//! Discord command implementations organized by category.
//!
//! Also holds the parameter parsing shared by several commands.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Accessory inventory commands
pub mod accessory;
/// Password gate commands
pub mod auth;
/// Debt commands
pub mod debt;
/// General utility commands
pub mod general;
/// Dashboard, rollover and backup commands
pub mod ledger;
/// Product stock commands
pub mod product;
/// Sale commands
pub mod sale;

// Export commands
pub use accessory::*;
pub use auth::*;
pub use debt::*;
pub use general::*;
pub use ledger::*;
pub use product::*;
pub use sale::*;

use crate::{
    entities::AccessoryCategory,
    errors::{Error, Result},
};
use chrono::NaiveDate;

/// Accessory category as offered in slash command choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum CategoryChoice {
    /// Phone case
    #[name = "Case"]
    Case,
    /// Screen protector
    #[name = "Screen protector"]
    ScreenProtector,
    /// Cable
    #[name = "Cable"]
    Cable,
}

impl From<CategoryChoice> for AccessoryCategory {
    fn from(choice: CategoryChoice) -> Self {
        match choice {
            CategoryChoice::Case => Self::Case,
            CategoryChoice::ScreenProtector => Self::ScreenProtector,
            CategoryChoice::Cable => Self::Cable,
        }
    }
}

/// Parses an optional `YYYY-MM-DD` argument, defaulting to today.
pub fn parse_date(input: Option<&str>) -> Result<NaiveDate> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| Error::Validation {
            message: format!("Invalid date '{text}', expected YYYY-MM-DD"),
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Parses `Name:qty, Name:qty` into accessory names and quantities.
///
/// A missing `:qty` means one unit.
pub fn parse_accessory_list(input: &str) -> Result<Vec<(String, i32)>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (name, quantity) = match part.rsplit_once(':') {
                Some((name, qty)) => {
                    let quantity = qty.trim().parse().map_err(|_| Error::Validation {
                        message: format!("Invalid accessory quantity in '{part}'"),
                    })?;
                    (name.trim(), quantity)
                }
                None => (part, 1),
            };
            if name.is_empty() {
                return Err(Error::Validation {
                    message: format!("Missing accessory name in '{part}'"),
                });
            }
            Ok((name.to_string(), quantity))
        })
        .collect()
}
