//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the ledger tables. None of them declare relations:
//! references between tables are plain ids and are not enforced.

pub mod accessory;
pub mod debt;
pub mod monthly_period;
pub mod product;
pub mod sale;
pub mod system_state;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de};

// Re-export specific types to avoid conflicts
pub use accessory::{
    AccessoryCategory, Column as AccessoryColumn, Entity as Accessory, Model as AccessoryModel,
};
pub use debt::{Column as DebtColumn, Entity as Debt, Model as DebtModel};
pub use monthly_period::{
    Column as MonthlyPeriodColumn, Entity as MonthlyPeriod, Model as MonthlyPeriodModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use sale::{
    Column as SaleColumn, Entity as Sale, Model as SaleModel, SaleAccessories, SaleAccessory,
};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};

/// Reads a calendar date written either as `YYYY-MM-DD` or as a full
/// timestamp such as `2024-01-20T00:00:00.000Z`, keeping the UTC date.
pub(crate) fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let value = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.naive_utc().date());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(timestamp.date());
    }

    Err(de::Error::custom(format!("invalid date '{raw}'")))
}
