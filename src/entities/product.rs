//! Product entity - Represents a stocked item bought for resale.
//!
//! Each product carries its purchase price, the number of units on hand, a
//! generated stock code and the `YYYY-MM` period it currently belongs to.
//! The period label is rewritten by the monthly rollover; the code never changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "iPhone 15 Pro")
    #[sea_orm(indexed)]
    pub name: String,
    /// Unit purchase price
    pub purchase_price: f64,
    /// Units still on hand
    pub quantity: i32,
    /// Stock code in `PREFIX-YYYYMM-XXXX` form
    #[sea_orm(unique)]
    pub code: String,
    /// Set once the last unit has been sold
    #[sea_orm(indexed)]
    pub is_sold: bool,
    /// When the product was taken into stock
    pub created_at: DateTimeUtc,
    /// Owning period, `YYYY-MM`
    #[sea_orm(indexed)]
    pub month_year: String,
}

/// Products have no declared relations; sales reference them by id only.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
