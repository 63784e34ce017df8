//! Sale entity - One sale of one or more units of a product.
//!
//! The `product_id` is a plain reference: deleting a product keeps its sales.
//! Accessories handed out with the sale are embedded as a JSON list, each entry
//! carrying the accessory unit price at the time of sale so later price edits
//! do not rewrite history.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product that was sold (not enforced)
    #[sea_orm(indexed)]
    pub product_id: i64,
    /// Customer full name
    pub customer_name: String,
    /// Calendar date of the sale
    #[sea_orm(indexed)]
    #[serde(deserialize_with = "super::deserialize_calendar_date")]
    pub sale_date: Date,
    /// Device identifier (IMEI) recorded at sale time
    pub imei: String,
    /// Total price charged to the customer
    pub sale_price: f64,
    /// Incidental cost (shipping and the like)
    pub cost: f64,
    /// `sale_price - (purchase_price * quantity + cost + accessory cost)`
    pub net_profit: f64,
    /// Units of the product sold
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    /// Accessories consumed by the sale, prices snapshotted
    #[serde(default)]
    pub accessories: SaleAccessories,
    /// When the sale row was written
    pub created_at: DateTimeUtc,
}

/// Backups written before multi-unit sales omit the quantity.
const fn default_quantity() -> i32 {
    1
}

/// Embedded accessory usage list, stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct SaleAccessories(pub Vec<SaleAccessory>);

impl SaleAccessories {
    /// Sum of `price * quantity` over every line.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.0
            .iter()
            .map(|line| line.price * f64::from(line.quantity))
            .sum()
    }

    /// Whether the sale used any accessories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One accessory line on a sale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleAccessory {
    /// Accessory that was handed out
    pub accessory_id: i64,
    /// Units consumed
    pub quantity: i32,
    /// Unit price at the time of sale
    pub price: f64,
}

/// Sales have no declared relations; see the module docs.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
