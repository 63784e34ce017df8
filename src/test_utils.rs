//! Shared test utilities for the shop ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        accessory::{self, AccessoryInput},
        accounting::MonthYear,
        debt,
        product::{self, ProductInput},
        sale::{self, AccessoryUse, NewSale},
    },
    entities::{self, AccessoryCategory},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Code prefix used by every helper.
pub const TEST_PREFIX: &str = "AOGZ";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// March 2024, the month every helper files products under.
#[allow(clippy::unwrap_used)]
pub fn test_month() -> MonthYear {
    MonthYear::new(2024, 3).unwrap()
}

/// A date inside [`test_month`].
#[allow(clippy::unwrap_used)]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `purchase_price`: 1000.0
/// * `quantity`: 1
/// * month: [`test_month`]
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    create_custom_product(db, name, 1000.0, 1).await
}

/// Creates a test product with custom price and quantity.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    purchase_price: f64,
    quantity: i32,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        ProductInput {
            name: name.to_string(),
            purchase_price,
            quantity,
        },
        TEST_PREFIX,
        test_month(),
    )
    .await
}

/// Creates a test accessory.
///
/// # Defaults
/// * `category`: case
/// * `price`: 100.0
pub async fn create_test_accessory(
    db: &DatabaseConnection,
    name: &str,
    quantity: i32,
) -> Result<entities::accessory::Model> {
    accessory::create_accessory(
        db,
        AccessoryInput {
            name: name.to_string(),
            category: AccessoryCategory::Case,
            quantity,
            price: 100.0,
        },
    )
    .await
}

/// Creates a test debt dated [`test_date`].
pub async fn create_test_debt(
    db: &DatabaseConnection,
    description: &str,
    amount: f64,
) -> Result<entities::debt::Model> {
    debt::create_debt(db, description, amount, test_date()).await
}

/// A sale of `quantity` units at 1500.0 with cost 50.0 and no accessories.
pub fn test_sale(product_id: i64, quantity: i32) -> NewSale {
    NewSale {
        product_id,
        customer_name: "Test Customer".to_string(),
        sale_date: test_date(),
        imei: "356938035643809".to_string(),
        sale_price: 1500.0,
        cost: 50.0,
        quantity,
        accessories: Vec::new(),
    }
}

/// Records [`test_sale`].
pub async fn create_test_sale(
    db: &DatabaseConnection,
    product_id: i64,
    quantity: i32,
) -> Result<entities::sale::Model> {
    sale::create_sale(db, test_sale(product_id, quantity)).await
}

/// Records [`test_sale`] with the given accessories attached.
pub async fn create_test_sale_with_accessories(
    db: &DatabaseConnection,
    product_id: i64,
    accessories: Vec<AccessoryUse>,
) -> Result<entities::sale::Model> {
    let mut new_sale = test_sale(product_id, 1);
    new_sale.accessories = accessories;
    sale::create_sale(db, new_sale).await
}

/// Sets up a test environment with one product in stock.
/// Returns (db, product) for sale-related tests.
pub async fn setup_with_product() -> Result<(DatabaseConnection, entities::product::Model)> {
    let db = setup_test_db().await?;
    let product = create_custom_product(&db, "Test Phone", 1000.0, 2).await?;
    Ok((db, product))
}
