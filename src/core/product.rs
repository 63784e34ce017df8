//! Product business logic - Handles product intake and stock queries.
//!
//! Products are created with a generated stock code and the period they were
//! taken in. Codes come from a per-month sequence allocated inside the same
//! transaction as the insert, and the `code` column is UNIQUE, so two products
//! can never share a code.

use crate::{
    core::{
        accounting::{self, MonthYear},
        require_amount, require_quantity, require_text,
    },
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Editable product fields, used for both intake and edits.
#[derive(Debug, Clone)]
pub struct ProductInput {
    /// Display name
    pub name: String,
    /// Unit purchase price
    pub purchase_price: f64,
    /// Units on hand, at least one
    pub quantity: i32,
}

impl ProductInput {
    fn validate(&self) -> Result<(String, f64, i32)> {
        let name = require_text("Product name", &self.name)?;
        let purchase_price = require_amount(self.purchase_price)?;
        let quantity = require_quantity(self.quantity)?;
        Ok((name, purchase_price, quantity))
    }
}

/// Which products an enumeration should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockFilter {
    /// Every product
    #[default]
    All,
    /// Products with units left
    InStock,
    /// Sold-out products
    Sold,
}

/// Returns the next free code for `prefix` in `month`.
///
/// Looks at every code already issued under the same `PREFIX-YYYYMM-` stem and
/// returns one past the highest sequence number. Run this on the transaction that
/// performs the insert.
pub async fn next_product_code<C>(db: &C, prefix: &str, month: MonthYear) -> Result<String>
where
    C: ConnectionTrait,
{
    let stem = accounting::code_stem(prefix, month);
    let codes: Vec<String> = Product::find()
        .filter(product::Column::Code.starts_with(&stem))
        .all(db)
        .await?
        .into_iter()
        .map(|p| p.code)
        .collect();

    let next = codes
        .iter()
        .filter_map(|code| accounting::parse_code_sequence(code, &stem))
        .max()
        .map_or(1, |highest| highest.saturating_add(1));

    Ok(accounting::format_product_code(prefix, month, next))
}

/// Takes a new product into stock for `month`.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The purchase price is negative or not finite
/// - The quantity is below one
/// - The database insert fails
pub async fn create_product(
    db: &DatabaseConnection,
    input: ProductInput,
    code_prefix: &str,
    month: MonthYear,
) -> Result<product::Model> {
    let (name, purchase_price, quantity) = input.validate()?;

    let txn = db.begin().await?;
    let code = next_product_code(&txn, code_prefix, month).await?;

    let product = product::ActiveModel {
        name: Set(name),
        purchase_price: Set(purchase_price),
        quantity: Set(quantity),
        code: Set(code),
        is_sold: Set(false),
        created_at: Set(chrono::Utc::now()),
        month_year: Set(month.to_string()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        "Added product '{}' ({}) x{} at {} for {}",
        product.name, product.code, product.quantity, product.purchase_price, product.month_year
    );
    Ok(product)
}

/// Retrieves a product by id.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by its stock code.
pub async fn get_product_by_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<product::Model>> {
    let found = Product::find()
        .filter(product::Column::Code.eq(code.trim()))
        .one(db)
        .await?;
    debug!("Product lookup by code '{}': {:?}", code, found.as_ref().map(|p| p.id));
    Ok(found)
}

/// Lists products, newest first.
pub async fn list_products(
    db: &DatabaseConnection,
    filter: StockFilter,
) -> Result<Vec<product::Model>> {
    let query = match filter {
        StockFilter::All => Product::find(),
        StockFilter::InStock => Product::find().filter(product::Column::IsSold.eq(false)),
        StockFilter::Sold => Product::find().filter(product::Column::IsSold.eq(true)),
    };

    query
        .order_by_desc(product::Column::CreatedAt)
        .order_by_desc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every product that still has stock, oldest first.
pub async fn list_unsold_products<C>(db: &C) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::IsSold.eq(false))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the products currently labelled with `month`, oldest first.
pub async fn list_products_for_month(
    db: &DatabaseConnection,
    month: MonthYear,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::MonthYear.eq(month.to_string()))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Edits the name, purchase price and quantity of an unsold product.
///
/// # Errors
/// Returns an error if the input fails validation, the product does not exist,
/// the product is already sold, or the update fails.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    let (name, purchase_price, quantity) = input.validate()?;

    let existing = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if existing.is_sold {
        return Err(Error::ProductAlreadySold { id: product_id });
    }

    let mut product: product::ActiveModel = existing.into();
    product.name = Set(name);
    product.purchase_price = Set(purchase_price);
    product.quantity = Set(quantity);

    let updated = product.update(db).await?;
    info!("Updated product {} ({})", updated.id, updated.code);
    Ok(updated)
}

/// Deletes a product. Its sales are kept.
///
/// # Errors
/// Returns `Error::ProductNotFound` if no row was deleted.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let result = Product::delete_by_id(product_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ProductNotFound { id: product_id });
    }
    info!("Deleted product {}", product_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn input(name: &str, purchase_price: f64, quantity: i32) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            purchase_price,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let month = test_month();

        let result = create_product(&db, input("   ", 10.0, 1), "AOGZ", month).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = create_product(&db, input("Phone", -10.0, 1), "AOGZ", month).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount } if amount == -10.0
        ));

        let result = create_product(&db, input("Phone", f64::NAN, 1), "AOGZ", month).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let result = create_product(&db, input("Phone", 10.0, 0), "AOGZ", month).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidQuantity { quantity: 0 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let product = create_product(&db, input("  iPhone 15 Pro ", 1000.0, 2), "AOGZ", test_month())
            .await?;

        assert_eq!(product.name, "iPhone 15 Pro");
        assert_eq!(product.purchase_price, 1000.0);
        assert_eq!(product.quantity, 2);
        assert_eq!(product.code, "AOGZ-202403-0001");
        assert_eq!(product.month_year, "2024-03");
        assert!(!product.is_sold);

        Ok(())
    }

    #[tokio::test]
    async fn test_product_codes_are_sequential_per_month() -> Result<()> {
        let db = setup_test_db().await?;
        let march = test_month();
        let april = march.next()?;

        let a = create_product(&db, input("A", 1.0, 1), "AOGZ", march).await?;
        let b = create_product(&db, input("B", 1.0, 1), "AOGZ", march).await?;
        let c = create_product(&db, input("C", 1.0, 1), "AOGZ", april).await?;

        assert_eq!(a.code, "AOGZ-202403-0001");
        assert_eq!(b.code, "AOGZ-202403-0002");
        assert_eq!(c.code, "AOGZ-202404-0001");

        // gaps left by deletions are not refilled
        delete_product(&db, a.id).await?;
        let d = create_product(&db, input("D", 1.0, 1), "AOGZ", march).await?;
        assert_eq!(d.code, "AOGZ-202403-0003");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_by_code() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Pixel 8").await?;

        let found = get_product_by_code(&db, &product.code).await?;
        assert_eq!(found.unwrap().id, product.id);

        assert!(get_product_by_code(&db, "AOGZ-190001-0001").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_products_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_product(&db, "First").await?;
        let second = create_test_product(&db, "Second").await?;

        let mut sold: product::ActiveModel = first.clone().into();
        sold.is_sold = Set(true);
        sold.quantity = Set(0);
        sold.update(&db).await?;

        let all = list_products(&db, StockFilter::All).await?;
        assert_eq!(all.len(), 2);
        // newest first
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);

        let in_stock = list_products(&db, StockFilter::InStock).await?;
        assert_eq!(in_stock.len(), 1);
        assert_eq!(in_stock[0].id, second.id);

        let sold = list_products(&db, StockFilter::Sold).await?;
        assert_eq!(sold.len(), 1);
        assert_eq!(sold[0].id, first.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_products_for_month() -> Result<()> {
        let db = setup_test_db().await?;
        let march = test_month();
        create_product(&db, input("March", 1.0, 1), "AOGZ", march).await?;
        create_product(&db, input("April", 1.0, 1), "AOGZ", march.next()?).await?;

        let products = list_products_for_month(&db, march).await?;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "March");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Original").await?;

        let updated = update_product(&db, product.id, input("Renamed", 750.0, 3)).await?;
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.purchase_price, 750.0);
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.code, product.code);

        let retrieved = get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(retrieved, updated);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_rejects_sold_and_missing() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Sold Out").await?;
        let mut sold: product::ActiveModel = product.clone().into();
        sold.is_sold = Set(true);
        sold.update(&db).await?;

        let result = update_product(&db, product.id, input("New", 1.0, 1)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductAlreadySold { id } if id == product.id
        ));

        let result = update_product(&db, 999, input("New", 1.0, 1)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { id: 999 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_keeps_sales() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "To Delete").await?;
        let sale = create_test_sale(&db, product.id, 1).await?;

        delete_product(&db, product.id).await?;
        assert!(get_product_by_id(&db, product.id).await?.is_none());

        let kept = crate::core::sale::get_sale_by_id(&db, sale.id).await?;
        assert!(kept.is_some());

        let result = delete_product(&db, product.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { .. }
        ));
        Ok(())
    }
}
