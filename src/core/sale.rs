//! Sale business logic - Records sales and keeps stock in step.
//!
//! A sale touches up to three tables: the sale row itself, the sold product's
//! quantity and the quantities of any accessories handed out. All of it runs in
//! one transaction, and every check happens before the first write.

use crate::{
    core::{accounting, require_amount, require_quantity, require_text},
    entities::{
        Accessory, Product, Sale, SaleAccessories, SaleAccessory, accessory, product, sale,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// One accessory requested with a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessoryUse {
    /// Accessory handed out
    pub accessory_id: i64,
    /// Units handed out
    pub quantity: i32,
}

/// Input for [`create_sale`].
#[derive(Debug, Clone)]
pub struct NewSale {
    /// Product being sold
    pub product_id: i64,
    /// Customer full name
    pub customer_name: String,
    /// Calendar date of the sale
    pub sale_date: NaiveDate,
    /// Device identifier
    pub imei: String,
    /// Total price charged
    pub sale_price: f64,
    /// Incidental cost
    pub cost: f64,
    /// Units of the product sold
    pub quantity: i32,
    /// Accessories handed out with the sale
    pub accessories: Vec<AccessoryUse>,
}

/// Editable fields of a recorded sale.
#[derive(Debug, Clone)]
pub struct SaleUpdate {
    /// Customer full name
    pub customer_name: String,
    /// Total price charged
    pub sale_price: f64,
    /// Incidental cost
    pub cost: f64,
    /// Calendar date of the sale
    pub sale_date: NaiveDate,
}

/// Merges repeated accessory ids, keeping first-seen order.
fn merge_accessory_uses(uses: &[AccessoryUse]) -> Result<Vec<AccessoryUse>> {
    let mut merged: Vec<AccessoryUse> = Vec::with_capacity(uses.len());
    for usage in uses {
        require_quantity(usage.quantity)?;
        match merged
            .iter_mut()
            .find(|m| m.accessory_id == usage.accessory_id)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(usage.quantity).ok_or(
                    Error::InvalidQuantity {
                        quantity: usage.quantity,
                    },
                )?;
            }
            None => merged.push(*usage),
        }
    }
    Ok(merged)
}

/// Records a sale.
///
/// Inserts the sale with accessory prices snapshotted and net profit computed,
/// takes each accessory's units out of stock (never below zero), then lowers the
/// product quantity and marks it sold when nothing is left.
///
/// # Errors
/// Returns an error if:
/// - The customer name or IMEI is empty
/// - The sale price or cost is negative or not finite
/// - The quantity, or any accessory quantity, is below one
/// - The product does not exist (`ProductNotFound`) or is sold (`ProductAlreadySold`)
/// - The product or an accessory has fewer units than requested (`InsufficientStock`)
/// - An accessory does not exist (`AccessoryNotFound`)
/// - Any database write fails; nothing is persisted in that case
pub async fn create_sale(db: &DatabaseConnection, new_sale: NewSale) -> Result<sale::Model> {
    let customer_name = require_text("Customer name", &new_sale.customer_name)?;
    let imei = require_text("IMEI", &new_sale.imei)?;
    let sale_price = require_amount(new_sale.sale_price)?;
    let cost = require_amount(new_sale.cost)?;
    let quantity = require_quantity(new_sale.quantity)?;
    let uses = merge_accessory_uses(&new_sale.accessories)?;

    let txn = db.begin().await?;

    let product = Product::find_by_id(new_sale.product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound {
            id: new_sale.product_id,
        })?;

    if product.is_sold {
        return Err(Error::ProductAlreadySold { id: product.id });
    }
    if quantity > product.quantity {
        return Err(Error::InsufficientStock {
            item: product.name,
            available: product.quantity,
            requested: quantity,
        });
    }

    let mut used = Vec::with_capacity(uses.len());
    for usage in &uses {
        let accessory = Accessory::find_by_id(usage.accessory_id)
            .one(&txn)
            .await?
            .ok_or(Error::AccessoryNotFound {
                id: usage.accessory_id,
            })?;
        if accessory.quantity < usage.quantity {
            return Err(Error::InsufficientStock {
                item: accessory.name,
                available: accessory.quantity,
                requested: usage.quantity,
            });
        }
        used.push((accessory, usage.quantity));
    }

    let lines = SaleAccessories(
        used.iter()
            .map(|(accessory, qty)| SaleAccessory {
                accessory_id: accessory.id,
                quantity: *qty,
                price: accessory.price,
            })
            .collect(),
    );

    let net_profit = accounting::net_profit_with_accessories(
        sale_price,
        product.purchase_price,
        quantity,
        cost,
        lines.total_cost(),
    );

    let sale = sale::ActiveModel {
        product_id: Set(product.id),
        customer_name: Set(customer_name),
        sale_date: Set(new_sale.sale_date),
        imei: Set(imei),
        sale_price: Set(sale_price),
        cost: Set(cost),
        net_profit: Set(net_profit),
        quantity: Set(quantity),
        accessories: Set(lines),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for (accessory, qty) in used {
        let remaining = (accessory.quantity - qty).max(0);
        let mut active: accessory::ActiveModel = accessory.into();
        active.quantity = Set(remaining);
        active.update(&txn).await?;
    }

    let remaining = product.quantity - quantity;
    let mut active: product::ActiveModel = product.into();
    active.quantity = Set(remaining);
    active.is_sold = Set(remaining == 0);
    active.update(&txn).await?;

    txn.commit().await?;

    info!(
        "Recorded sale {} of product {} x{} to '{}' (net profit {:.2}, {} left)",
        sale.id, sale.product_id, sale.quantity, sale.customer_name, sale.net_profit, remaining
    );
    Ok(sale)
}

/// Retrieves a sale by id.
pub async fn get_sale_by_id(db: &DatabaseConnection, sale_id: i64) -> Result<Option<sale::Model>> {
    Sale::find_by_id(sale_id).one(db).await.map_err(Into::into)
}

/// Lists all sales, most recent sale date first.
pub async fn list_sales(db: &DatabaseConnection) -> Result<Vec<sale::Model>> {
    Sale::find()
        .order_by_desc(sale::Column::SaleDate)
        .order_by_desc(sale::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the sales recorded against one product.
pub async fn list_sales_for_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<sale::Model>> {
    Sale::find()
        .filter(sale::Column::ProductId.eq(product_id))
        .order_by_desc(sale::Column::SaleDate)
        .order_by_desc(sale::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Edits a sale and recomputes its net profit.
///
/// The product's current purchase price is used; accessory cost comes from the
/// prices snapshotted when the sale was recorded. Stock is left alone.
///
/// # Errors
/// Returns an error if the input fails validation, the sale does not exist, or
/// its product has been deleted.
pub async fn update_sale(
    db: &DatabaseConnection,
    sale_id: i64,
    update: SaleUpdate,
) -> Result<sale::Model> {
    let customer_name = require_text("Customer name", &update.customer_name)?;
    let sale_price = require_amount(update.sale_price)?;
    let cost = require_amount(update.cost)?;

    let existing = Sale::find_by_id(sale_id)
        .one(db)
        .await?
        .ok_or(Error::SaleNotFound { id: sale_id })?;

    let product = Product::find_by_id(existing.product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound {
            id: existing.product_id,
        })?;

    let net_profit = accounting::net_profit_with_accessories(
        sale_price,
        product.purchase_price,
        existing.quantity,
        cost,
        existing.accessories.total_cost(),
    );

    let mut active: sale::ActiveModel = existing.into();
    active.customer_name = Set(customer_name);
    active.sale_price = Set(sale_price);
    active.cost = Set(cost);
    active.sale_date = Set(update.sale_date);
    active.net_profit = Set(net_profit);

    let updated = active.update(db).await?;
    info!(
        "Updated sale {} (net profit now {:.2})",
        updated.id, updated.net_profit
    );
    Ok(updated)
}

/// Deletes a sale. Product and accessory stock are not restored.
///
/// # Errors
/// Returns `Error::SaleNotFound` if no row was deleted.
pub async fn delete_sale(db: &DatabaseConnection, sale_id: i64) -> Result<()> {
    let result = Sale::delete_by_id(sale_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::SaleNotFound { id: sale_id });
    }
    info!("Deleted sale {}", sale_id);
    Ok(())
}
