//! Accessory business logic - Cases, screen protectors and cables.

use crate::{
    config::shop::AccessorySeed,
    core::{require_amount, require_quantity, require_text},
    entities::{Accessory, AccessoryCategory, accessory},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Editable accessory fields.
#[derive(Debug, Clone)]
pub struct AccessoryInput {
    /// Display name
    pub name: String,
    /// Category
    pub category: AccessoryCategory,
    /// Units on hand, at least one
    pub quantity: i32,
    /// Unit price
    pub price: f64,
}

impl AccessoryInput {
    fn validate(&self) -> Result<(String, i32, f64)> {
        let name = require_text("Accessory name", &self.name)?;
        let quantity = require_quantity(self.quantity)?;
        let price = require_amount(self.price)?;
        Ok((name, quantity, price))
    }
}

/// Fails if an accessory other than `except` already carries `name`.
async fn ensure_unique_name(
    db: &DatabaseConnection,
    name: &str,
    except: Option<i64>,
) -> Result<()> {
    let mut query = Accessory::find().filter(accessory::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(accessory::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(Error::DuplicateAccessory {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Adds an accessory to stock.
///
/// # Errors
/// Returns an error if the name is empty or already taken, the quantity is
/// below one, the price is negative or not finite, or the insert fails.
pub async fn create_accessory(
    db: &DatabaseConnection,
    input: AccessoryInput,
) -> Result<accessory::Model> {
    let (name, quantity, price) = input.validate()?;
    ensure_unique_name(db, &name, None).await?;

    let accessory = accessory::ActiveModel {
        name: Set(name),
        category: Set(input.category.to_string()),
        quantity: Set(quantity),
        price: Set(price),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Added accessory '{}' ({}) x{} at {}",
        accessory.name, accessory.category, accessory.quantity, accessory.price
    );
    Ok(accessory)
}

/// Retrieves an accessory by id.
pub async fn get_accessory_by_id(
    db: &DatabaseConnection,
    accessory_id: i64,
) -> Result<Option<accessory::Model>> {
    Accessory::find_by_id(accessory_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an accessory by exact name. Names are unique for accessories
/// added through [`create_accessory`]; rows restored from older backups may
/// share a name, in which case the oldest one wins.
pub async fn get_accessory_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<accessory::Model>> {
    let found = Accessory::find()
        .filter(accessory::Column::Name.eq(name.trim()))
        .order_by_asc(accessory::Column::Id)
        .one(db)
        .await?;
    debug!("Accessory lookup '{}': {:?}", name, found.as_ref().map(|a| a.id));
    Ok(found)
}

/// Lists accessories, newest first.
pub async fn list_accessories(db: &DatabaseConnection) -> Result<Vec<accessory::Model>> {
    Accessory::find()
        .order_by_desc(accessory::Column::CreatedAt)
        .order_by_desc(accessory::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists accessories of one category, newest first.
pub async fn list_accessories_by_category(
    db: &DatabaseConnection,
    category: AccessoryCategory,
) -> Result<Vec<accessory::Model>> {
    Accessory::find()
        .filter(accessory::Column::Category.eq(category.as_str()))
        .order_by_desc(accessory::Column::CreatedAt)
        .order_by_desc(accessory::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces an accessory's fields. Past sales keep their snapshotted prices.
///
/// # Errors
/// Returns an error if the input fails validation or the accessory does not exist.
pub async fn update_accessory(
    db: &DatabaseConnection,
    accessory_id: i64,
    input: AccessoryInput,
) -> Result<accessory::Model> {
    let (name, quantity, price) = input.validate()?;

    let existing = Accessory::find_by_id(accessory_id)
        .one(db)
        .await?
        .ok_or(Error::AccessoryNotFound { id: accessory_id })?;
    ensure_unique_name(db, &name, Some(accessory_id)).await?;

    let mut active: accessory::ActiveModel = existing.into();
    active.name = Set(name);
    active.category = Set(input.category.to_string());
    active.quantity = Set(quantity);
    active.price = Set(price);

    let updated = active.update(db).await?;
    info!("Updated accessory {} '{}'", updated.id, updated.name);
    Ok(updated)
}

/// Deletes an accessory.
///
/// # Errors
/// Returns `Error::AccessoryNotFound` if no row was deleted.
pub async fn delete_accessory(db: &DatabaseConnection, accessory_id: i64) -> Result<()> {
    let result = Accessory::delete_by_id(accessory_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::AccessoryNotFound { id: accessory_id });
    }
    info!("Deleted accessory {}", accessory_id);
    Ok(())
}

/// Inserts configured accessories whose name is not in the ledger yet.
///
/// Returns how many rows were inserted.
pub async fn seed_accessories(db: &DatabaseConnection, seeds: &[AccessorySeed]) -> Result<usize> {
    let mut inserted = 0;
    for seed in seeds {
        if get_accessory_by_name(db, &seed.name).await?.is_some() {
            debug!("Accessory '{}' already present, skipping seed", seed.name);
            continue;
        }
        create_accessory(
            db,
            AccessoryInput {
                name: seed.name.clone(),
                category: seed.category,
                quantity: seed.quantity,
                price: seed.price,
            },
        )
        .await?;
        inserted += 1;
    }

    if inserted > 0 {
        info!("Seeded {} accessories from config", inserted);
    }
    Ok(inserted)
}
