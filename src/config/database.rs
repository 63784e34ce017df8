//! Database configuration module for the shop ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables and their indexes are generated from the entity definitions with
//! `Schema::create_table_from_entity` / `Schema::create_index_from_entity`, so the
//! schema always matches the Rust structs. Creation is idempotent (`IF NOT EXISTS`),
//! which lets the binary call it on every start against a file database.

use crate::entities::{Accessory, Debt, MonthlyPeriod, Product, Sale, SystemState};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/shop_ledger.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a local `SQLite` file (created on first use) if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Creates the directory holding a file-backed `SQLite` database.
fn ensure_database_dir(url: &str) -> Result<()> {
    let Some(rest) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(':') {
        return Ok(());
    }
    if let Some(parent) = Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Establishes a connection to the `SQLite` database named by `DATABASE_URL`.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let url = get_database_url();
    ensure_database_dir(&url)?;
    tracing::info!("Connecting to {}", url);
    Database::connect(&url).await.map_err(Into::into)
}

async fn create_table_for<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}

/// Creates all ledger tables (and their indexes) if they do not exist yet.
///
/// Covers products, sales, monthly periods, debts, accessories and system state.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table_for(db, &schema, Product).await?;
    create_table_for(db, &schema, Sale).await?;
    create_table_for(db, &schema, MonthlyPeriod).await?;
    create_table_for(db, &schema, Debt).await?;
    create_table_for(db, &schema, Accessory).await?;
    create_table_for(db, &schema, SystemState).await?;

    tracing::info!("Ledger tables ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        AccessoryModel, DebtModel, MonthlyPeriodModel, ProductModel, SaleModel, SystemStateModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<SaleModel> = Sale::find().limit(1).all(&db).await?;
        let _: Vec<MonthlyPeriodModel> = MonthlyPeriod::find().limit(1).all(&db).await?;
        let _: Vec<DebtModel> = Debt::find().limit(1).all(&db).await?;
        let _: Vec<AccessoryModel> = Accessory::find().limit(1).all(&db).await?;
        let _: Vec<SystemStateModel> = SystemState::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[test]
    fn test_ensure_database_dir_skips_memory_urls() -> Result<()> {
        ensure_database_dir("sqlite::memory:")?;
        ensure_database_dir("sqlite://:memory:")?;
        ensure_database_dir("postgres://localhost/db")?;
        Ok(())
    }
}
