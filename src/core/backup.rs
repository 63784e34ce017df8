//! Backup business logic - Whole-ledger export and import.
//!
//! A backup is one JSON document holding every ledger table:
//!
//! ```json
//! { "products": [], "sales": [], "monthlyData": [], "debts": [],
//!   "accessories": [], "exportDate": "...", "version": "2.0" }
//! ```
//!
//! Import replaces the ledger wholesale. The document is checked before
//! anything is cleared, and the clear-and-insert runs in one transaction.
//! The access password lives outside the ledger tables and survives an import.

use crate::{
    entities::{
        Accessory, AccessoryCategory, Debt, MonthlyPeriod, Product, Sale, accessory, debt,
        monthly_period, product, sale,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{IntoActiveModel, QueryOrder, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Format version written into every export.
pub const BACKUP_VERSION: &str = "2.0";

/// Top-level sections an import refuses to do without.
const REQUIRED_SECTIONS: [&str; 3] = ["products", "sales", "monthlyData"];

/// Serialized form of the whole ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    /// Every product
    pub products: Vec<product::Model>,
    /// Every sale
    pub sales: Vec<sale::Model>,
    /// Every monthly period
    pub monthly_data: Vec<monthly_period::Model>,
    /// Every debt; older backups omit it
    #[serde(default)]
    pub debts: Vec<debt::Model>,
    /// Every accessory; older backups omit it
    #[serde(default)]
    pub accessories: Vec<accessory::Model>,
    /// When the export was taken
    #[serde(default)]
    pub export_date: Option<DateTime<Utc>>,
    /// Format version
    #[serde(default)]
    pub version: Option<String>,
}

/// Row counts written by an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Products restored
    pub products: usize,
    /// Sales restored
    pub sales: usize,
    /// Monthly periods restored
    pub periods: usize,
    /// Debts restored
    pub debts: usize,
    /// Accessories restored
    pub accessories: usize,
}

/// Reads every table into a [`BackupDocument`].
pub async fn export_ledger(db: &DatabaseConnection) -> Result<BackupDocument> {
    let products = Product::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    let sales = Sale::find().order_by_asc(sale::Column::Id).all(db).await?;
    let monthly_data = MonthlyPeriod::find()
        .order_by_asc(monthly_period::Column::Id)
        .all(db)
        .await?;
    let debts = Debt::find().order_by_asc(debt::Column::Id).all(db).await?;
    let accessories = Accessory::find()
        .order_by_asc(accessory::Column::Id)
        .all(db)
        .await?;

    info!(
        "Exported ledger: {} products, {} sales, {} periods, {} debts, {} accessories",
        products.len(),
        sales.len(),
        monthly_data.len(),
        debts.len(),
        accessories.len()
    );

    Ok(BackupDocument {
        products,
        sales,
        monthly_data,
        debts,
        accessories,
        export_date: Some(Utc::now()),
        version: Some(BACKUP_VERSION.to_string()),
    })
}

/// Exports the ledger as pretty-printed JSON.
pub async fn export_to_string(db: &DatabaseConnection) -> Result<String> {
    let document = export_ledger(db).await?;
    serde_json::to_string_pretty(&document).map_err(Into::into)
}

/// Parses and checks a backup without touching the database.
///
/// Accessory categories are normalized to their canonical labels, so backups
/// written with the older localized labels load as well.
///
/// # Errors
/// Returns `Error::Serialization` for text that is not JSON and
/// `Error::InvalidBackup` when a required section is missing or a row is malformed.
pub fn parse_backup(json: &str) -> Result<BackupDocument> {
    let value: Value = serde_json::from_str(json)?;
    let Some(sections) = value.as_object() else {
        return Err(Error::InvalidBackup {
            message: "backup must be a JSON object".to_string(),
        });
    };

    for section in REQUIRED_SECTIONS {
        if !matches!(sections.get(section), Some(Value::Array(_))) {
            return Err(Error::InvalidBackup {
                message: format!("missing '{section}' list"),
            });
        }
    }

    let mut document: BackupDocument =
        serde_json::from_value(value).map_err(|e| Error::InvalidBackup {
            message: e.to_string(),
        })?;

    for accessory in &mut document.accessories {
        let category: AccessoryCategory =
            accessory
                .category
                .parse()
                .map_err(|_| Error::InvalidBackup {
                    message: format!(
                        "accessory '{}' has unknown category '{}'",
                        accessory.name, accessory.category
                    ),
                })?;
        accessory.category = category.to_string();
    }

    if document.version.as_deref() != Some(BACKUP_VERSION) {
        warn!(
            "Importing backup with version {:?}, expected {}",
            document.version, BACKUP_VERSION
        );
    }

    Ok(document)
}

/// Replaces the whole ledger with `document`, keeping every row's id.
pub async fn import_ledger(
    db: &DatabaseConnection,
    document: BackupDocument,
) -> Result<ImportSummary> {
    let summary = ImportSummary {
        products: document.products.len(),
        sales: document.sales.len(),
        periods: document.monthly_data.len(),
        debts: document.debts.len(),
        accessories: document.accessories.len(),
    };

    let txn = db.begin().await?;

    Sale::delete_many().exec(&txn).await?;
    Product::delete_many().exec(&txn).await?;
    MonthlyPeriod::delete_many().exec(&txn).await?;
    Debt::delete_many().exec(&txn).await?;
    Accessory::delete_many().exec(&txn).await?;

    for row in document.products {
        Product::insert(row.into_active_model().reset_all())
            .exec(&txn)
            .await?;
    }
    for row in document.sales {
        Sale::insert(row.into_active_model().reset_all())
            .exec(&txn)
            .await?;
    }
    for row in document.monthly_data {
        MonthlyPeriod::insert(row.into_active_model().reset_all())
            .exec(&txn)
            .await?;
    }
    for row in document.debts {
        Debt::insert(row.into_active_model().reset_all())
            .exec(&txn)
            .await?;
    }
    for row in document.accessories {
        Accessory::insert(row.into_active_model().reset_all())
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    info!("Imported ledger: {:?}", summary);
    Ok(summary)
}

/// Parses `json` and imports it. Nothing is cleared if parsing fails.
pub async fn import_from_str(db: &DatabaseConnection, json: &str) -> Result<ImportSummary> {
    let document = parse_backup(json)?;
    import_ledger(db, document).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{
        accessory::list_accessories, debt::list_debts, period::ensure_period,
        product::list_products, product::StockFilter, sale::AccessoryUse, sale::list_sales,
    };
    use crate::test_utils::*;
    use chrono::NaiveDate;

    async fn populated_db() -> Result<DatabaseConnection> {
        let (db, product) = setup_with_product().await?;
        ensure_period(&db, test_month()).await?;
        let case = create_test_accessory(&db, "Clear Case", 3).await?;
        create_test_sale_with_accessories(
            &db,
            product.id,
            vec![AccessoryUse {
                accessory_id: case.id,
                quantity: 1,
            }],
        )
        .await?;
        create_test_debt(&db, "Supplier", 250.0).await?;
        Ok(db)
    }

    #[tokio::test]
    async fn test_export_import_reproduces_ledger() -> Result<()> {
        let source = populated_db().await?;
        let json = export_to_string(&source).await?;

        let target = setup_test_db().await?;
        create_test_product(&target, "Will be replaced").await?;

        let summary = import_from_str(&target, &json).await?;
        assert_eq!(
            summary,
            ImportSummary {
                products: 1,
                sales: 1,
                periods: 1,
                debts: 1,
                accessories: 1,
            }
        );

        let original = export_ledger(&source).await?;
        let restored = export_ledger(&target).await?;
        assert_eq!(restored.products, original.products);
        assert_eq!(restored.sales, original.sales);
        assert_eq!(restored.monthly_data, original.monthly_data);
        assert_eq!(restored.debts, original.debts);
        assert_eq!(restored.accessories, original.accessories);
        Ok(())
    }

    #[tokio::test]
    async fn test_export_document_shape() -> Result<()> {
        let db = populated_db().await?;
        let json = export_to_string(&db).await?;
        let value: Value = serde_json::from_str(&json)?;

        for key in [
            "products",
            "sales",
            "monthlyData",
            "debts",
            "accessories",
            "exportDate",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["version"], "2.0");
        assert_eq!(value["products"][0]["purchasePrice"], 1000.0);
        assert_eq!(value["sales"][0]["accessories"][0]["quantity"], 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_import_rejects_missing_sections_before_clearing() -> Result<()> {
        let db = populated_db().await?;

        let result = import_from_str(&db, r#"{"products": [], "sales": []}"#).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidBackup { message } if message.contains("monthlyData")
        ));

        let result = import_from_str(&db, "[]").await;
        assert!(matches!(result.unwrap_err(), Error::InvalidBackup { .. }));

        let result = import_from_str(&db, "not json").await;
        assert!(matches!(result.unwrap_err(), Error::Serialization(_)));

        assert_eq!(list_products(&db, StockFilter::All).await?.len(), 1);
        assert_eq!(list_sales(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_import_defaults_optional_sections() -> Result<()> {
        let db = populated_db().await?;

        let summary =
            import_from_str(&db, r#"{"products": [], "sales": [], "monthlyData": []}"#).await?;
        assert_eq!(summary, ImportSummary::default());

        assert!(list_accessories(&db).await?.is_empty());
        assert!(list_debts(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_import_accepts_legacy_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let json = r#"{
            "products": [{
                "id": 7, "name": "Old Phone", "purchasePrice": 800.0, "quantity": 0,
                "code": "AOGZ-202401-1234", "isSold": true,
                "createdAt": "2024-01-05T10:00:00Z", "monthYear": "2024-01"
            }],
            "sales": [{
                "id": 3, "productId": 7, "customerName": "Ayşe",
                "saleDate": "2024-01-20T00:00:00.000Z",
                "imei": "123", "salePrice": 1000.0, "cost": 0.0, "netProfit": 200.0,
                "createdAt": "2024-01-20T12:00:00.000Z"
            }],
            "monthlyData": [],
            "debts": [{
                "id": 5, "description": "Supplier", "amount": 300.0,
                "date": "2024-02-01T00:00:00.000Z", "createdAt": "2024-01-21T09:30:00.000Z"
            }],
            "accessories": [{
                "id": 2, "name": "Kılıf", "type": "kılıf", "quantity": 4, "price": 50.0,
                "createdAt": "2024-01-01T00:00:00Z"
            }]
        }"#;

        let summary = import_from_str(&db, json).await?;
        assert_eq!(summary.products, 1);
        assert_eq!(summary.accessories, 1);
        assert_eq!(summary.debts, 1);

        let sales = list_sales(&db).await?;
        assert_eq!(sales[0].id, 3);
        assert_eq!(sales[0].sale_date, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
        assert_eq!(sales[0].quantity, 1);
        assert!(sales[0].accessories.is_empty());

        let debts = list_debts(&db).await?;
        assert_eq!(debts[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

        let accessories = list_accessories(&db).await?;
        assert_eq!(accessories[0].category, "case");
        Ok(())
    }

    #[test]
    fn test_parse_backup_rejects_unknown_category() {
        let json = r#"{"products": [], "sales": [], "monthlyData": [], "accessories": [{
            "id": 1, "name": "Charger", "category": "charger", "quantity": 1, "price": 1.0,
            "createdAt": "2024-01-01T00:00:00Z"
        }]}"#;
        assert!(matches!(
            parse_backup(json).unwrap_err(),
            Error::InvalidBackup { message } if message.contains("charger")
        ));
    }
}
