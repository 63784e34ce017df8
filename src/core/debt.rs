//! Debt business logic - Money the shop owes.

use crate::{
    core::{require_positive_amount, require_text},
    entities::{Debt, debt},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Records a debt.
///
/// # Errors
/// Returns an error if the description is empty, the amount is not a positive
/// finite number, or the insert fails.
pub async fn create_debt(
    db: &DatabaseConnection,
    description: &str,
    amount: f64,
    date: NaiveDate,
) -> Result<debt::Model> {
    let description = require_text("Description", description)?;
    let amount = require_positive_amount(amount)?;

    let debt = debt::ActiveModel {
        description: Set(description),
        amount: Set(amount),
        date: Set(date),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Recorded debt {} '{}' of {}", debt.id, debt.description, debt.amount);
    Ok(debt)
}

/// Retrieves a debt by id.
pub async fn get_debt_by_id(db: &DatabaseConnection, debt_id: i64) -> Result<Option<debt::Model>> {
    Debt::find_by_id(debt_id).one(db).await.map_err(Into::into)
}

/// Lists debts, latest date first.
pub async fn list_debts(db: &DatabaseConnection) -> Result<Vec<debt::Model>> {
    Debt::find()
        .order_by_desc(debt::Column::Date)
        .order_by_desc(debt::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces a debt's description, amount and date.
///
/// # Errors
/// Returns an error if the input fails validation or the debt does not exist.
pub async fn update_debt(
    db: &DatabaseConnection,
    debt_id: i64,
    description: &str,
    amount: f64,
    date: NaiveDate,
) -> Result<debt::Model> {
    let description = require_text("Description", description)?;
    let amount = require_positive_amount(amount)?;

    let existing = Debt::find_by_id(debt_id)
        .one(db)
        .await?
        .ok_or(Error::DebtNotFound { id: debt_id })?;

    let mut active: debt::ActiveModel = existing.into();
    active.description = Set(description);
    active.amount = Set(amount);
    active.date = Set(date);

    let updated = active.update(db).await?;
    info!("Updated debt {}", updated.id);
    Ok(updated)
}

/// Deletes a debt.
///
/// # Errors
/// Returns `Error::DebtNotFound` if no row was deleted.
pub async fn delete_debt(db: &DatabaseConnection, debt_id: i64) -> Result<()> {
    let result = Debt::delete_by_id(debt_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::DebtNotFound { id: debt_id });
    }
    info!("Deleted debt {}", debt_id);
    Ok(())
}

/// Sum of every recorded debt.
pub async fn total_debts(db: &DatabaseConnection) -> Result<f64> {
    let debts = Debt::find().all(db).await?;
    Ok(debts.iter().map(|d| d.amount).sum())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_debt_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_debt(&db, " ", 10.0, test_date()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = create_debt(&db, "Supplier", 0.0, test_date()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount } if amount == 0.0
        ));

        let result = create_debt(&db, "Supplier", f64::NAN, test_date()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_debt_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;

        let older = create_debt(
            &db,
            "Screen supplier",
            300.0,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .await?;
        let newer = create_test_debt(&db, "Rent", 1200.0).await?;

        let debts = list_debts(&db).await?;
        assert_eq!(debts.len(), 2);
        assert_eq!(debts[0].id, newer.id);
        assert_eq!(debts[1].id, older.id);
        assert_eq!(total_debts(&db).await?, 1500.0);

        let updated = update_debt(&db, older.id, "Screen supplier (partial)", 100.0, test_date())
            .await?;
        assert_eq!(updated.amount, 100.0);
        assert_eq!(updated.date, test_date());
        assert_eq!(total_debts(&db).await?, 1300.0);

        delete_debt(&db, newer.id).await?;
        assert!(get_debt_by_id(&db, newer.id).await?.is_none());
        assert!(matches!(
            delete_debt(&db, newer.id).await.unwrap_err(),
            Error::DebtNotFound { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_total_debts_empty() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(total_debts(&db).await?, 0.0);
        Ok(())
    }
}
