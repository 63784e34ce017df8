//! Monthly period business logic
//!
//! Tracks which month the ledger is filing stock under and moves unsold stock
//! into the next month. A rollover activates (or creates) the next month's
//! period, deactivates the current one, relabels unsold products and records
//! when it happened in the `system_state` table, all in one transaction.
//! Only one rollover runs per calendar month: once one has been recorded this
//! month, further rollovers write nothing, even though the active period has
//! already moved ahead. Products already filed under the target month are
//! left out as well.

use crate::{
    core::{accounting::MonthYear, get_state_value, set_state_value},
    entities::{MonthlyPeriod, Product, monthly_period, product},
    errors::{Error, Result},
};
use chrono::{DateTime, Local, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use std::fmt::Write;
use tracing::info;

const LAST_ROLLOVER_KEY: &str = "last_rollover_at";

/// Products listed by name in a rollover summary before collapsing the rest.
const SUMMARY_PRODUCT_LIMIT: usize = 5;

/// What a rollover would do, computed without writing anything.
#[derive(Debug, Clone)]
pub struct RolloverPreview {
    /// Month the products are currently filed under
    pub current_month: MonthYear,
    /// Month they would move into
    pub next_month: MonthYear,
    /// Products that would be relabelled
    pub products: Vec<product::Model>,
}

/// Outcome of a completed rollover.
#[derive(Debug, Clone)]
pub struct RolloverResult {
    /// Month that was closed
    pub from_month: MonthYear,
    /// Month that is now active
    pub to_month: MonthYear,
    /// Relabelled products, as they are stored now
    pub moved_products: Vec<product::Model>,
    /// When the rollover ran
    pub rolled_at: DateTime<Utc>,
}

/// Returns the active period, preferring the latest month if several are active.
pub async fn get_active_period(db: &DatabaseConnection) -> Result<Option<monthly_period::Model>> {
    MonthlyPeriod::find()
        .filter(monthly_period::Column::IsActive.eq(true))
        .order_by_desc(monthly_period::Column::MonthYear)
        .order_by_desc(monthly_period::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Month new stock is filed under: the active period's, or the clock's when
/// no period is active.
pub async fn current_month(db: &DatabaseConnection) -> Result<MonthYear> {
    match get_active_period(db).await? {
        Some(period) => period.month_year.parse(),
        None => Ok(MonthYear::current()),
    }
}

/// Retrieves the period row for `month`.
pub async fn get_period_by_month<C>(
    db: &C,
    month: MonthYear,
) -> Result<Option<monthly_period::Model>>
where
    C: ConnectionTrait,
{
    MonthlyPeriod::find()
        .filter(monthly_period::Column::MonthYear.eq(month.to_string()))
        .order_by_desc(monthly_period::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every period, latest month first.
pub async fn list_periods(db: &DatabaseConnection) -> Result<Vec<monthly_period::Model>> {
    MonthlyPeriod::find()
        .order_by_desc(monthly_period::Column::MonthYear)
        .order_by_desc(monthly_period::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the period for `month`, inserting an active one if none exists.
pub async fn ensure_period(db: &DatabaseConnection, month: MonthYear) -> Result<monthly_period::Model> {
    if let Some(existing) = get_period_by_month(db, month).await? {
        return Ok(existing);
    }

    let period = monthly_period::ActiveModel {
        month_year: Set(month.to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Opened period {}", period.month_year);
    Ok(period)
}

/// Retrieves when the last rollover ran.
///
/// # Returns
/// * `Ok(Some(timestamp))` - Time of the last rollover
/// * `Ok(None)` - No rollover recorded
pub async fn get_last_rollover_at(db: &DatabaseConnection) -> Result<Option<DateTime<Utc>>> {
    last_rollover_at(db).await
}

async fn last_rollover_at<C>(db: &C) -> Result<Option<DateTime<Utc>>>
where
    C: ConnectionTrait,
{
    match get_state_value(db, LAST_ROLLOVER_KEY).await? {
        Some(value) => DateTime::parse_from_rfc3339(&value)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| Error::Config {
                message: format!("Failed to parse last rollover time: {e}"),
            }),
        None => Ok(None),
    }
}

/// Whether `last` falls in calendar month `month`, in local time.
fn rolled_over_in(last: DateTime<Utc>, month: MonthYear) -> bool {
    MonthYear::from_date(&last.with_timezone(&Local).date_naive()) == month
}

/// Whether a rollover has already been recorded in the current calendar month.
pub async fn rolled_over_this_month(db: &DatabaseConnection) -> Result<bool> {
    Ok(last_rollover_at(db)
        .await?
        .is_some_and(|last| rolled_over_in(last, MonthYear::current())))
}

/// Unsold products that a rollover out of `current` would move.
async fn rollover_candidates<C>(db: &C, next: MonthYear) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::IsSold.eq(false))
        .filter(product::Column::MonthYear.ne(next.to_string()))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Shows what [`rollover`] would do for `current` without writing.
pub async fn preview_rollover(db: &DatabaseConnection, current: MonthYear) -> Result<RolloverPreview> {
    let next_month = current.next()?;
    let products = rollover_candidates(db, next_month).await?;
    Ok(RolloverPreview {
        current_month: current,
        next_month,
        products,
    })
}

/// Closes `current` and carries unsold stock into the following month.
///
/// # Returns
/// * `Ok(Some(result))` - Rollover was performed
/// * `Ok(None)` - Nothing to roll over, or a rollover already ran this
///   calendar month; nothing was written
pub async fn rollover(db: &DatabaseConnection, current: MonthYear) -> Result<Option<RolloverResult>> {
    let next = current.next()?;
    let txn = db.begin().await?;

    let this_month = MonthYear::current();
    if let Some(last) = last_rollover_at(&txn)
        .await?
        .filter(|&last| rolled_over_in(last, this_month))
    {
        info!("Rollover from {} skipped: already rolled over at {}", current, last);
        return Ok(None);
    }

    let products = rollover_candidates(&txn, next).await?;
    if products.is_empty() {
        info!("Rollover from {} skipped: no unsold products", current);
        return Ok(None);
    }

    let now = Utc::now();

    if let Some(existing) = get_period_by_month(&txn, next).await? {
        let mut active: monthly_period::ActiveModel = existing.into();
        active.is_active = Set(true);
        active.update(&txn).await?;
    } else {
        monthly_period::ActiveModel {
            month_year: Set(next.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    MonthlyPeriod::update_many()
        .col_expr(monthly_period::Column::IsActive, Expr::value(false))
        .filter(monthly_period::Column::MonthYear.eq(current.to_string()))
        .exec(&txn)
        .await?;

    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    Product::update_many()
        .col_expr(product::Column::MonthYear, Expr::value(next.to_string()))
        .filter(product::Column::Id.is_in(ids))
        .exec(&txn)
        .await?;

    set_state_value(&txn, LAST_ROLLOVER_KEY, now.to_rfc3339()).await?;

    txn.commit().await?;

    let moved_products: Vec<product::Model> = products
        .into_iter()
        .map(|p| product::Model {
            month_year: next.to_string(),
            ..p
        })
        .collect();

    info!(
        "Rolled {} unsold products from {} into {}",
        moved_products.len(),
        current,
        next
    );

    Ok(Some(RolloverResult {
        from_month: current,
        to_month: next,
        moved_products,
        rolled_at: now,
    }))
}

/// Formats a rollover result into a human-readable summary.
pub fn format_rollover_summary(result: &RolloverResult) -> Result<String> {
    let mut summary = format!(
        "Rolled {} unsold products from {} into {}\n",
        result.moved_products.len(),
        result.from_month,
        result.to_month
    );

    for product in result.moved_products.iter().take(SUMMARY_PRODUCT_LIMIT) {
        writeln!(
            summary,
            "  • {} ({}) x{}",
            product.name, product.code, product.quantity
        )?;
    }

    let hidden = result
        .moved_products
        .len()
        .saturating_sub(SUMMARY_PRODUCT_LIMIT);
    if hidden > 0 {
        writeln!(summary, "  ... and {hidden} more")?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::product::{get_product_by_id, list_products_for_month};
    use crate::test_utils::*;
    use chrono::Datelike;

    #[tokio::test]
    async fn test_rollover_with_no_unsold_products_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Sold Phone").await?;
        create_test_sale(&db, product.id, 1).await?;

        let result = rollover(&db, test_month()).await?;
        assert!(result.is_none());

        assert!(list_periods(&db).await?.is_empty());
        assert!(get_last_rollover_at(&db).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_rollover_moves_unsold_products() -> Result<()> {
        let db = setup_test_db().await?;
        let march = test_month();
        ensure_period(&db, march).await?;

        let unsold = create_test_product(&db, "Unsold").await?;
        let sold = create_test_product(&db, "Sold").await?;
        create_test_sale(&db, sold.id, 1).await?;

        let result = rollover(&db, march).await?.unwrap();
        assert_eq!(result.from_month, march);
        assert_eq!(result.to_month.to_string(), "2024-04");
        assert_eq!(result.moved_products.len(), 1);
        assert_eq!(result.moved_products[0].id, unsold.id);
        assert_eq!(result.moved_products[0].month_year, "2024-04");

        let unsold = get_product_by_id(&db, unsold.id).await?.unwrap();
        assert_eq!(unsold.month_year, "2024-04");
        let sold = get_product_by_id(&db, sold.id).await?.unwrap();
        assert_eq!(sold.month_year, "2024-03");

        let active = get_active_period(&db).await?.unwrap();
        assert_eq!(active.month_year, "2024-04");
        let old = get_period_by_month(&db, march).await?.unwrap();
        assert!(!old.is_active);

        assert!(get_last_rollover_at(&db).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_rollover_twice_is_a_no_op() -> Result<()> {
        let db = setup_test_db().await?;
        let march = test_month();
        create_test_product(&db, "Phone").await?;

        assert!(rollover(&db, march).await?.is_some());
        assert!(rollover(&db, march).await?.is_none());

        let periods = list_periods(&db).await?;
        assert_eq!(periods.len(), 1);
        assert_eq!(list_products_for_month(&db, march.next()?).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_second_rollover_from_active_period_keeps_stock_in_place() -> Result<()> {
        let db = setup_test_db().await?;
        ensure_period(&db, test_month()).await?;
        let product = create_test_product(&db, "Phone").await?;

        let first = rollover(&db, current_month(&db).await?).await?;
        assert!(first.is_some());
        assert!(rolled_over_this_month(&db).await?);

        let before = get_last_rollover_at(&db).await?;
        let second = rollover(&db, current_month(&db).await?).await?;
        assert!(second.is_none());

        let product = get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(product.month_year, "2024-04");
        assert_eq!(current_month(&db).await?.to_string(), "2024-04");
        assert!(get_period_by_month(&db, MonthYear::new(2024, 5)?).await?.is_none());
        assert_eq!(get_last_rollover_at(&db).await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_rollover_runs_again_in_a_later_month() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Phone").await?;

        let last_month = Local::now()
            .date_naive()
            .with_day(1)
            .and_then(|d| d.pred_opt())
            .and_then(|d| d.with_day(15))
            .unwrap();
        let stamp = last_month.and_hms_opt(12, 0, 0).unwrap().and_utc();
        set_state_value(&db, LAST_ROLLOVER_KEY, stamp.to_rfc3339()).await?;
        assert!(!rolled_over_this_month(&db).await?);

        let result = rollover(&db, test_month()).await?.unwrap();
        assert_eq!(result.moved_products[0].id, product.id);
        Ok(())
    }

    #[test]
    fn test_rolled_over_in_matches_local_calendar_month() {
        let now = Utc::now();
        assert!(rolled_over_in(now, MonthYear::current()));
        assert!(!rolled_over_in(now, MonthYear::new(2024, 3).unwrap()));
    }

    #[tokio::test]
    async fn test_rollover_reactivates_existing_next_period() -> Result<()> {
        let db = setup_test_db().await?;
        let march = test_month();
        let april = ensure_period(&db, march.next()?).await?;
        let mut inactive: monthly_period::ActiveModel = april.clone().into();
        inactive.is_active = Set(false);
        inactive.update(&db).await?;

        create_test_product(&db, "Phone").await?;
        rollover(&db, march).await?.unwrap();

        let periods = list_periods(&db).await?;
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].id, april.id);
        assert!(periods[0].is_active);
        Ok(())
    }

    #[tokio::test]
    async fn test_preview_rollover_does_not_write() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Phone").await?;

        let preview = preview_rollover(&db, test_month()).await?;
        assert_eq!(preview.next_month.to_string(), "2024-04");
        assert_eq!(preview.products.len(), 1);

        let product = get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(product.month_year, "2024-03");
        assert!(list_periods(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_current_month_follows_active_period() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(current_month(&db).await?, MonthYear::current());

        create_test_product(&db, "Phone").await?;
        rollover(&db, test_month()).await?.unwrap();
        assert_eq!(current_month(&db).await?.to_string(), "2024-04");
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_period_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let first = ensure_period(&db, test_month()).await?;
        let second = ensure_period(&db, test_month()).await?;
        assert_eq!(first.id, second.id);
        assert!(first.is_active);
        assert_eq!(list_periods(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_format_rollover_summary_truncates() -> Result<()> {
        let db = setup_test_db().await?;
        for i in 0..7 {
            create_test_product(&db, &format!("Phone {i}")).await?;
        }

        let result = rollover(&db, test_month()).await?.unwrap();
        let summary = format_rollover_summary(&result)?;

        assert!(summary.starts_with("Rolled 7 unsold products from 2024-03 into 2024-04"));
        assert!(summary.contains("Phone 0 (AOGZ-202403-0001)"));
        assert!(summary.contains("Phone 4"));
        assert!(!summary.contains("Phone 5"));
        assert!(summary.contains("... and 2 more"));
        Ok(())
    }
}
