//! Core business logic - framework-agnostic ledger operations.
//!
//! Every function here takes a `SeaORM` connection and returns [`crate::errors::Result`].
//! Input validation happens before the first write; operations that touch more
//! than one table run inside a single database transaction.

/// Accessory inventory
pub mod accessory;
/// Pure functions: month arithmetic, product codes, net profit
pub mod accounting;
/// Access password gate
pub mod auth;
/// Whole-ledger export and import
pub mod backup;
/// Debt tracking
pub mod debt;
/// Monthly periods and stock rollover
pub mod period;
/// Product intake and stock
pub mod product;
/// Dashboard figures and text formatting
pub mod report;
/// Sales and profit
pub mod sale;

use crate::{
    entities::{SystemState, system_state},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

/// Prices and costs must be finite and non-negative.
pub(crate) fn require_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Debt amounts must be finite and strictly positive.
pub(crate) fn require_positive_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Quantities entered on forms start at one.
pub(crate) fn require_quantity(quantity: i32) -> Result<i32> {
    if quantity < 1 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(quantity)
}

/// Reads a `system_state` value.
pub(crate) async fn get_state_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;
    Ok(state.map(|s| s.value))
}

/// Inserts or replaces a `system_state` value.
pub(crate) async fn set_state_value<C>(db: &C, key: &str, value: String) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now().naive_utc();

    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(value);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        system_state::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}
