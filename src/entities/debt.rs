//! Debt entity - Money the shop owes, with the date it was incurred or is due.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Debt database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "debts")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the debt
    #[sea_orm(primary_key)]
    pub id: i64,
    /// What the debt is for
    pub description: String,
    /// Amount owed
    pub amount: f64,
    /// Due or incurred date
    #[sea_orm(indexed)]
    #[serde(deserialize_with = "super::deserialize_calendar_date")]
    pub date: Date,
    /// When the debt was recorded
    pub created_at: DateTimeUtc,
}

/// Debts have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
