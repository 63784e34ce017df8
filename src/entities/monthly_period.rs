//! Monthly period entity - Marks which `YYYY-MM` period is current.
//!
//! A new active row is written by each monthly rollover and the previous
//! month's row is deactivated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Monthly period database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_periods")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Period label, `YYYY-MM`
    #[sea_orm(indexed)]
    pub month_year: String,
    /// Whether this is the current period
    pub is_active: bool,
    /// When the period row was created
    pub created_at: DateTimeUtc,
}

/// `MonthlyPeriod` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
