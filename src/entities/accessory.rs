//! Accessory entity - Cases, screen protectors and cables kept in stock.
//!
//! The category is stored as a string; [`AccessoryCategory`] is the typed view
//! and also understands the labels used by older backups.

use crate::errors;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Accessory database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accessories")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the accessory
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Clear Silicone Case")
    #[sea_orm(indexed)]
    pub name: String,
    /// One of `case`, `screen-protector`, `cable`
    #[serde(alias = "type")]
    pub category: String,
    /// Units on hand
    pub quantity: i32,
    /// Current unit price
    pub price: f64,
    /// When the accessory was added
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Typed category of this accessory.
    pub fn category(&self) -> errors::Result<AccessoryCategory> {
        self.category.parse()
    }
}

/// Accessories have no declared relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Accessory category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessoryCategory {
    /// Phone case
    Case,
    /// Screen protector
    ScreenProtector,
    /// Charging or data cable
    Cable,
}

impl AccessoryCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::Case, Self::ScreenProtector, Self::Cable];

    /// Canonical persisted label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::ScreenProtector => "screen-protector",
            Self::Cable => "cable",
        }
    }
}

impl fmt::Display for AccessoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessoryCategory {
    type Err = errors::Error;

    fn from_str(s: &str) -> errors::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "case" | "kılıf" => Ok(Self::Case),
            "screen-protector" | "screen protector" | "ekran koruyucu" => {
                Ok(Self::ScreenProtector)
            }
            "cable" | "kablo" => Ok(Self::Cable),
            _ => Err(errors::Error::Validation {
                message: format!("Unknown accessory category '{s}'"),
            }),
        }
    }
}
