//! Unified error type for the ledger.
//!
//! Validation failures are reported before any write is attempted, storage
//! failures bubble up from `SeaORM`, and backup integrity problems are raised
//! before an import clears anything.

use thiserror::Error;

/// All errors produced by the ledger core and the bot layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A form field failed validation (empty name, short password, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// A price, cost or amount was negative or not a finite number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// A quantity was zero or negative
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected value
        quantity: i32,
    },

    /// A month string was not in `YYYY-MM` form
    #[error("Invalid month '{value}', expected YYYY-MM")]
    InvalidMonth {
        /// The rejected input
        value: String,
    },

    /// No product with this id
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Product id
        id: i64,
    },

    /// The product has already been sold out
    #[error("Product {id} is already sold")]
    ProductAlreadySold {
        /// Product id
        id: i64,
    },

    /// Not enough units of a product or accessory on hand
    #[error("Insufficient stock for '{item}': {available} available, {requested} requested")]
    InsufficientStock {
        /// Name of the product or accessory
        item: String,
        /// Units on hand
        available: i32,
        /// Units requested
        requested: i32,
    },

    /// No accessory with this id
    #[error("Accessory not found: {id}")]
    AccessoryNotFound {
        /// Accessory id
        id: i64,
    },

    /// Another accessory already uses this name
    #[error("An accessory named '{name}' already exists")]
    DuplicateAccessory {
        /// The clashing name
        name: String,
    },

    /// No sale with this id
    #[error("Sale not found: {id}")]
    SaleNotFound {
        /// Sale id
        id: i64,
    },

    /// No debt with this id
    #[error("Debt not found: {id}")]
    DebtNotFound {
        /// Debt id
        id: i64,
    },

    /// A backup document is missing a required section or is malformed
    #[error("Invalid backup: {message}")]
    InvalidBackup {
        /// What is missing or malformed
        message: String,
    },

    /// JSON (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Writing into a report buffer failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
