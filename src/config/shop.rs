//! Shop configuration loading from config.toml
//!
//! Holds the stock-code prefix, the currency symbol used in replies and an
//! optional list of accessories to seed into an empty ledger. Every field has
//! a default, and a missing file is treated as an empty one.

use crate::entities::AccessoryCategory;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// General shop settings
    #[serde(default)]
    pub shop: ShopSettings,
    /// Accessories inserted on start-up when missing
    #[serde(default)]
    pub accessories: Vec<AccessorySeed>,
}

/// General shop settings
#[derive(Debug, Clone, Deserialize)]
pub struct ShopSettings {
    /// Prefix of generated product codes (`PREFIX-YYYYMM-XXXX`)
    #[serde(default = "default_code_prefix")]
    pub code_prefix: String,
    /// Symbol shown in front of amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            code_prefix: default_code_prefix(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_code_prefix() -> String {
    "AOGZ".to_string()
}

fn default_currency_symbol() -> String {
    "₺".to_string()
}

/// One accessory to seed
#[derive(Debug, Clone, Deserialize)]
pub struct AccessorySeed {
    /// Accessory name, used to detect existing rows
    pub name: String,
    /// Category
    pub category: AccessoryCategory,
    /// Units on hand
    pub quantity: i32,
    /// Unit price
    pub price: f64,
}

/// Loads shop configuration from a TOML file
///
/// # Errors
/// Returns an error if the file exists but cannot be read, or if the TOML is
/// invalid or has fields of the wrong type. A missing file yields defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("No config file at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path:?}: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.shop.code_prefix.trim().is_empty() {
        return Err(Error::Config {
            message: "shop.code_prefix cannot be empty".to_string(),
        });
    }

    Ok(config)
}

/// Loads configuration from `SHOP_CONFIG_PATH`, or `./config.toml` when unset
pub fn load_default_config() -> Result<Config> {
    let path =
        std::env::var("SHOP_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)
}
