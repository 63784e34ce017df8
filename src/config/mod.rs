/// Database configuration and connection management
pub mod database;

/// Shop settings and accessory seeds loaded from config.toml
pub mod shop;
