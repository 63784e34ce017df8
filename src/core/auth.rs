//! Access password gate.
//!
//! A single shared password guards the ledger. Only its SHA-256 digest is kept,
//! in the `system_state` table. This keeps casual hands off the data and is not
//! meant as a security boundary.

use crate::{
    core::{get_state_value, set_state_value},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

const ACCESS_PASSWORD_KEY: &str = "access_password";

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 4;

fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn validate_new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::Validation {
            message: format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }
    Ok(())
}

/// Whether a password has been set.
pub async fn is_password_set(db: &DatabaseConnection) -> Result<bool> {
    Ok(get_state_value(db, ACCESS_PASSWORD_KEY).await?.is_some())
}

/// Stores `password`, replacing any previous one.
///
/// # Errors
/// Returns `Error::Validation` if the password is shorter than [`MIN_PASSWORD_LEN`].
pub async fn set_password(db: &DatabaseConnection, password: &str) -> Result<()> {
    validate_new_password(password)?;
    set_state_value(db, ACCESS_PASSWORD_KEY, digest(password)).await?;
    info!("Access password set");
    Ok(())
}

/// Compares `password` against the stored one. Always false when none is set.
pub async fn check_password(db: &DatabaseConnection, password: &str) -> Result<bool> {
    let Some(stored) = get_state_value(db, ACCESS_PASSWORD_KEY).await? else {
        return Ok(false);
    };
    let matches = stored == digest(password);
    if !matches {
        warn!("Rejected access password attempt");
    }
    Ok(matches)
}

/// Replaces the password after verifying the current one.
///
/// # Errors
/// Returns `Error::Validation` if `current` does not match or `new` is too short.
pub async fn change_password(db: &DatabaseConnection, current: &str, new: &str) -> Result<()> {
    validate_new_password(new)?;
    if !check_password(db, current).await? {
        return Err(Error::Validation {
            message: "Current password is incorrect".to_string(),
        });
    }
    set_password(db, new).await
}
