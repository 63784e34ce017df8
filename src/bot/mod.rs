//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the shop ledger, including all
//! slash commands, autocomplete handlers, the password gate and bot start-up.

/// Discord command implementations
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::shop::ShopSettings,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

/// Commands reachable while the ledger is locked.
const UNGATED_COMMANDS: [&str; 4] = ["unlock", "lock", "ping", "help"];

/// Shared data available to all bot commands.
/// This structure holds the database connection, the shop settings and the
/// state of the password gate.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Code prefix and currency symbol
    pub settings: ShopSettings,
    unlocked: AtomicBool,
}

impl BotData {
    /// Creates a new `BotData` instance. The ledger starts locked.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: ShopSettings) -> Self {
        Self {
            database,
            settings,
            unlocked: AtomicBool::new(false),
        }
    }

    /// Whether ledger commands are currently allowed.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::SeqCst)
    }

    /// Opens or closes the password gate.
    pub fn set_unlocked(&self, unlocked: bool) {
        self.unlocked.store(unlocked, Ordering::SeqCst);
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Whether `qualified_name` may run while the ledger is locked.
#[must_use]
pub fn is_ungated(qualified_name: &str) -> bool {
    let root = qualified_name.split_whitespace().next().unwrap_or_default();
    UNGATED_COMMANDS.contains(&root)
}

async fn gate_check(ctx: Context<'_>) -> Result<bool> {
    Ok(ctx.data().is_unlocked() || is_ungated(&ctx.command().qualified_name))
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::CommandCheckFailed {
            error: None, ctx, ..
        } => {
            warn!(
                "Refused `{}` while locked",
                ctx.command().qualified_name
            );
            if let Err(e) = ctx
                .say("🔒 The ledger is locked. Use `/unlock` first.")
                .await
            {
                error!("Failed to send error message: {}", e);
            }
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Error in command `{}`: {:?}",
                ctx.command().qualified_name,
                error
            );
            if let Err(e) = ctx.say(format!("❌ {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Every slash command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::unlock(),
        commands::lock(),
        commands::change_password(),
        commands::product(),
        commands::sale(),
        commands::accessory(),
        commands::debt(),
        commands::dashboard(),
        commands::rollover(),
        commands::backup(),
    ]
}

/// Connects to Discord and serves commands until the client stops.
///
/// # Errors
/// Returns an error if the client cannot be built or the gateway connection fails.
pub async fn run_bot(
    token: String,
    database: DatabaseConnection,
    settings: ShopSettings,
) -> Result<()> {
    let data = BotData::new(database, settings);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            command_check: Some(|ctx| Box::pin(gate_check(ctx))),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} commands", framework.options().commands.len());
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Starting bot client...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_allows_only_unlock_and_utilities() {
        assert!(is_ungated("unlock"));
        assert!(is_ungated("lock"));
        assert!(is_ungated("ping"));
        assert!(is_ungated("help"));
        assert!(!is_ungated("product add"));
        assert!(!is_ungated("change_password"));
        assert!(!is_ungated("backup export"));
        assert!(!is_ungated(""));
    }

    #[tokio::test]
    async fn test_bot_data_starts_locked() -> Result<()> {
        let db = crate::test_utils::setup_test_db().await?;
        let data = BotData::new(db, ShopSettings::default());
        assert!(!data.is_unlocked());
        data.set_unlocked(true);
        assert!(data.is_unlocked());
        Ok(())
    }
}
