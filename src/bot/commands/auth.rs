//! Password gate commands - `unlock`, `lock` and `change_password`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::auth,
        errors::{Error, Result},
    };
    use tracing::info;

    /// Unlocks the ledger. The first call sets the password.
    #[poise::command(slash_command, ephemeral)]
    pub async fn unlock(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Ledger password"] password: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        if !auth::is_password_set(db).await? {
            auth::set_password(db, &password).await?;
            ctx.data().set_unlocked(true);
            ctx.say("✅ Password set. The ledger is unlocked.").await?;
            return Ok(());
        }

        if auth::check_password(db, &password).await? {
            ctx.data().set_unlocked(true);
            info!("Ledger unlocked by {}", ctx.author().name);
            ctx.say("✅ Ledger unlocked.").await?;
        } else {
            ctx.say("❌ Wrong password.").await?;
        }
        Ok(())
    }

    /// Locks the ledger.
    #[poise::command(slash_command)]
    pub async fn lock(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.data().set_unlocked(false);
        info!("Ledger locked by {}", ctx.author().name);
        ctx.say("🔒 Ledger locked.").await?;
        Ok(())
    }

    /// Replaces the ledger password.
    #[poise::command(slash_command, ephemeral)]
    pub async fn change_password(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Current password"] current: String,
        #[description = "New password (at least 4 characters)"] new: String,
    ) -> Result<()> {
        auth::change_password(&ctx.data().database, &current, &new).await?;
        ctx.say("✅ Password changed.").await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
