//! General Discord commands - ping and help.
//! These commands don't touch the ledger and stay available while it is locked.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Shop Ledger Help**\n\
        **Access**\n\
        • `/unlock <password>` - Sets the password on first use, unlocks afterwards.\n\
        • `/lock` - Locks the ledger again.\n\
        • `/change_password <current> <new>` - Replaces the password.\n\n\
        **Stock & Sales**\n\
        • `/product <add|list|edit|delete>` - Manage phones in stock.\n\
        • `/sale <record|list|show|edit|delete>` - Record and review sales.\n\
        • `/accessory <add|list|edit|delete>` - Manage cases, screen protectors and cables.\n\
        • `/debt <add|list|edit|delete>` - Track money owed.\n\n\
        **Ledger**\n\
        • `/dashboard` - Totals, this month's profit and recent sales.\n\
        • `/rollover [confirm]` - Moves unsold stock into next month.\n\
        • `/backup <export|import>` - Download or restore the whole ledger.\n\
        • `/ping` - Checks if the bot is responsive.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
