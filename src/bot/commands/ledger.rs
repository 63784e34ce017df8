//! Ledger-wide Discord commands - `dashboard`, `rollover` and `backup`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{backup, period, report},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::info;

    /// Shows totals, this month's profit and the latest sales.
    #[poise::command(slash_command)]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let month = period::current_month(&data.database).await?;
        let figures = report::dashboard(&data.database, month).await?;
        let text = report::format_dashboard(&figures, &data.settings.currency_symbol)?;

        let embed = serenity::CreateEmbed::default()
            .title(format!("Dashboard - {month}"))
            .description(text)
            .color(0x0058_65F2);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Moves unsold stock into next month. Shows a preview unless confirmed.
    #[poise::command(slash_command)]
    pub async fn rollover(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Set to true to perform the rollover"] confirm: Option<bool>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let month = period::current_month(db).await?;

        if period::rolled_over_this_month(db).await? {
            ctx.say("Stock was already rolled over this month; the next rollover opens next month.")
                .await?;
            return Ok(());
        }

        if !confirm.unwrap_or(false) {
            let preview = period::preview_rollover(db, month).await?;
            if preview.products.is_empty() {
                ctx.say("Nothing to roll over: no unsold products.").await?;
                return Ok(());
            }

            let mut text = format!(
                "**Rollover preview** {} → {}\n{} unsold products would move:\n",
                preview.current_month,
                preview.next_month,
                preview.products.len()
            );
            for p in preview.products.iter().take(10) {
                writeln!(text, "• {} (`{}`)", p.name, p.code)?;
            }
            if preview.products.len() > 10 {
                writeln!(text, "... and {} more", preview.products.len() - 10)?;
            }
            if let Some(last) = period::get_last_rollover_at(db).await? {
                writeln!(text, "Last rollover: {}", last.format("%Y-%m-%d %H:%M UTC"))?;
            }
            text.push_str("\nRun `/rollover confirm:true` to proceed. This cannot be undone.");

            ctx.say(text).await?;
            return Ok(());
        }

        ctx.defer().await?;
        match period::rollover(db, month).await? {
            Some(result) => {
                let summary = period::format_rollover_summary(&result)?;
                ctx.say(format!("✅ {summary}")).await?;
            }
            None => {
                ctx.say("Nothing to roll over: no unsold products.").await?;
            }
        }
        Ok(())
    }

    /// Parent command for backups.
    #[poise::command(slash_command, subcommands("backup_export", "backup_import"))]
    pub async fn backup(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Backup commands:\n\
            `/backup export` - Download the whole ledger as JSON\n\
            `/backup import` - Replace the ledger from a JSON backup",
        )
        .await?;
        Ok(())
    }

    /// Sends the whole ledger as a JSON file.
    #[poise::command(slash_command, rename = "export", ephemeral)]
    pub async fn backup_export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.defer_ephemeral().await?;
        let json = backup::export_to_string(&ctx.data().database).await?;
        let filename = format!(
            "ledger-backup-{}.json",
            chrono::Local::now().date_naive().format("%Y-%m-%d")
        );

        let reply = poise::CreateReply::default()
            .content("✅ Backup ready.")
            .attachment(serenity::CreateAttachment::bytes(json.into_bytes(), filename));
        ctx.send(reply).await?;
        Ok(())
    }

    /// Replaces the whole ledger with an uploaded backup.
    #[poise::command(slash_command, rename = "import")]
    pub async fn backup_import(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Backup JSON file"] file: serenity::Attachment,
        #[description = "Set to true to replace all current data"] confirm: Option<bool>,
    ) -> Result<()> {
        if !confirm.unwrap_or(false) {
            ctx.say(
                "⚠️ Importing replaces every product, sale, period, debt and accessory. \
                Run again with `confirm:true` to proceed.",
            )
            .await?;
            return Ok(());
        }

        ctx.defer().await?;
        let bytes = file.download().await?;
        let json = String::from_utf8(bytes).map_err(|_| Error::InvalidBackup {
            message: "file is not UTF-8 text".to_string(),
        })?;

        let summary = backup::import_from_str(&ctx.data().database, &json).await?;
        info!("Backup '{}' imported by {}", file.filename, ctx.author().name);

        ctx.say(format!(
            "✅ Imported {} products, {} sales, {} periods, {} debts and {} accessories.",
            summary.products, summary.sales, summary.periods, summary.debts, summary.accessories
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
