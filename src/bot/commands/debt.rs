//! Debt Discord commands - `/debt add|list|edit|delete`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::parse_date},
        core::{debt, report},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Parent command for debts.
    #[poise::command(
        slash_command,
        subcommands("debt_add", "debt_list", "debt_edit", "debt_delete")
    )]
    pub async fn debt(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Debt commands:\n\
            `/debt add` - Record a debt\n\
            `/debt list` - List debts and their total\n\
            `/debt edit` - Edit a debt\n\
            `/debt delete` - Delete a debt",
        )
        .await?;
        Ok(())
    }

    /// Records a debt.
    #[poise::command(slash_command, rename = "add")]
    pub async fn debt_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What the debt is for"] description: String,
        #[description = "Amount owed"] amount: f64,
        #[description = "Date YYYY-MM-DD. Defaults to today."] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let date = parse_date(date.as_deref())?;
        let created = debt::create_debt(&data.database, &description, amount, date).await?;

        ctx.say(format!(
            "✅ Recorded debt #{} '{}' of {}.",
            created.id,
            created.description,
            report::format_amount(created.amount, &data.settings.currency_symbol)
        ))
        .await?;
        Ok(())
    }

    /// Lists debts, latest first, with their total.
    #[poise::command(slash_command, rename = "list")]
    pub async fn debt_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let debts = debt::list_debts(&data.database).await?;

        if debts.is_empty() {
            ctx.say("No debts recorded. 🎉").await?;
            return Ok(());
        }

        let symbol = &data.settings.currency_symbol;
        let lines: Vec<String> = debts
            .iter()
            .map(|d| {
                format!(
                    "#{} {} | {} | {}",
                    d.id,
                    d.date,
                    d.description,
                    report::format_amount(d.amount, symbol)
                )
            })
            .collect();
        let total = debt::total_debts(&data.database).await?;

        let embed = serenity::CreateEmbed::default()
            .title("Debts")
            .description(lines.join("\n"))
            .field("Total", report::format_amount(total, symbol), false)
            .color(0x00ED_4245);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Edits a debt. Omitted fields keep their value.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn debt_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Debt id"] id: i64,
        #[description = "What the debt is for"] description: Option<String>,
        #[description = "Amount owed"] amount: Option<f64>,
        #[description = "Date YYYY-MM-DD"] date: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(existing) = debt::get_debt_by_id(db, id).await? else {
            ctx.say(format!("❌ Debt #{id} not found.")).await?;
            return Ok(());
        };

        let date = match date {
            Some(text) => parse_date(Some(&text))?,
            None => existing.date,
        };
        let description = description.unwrap_or(existing.description);

        let updated = debt::update_debt(
            db,
            id,
            &description,
            amount.unwrap_or(existing.amount),
            date,
        )
        .await?;

        ctx.say(format!("✅ Debt #{} updated.", updated.id)).await?;
        Ok(())
    }

    /// Deletes a debt.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn debt_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Debt id"] id: i64,
    ) -> Result<()> {
        debt::delete_debt(&ctx.data().database, id).await?;
        ctx.say(format!("🗑️ Deleted debt #{id}.")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
