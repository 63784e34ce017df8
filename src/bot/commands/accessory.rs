//! Accessory Discord commands - `/accessory add|list|edit|delete`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::CategoryChoice, handlers::autocomplete},
        core::{
            accessory::{self, AccessoryInput},
            report,
        },
        entities::AccessoryCategory,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Accessories shown per list, leaving room under Discord's 25-field cap.
    const MAX_FIELDS: usize = 20;

    /// Parent command for accessory stock.
    #[poise::command(
        slash_command,
        subcommands("accessory_add", "accessory_list", "accessory_edit", "accessory_delete")
    )]
    pub async fn accessory(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Accessory commands:\n\
            `/accessory add` - Add an accessory\n\
            `/accessory list` - List accessories\n\
            `/accessory edit` - Edit an accessory\n\
            `/accessory delete` - Delete an accessory",
        )
        .await?;
        Ok(())
    }

    /// Adds an accessory to stock.
    #[poise::command(slash_command, rename = "add")]
    pub async fn accessory_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Accessory name"] name: String,
        #[description = "Category"] category: CategoryChoice,
        #[description = "Units on hand"] quantity: i32,
        #[description = "Unit price"] price: f64,
    ) -> Result<()> {
        let data = ctx.data();
        let created = accessory::create_accessory(
            &data.database,
            AccessoryInput {
                name,
                category: category.into(),
                quantity,
                price,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Added **{}** ({}) x{} at {}.",
            created.name,
            created.category,
            created.quantity,
            report::format_amount(created.price, &data.settings.currency_symbol)
        ))
        .await?;
        Ok(())
    }

    /// Lists accessories, optionally of one category.
    #[poise::command(slash_command, rename = "list")]
    pub async fn accessory_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this category"] category: Option<CategoryChoice>,
    ) -> Result<()> {
        let data = ctx.data();
        let accessories = match category {
            Some(choice) => {
                accessory::list_accessories_by_category(&data.database, choice.into()).await?
            }
            None => accessory::list_accessories(&data.database).await?,
        };

        if accessories.is_empty() {
            ctx.say("No accessories found. Use `/accessory add` to add some!")
                .await?;
            return Ok(());
        }

        let symbol = &data.settings.currency_symbol;
        let summary = report::accessory_summary(&accessories);
        let fields: Vec<(String, String, bool)> = accessories
            .iter()
            .take(MAX_FIELDS)
            .map(|a| {
                (
                    format!("{} ({})", a.name, a.category),
                    format!("{} pcs @ {}", a.quantity, report::format_amount(a.price, symbol)),
                    true,
                )
            })
            .collect();
        let counts: Vec<String> = summary
            .per_category
            .iter()
            .map(|(c, n)| format!("{c}: {n}"))
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("Accessories")
            .fields(fields)
            .field(
                "Stock value",
                report::format_amount(summary.stock_value, symbol),
                false,
            )
            .field("Per category", counts.join(" | "), false)
            .color(0x00FE_E75C);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Edits an accessory. Omitted fields keep their value.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn accessory_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Accessory to edit"]
        #[autocomplete = "autocomplete::autocomplete_accessory_name"]
        name: String,
        #[description = "New name"] new_name: Option<String>,
        #[description = "New category"] category: Option<CategoryChoice>,
        #[description = "Units on hand"] quantity: Option<i32>,
        #[description = "Unit price"] price: Option<f64>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(existing) = accessory::get_accessory_by_name(db, &name).await? else {
            ctx.say(format!("❌ No accessory named '{name}'.")).await?;
            return Ok(());
        };

        let category = match category {
            Some(choice) => AccessoryCategory::from(choice),
            None => existing.category()?,
        };

        let updated = accessory::update_accessory(
            db,
            existing.id,
            AccessoryInput {
                name: new_name.unwrap_or(existing.name),
                category,
                quantity: quantity.unwrap_or(existing.quantity),
                price: price.unwrap_or(existing.price),
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Updated **{}** ({}) x{}.",
            updated.name, updated.category, updated.quantity
        ))
        .await?;
        Ok(())
    }

    /// Deletes an accessory. Past sales keep their snapshot.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn accessory_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Accessory to delete"]
        #[autocomplete = "autocomplete::autocomplete_accessory_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(existing) = accessory::get_accessory_by_name(db, &name).await? else {
            ctx.say(format!("❌ No accessory named '{name}'.")).await?;
            return Ok(());
        };

        accessory::delete_accessory(db, existing.id).await?;
        ctx.say(format!("🗑️ Deleted accessory **{}**.", existing.name))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
