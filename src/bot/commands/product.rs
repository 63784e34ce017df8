//! Product Discord commands - `/product add|list|edit|delete`.
//!
//! Products are addressed by their stock code.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            period,
            product::{self, ProductInput, StockFilter},
            report,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Which products to list.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum StockChoice {
        #[name = "All"]
        All,
        #[name = "In stock"]
        InStock,
        #[name = "Sold"]
        Sold,
    }

    impl From<StockChoice> for StockFilter {
        fn from(choice: StockChoice) -> Self {
            match choice {
                StockChoice::All => Self::All,
                StockChoice::InStock => Self::InStock,
                StockChoice::Sold => Self::Sold,
            }
        }
    }

    /// Maximum products shown by `/product list`.
    const LIST_LIMIT: usize = 25;

    async fn find_by_code(
        ctx: poise::Context<'_, BotData, Error>,
        code: &str,
    ) -> Result<Option<crate::entities::product::Model>> {
        let found = product::get_product_by_code(&ctx.data().database, code).await?;
        if found.is_none() {
            ctx.say(format!("❌ No product with code '{code}'.")).await?;
        }
        Ok(found)
    }

    /// Parent command for phone stock.
    #[poise::command(
        slash_command,
        subcommands("product_add", "product_list", "product_edit", "product_delete")
    )]
    pub async fn product(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Product commands:\n\
            `/product add` - Take a product into stock\n\
            `/product list` - List products\n\
            `/product edit` - Edit an unsold product\n\
            `/product delete` - Delete a product",
        )
        .await?;
        Ok(())
    }

    /// Takes a product into stock under the current month.
    #[poise::command(slash_command, rename = "add")]
    pub async fn product_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product name (e.g., 'iPhone 13 128GB')"] name: String,
        #[description = "Unit purchase price"] purchase_price: f64,
        #[description = "Units bought. Defaults to 1."] quantity: Option<i32>,
    ) -> Result<()> {
        let data = ctx.data();
        let month = period::current_month(&data.database).await?;

        let created = product::create_product(
            &data.database,
            ProductInput {
                name,
                purchase_price,
                quantity: quantity.unwrap_or(1),
            },
            &data.settings.code_prefix,
            month,
        )
        .await?;

        ctx.say(format!(
            "✅ Added **{}** x{} at {} with code `{}` ({}).",
            created.name,
            created.quantity,
            report::format_amount(created.purchase_price, &data.settings.currency_symbol),
            created.code,
            created.month_year
        ))
        .await?;
        Ok(())
    }

    /// Lists products, newest first.
    #[poise::command(slash_command, rename = "list")]
    pub async fn product_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Which products to show. Defaults to in stock."] filter: Option<
            StockChoice,
        >,
    ) -> Result<()> {
        let data = ctx.data();
        let filter = filter.map_or(StockFilter::InStock, StockFilter::from);
        let products = product::list_products(&data.database, filter).await?;

        if products.is_empty() {
            ctx.say("No products found. Use `/product add` to take some into stock!")
                .await?;
            return Ok(());
        }

        let symbol = &data.settings.currency_symbol;
        let lines: Vec<String> = products
            .iter()
            .take(LIST_LIMIT)
            .map(|p| report::format_product_line(p, symbol))
            .collect();
        let mut description = lines.join("\n");
        if products.len() > LIST_LIMIT {
            description.push_str(&format!("\n... and {} more", products.len() - LIST_LIMIT));
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!("Products ({})", products.len()))
            .description(description)
            .field(
                "Stock value",
                report::format_amount(report::stock_value(&products), symbol),
                true,
            )
            .color(0x0058_65F2);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Edits an unsold product's name, price and quantity.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn product_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product code"]
        #[autocomplete = "autocomplete::autocomplete_unsold_product"]
        code: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New unit purchase price"] purchase_price: Option<f64>,
        #[description = "New quantity"] quantity: Option<i32>,
    ) -> Result<()> {
        let Some(existing) = find_by_code(ctx, &code).await? else {
            return Ok(());
        };

        let updated = product::update_product(
            &ctx.data().database,
            existing.id,
            ProductInput {
                name: name.unwrap_or(existing.name),
                purchase_price: purchase_price.unwrap_or(existing.purchase_price),
                quantity: quantity.unwrap_or(existing.quantity),
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Updated {}",
            report::format_product_line(&updated, &ctx.data().settings.currency_symbol)
        ))
        .await?;
        Ok(())
    }

    /// Deletes a product. Its sales are kept.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn product_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product code"]
        #[autocomplete = "autocomplete::autocomplete_any_product"]
        code: String,
    ) -> Result<()> {
        let Some(existing) = find_by_code(ctx, &code).await? else {
            return Ok(());
        };

        product::delete_product(&ctx.data().database, existing.id).await?;
        ctx.say(format!("🗑️ Deleted **{}** (`{}`).", existing.name, existing.code))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
