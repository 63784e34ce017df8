//! Sale Discord commands - `/sale record|list|show|edit|delete`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{parse_accessory_list, parse_date},
            handlers::autocomplete,
        },
        core::{
            accessory, product, report,
            sale::{self, AccessoryUse, NewSale, SaleUpdate},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Maximum sales shown by `/sale list`.
    const LIST_LIMIT: usize = 20;

    async fn product_name(ctx: poise::Context<'_, BotData, Error>, product_id: i64) -> Result<String> {
        Ok(product::get_product_by_id(&ctx.data().database, product_id)
            .await?
            .map_or_else(|| report::UNKNOWN_PRODUCT.to_string(), |p| p.name))
    }

    /// Parent command for sales.
    #[poise::command(
        slash_command,
        subcommands("sale_record", "sale_list", "sale_show", "sale_edit", "sale_delete")
    )]
    pub async fn sale(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Sale commands:\n\
            `/sale record` - Record a sale\n\
            `/sale list` - List recent sales\n\
            `/sale show` - Show one sale\n\
            `/sale edit` - Edit customer, price, cost or date\n\
            `/sale delete` - Delete a sale (stock is not restored)",
        )
        .await?;
        Ok(())
    }

    /// Records a sale and takes the units out of stock.
    #[poise::command(slash_command, rename = "record")]
    #[allow(clippy::too_many_arguments)]
    pub async fn sale_record(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product code"]
        #[autocomplete = "autocomplete::autocomplete_unsold_product"]
        code: String,
        #[description = "Customer full name"] customer: String,
        #[description = "Device IMEI"] imei: String,
        #[description = "Total price charged"] sale_price: f64,
        #[description = "Incidental cost. Defaults to 0."] cost: Option<f64>,
        #[description = "Units sold. Defaults to 1."] quantity: Option<i32>,
        #[description = "Sale date YYYY-MM-DD. Defaults to today."] date: Option<String>,
        #[description = "Accessories given, e.g. 'Clear Case:1, USB-C Cable:2'"]
        accessories: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let sale_date = parse_date(date.as_deref())?;

        let Some(sold) = product::get_product_by_code(db, &code).await? else {
            ctx.say(format!("❌ No product with code '{code}'.")).await?;
            return Ok(());
        };

        let mut uses = Vec::new();
        for (name, qty) in parse_accessory_list(accessories.as_deref().unwrap_or_default())? {
            let Some(found) = accessory::get_accessory_by_name(db, &name).await? else {
                ctx.say(format!("❌ No accessory named '{name}'.")).await?;
                return Ok(());
            };
            uses.push(AccessoryUse {
                accessory_id: found.id,
                quantity: qty,
            });
        }

        let recorded = sale::create_sale(
            db,
            NewSale {
                product_id: sold.id,
                customer_name: customer,
                sale_date,
                imei,
                sale_price,
                cost: cost.unwrap_or(0.0),
                quantity: quantity.unwrap_or(1),
                accessories: uses,
            },
        )
        .await?;

        let symbol = &data.settings.currency_symbol;
        let accessories_text = report::describe_sale_accessories(db, &recorded.accessories).await?;
        ctx.say(format!(
            "✅ Sold **{}** x{} to {} for {}. Net profit: **{}**. Accessories: {}.",
            sold.name,
            recorded.quantity,
            recorded.customer_name,
            report::format_amount(recorded.sale_price, symbol),
            report::format_amount(recorded.net_profit, symbol),
            accessories_text
        ))
        .await?;
        Ok(())
    }

    /// Lists recent sales with totals.
    #[poise::command(slash_command, rename = "list")]
    pub async fn sale_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let sales = sale::list_sales(&data.database).await?;

        if sales.is_empty() {
            ctx.say("No sales recorded yet.").await?;
            return Ok(());
        }

        let symbol = &data.settings.currency_symbol;
        let mut lines = Vec::new();
        for s in sales.iter().take(LIST_LIMIT) {
            let name = product_name(ctx, s.product_id).await?;
            lines.push(report::format_sale_line(s, &name, symbol));
        }

        let summary = report::sales_summary(&sales);
        let embed = serenity::CreateEmbed::default()
            .title(format!("Sales ({})", summary.count))
            .description(lines.join("\n"))
            .field("Revenue", report::format_amount(summary.revenue, symbol), true)
            .field("Net profit", report::format_amount(summary.profit, symbol), true)
            .color(0x0057_F287);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows one sale in full.
    #[poise::command(slash_command, rename = "show")]
    pub async fn sale_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Sale id"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let Some(found) = sale::get_sale_by_id(db, id).await? else {
            ctx.say(format!("❌ Sale #{id} not found.")).await?;
            return Ok(());
        };

        let symbol = &data.settings.currency_symbol;
        let name = product_name(ctx, found.product_id).await?;
        let accessories_text = report::describe_sale_accessories(db, &found.accessories).await?;

        let embed = serenity::CreateEmbed::default()
            .title(format!("Sale #{}", found.id))
            .field("Product", format!("{name} x{}", found.quantity), true)
            .field("Customer", &found.customer_name, true)
            .field("Date", found.sale_date.to_string(), true)
            .field("IMEI", &found.imei, true)
            .field("Price", report::format_amount(found.sale_price, symbol), true)
            .field("Cost", report::format_amount(found.cost, symbol), true)
            .field("Net profit", report::format_amount(found.net_profit, symbol), true)
            .field("Accessories", accessories_text, false)
            .color(0x0057_F287);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Edits a sale; net profit is recomputed.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn sale_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Sale id"] id: i64,
        #[description = "Customer full name"] customer: Option<String>,
        #[description = "Total price charged"] sale_price: Option<f64>,
        #[description = "Incidental cost"] cost: Option<f64>,
        #[description = "Sale date YYYY-MM-DD"] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let Some(existing) = sale::get_sale_by_id(db, id).await? else {
            ctx.say(format!("❌ Sale #{id} not found.")).await?;
            return Ok(());
        };

        let sale_date = match date {
            Some(text) => parse_date(Some(&text))?,
            None => existing.sale_date,
        };

        let updated = sale::update_sale(
            db,
            id,
            SaleUpdate {
                customer_name: customer.unwrap_or(existing.customer_name),
                sale_price: sale_price.unwrap_or(existing.sale_price),
                cost: cost.unwrap_or(existing.cost),
                sale_date,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Sale #{} updated. Net profit: **{}**.",
            updated.id,
            report::format_amount(updated.net_profit, &data.settings.currency_symbol)
        ))
        .await?;
        Ok(())
    }

    /// Deletes a sale. Stock is not restored.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn sale_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Sale id"] id: i64,
    ) -> Result<()> {
        sale::delete_sale(&ctx.data().database, id).await?;
        ctx.say(format!("🗑️ Deleted sale #{id}.")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
