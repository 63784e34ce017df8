//! Autocomplete handlers for Discord slash command parameters.
//!
//! Product parameters take the stock code, which is unique; suggestions match on
//! either the code or the product name.

use crate::{
    bot::BotData,
    core::{
        accessory,
        product::{self, StockFilter},
    },
    entities::product::Model as ProductModel,
    errors::Error,
};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

/// Codes of `products` whose code or name contains `partial`, case-insensitively.
#[must_use]
pub fn matching_codes(products: Vec<ProductModel>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    products
        .into_iter()
        .filter(|p| {
            p.code.to_lowercase().contains(&partial_lower)
                || p.name.to_lowercase().contains(&partial_lower)
        })
        .map(|p| p.code)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Suggests codes of products that still have stock.
pub async fn autocomplete_unsold_product(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(products) = product::list_products(&ctx.data().database, StockFilter::InStock).await
    else {
        return Vec::new();
    };
    matching_codes(products, partial)
}

/// Suggests codes of every product.
pub async fn autocomplete_any_product(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(products) = product::list_products(&ctx.data().database, StockFilter::All).await else {
        return Vec::new();
    };
    matching_codes(products, partial)
}

/// Suggests accessory names.
pub async fn autocomplete_accessory_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(accessories) = accessory::list_accessories(&ctx.data().database).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = accessories
        .into_iter()
        .filter(|a| a.name.to_lowercase().contains(&partial_lower))
        .map(|a| a.name)
        .take(MAX_SUGGESTIONS)
        .collect();

    // Sort alphabetically for consistent UX
    matching.sort();
    matching
}
