//! Report generation business logic.
//!
//! This module provides the dashboard figures and the text formatting shared by
//! the list commands. Figures are computed here and returned as plain structs;
//! the bot layer only lays them out.

use crate::{
    core::accounting::MonthYear,
    entities::{
        Accessory, AccessoryCategory, Debt, Product, Sale, SaleAccessories, accessory, product,
        sale,
    },
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, prelude::*};
use std::collections::HashMap;
use std::fmt::Write;

/// Number of sales shown on the dashboard.
pub const RECENT_SALES_LIMIT: u64 = 5;

/// Name shown for a sale whose product has been deleted.
pub const UNKNOWN_PRODUCT: &str = "Unknown product";

/// A sale paired with the name of what was sold.
#[derive(Debug, Clone)]
pub struct RecentSale {
    /// The sale
    pub sale: sale::Model,
    /// Product name, or [`UNKNOWN_PRODUCT`]
    pub product_name: String,
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Month the monthly profit refers to
    pub month: MonthYear,
    /// Every product ever taken in
    pub total_products: usize,
    /// Products that are sold out
    pub sold_products: usize,
    /// Purchase value of unsold stock
    pub stock_value: f64,
    /// Net profit over all sales
    pub total_profit: f64,
    /// Net profit of sales dated inside `month`
    pub month_profit: f64,
    /// Sum of recorded debts
    pub total_debts: f64,
    /// Latest recorded sales, newest first
    pub recent_sales: Vec<RecentSale>,
}

/// Totals over a list of sales.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SalesSummary {
    /// Number of sales
    pub count: usize,
    /// Sum of sale prices
    pub revenue: f64,
    /// Sum of net profit
    pub profit: f64,
}

/// Totals over the accessory stock.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccessorySummary {
    /// Sum of `price * quantity`
    pub stock_value: f64,
    /// Number of accessory rows per category, in display order
    pub per_category: Vec<(AccessoryCategory, usize)>,
}

/// Gathers the dashboard figures for `month`.
pub async fn dashboard(db: &DatabaseConnection, month: MonthYear) -> Result<Dashboard> {
    let products = Product::find().all(db).await?;
    let sales = Sale::find().all(db).await?;
    let debts = Debt::find().all(db).await?;

    let sold_products = products.iter().filter(|p| p.is_sold).count();
    let stock_value = stock_value(&products);
    let total_profit = sales.iter().map(|s| s.net_profit).sum();
    let month_profit = sales
        .iter()
        .filter(|s| month.contains(s.sale_date))
        .map(|s| s.net_profit)
        .sum();
    let total_debts = debts.iter().map(|d| d.amount).sum();

    let names: HashMap<i64, &str> = products.iter().map(|p| (p.id, p.name.as_str())).collect();
    let recent_sales = Sale::find()
        .order_by_desc(sale::Column::Id)
        .limit(RECENT_SALES_LIMIT)
        .all(db)
        .await?
        .into_iter()
        .map(|sale| RecentSale {
            product_name: names
                .get(&sale.product_id)
                .map_or_else(|| UNKNOWN_PRODUCT.to_string(), |n| (*n).to_string()),
            sale,
        })
        .collect();

    Ok(Dashboard {
        month,
        total_products: products.len(),
        sold_products,
        stock_value,
        total_profit,
        month_profit,
        total_debts,
        recent_sales,
    })
}

/// Purchase value of the unsold products in `products`.
#[must_use]
pub fn stock_value(products: &[product::Model]) -> f64 {
    products
        .iter()
        .filter(|p| !p.is_sold)
        .map(|p| p.purchase_price * f64::from(p.quantity))
        .sum()
}

/// Count, revenue and profit over `sales`.
#[must_use]
pub fn sales_summary(sales: &[sale::Model]) -> SalesSummary {
    SalesSummary {
        count: sales.len(),
        revenue: sales.iter().map(|s| s.sale_price).sum(),
        profit: sales.iter().map(|s| s.net_profit).sum(),
    }
}

/// Stock value and per-category counts over `accessories`.
///
/// Rows whose category is not recognised are counted in the value only.
#[must_use]
pub fn accessory_summary(accessories: &[accessory::Model]) -> AccessorySummary {
    let per_category = AccessoryCategory::ALL
        .into_iter()
        .map(|category| {
            let count = accessories
                .iter()
                .filter(|a| a.category().ok() == Some(category))
                .count();
            (category, count)
        })
        .collect();

    AccessorySummary {
        stock_value: accessories
            .iter()
            .map(|a| a.price * f64::from(a.quantity))
            .sum(),
        per_category,
    }
}

/// Describes a sale's accessories as `Name (N pcs), ...`, or `None`.
pub async fn describe_sale_accessories(
    db: &DatabaseConnection,
    accessories: &SaleAccessories,
) -> Result<String> {
    if accessories.is_empty() {
        return Ok("None".to_string());
    }

    let mut parts = Vec::with_capacity(accessories.0.len());
    for line in &accessories.0 {
        let name = Accessory::find_by_id(line.accessory_id)
            .one(db)
            .await?
            .map_or_else(|| "Unknown".to_string(), |a| a.name);
        parts.push(format!("{name} ({} pcs)", line.quantity));
    }
    Ok(parts.join(", "))
}

/// Formats an amount with the currency symbol, e.g. `₺1500.00` or `-₺550.00`.
#[must_use]
pub fn format_amount(amount: f64, symbol: &str) -> String {
    if amount < 0.0 {
        format!("-{symbol}{:.2}", amount.abs())
    } else {
        format!("{symbol}{amount:.2}")
    }
}

/// One-line summary of a product.
#[must_use]
pub fn format_product_line(product: &product::Model, symbol: &str) -> String {
    let status = if product.is_sold { "sold" } else { "in stock" };
    format!(
        "`{}` {} x{} @ {} ({}, {})",
        product.code,
        product.name,
        product.quantity,
        format_amount(product.purchase_price, symbol),
        product.month_year,
        status
    )
}

/// One-line summary of a sale.
#[must_use]
pub fn format_sale_line(sale: &sale::Model, product_name: &str, symbol: &str) -> String {
    format!(
        "#{} {} | {} x{} | {} | {} → profit {}",
        sale.id,
        sale.sale_date,
        product_name,
        sale.quantity,
        sale.customer_name,
        format_amount(sale.sale_price, symbol),
        format_amount(sale.net_profit, symbol)
    )
}

/// Renders the dashboard as text.
pub fn format_dashboard(dashboard: &Dashboard, symbol: &str) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "Products: {} total, {} sold, {} in stock",
        dashboard.total_products,
        dashboard.sold_products,
        dashboard.total_products - dashboard.sold_products
    )?;
    writeln!(
        out,
        "Stock value: {}",
        format_amount(dashboard.stock_value, symbol)
    )?;
    writeln!(
        out,
        "Total profit: {}",
        format_amount(dashboard.total_profit, symbol)
    )?;
    writeln!(
        out,
        "Profit in {}: {}",
        dashboard.month,
        format_amount(dashboard.month_profit, symbol)
    )?;
    writeln!(
        out,
        "Total debts: {}",
        format_amount(dashboard.total_debts, symbol)
    )?;

    if dashboard.recent_sales.is_empty() {
        writeln!(out, "\nNo sales yet.")?;
    } else {
        writeln!(out, "\nRecent sales:")?;
        for recent in &dashboard.recent_sales {
            writeln!(
                out,
                "  {}",
                format_sale_line(&recent.sale, &recent.product_name, symbol)
            )?;
        }
    }

    Ok(out)
}
