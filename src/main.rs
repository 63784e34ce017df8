use dotenvy::dotenv;
use shop_ledger::{
    bot,
    config::{database, shop},
    core::{accessory, period},
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load shop settings
    let config = shop::load_default_config()
        .inspect_err(|e| error!("Failed to load shop configuration: {}", e))?;

    // 4. Open the database and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Seed configured accessories and make sure a period is open
    accessory::seed_accessories(&db, &config.accessories).await?;
    let month = period::current_month(&db).await?;
    period::ensure_period(&db, month).await?;
    info!("Ledger ready, filing stock under {}", month);

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, db, config.shop).await
}
