//! Upserts the default spa catalog into PostgreSQL.

use anyhow::Context;
use spa_booking::{catalog::seed::seed_catalog, logging, store::PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let store = PgStore::connect(&url).await?;
    store.migrate().await?;

    let written = seed_catalog(&store).await?;
    tracing::info!(written, "catalog seeded");
    Ok(())
}
