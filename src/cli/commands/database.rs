use anyhow::Context;
use sqlx::PgPool;

use crate::config;
use crate::database::{schema, CatalogStore, DatabaseManager, PgCatalogStore};

async fn connect() -> anyhow::Result<PgPool> {
    let pool = DatabaseManager::connect(&config::config().database)
        .await
        .context("failed to connect to database")?;
    schema::create_all(&pool).await.context("failed to create tables")?;
    Ok(pool)
}

pub async fn migrate() -> anyhow::Result<()> {
    connect().await?;
    println!("Tables are up to date");
    Ok(())
}

pub async fn seed() -> anyhow::Result<()> {
    let store = PgCatalogStore::new(connect().await?);

    let inserted = schema::seed_categories(&store)
        .await
        .context("failed to seed categories")?;
    if inserted == 0 {
        println!("Categories already present, nothing to seed");
    } else {
        println!("Inserted {} categories", inserted);
    }

    let total = store.categories().await?.len();
    println!("Catalog has {} categories", total);
    Ok(())
}
