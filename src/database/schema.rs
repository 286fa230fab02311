use sqlx::PgPool;
use tracing::info;

use super::{CatalogStore, DatabaseError};

/// Table DDL in dependency order. Comment tables hold a plain item id, so
/// deleting an item leaves its comments in place.
const TABLES: &[(&str, &str)] = &[
    (
        "categories",
        r#"CREATE TABLE IF NOT EXISTS categories (
            id SERIAL PRIMARY KEY,
            type VARCHAR NOT NULL
        )"#,
    ),
    (
        "items",
        r#"CREATE TABLE IF NOT EXISTS items (
            id SERIAL PRIMARY KEY,
            title VARCHAR NOT NULL,
            brand VARCHAR NOT NULL,
            category INTEGER NOT NULL REFERENCES categories(id),
            comment VARCHAR
        )"#,
    ),
    (
        "temp_comments",
        r#"CREATE TABLE IF NOT EXISTS temp_comments (
            id SERIAL PRIMARY KEY,
            comment VARCHAR NOT NULL,
            rating DOUBLE PRECISION NOT NULL,
            item INTEGER NOT NULL,
            userid INTEGER NOT NULL
        )"#,
    ),
    (
        "comments",
        r#"CREATE TABLE IF NOT EXISTS comments (
            id SERIAL PRIMARY KEY,
            comment VARCHAR NOT NULL,
            rating DOUBLE PRECISION NOT NULL,
            item INTEGER NOT NULL,
            userid INTEGER NOT NULL
        )"#,
    ),
    (
        "tastes",
        r#"CREATE TABLE IF NOT EXISTS tastes (
            id SERIAL PRIMARY KEY,
            item INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
            taste VARCHAR NOT NULL
        )"#,
    ),
    (
        "holidays",
        r#"CREATE TABLE IF NOT EXISTS holidays (
            id SERIAL PRIMARY KEY,
            item INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
            holiday VARCHAR NOT NULL
        )"#,
    ),
];

/// Create every table that does not exist yet
pub async fn create_all(pool: &PgPool) -> Result<(), DatabaseError> {
    for (name, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await?;
        info!("Ensured table: {}", name);
    }
    Ok(())
}

/// Category labels inserted by `seed` into an empty catalog
pub const DEFAULT_CATEGORIES: &[&str] = &["Chips", "Candy", "Cookies", "Crackers", "Nuts", "Popcorn"];

/// Insert `DEFAULT_CATEGORIES` when the catalog has no categories yet.
/// Returns how many rows were written.
pub async fn seed_categories(store: &dyn CatalogStore) -> Result<usize, DatabaseError> {
    if !store.categories().await?.is_empty() {
        return Ok(0);
    }
    for kind in DEFAULT_CATEGORIES {
        store.insert_category(kind).await?;
    }
    info!("Seeded {} categories", DEFAULT_CATEGORIES.len());
    Ok(DEFAULT_CATEGORIES.len())
}
