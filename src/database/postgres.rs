use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{Category, Comment, Holiday, Item, NewComment, NewItem, Taste, TempComment};
use super::pagination::Page;
use super::store::CatalogStore;
use super::DatabaseError;

/// `CatalogStore` backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Foreign key and other integrity failures get their own variant so the
/// route layer can log them distinctly
fn classify(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
            return DatabaseError::Constraint(db_err.message().to_string());
        }
    }
    DatabaseError::Sqlx(err)
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let rows = sqlx::query_as::<_, Category>("SELECT id, type FROM categories ORDER BY type, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn category(&self, id: i32) -> Result<Option<Category>, DatabaseError> {
        let row = sqlx::query_as::<_, Category>("SELECT id, type FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_category(&self, kind: &str) -> Result<Category, DatabaseError> {
        let row = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (type) VALUES ($1) RETURNING id, type",
        )
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;
        Ok(row)
    }

    async fn items_page(&self, page: Page) -> Result<Vec<Item>, DatabaseError> {
        let rows = sqlx::query_as::<_, Item>(
            "SELECT id, title, brand, category, comment FROM items ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn items_in_category(&self, category: i32) -> Result<Vec<Item>, DatabaseError> {
        let rows = sqlx::query_as::<_, Item>(
            "SELECT id, title, brand, category, comment FROM items WHERE category = $1 ORDER BY id",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn item(&self, id: i32) -> Result<Option<Item>, DatabaseError> {
        let row = sqlx::query_as::<_, Item>(
            "SELECT id, title, brand, category, comment FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn count_items(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_item(&self, item: NewItem) -> Result<Item, DatabaseError> {
        let row = sqlx::query_as::<_, Item>(
            r#"INSERT INTO items (title, brand, category, comment)
               VALUES ($1, $2, $3, $4)
               RETURNING id, title, brand, category, comment"#,
        )
        .bind(&item.title)
        .bind(&item.brand)
        .bind(item.category)
        .bind(&item.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;
        Ok(row)
    }

    async fn update_item(&self, item: &Item) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE items SET title = $2, brand = $3, category = $4, comment = $5 WHERE id = $1",
        )
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.brand)
        .bind(item.category)
        .bind(&item.comment)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("item {}", item.id)));
        }
        Ok(())
    }

    async fn delete_item(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn tastes_for_item(&self, item: i32) -> Result<Vec<Taste>, DatabaseError> {
        let rows = sqlx::query_as::<_, Taste>("SELECT id, item, taste FROM tastes WHERE item = $1 ORDER BY id")
            .bind(item)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn holidays_for_item(&self, item: i32) -> Result<Vec<Holiday>, DatabaseError> {
        let rows = sqlx::query_as::<_, Holiday>(
            "SELECT id, item, holiday FROM holidays WHERE item = $1 ORDER BY id",
        )
        .bind(item)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn temp_comments_page(&self, page: Page) -> Result<Vec<TempComment>, DatabaseError> {
        let rows = sqlx::query_as::<_, TempComment>(
            "SELECT id, comment, rating, item, userid FROM temp_comments ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_temp_comments(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM temp_comments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_temp_comment(&self, comment: NewComment) -> Result<TempComment, DatabaseError> {
        let row = sqlx::query_as::<_, TempComment>(
            r#"INSERT INTO temp_comments (comment, rating, item, userid)
               VALUES ($1, $2, $3, $4)
               RETURNING id, comment, rating, item, userid"#,
        )
        .bind(&comment.comment)
        .bind(comment.rating)
        .bind(comment.item)
        .bind(comment.userid)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;
        Ok(row)
    }

    async fn delete_temp_comment(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM temp_comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn comments_page(&self, page: Page) -> Result<Vec<Comment>, DatabaseError> {
        let rows = sqlx::query_as::<_, Comment>(
            "SELECT id, comment, rating, item, userid FROM comments ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_comments(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, DatabaseError> {
        let row = sqlx::query_as::<_, Comment>(
            r#"INSERT INTO comments (comment, rating, item, userid)
               VALUES ($1, $2, $3, $4)
               RETURNING id, comment, rating, item, userid"#,
        )
        .bind(&comment.comment)
        .bind(comment.rating)
        .bind(comment.item)
        .bind(comment.userid)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;
        Ok(row)
    }

    async fn delete_comment(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
