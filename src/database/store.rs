use async_trait::async_trait;

use super::models::{Category, Comment, Holiday, Item, NewComment, NewItem, Taste, TempComment};
use super::pagination::Page;
use super::DatabaseError;

/// Every read and write the route layer performs. Handlers get an
/// implementation injected through router state; each mutating call commits
/// on its own.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All categories ordered by their display label
    async fn categories(&self) -> Result<Vec<Category>, DatabaseError>;
    async fn category(&self, id: i32) -> Result<Option<Category>, DatabaseError>;
    async fn insert_category(&self, kind: &str) -> Result<Category, DatabaseError>;

    async fn items_page(&self, page: Page) -> Result<Vec<Item>, DatabaseError>;
    async fn items_in_category(&self, category: i32) -> Result<Vec<Item>, DatabaseError>;
    async fn item(&self, id: i32) -> Result<Option<Item>, DatabaseError>;
    async fn count_items(&self) -> Result<i64, DatabaseError>;
    async fn insert_item(&self, item: NewItem) -> Result<Item, DatabaseError>;
    /// Persist every column of an already-loaded item
    async fn update_item(&self, item: &Item) -> Result<(), DatabaseError>;
    /// Returns false when no row had that id
    async fn delete_item(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn tastes_for_item(&self, item: i32) -> Result<Vec<Taste>, DatabaseError>;
    async fn holidays_for_item(&self, item: i32) -> Result<Vec<Holiday>, DatabaseError>;

    async fn temp_comments_page(&self, page: Page) -> Result<Vec<TempComment>, DatabaseError>;
    async fn count_temp_comments(&self) -> Result<i64, DatabaseError>;
    async fn insert_temp_comment(&self, comment: NewComment) -> Result<TempComment, DatabaseError>;
    async fn delete_temp_comment(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn comments_page(&self, page: Page) -> Result<Vec<Comment>, DatabaseError>;
    async fn count_comments(&self) -> Result<i64, DatabaseError>;
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, DatabaseError>;
    async fn delete_comment(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
