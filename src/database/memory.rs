use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::models::{Category, Comment, Holiday, Item, NewComment, NewItem, Taste, TempComment};
use super::pagination::Page;
use super::store::CatalogStore;
use super::DatabaseError;

/// Rows keyed by id plus the next id to hand out, like a SERIAL column
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self { rows: BTreeMap::new(), next_id: 1 }
    }

    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn page(&self, page: Page) -> Vec<T> {
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(0);
        self.rows.values().skip(skip).take(take).cloned().collect()
    }

    fn count(&self) -> i64 {
        self.rows.len() as i64
    }
}

#[derive(Debug)]
struct Tables {
    categories: Table<Category>,
    items: Table<Item>,
    temp_comments: Table<TempComment>,
    comments: Table<Comment>,
    tastes: Table<Taste>,
    holidays: Table<Holiday>,
}

/// In-process `CatalogStore` with the same foreign keys as the SQL schema.
/// Comment rows keep a plain item id and outlive the item they describe.
#[derive(Debug)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                categories: Table::new(),
                items: Table::new(),
                temp_comments: Table::new(),
                comments: Table::new(),
                tastes: Table::new(),
                holidays: Table::new(),
            }),
        }
    }

    pub async fn insert_taste(&self, item: i32, taste: &str) -> Result<Taste, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.items.rows.contains_key(&item) {
            return Err(missing_item(item));
        }
        Ok(tables.tastes.insert_with(|id| Taste { id, item, taste: taste.to_string() }))
    }

    pub async fn insert_holiday(&self, item: i32, holiday: &str) -> Result<Holiday, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.items.rows.contains_key(&item) {
            return Err(missing_item(item));
        }
        Ok(tables.holidays.insert_with(|id| Holiday { id, item, holiday: holiday.to_string() }))
    }
}

fn missing_item(item: i32) -> DatabaseError {
    DatabaseError::Constraint(format!("item {} does not exist", item))
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Category> = tables.categories.rows.values().cloned().collect();
        rows.sort_by(|a, b| a.kind.cmp(&b.kind).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn category(&self, id: i32) -> Result<Option<Category>, DatabaseError> {
        Ok(self.tables.read().await.categories.rows.get(&id).cloned())
    }

    async fn insert_category(&self, kind: &str) -> Result<Category, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.categories.insert_with(|id| Category { id, kind: kind.to_string() }))
    }

    async fn items_page(&self, page: Page) -> Result<Vec<Item>, DatabaseError> {
        Ok(self.tables.read().await.items.page(page))
    }

    async fn items_in_category(&self, category: i32) -> Result<Vec<Item>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .rows
            .values()
            .filter(|item| item.category == category)
            .cloned()
            .collect())
    }

    async fn item(&self, id: i32) -> Result<Option<Item>, DatabaseError> {
        Ok(self.tables.read().await.items.rows.get(&id).cloned())
    }

    async fn count_items(&self) -> Result<i64, DatabaseError> {
        Ok(self.tables.read().await.items.count())
    }

    async fn insert_item(&self, item: NewItem) -> Result<Item, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.rows.contains_key(&item.category) {
            return Err(DatabaseError::Constraint(format!(
                "category {} does not exist",
                item.category
            )));
        }
        Ok(tables.items.insert_with(|id| Item {
            id,
            title: item.title,
            brand: item.brand,
            category: item.category,
            comment: item.comment,
        }))
    }

    async fn update_item(&self, item: &Item) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.rows.contains_key(&item.category) {
            return Err(DatabaseError::Constraint(format!(
                "category {} does not exist",
                item.category
            )));
        }
        match tables.items.rows.get_mut(&item.id) {
            Some(row) => {
                *row = item.clone();
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("item {}", item.id))),
        }
    }

    async fn delete_item(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let removed = tables.items.rows.remove(&id).is_some();
        if removed {
            tables.tastes.rows.retain(|_, taste| taste.item != id);
            tables.holidays.rows.retain(|_, holiday| holiday.item != id);
        }
        Ok(removed)
    }

    async fn tastes_for_item(&self, item: i32) -> Result<Vec<Taste>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.tastes.rows.values().filter(|t| t.item == item).cloned().collect())
    }

    async fn holidays_for_item(&self, item: i32) -> Result<Vec<Holiday>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.holidays.rows.values().filter(|h| h.item == item).cloned().collect())
    }

    async fn temp_comments_page(&self, page: Page) -> Result<Vec<TempComment>, DatabaseError> {
        Ok(self.tables.read().await.temp_comments.page(page))
    }

    async fn count_temp_comments(&self) -> Result<i64, DatabaseError> {
        Ok(self.tables.read().await.temp_comments.count())
    }

    async fn insert_temp_comment(&self, comment: NewComment) -> Result<TempComment, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.temp_comments.insert_with(|id| TempComment {
            id,
            comment: comment.comment,
            rating: comment.rating,
            item: comment.item,
            userid: comment.userid,
        }))
    }

    async fn delete_temp_comment(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.temp_comments.rows.remove(&id).is_some())
    }

    async fn comments_page(&self, page: Page) -> Result<Vec<Comment>, DatabaseError> {
        Ok(self.tables.read().await.comments.page(page))
    }

    async fn count_comments(&self) -> Result<i64, DatabaseError> {
        Ok(self.tables.read().await.comments.count())
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.insert_with(|id| Comment {
            id,
            comment: comment.comment,
            rating: comment.rating,
            item: comment.item,
            userid: comment.userid,
        }))
    }

    async fn delete_comment(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.comments.rows.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
