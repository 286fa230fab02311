pub mod manager;
pub mod memory;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod schema;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryCatalogStore;
pub use pagination::{Page, PageQuery};
pub use postgres::PgCatalogStore;
pub use store::CatalogStore;
