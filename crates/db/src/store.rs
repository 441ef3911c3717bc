//! The storage contract shared by the durable and volatile backends.

use async_trait::async_trait;
use grocerific_core::types::DbId;
use grocerific_core::validation::ItemFields;

use crate::models::item::Item;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Owner of an item collection.
///
/// Implementations assign ids (never reused) and timestamps. `created_at` is
/// fixed at insert; every update moves `updated_at` strictly forward.
/// Callers validate and check existence before `update`/`delete`; the
/// returned `bool` reports whether a row was actually written.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, ordered by name ascending.
    async fn list_all(&self) -> StoreResult<Vec<Item>>;

    async fn get_by_id(&self, id: DbId) -> StoreResult<Option<Item>>;

    /// Persist a new item and return its id.
    async fn insert(&self, fields: &ItemFields) -> StoreResult<DbId>;

    /// Overwrite every mutable field of an item.
    async fn update(&self, id: DbId, fields: &ItemFields) -> StoreResult<bool>;

    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}
