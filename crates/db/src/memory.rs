//! Volatile in-memory item storage.
//!
//! Used for the demo API, where each browser session owns one store, and
//! for tests that need a store without a database.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use grocerific_core::types::{DbId, Timestamp};
use grocerific_core::validation::ItemFields;
use tokio::sync::RwLock;

use crate::models::item::Item;
use crate::store::{ItemStore, StoreResult};

/// 2024-01-01 10:00:00 UTC, the creation time of the first demo item.
const DEMO_EPOCH_SECS: i64 = 1_704_103_200;

/// `(name, category, quantity, price, description)` of the demo inventory.
const DEMO_ITEMS: [(&str, &str, i32, &str, &str); 5] = [
    ("Apples", "Fruits", 10, "2.99", "Fresh red apples"),
    ("Milk", "Dairy", 5, "3.49", "Whole milk - 1 gallon"),
    ("Bread", "Bakery", 8, "2.49", "Whole wheat bread"),
    ("Bananas", "Fruits", 15, "1.99", "Yellow bananas"),
    ("Chicken Breast", "Meat", 3, "8.99", "Boneless chicken breast"),
];

#[derive(Debug)]
struct Collection {
    items: Vec<Item>,
    next_id: DbId,
}

/// An item collection held in process memory.
#[derive(Debug)]
pub struct MemoryItemStore {
    inner: RwLock<Collection>,
}

impl Default for MemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryItemStore {
    /// An empty store whose first id is 1.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// A store holding the given items; new ids continue after the largest
    /// existing one.
    pub fn with_items(items: Vec<Item>) -> Self {
        let next_id = items.iter().map(|item| item.id).max().unwrap_or(0) + 1;
        Self {
            inner: RwLock::new(Collection { items, next_id }),
        }
    }

    /// A store seeded with the five demo items (ids 1 through 5, created five
    /// minutes apart); the next id is 6.
    pub fn with_demo_items() -> Self {
        let items = DEMO_ITEMS
            .iter()
            .zip(1_i64..)
            .map(|(&(name, category, quantity, price, description), id)| {
                let stamp = DateTime::from_timestamp(DEMO_EPOCH_SECS + (id - 1) * 300, 0)
                    .unwrap_or_default();
                Item {
                    id,
                    name: name.to_string(),
                    category: category.to_string(),
                    quantity,
                    price: price.to_string(),
                    description: description.to_string(),
                    created_at: stamp,
                    updated_at: stamp,
                }
            })
            .collect();
        Self::with_items(items)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.items.is_empty()
    }
}

/// Current time at the microsecond precision the database keeps.
fn now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

/// A refreshed `updated_at` that is strictly later than `previous`.
fn bump(previous: Timestamp) -> Timestamp {
    let now = now();
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list_all(&self) -> StoreResult<Vec<Item>> {
        let mut items = self.inner.read().await.items.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn get_by_id(&self, id: DbId) -> StoreResult<Option<Item>> {
        let collection = self.inner.read().await;
        Ok(collection.items.iter().find(|item| item.id == id).cloned())
    }

    async fn insert(&self, fields: &ItemFields) -> StoreResult<DbId> {
        let mut collection = self.inner.write().await;
        let id = collection.next_id;
        collection.next_id += 1;

        let stamp = now();
        collection.items.push(Item {
            id,
            name: fields.name.clone(),
            category: fields.category.clone(),
            quantity: fields.quantity,
            price: fields.price.clone(),
            description: fields.description.clone(),
            created_at: stamp,
            updated_at: stamp,
        });
        tracing::debug!(id, name = %fields.name, "Inserted in-memory item");
        Ok(id)
    }

    async fn update(&self, id: DbId, fields: &ItemFields) -> StoreResult<bool> {
        let mut collection = self.inner.write().await;
        let Some(item) = collection.items.iter_mut().find(|item| item.id == id) else {
            return Ok(false);
        };

        item.name = fields.name.clone();
        item.category = fields.category.clone();
        item.quantity = fields.quantity;
        item.price = fields.price.clone();
        item.description = fields.description.clone();
        item.updated_at = bump(item.updated_at);
        Ok(true)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut collection = self.inner.write().await;
        let before = collection.items.len();
        collection.items.retain(|item| item.id != id);
        Ok(collection.items.len() < before)
    }
}
