//! Grocery item entity model.

use grocerific_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `grocery_items` table, or its in-memory equivalent.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    /// Two-decimal fixed-point text, e.g. `"2.99"`.
    pub price: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
