//! Handlers for the grocery item API.
//!
//! Requests are addressed by HTTP method plus an `action` query parameter.
//! [`Operation::ALL`] is the complete routing table; [`dispatch`] resolves a
//! request against it and runs the matching handler on the given store.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use grocerific_core::error::CoreError;
use grocerific_core::validation::{self, ItemIdParam, ItemPayload};
use grocerific_db::models::item::Item;
use grocerific_db::ItemStore;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, MessageResponse};

/// Query parameters shared by every item action (`?action=&id=`).
#[derive(Debug, Default, Deserialize)]
pub struct ItemQuery {
    #[serde(default)]
    pub action: String,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Add,
    Update,
    Delete,
}

impl Operation {
    /// Every routable operation.
    pub const ALL: [Operation; 5] = [
        Operation::List,
        Operation::Get,
        Operation::Add,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn method(self) -> Method {
        match self {
            Operation::List | Operation::Get => Method::GET,
            Operation::Add => Method::POST,
            Operation::Update => Method::PUT,
            Operation::Delete => Method::DELETE,
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Operation::List => "items",
            Operation::Get => "item",
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Find the operation for a method and action.
    ///
    /// A method with no operations at all is rejected with 405; a known
    /// method with an unknown action with 400.
    pub fn resolve(method: &Method, action: &str) -> AppResult<Self> {
        if !Self::ALL.iter().any(|op| op.method() == *method) {
            return Err(AppError::MethodNotAllowed);
        }
        Self::ALL
            .into_iter()
            .find(|op| op.method() == *method && op.action() == action)
            .ok_or(AppError::InvalidAction)
    }
}

/// Handle one item API request against `store`.
///
/// `store` is `None` when the backend is unavailable; that is reported for
/// every request except `OPTIONS`, which always succeeds with an empty body.
pub async fn dispatch(
    store: Option<&dyn ItemStore>,
    method: &Method,
    query: &ItemQuery,
    body: &[u8],
) -> Response {
    if *method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    run(store, method, query, body).await.into_response()
}

async fn run(
    store: Option<&dyn ItemStore>,
    method: &Method,
    query: &ItemQuery,
    body: &[u8],
) -> AppResult<Response> {
    let store = store.ok_or(AppError::DatabaseUnavailable)?;
    let operation = Operation::resolve(method, &query.action)?;
    tracing::debug!(?operation, "Dispatching item request");

    let query_id = query.id.clone().map(Value::String);
    match operation {
        Operation::List => list(store).await,
        Operation::Get => get(store, query_id.as_ref()).await,
        Operation::Add => add(store, &ItemPayload::from_json_bytes(body)).await,
        Operation::Update => update(store, &ItemPayload::from_json_bytes(body)).await,
        Operation::Delete => delete(store, query_id.as_ref()).await,
    }
}

/// GET ?action=items
async fn list(store: &dyn ItemStore) -> AppResult<Response> {
    let items = store.list_all().await?;
    Ok(DataResponse::new(items).into_response())
}

/// GET ?action=item&id=
async fn get(store: &dyn ItemStore, raw_id: Option<&Value>) -> AppResult<Response> {
    let item = find_existing(store, raw_id).await?;
    Ok(DataResponse::new(item).into_response())
}

/// POST ?action=add
async fn add(store: &dyn ItemStore, payload: &ItemPayload) -> AppResult<Response> {
    let fields = validation::normalize_fields(payload)?;
    let id = store.insert(&fields).await?;
    tracing::info!(id, name = %fields.name, "Item added");
    Ok(MessageResponse::with_id("Item added successfully", id).into_response())
}

/// PUT ?action=update
///
/// Checks run in order: id present, item exists, required fields.
async fn update(store: &dyn ItemStore, payload: &ItemPayload) -> AppResult<Response> {
    let item = find_existing(store, payload.get("id")).await?;
    let fields = validation::normalize_fields(payload)?;
    if !store.update(item.id, &fields).await? {
        return Err(AppError::WriteFailed("Failed to update item"));
    }
    tracing::info!(id = item.id, "Item updated");
    Ok(MessageResponse::new("Item updated successfully").into_response())
}

/// DELETE ?action=delete&id=
async fn delete(store: &dyn ItemStore, raw_id: Option<&Value>) -> AppResult<Response> {
    let item = find_existing(store, raw_id).await?;
    if !store.delete(item.id).await? {
        return Err(AppError::WriteFailed("Failed to delete item"));
    }
    tracing::info!(id = item.id, "Item deleted");
    Ok(MessageResponse::new("Item deleted successfully").into_response())
}

/// Resolve a client-supplied id to a stored item, or fail with 400/404.
async fn find_existing(store: &dyn ItemStore, raw_id: Option<&Value>) -> AppResult<Item> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Item",
            key: raw_id.map(Value::to_string).unwrap_or_default(),
        })
    };

    match validation::parse_item_id(raw_id)? {
        ItemIdParam::Id(id) => store.get_by_id(id).await?.ok_or_else(not_found),
        ItemIdParam::Unmatchable => Err(not_found()),
    }
}
