//! Route definitions for the item API surfaces.
//!
//! ```text
//! ANY /api        -> durable store (PostgreSQL)
//! ANY /demo-api   -> per-session in-memory store
//! ```
//!
//! Both surfaces accept every method and resolve the operation from the
//! method and `?action=` via [`handlers::items::dispatch`].

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;

use crate::handlers;
use crate::handlers::items::ItemQuery;
use crate::sessions::{session_cookie, session_id_from_headers};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api", any(durable_items))
        .route("/demo-api", any(demo_items))
}

/// An unparsable query string is treated like an empty one.
fn item_query(uri: &Uri) -> ItemQuery {
    Query::<ItemQuery>::try_from_uri(uri)
        .map(|Query(query)| query)
        .unwrap_or_default()
}

async fn durable_items(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    handlers::items::dispatch(
        state.item_store.as_deref(),
        &method,
        &item_query(&uri),
        &body,
    )
    .await
}

async fn demo_items(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Preflight requests never open a session.
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let (store, new_session) = state
        .demo_sessions
        .resolve(session_id_from_headers(&headers))
        .await;

    let mut response =
        handlers::items::dispatch(Some(&*store), &method, &item_query(&uri), &body).await;

    if let Some(id) = new_session {
        match HeaderValue::from_str(&session_cookie(id)) {
            Ok(cookie) => {
                response.headers_mut().append(SET_COOKIE, cookie);
            }
            Err(err) => tracing::warn!(error = %err, "Could not encode session cookie"),
        }
    }
    response
}
