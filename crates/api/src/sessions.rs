//! Session-scoped stores for the demo API.
//!
//! Each client session owns a [`MemoryItemStore`] seeded with the demo
//! inventory. Sessions are identified by a random UUID carried in the
//! `grocerific_session` cookie and are dropped after sitting idle for the
//! configured lifetime.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use grocerific_db::MemoryItemStore;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "grocerific_session";

struct DemoSession {
    store: Arc<MemoryItemStore>,
    last_seen: Instant,
}

/// Registry of live demo sessions.
pub struct DemoSessions {
    ttl: Duration,
    sessions: Mutex<HashMap<Uuid, DemoSession>>,
}

impl DemoSessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Look up the store for `session_id`, opening a fresh session when the
    /// id is absent, unknown or expired.
    ///
    /// Returns the store and, for a newly opened session, its id so the
    /// caller can hand it to the client.
    pub async fn resolve(&self, session_id: Option<Uuid>) -> (Arc<MemoryItemStore>, Option<Uuid>) {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.last_seen) < self.ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::info!(expired, remaining = sessions.len(), "Pruned idle demo sessions");
        }

        if let Some(session) = session_id.and_then(|id| sessions.get_mut(&id)) {
            session.last_seen = now;
            return (Arc::clone(&session.store), None);
        }

        let id = Uuid::new_v4();
        let store = Arc::new(MemoryItemStore::with_demo_items());
        sessions.insert(
            id,
            DemoSession {
                store: Arc::clone(&store),
                last_seen: now,
            },
        );
        tracing::debug!(session = %id, "Opened demo session");
        (store, Some(id))
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

/// Extract the demo session id from the request's `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a newly opened session.
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
