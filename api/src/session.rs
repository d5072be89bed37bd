//! Browser sessions
//!
//! Each browser gets a random session id in a cookie. Histories live in
//! process memory only and are lost on restart. A history is stored only
//! once the browser submits something; page views alone never allocate.
//! The map is capped, and the least recently used session is dropped when
//! a new one would exceed the cap.

use axum::http::{header, HeaderMap, HeaderValue};
use dashmap::DashMap;
use lunchbot_core::ChatHistory;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "lunchbot_session";

/// Default cap on stored sessions
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Shared handle to one session's history
///
/// The async mutex serializes messages from the same browser.
pub type SessionHandle = Arc<Mutex<ChatHistory>>;

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    /// Milliseconds since the store was created
    last_seen: AtomicU64,
}

/// In-memory session map
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionEntry>,
    max_sessions: usize,
    started: Instant,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding at most `max_sessions` histories
    pub fn with_capacity(max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions: max_sessions.max(1),
            started: Instant::now(),
        }
    }

    fn now_millis(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Existing session, if any; refreshes its last access time
    pub fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| {
            entry.last_seen.store(self.now_millis(), Ordering::Relaxed);
            entry.handle.clone()
        })
    }

    /// Session for `id`, storing a fresh history when it is unknown
    pub fn get_or_insert(&self, id: Uuid) -> SessionHandle {
        if let Some(handle) = self.get(&id) {
            return handle;
        }

        if self.sessions.len() >= self.max_sessions {
            self.evict_least_recent();
        }

        let entry = self.sessions.entry(id).or_insert_with(|| {
            tracing::debug!("Created session {}", id);
            SessionEntry {
                handle: SessionHandle::default(),
                last_seen: AtomicU64::new(0),
            }
        });
        entry.last_seen.store(self.now_millis(), Ordering::Relaxed);
        entry.handle.clone()
    }

    fn evict_least_recent(&self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|entry| entry.value().last_seen.load(Ordering::Relaxed))
            .map(|entry| *entry.key());

        if let Some(id) = oldest {
            self.sessions.remove(&id);
            tracing::debug!("Evicted session {}", id);
        }
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Read the session id from the `Cookie` header
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a session id
pub fn session_cookie(id: Uuid) -> HeaderValue {
    let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
    // A UUID and fixed attributes are always valid header text
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_from_cookie_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, id)).unwrap(),
        );
        assert_eq!(session_id(&headers), Some(id));
    }

    #[test]
    fn test_session_id_rejects_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("lunchbot_session=not-a-uuid"),
        );
        assert_eq!(session_id(&headers), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn test_get_or_insert_reuses_known_id() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        assert!(store.get(&id).is_none());

        let first = store.get_or_insert(id);
        let second = store.get_or_insert(id);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len(), 1);

        store.get_or_insert(Uuid::new_v4());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_full_store_drops_least_recent_session() {
        let store = SessionStore::with_capacity(2);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        store.get_or_insert(a);
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.get_or_insert(b);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(store.get(&a).is_some());
        std::thread::sleep(std::time::Duration::from_millis(5));

        store.get_or_insert(c);
        assert_eq!(store.len(), 2);
        assert!(store.get(&a).is_some());
        assert!(store.get(&b).is_none());
        assert!(store.get(&c).is_some());
    }

    #[test]
    fn test_session_cookie_format() {
        let id = Uuid::nil();
        let cookie = session_cookie(id);
        assert_eq!(
            cookie.to_str().unwrap(),
            "lunchbot_session=00000000-0000-0000-0000-000000000000; Path=/; HttpOnly; SameSite=Lax"
        );
    }
}
