//! In-memory login sessions.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use uuid::Uuid;

/// Name of the session cookie.
pub const COOKIE_NAME: &str = "session";

/// Lifetime of a session.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Active sessions keyed by random id.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Instant>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a session and return its id.
    pub fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write();
        let now = Instant::now();
        sessions.retain(|_, expires| *expires > now);
        sessions.insert(id.clone(), now + self.ttl);
        id
    }

    /// Whether an id names a live session.
    pub fn is_valid(&self, id: &str) -> bool {
        let expired = match self.sessions.read().get(id) {
            Some(expires) => *expires <= Instant::now(),
            None => return false,
        };
        if expired {
            self.sessions.write().remove(id);
        }
        !expired
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Set-Cookie value for a new session.
    pub fn cookie(&self, id: &str) -> String {
        format!(
            "{}={}; HttpOnly; Path=/; Max-Age={}",
            COOKIE_NAME,
            id,
            self.ttl.as_secs()
        )
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SESSION_TTL)
    }
}

/// Set-Cookie value that clears the session cookie.
pub fn clear_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0", COOKIE_NAME)
}

/// Value of a cookie in a `Cookie` header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let store = SessionStore::default();
        let id = store.create();
        assert!(store.is_valid(&id));
        assert!(!store.is_valid("forged"));
        assert!(store.remove(&id));
        assert!(!store.is_valid(&id));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_expired_session() {
        let store = SessionStore::new(Duration::ZERO);
        let id = store.create();
        assert!(!store.is_valid(&id));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_cookie_format() {
        let store = SessionStore::default();
        assert_eq!(
            store.cookie("abc"),
            "session=abc; HttpOnly; Path=/; Max-Age=604800"
        );
        assert!(clear_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn test_cookie_value() {
        let header = "theme=dark; session=1234-abcd; other=x";
        assert_eq!(cookie_value(header, "session"), Some("1234-abcd"));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("", "session"), None);
    }
}
