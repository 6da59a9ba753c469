use super::{Session, UserId};
use chrono::Utc;
use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::debug;

/// Mapping from user id to session record, owned by the dispatcher.
pub trait SessionStore {
    fn get(&self, user: UserId) -> Option<&Session>;

    /// Returns the user's session, creating a fresh one on first contact.
    fn get_or_create(&mut self, user: UserId) -> &mut Session;

    fn remove(&mut self, user: UserId) -> Option<Session>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps at most `max_sessions` records; the least recently active one is
/// dropped to make room.
pub struct InMemorySessionStore {
    sessions: LruCache<UserId, Session>,
}

impl InMemorySessionStore {
    pub fn new(max_sessions: usize) -> Self {
        let capacity = NonZeroUsize::new(max_sessions).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: LruCache::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.sessions.cap().get()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, user: UserId) -> Option<&Session> {
        self.sessions.peek(&user)
    }

    fn get_or_create(&mut self, user: UserId) -> &mut Session {
        if !self.sessions.contains(&user) && self.sessions.len() == self.capacity() {
            if let Some((evicted, session)) = self.sessions.peek_lru() {
                debug!(
                    evicted = *evicted,
                    age_secs = session.age(Utc::now()).num_seconds(),
                    "Session store full, dropping idle session"
                );
            }
        }
        self.sessions.get_or_insert_mut(user, Session::new)
    }

    fn remove(&mut self, user: UserId) -> Option<Session> {
        self.sessions.pop(&user)
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}
