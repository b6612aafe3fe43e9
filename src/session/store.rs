//! In-memory session index for one assistant context.
//!
//! Holds the known sessions and the active-session pointer. All backend
//! reconciliation happens in the sync controller; this type only keeps
//! state consistent under the controller's mutations.

use super::types::ChatSession;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active: Option<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with the backend's enumeration.
    ///
    /// The active pointer is kept even when the listed ids no longer include
    /// it; the backend is the source of truth for the list, not the pointer.
    pub fn replace_all(&mut self, sessions: Vec<ChatSession>) {
        self.sessions = sessions;
    }

    /// Insert a session, or refresh it when the id is already known.
    pub fn upsert(&mut self, session: ChatSession) {
        match self.sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session,
            None => self.sessions.push(session),
        }
    }

    /// Remove a session from the list. Returns `true` if it existed.
    /// The caller is responsible for clearing the active pointer and the
    /// message log when the removed session was active.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        self.sessions.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// At most one session is active; `None` means "no session yet".
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set_active(&mut self, id: &str) {
        self.active = Some(id.to_string());
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_inserts_then_refreshes() {
        let mut store = SessionStore::new();
        store.upsert(ChatSession::new("a"));
        store.upsert(ChatSession::new("b"));
        assert_eq!(store.sessions().len(), 2);

        // Same id again: refreshed in place, not duplicated.
        store.upsert(ChatSession::new("a"));
        assert_eq!(store.sessions().len(), 2);
    }

    #[test]
    fn remove_reports_whether_the_session_existed() {
        let mut store = SessionStore::new();
        store.upsert(ChatSession::new("a"));

        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert!(store.get("a").is_none());
    }

    #[test]
    fn active_pointer_lifecycle() {
        let mut store = SessionStore::new();
        assert_eq!(store.active(), None);

        store.set_active("a");
        assert_eq!(store.active(), Some("a"));

        store.clear_active();
        assert_eq!(store.active(), None);
    }

    #[test]
    fn replace_all_keeps_active_pointer() {
        let mut store = SessionStore::new();
        store.upsert(ChatSession::new("a"));
        store.set_active("a");

        store.replace_all(vec![ChatSession::new("b")]);
        assert_eq!(store.active(), Some("a"));
        assert_eq!(store.sessions().len(), 1);
    }
}
