use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::role::Role;
use super::storage::{MemoryStorage, SessionStorage, StoredSession};
use crate::error::ClientResult;

pub type SessionToken = String;

/// Snapshot of the session slots. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<SessionToken>,
    pub role: Option<Role>,
}

impl Session {
    pub fn anonymous() -> Self { Self::default() }

    pub fn new<S: Into<String>>(token: S, role: Option<Role>) -> Self {
        Self::from_parts(Some(token.into()), role)
    }

    /// Normalises raw values: an empty token counts as no token.
    pub fn from_parts(token: Option<String>, role: Option<Role>) -> Self {
        let token = token.filter(|t| !t.trim().is_empty());
        Self { token, role }
    }

    pub fn is_authenticated(&self) -> bool { self.token.is_some() }

    pub fn token(&self) -> Option<&str> { self.token.as_deref() }

    fn from_stored(stored: StoredSession) -> Self {
        let role = stored.role.as_deref().and_then(|r| {
            let parsed = Role::parse(r);
            if parsed.is_none() && !r.trim().is_empty() {
                tracing::warn!(target: "bookpal::session", "ignoring unknown stored role '{}'", r);
            }
            parsed
        });
        Self::from_parts(stored.token, role)
    }

    fn to_stored(&self) -> StoredSession {
        StoredSession { token: self.token.clone(), role: self.role.map(|r| r.as_str().to_string()) }
    }
}

/// Shared handle to the one session slot. Clones see the same state; it is injected
/// into the API client (header) and the router (guard) instead of either reading
/// storage on its own.
#[derive(Clone)]
pub struct SessionHandle {
    current: Arc<RwLock<Session>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionHandle {
    /// Load whatever the storage currently holds.
    pub fn load(storage: Arc<dyn SessionStorage>) -> ClientResult<Self> {
        let session = Session::from_stored(storage.load()?);
        debug!(target: "bookpal::session", "loaded from {} (authenticated: {})", storage.describe(), session.is_authenticated());
        Ok(Self { current: Arc::new(RwLock::new(session)), storage })
    }

    pub fn in_memory() -> Self {
        Self { current: Arc::new(RwLock::new(Session::anonymous())), storage: Arc::new(MemoryStorage::new()) }
    }

    /// In-memory handle pre-populated with `session`.
    pub fn with_session(session: Session) -> Self {
        let h = Self::in_memory();
        *h.current.write() = session;
        h
    }

    pub fn snapshot(&self) -> Session { self.current.read().clone() }

    pub fn token(&self) -> Option<SessionToken> { self.current.read().token.clone() }

    pub fn role(&self) -> Option<Role> { self.current.read().role }

    /// Write a fresh session (login). Storage is written first so a failed write leaves
    /// the in-memory view unchanged.
    pub fn establish(&self, session: Session) -> ClientResult<()> {
        self.storage.save(&session.to_stored())?;
        debug!(target: "bookpal::session", "established role={:?}", session.role);
        *self.current.write() = session;
        Ok(())
    }

    /// Drop both slots (logout or explicit clear). The in-memory view is cleared even
    /// when the storage cannot be.
    pub fn clear(&self) -> ClientResult<()> {
        *self.current.write() = Session::anonymous();
        debug!(target: "bookpal::session", "cleared {}", self.storage.describe());
        self.storage.clear()
    }

    pub fn storage_description(&self) -> String { self.storage.describe() }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.snapshot();
        f.debug_struct("SessionHandle")
            .field("authenticated", &s.is_authenticated())
            .field("role", &s.role)
            .field("storage", &self.storage.describe())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::storage::FileStorage;
    use tempfile::tempdir;

    #[test]
    fn empty_token_is_anonymous() {
        let s = Session::from_parts(Some("   ".into()), Some(Role::Buyer));
        assert!(!s.is_authenticated());
        assert_eq!(s.role, Some(Role::Buyer));
    }

    #[test]
    fn clones_share_state() {
        let a = SessionHandle::in_memory();
        let b = a.clone();
        a.establish(Session::new("abc", Some(Role::Seller))).unwrap();
        assert_eq!(b.token().as_deref(), Some("abc"));
        assert_eq!(b.role(), Some(Role::Seller));
        b.clear().unwrap();
        assert_eq!(a.snapshot(), Session::anonymous());
    }

    #[test]
    fn load_from_file_and_unknown_role_is_dropped() {
        crate::tprintln!("loading a session with an unknown role");
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, r#"{"token":"xyz","role":"moderator"}"#).unwrap();
        let h = SessionHandle::load(Arc::new(FileStorage::new(&path))).unwrap();
        assert_eq!(h.token().as_deref(), Some("xyz"));
        assert_eq!(h.role(), None);
    }

    #[test]
    fn establish_persists_and_clear_removes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.json");
        let h = SessionHandle::load(Arc::new(FileStorage::new(&path))).unwrap();
        h.establish(Session::new("tok", Some(Role::Admin))).unwrap();
        let reloaded = SessionHandle::load(Arc::new(FileStorage::new(&path))).unwrap();
        assert_eq!(reloaded.snapshot(), Session::new("tok", Some(Role::Admin)));
        h.clear().unwrap();
        assert!(!path.exists());
    }
}
