use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Raw contents of the session slots as they sit in storage (`token`, `role`).
/// Values are kept as strings; interpretation happens in [`super::Session`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Backing store for the session slots.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> ClientResult<StoredSession>;
    fn save(&self, stored: &StoredSession) -> ClientResult<()>;
    /// Remove both slots.
    fn clear(&self) -> ClientResult<()>;
    fn describe(&self) -> String;
}

/// Process-lifetime storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<StoredSession>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> ClientResult<StoredSession> { Ok(self.slots.lock().clone()) }

    fn save(&self, stored: &StoredSession) -> ClientResult<()> {
        *self.slots.lock() = stored.clone();
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.slots.lock() = StoredSession::default();
        Ok(())
    }

    fn describe(&self) -> String { "memory".to_string() }
}

/// JSON file storage, shared between separate CLI invocations.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> ClientResult<StoredSession> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoredSession::default()),
            Err(e) => return Err(ClientError::session("session_read", format!("{}: {}", self.path.display(), e))),
        };
        if text.trim().is_empty() { return Ok(StoredSession::default()); }
        serde_json::from_str(&text)
            .map_err(|e| ClientError::session("session_corrupt", format!("{}: {}", self.path.display(), e)))
    }

    fn save(&self, stored: &StoredSession) -> ClientResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| ClientError::session("session_write", format!("{}: {}", dir.display(), e)))?;
        }
        let text = serde_json::to_string_pretty(stored)?;
        write_private(&self.path, text.as_bytes())
            .map_err(|e| ClientError::session("session_write", format!("{}: {}", self.path.display(), e)))
    }

    fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::session("session_write", format!("{}: {}", self.path.display(), e))),
        }
    }

    fn describe(&self) -> String { format!("file:{}", self.path.display()) }
}

/// The file holds a bearer token in plain text, so on unix it is owner-only (0600),
/// including when an existing file with wider permissions is overwritten.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    std::os::unix::fs::OpenOptionsExt::mode(&mut opts, 0o600);
    let mut file = opts.open(path)?;
    #[cfg(unix)]
    file.set_permissions(std::os::unix::fs::PermissionsExt::from_mode(0o600))?;
    file.write_all(bytes)
}
