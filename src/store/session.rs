use crate::error::StoreError;
use crate::models::session::Session;
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name the session record lives under.
pub const SESSION_FILE: &str = "auth.json";

/// Durable `{token, username}` record.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing, unreadable or corrupt data all read as "no session". A corrupt
    /// record is removed so the next start does not trip over it again.
    pub fn restore(&self) -> Option<Session> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No saved session at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read session file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Session>(&content) {
            Ok(session) if !session.token.is_empty() => {
                debug!("Restored session for {}", session.username);
                Some(session)
            }
            Ok(_) => {
                warn!("Discarding session without token at {}", self.path.display());
                self.discard();
                None
            }
            Err(e) => {
                warn!("Discarding corrupt session file {}: {}", self.path.display(), e);
                self.discard();
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(session)?;
        fs::write(&self.path, content)?;
        debug!("Saved session for {}", session.username);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn discard(&self) {
        if let Err(e) = self.clear() {
            warn!("Failed to remove {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str, username: &str) -> Session {
        Session {
            token: token.to_owned(),
            username: username.to_owned(),
        }
    }

    #[test]
    fn restore_returns_what_was_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        for s in [
            session("abc", "geralt"),
            session("9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b", "Ciri"),
            session("t", "Лютик"),
        ] {
            store.save(&s).unwrap();
            assert_eq!(store.restore(), Some(s));
        }
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("deeper"));
        store.save(&session("abc", "geralt")).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn save_overwrites_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.save(&session("abc", "geralt")).unwrap();
        store.save(&session("def", "yennefer")).unwrap();
        assert_eq!(store.restore(), Some(session("def", "yennefer")));
    }

    #[test]
    fn missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(SessionStore::new(dir.path()).restore(), None);
    }

    #[test]
    fn corrupt_file_is_absent_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        fs::write(store.path(), "{\"token\": \"abc\"").unwrap();
        assert_eq!(store.restore(), None);
        assert!(!store.path().exists());

        fs::write(store.path(), "{\"token\": \"abc\"}").unwrap();
        assert_eq!(store.restore(), None);

        fs::write(store.path(), "{\"token\": \"\", \"username\": \"geralt\"}").unwrap();
        assert_eq!(store.restore(), None);
    }

    #[test]
    fn clear_removes_session_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.clear().unwrap();
        store.save(&session("abc", "geralt")).unwrap();
        store.clear().unwrap();
        assert_eq!(store.restore(), None);
    }
}
