use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted session (written to .session.json in the data directory).
/// Plain key-value state so the next start can restore the signed-in user
/// without asking for credentials again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub mail: String,
    #[serde(default)]
    pub name: String,
}

/// Read .session.json from the data directory
pub fn read_session(data_dir: &Path) -> Option<Session> {
    let path = data_dir.join(".session.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .session.json to the data directory
pub fn write_session(data_dir: &Path, session: &Session) -> Result<(), std::io::Error> {
    let path = data_dir.join(".session.json");
    let content = serde_json::to_string_pretty(session)?;
    fs::write(&path, content)
}

/// Remove the persisted session, if any.
pub fn clear_session(data_dir: &Path) {
    let _ = fs::remove_file(data_dir.join(".session.json"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let session = Session {
            user_id: "3".into(),
            mail: "ada@example.com".into(),
            name: "Ada Lovelace".into(),
        };
        write_session(dir.path(), &session).unwrap();
        assert_eq!(read_session(dir.path()), Some(session));
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_session(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".session.json"), "not json {{{").unwrap();
        assert!(read_session(dir.path()).is_none());
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let session = Session {
            user_id: "1".into(),
            mail: "a@b.co".into(),
            name: String::new(),
        };
        write_session(dir.path(), &session).unwrap();
        clear_session(dir.path());
        assert!(read_session(dir.path()).is_none());
        // Clearing twice is fine.
        clear_session(dir.path());
    }
}
