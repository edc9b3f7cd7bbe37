use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Self-documenting header written at the top of a new event log.
const FILE_HEADER: &str = "\
# join event log — append-only record of failed backend writes.
# The board keeps its optimistic layout when a write fails; this file is
# where the failure itself is kept. Safe to delete.
";

/// A failed backend write, as recorded in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedFailure {
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub detail: String,
}

/// Return the path to the event log file.
pub fn event_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".events.log")
}

/// Append a failed-write entry. Logging must never become a second
/// failure, so errors here are swallowed.
pub fn log_write_failure(data_dir: &Path, operation: &str, detail: &str) {
    let _ = append_entry(data_dir, Utc::now(), operation, detail);
}

fn append_entry(
    data_dir: &Path,
    timestamp: DateTime<Utc>,
    operation: &str,
    detail: &str,
) -> std::io::Result<()> {
    let path = event_log_path(data_dir);
    let is_new = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if is_new {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    // One entry per line; newlines in the detail would break parsing.
    let detail = detail.replace('\n', " ");
    writeln!(
        file,
        "{}\t{}\t{}",
        timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
        operation,
        detail
    )
}

/// Read all entries from the log, oldest first. A missing log is empty.
pub fn read_entries(data_dir: &Path) -> Vec<LoggedFailure> {
    let Ok(text) = std::fs::read_to_string(event_log_path(data_dir)) else {
        return Vec::new();
    };
    text.lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut parts = line.splitn(3, '\t');
            let timestamp = parts.next()?;
            let operation = parts.next()?;
            let detail = parts.next().unwrap_or("");
            let timestamp = DateTime::parse_from_rfc3339(timestamp).ok()?.to_utc();
            Some(LoggedFailure {
                timestamp,
                operation: operation.to_string(),
                detail: detail.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn append_and_read_back() {
        let tmp = TempDir::new().unwrap();
        log_write_failure(tmp.path(), "update task 3", "io error: disk full");
        log_write_failure(tmp.path(), "delete contact 7", "permission denied");

        let entries = read_entries(tmp.path());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, "update task 3");
        assert_eq!(entries[1].detail, "permission denied");
    }

    #[test]
    fn missing_log_reads_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_entries(tmp.path()).is_empty());
    }

    #[test]
    fn multiline_detail_is_flattened() {
        let tmp = TempDir::new().unwrap();
        log_write_failure(tmp.path(), "add task", "line one\nline two");
        let entries = read_entries(tmp.path());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].detail, "line one line two");
    }

    #[test]
    fn header_is_written_once() {
        let tmp = TempDir::new().unwrap();
        log_write_failure(tmp.path(), "a", "b");
        log_write_failure(tmp.path(), "c", "d");
        let text = std::fs::read_to_string(event_log_path(tmp.path())).unwrap();
        assert_eq!(text.matches("# join event log").count(), 1);
    }
}
