use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use indexmap::IndexMap;
use tempfile::NamedTempFile;

use crate::store::backend::{ChangeEvent, DocumentMap, DocumentStore, Record, StoreError};

/// The collections a workspace persists, one JSON file each.
pub const COLLECTIONS: [&str; 3] = ["tasks", "contacts", "users"];

/// File-backed document store: one `<collection>.json` per collection in
/// the workspace data directory, each holding an id → document object in
/// creation order.
///
/// Every mutation is persisted with a temp-file + rename so a concurrent
/// reader never sees a half-written file, then broadcast to subscribers.
/// [`JsonStore::reload`] picks up edits made by other processes (the TUI
/// calls it when the file watcher fires).
#[derive(Debug)]
pub struct JsonStore {
    dir: PathBuf,
    documents: DocumentMap,
}

impl JsonStore {
    /// Open the store in the given data directory, reading any existing
    /// collection files.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        let mut store = JsonStore {
            dir: dir.to_path_buf(),
            documents: DocumentMap::default(),
        };
        for collection in COLLECTIONS {
            if let Some(docs) = store.read_collection_file(collection)? {
                store.documents.replace_collection(collection, docs);
            }
        }
        Ok(store)
    }

    /// Re-read every collection file, broadcasting a change event for each
    /// collection whose contents differ from the in-memory copy.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        for collection in COLLECTIONS {
            let on_disk = self.read_collection_file(collection)?.unwrap_or_default();
            let changed = self.documents.collection(collection) != Some(&on_disk);
            if changed {
                self.documents.replace_collection(collection, on_disk);
                self.documents.broadcast(collection);
            }
        }
        Ok(())
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    fn read_collection_file(
        &self,
        collection: &str,
    ) -> Result<Option<IndexMap<String, serde_json::Value>>, StoreError> {
        let path = self.path_for(collection);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        let docs = serde_json::from_str(&text)?;
        Ok(Some(docs))
    }

    fn persist(&self, collection: &str) -> Result<(), StoreError> {
        let docs = self.documents.collection(collection);
        let empty = IndexMap::new();
        let text = serde_json::to_string_pretty(docs.unwrap_or(&empty))?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(self.path_for(collection))
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl DocumentStore for JsonStore {
    fn add<R: Record>(&mut self, record: R) -> Result<String, StoreError> {
        let id = self.documents.insert_new(record)?;
        self.persist(R::COLLECTION)?;
        self.documents.broadcast(R::COLLECTION);
        Ok(id)
    }

    fn update<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        self.documents.replace(record)?;
        self.persist(R::COLLECTION)?;
        self.documents.broadcast(R::COLLECTION);
        Ok(())
    }

    fn delete<R: Record>(&mut self, id: &str) -> Result<(), StoreError> {
        if self.documents.remove(R::COLLECTION, id) {
            self.persist(R::COLLECTION)?;
            self.documents.broadcast(R::COLLECTION);
        }
        Ok(())
    }

    fn snapshot<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        self.documents.decode_all()
    }

    fn subscribe(&mut self) -> mpsc::Receiver<ChangeEvent> {
        self.documents.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::contact::Contact;
    use crate::model::task::{Status, Task};
    use tempfile::TempDir;

    #[test]
    fn add_persists_to_collection_file() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        let id = store.add(Task::new("persisted")).unwrap();

        let text = fs::read_to_string(dir.path().join("tasks.json")).unwrap();
        assert!(text.contains("persisted"));
        assert!(text.contains(&format!("\"{id}\"")));
    }

    #[test]
    fn reopen_sees_previous_writes() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = JsonStore::open(dir.path()).unwrap();
            store.add(Task::new("survives")).unwrap();
            store.add(Contact::new("Ada", "ada@example.com", "1")).unwrap();
        }
        let store = JsonStore::open(dir.path()).unwrap();
        let tasks: Vec<Task> = store.snapshot().unwrap();
        let contacts: Vec<Contact> = store.snapshot().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "survives");
        assert_eq!(contacts.len(), 1);
    }

    #[test]
    fn ids_continue_after_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = JsonStore::open(dir.path()).unwrap();
            store.add(Task::new("a")).unwrap();
        }
        let mut store = JsonStore::open(dir.path()).unwrap();
        let id = store.add(Task::new("b")).unwrap();
        assert_eq!(id, "2");
    }

    #[test]
    fn reload_broadcasts_external_changes() {
        let dir = TempDir::new().unwrap();
        let mut writer = JsonStore::open(dir.path()).unwrap();
        let mut reader = JsonStore::open(dir.path()).unwrap();
        let rx = reader.subscribe();

        writer.add(Task::new("from the other client")).unwrap();
        reader.reload().unwrap();

        assert_eq!(rx.try_recv().unwrap().collection, "tasks");
        let tasks: Vec<Task> = reader.snapshot().unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn reload_without_changes_is_silent() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        store.add(Task::new("t")).unwrap();
        let rx = store.subscribe();
        store.reload().unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn update_round_trips_status() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        store.add(Task::new("t")).unwrap();
        let mut task: Task = store.snapshot::<Task>().unwrap().remove(0);
        task.status = Status::AwaitFeedback;
        store.update(&task).unwrap();

        let store = JsonStore::open(dir.path()).unwrap();
        let tasks: Vec<Task> = store.snapshot().unwrap();
        assert_eq!(tasks[0].status, Status::AwaitFeedback);
    }
}
