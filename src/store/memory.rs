use std::sync::mpsc;

use crate::store::backend::{ChangeEvent, DocumentMap, DocumentStore, Record, StoreError};

/// In-memory document store.
///
/// Used by tests and by anything that wants board semantics without a
/// workspace on disk. Write calls are counted so tests can assert how many
/// backend writes an interaction produced.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DocumentMap,
    add_calls: usize,
    update_calls: usize,
    delete_calls: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls
    }
}

impl DocumentStore for MemoryStore {
    fn add<R: Record>(&mut self, record: R) -> Result<String, StoreError> {
        self.add_calls += 1;
        let id = self.documents.insert_new(record)?;
        self.documents.broadcast(R::COLLECTION);
        Ok(id)
    }

    fn update<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        self.update_calls += 1;
        self.documents.replace(record)?;
        self.documents.broadcast(R::COLLECTION);
        Ok(())
    }

    fn delete<R: Record>(&mut self, id: &str) -> Result<(), StoreError> {
        self.delete_calls += 1;
        if self.documents.remove(R::COLLECTION, id) {
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
