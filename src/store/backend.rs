use std::sync::mpsc;

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::contact::Contact;
use crate::model::task::Task;

/// Error type for document-store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no {collection} record with id {id}")]
    NotFound { collection: String, id: String },
    #[error("record has no id; only stored records can be updated")]
    MissingId,
    #[error("malformed {collection} document {id}: {source}")]
    Malformed {
        collection: String,
        id: String,
        source: serde_json::Error,
    },
    #[error("could not encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A document type stored in a named collection.
///
/// The id is assigned by the store on `add` and is immutable afterwards;
/// an empty id marks a record that has never been stored.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

impl Record for Task {
    const COLLECTION: &'static str = "tasks";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Record for Contact {
    const COLLECTION: &'static str = "contacts";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Notification that a collection changed. Subscribers re-read the full
/// snapshot; there is no per-document delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: String,
}

/// The backend seam: create/update/delete keyed by id, plus full-collection
/// snapshots and a change stream. Implementations never filter; all
/// querying happens client-side on the snapshot.
pub trait DocumentStore {
    /// Store a new record, assigning and returning its id.
    fn add<R: Record>(&mut self, record: R) -> Result<String, StoreError>;

    /// Replace the stored document with this record's fields (keyed by its id).
    fn update<R: Record>(&mut self, record: &R) -> Result<(), StoreError>;

    /// Delete by id. Deleting an absent id is not an error.
    fn delete<R: Record>(&mut self, id: &str) -> Result<(), StoreError>;

    /// The full collection, in creation order.
    fn snapshot<R: Record>(&self) -> Result<Vec<R>, StoreError>;

    /// Subscribe to change events. Every local mutation emits one; stores
    /// with external writers emit on reload as well.
    fn subscribe(&mut self) -> mpsc::Receiver<ChangeEvent>;
}

/// Shared in-memory document table: collection name → (id → JSON document),
/// with change broadcast. Both store implementations build on this.
#[derive(Debug, Default)]
pub(crate) struct DocumentMap {
    collections: IndexMap<String, IndexMap<String, serde_json::Value>>,
    subscribers: Vec<mpsc::Sender<ChangeEvent>>,
}

impl DocumentMap {
    pub(crate) fn collection(&self, name: &str) -> Option<&IndexMap<String, serde_json::Value>> {
        self.collections.get(name)
    }

    pub(crate) fn replace_collection(
        &mut self,
        name: &str,
        documents: IndexMap<String, serde_json::Value>,
    ) {
        self.collections.insert(name.to_string(), documents);
    }

    /// Next id: one past the highest numeric id already in the collection.
    fn next_id(&self, collection: &str) -> String {
        let max = self
            .collections
            .get(collection)
            .map(|docs| {
                docs.keys()
                    .filter_map(|id| id.parse::<u64>().ok())
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        (max + 1).to_string()
    }

    pub(crate) fn insert_new<R: Record>(&mut self, mut record: R) -> Result<String, StoreError> {
        let id = self.next_id(R::COLLECTION);
        record.set_id(id.clone());
        let value = serde_json::to_value(&record)?;
        self.collections
            .entry(R::COLLECTION.to_string())
            .or_default()
            .insert(id.clone(), value);
        Ok(id)
    }

    pub(crate) fn replace<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        if record.id().is_empty() {
            return Err(StoreError::MissingId);
        }
        let docs = self
            .collections
            .entry(R::COLLECTION.to_string())
            .or_default();
        if !docs.contains_key(record.id()) {
            return Err(StoreError::NotFound {
                collection: R::COLLECTION.to_string(),
                id: record.id().to_string(),
            });
        }
        let value = serde_json::to_value(record)?;
        docs.insert(record.id().to_string(), value);
        Ok(())
    }

    pub(crate) fn remove(&mut self, collection: &str, id: &str) -> bool {
        self.collections
            .get_mut(collection)
            .and_then(|docs| docs.shift_remove(id))
            .is_some()
    }

    pub(crate) fn decode_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let Some(docs) = self.collections.get(R::COLLECTION) else {
            return Ok(Vec::new());
        };
        docs.iter()
            .map(|(id, value)| {
                serde_json::from_value(value.clone()).map_err(|source| StoreError::Malformed {
                    collection: R::COLLECTION.to_string(),
                    id: id.clone(),
                    source,
                })
            })
            .collect()
    }

    pub(crate) fn subscribe(&mut self) -> mpsc::Receiver<ChangeEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub(crate) fn broadcast(&mut self, collection: &str) {
        let event = ChangeEvent {
            collection: collection.to_string(),
        };
        // Drop subscribers whose receiving end is gone.
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}
