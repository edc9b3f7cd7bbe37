pub mod backend;
pub mod json_store;
pub mod memory;

pub use backend::{ChangeEvent, DocumentStore, Record, StoreError};
pub use json_store::{COLLECTIONS, JsonStore};
pub use memory::MemoryStore;
