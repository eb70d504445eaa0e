use std::sync::Arc;

use derive_more::Deref;

use crate::{Document, StoreResult};

/// Shared handle on the backend holding the documents of a database
#[derive(Deref, Clone)]
#[deref(forward)]
pub struct StorageBackend(Arc<dyn IStorageBackend>);

impl StorageBackend {
    pub fn new(backend: impl IStorageBackend + 'static) -> Self {
        Self(Arc::new(backend))
    }
}

pub trait IStorageBackend: Send + Sync {
    /// Append a document that already carries its identifier, either the
    /// whole document is written or nothing is
    fn insert(&self, collection: &str, document: &Document) -> StoreResult<()>;

    /// Every document of the collection in insertion order
    fn scan(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Remove the collection, dropping a missing collection is not an error
    fn drop_collection(&self, collection: &str) -> StoreResult<()>;

    /// Remove every collection of the database
    fn drop_database(&self) -> StoreResult<()>;
}
