use dashmap::DashMap;
use tracing::{instrument, trace};

use crate::{Document, IStorageBackend, StoreResult};

/// This backend is used for testing, documents are not persisted to disk but
/// only kept in memory
#[derive(Default, Debug)]
pub struct InMemoryBackend {
    collections: DashMap<String, Vec<Document>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IStorageBackend for InMemoryBackend {
    #[instrument(skip(self, document))]
    fn insert(&self, collection: &str, document: &Document) -> StoreResult<()> {
        trace!("Insert document");
        self.collections
            .entry(collection.to_owned())
            .or_default()
            .push(document.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    fn scan(&self, collection: &str) -> StoreResult<Vec<Document>> {
        trace!("Scan collection");
        Ok(self
            .collections
            .get(collection)
            .map(|documents| documents.value().clone())
            .unwrap_or_default())
    }

    #[instrument(skip(self))]
    fn drop_collection(&self, collection: &str) -> StoreResult<()> {
        trace!("Drop collection");
        self.collections.remove(collection);
        Ok(())
    }

    #[instrument(skip(self))]
    fn drop_database(&self) -> StoreResult<()> {
        trace!("Drop database");
        self.collections.clear();
        Ok(())
    }
}
