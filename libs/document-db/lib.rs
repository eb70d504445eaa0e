pub(crate) mod connection;
pub(crate) mod connection_config;
pub(crate) mod connection_string;
pub(crate) mod dao;
pub(crate) mod document;
pub(crate) mod errors;
pub(crate) mod filter;
pub(crate) mod schema;
pub(crate) mod schema_registry;
pub(crate) mod storage_backend;
pub(crate) mod value;
pub mod document_parser;

pub mod backend {
    pub mod file;
    pub mod in_memory;

    pub use file::FileBackend;
    pub use in_memory::InMemoryBackend;
}

mod utils {
    pub(crate) mod files;
    #[cfg(test)]
    pub(crate) mod test_utilities;
}

pub use connection::Connection;
pub use connection_config::ConnectionConfig;
pub use connection_string::ConnectionString;
pub use dao::{Dao, DocumentGateway};
pub use document::{Document, ID_FIELD};
pub use errors::{StoreError, StoreResult};
pub use filter::Filter;
pub use schema::{CollectionSchema, FieldSpec, FieldType, SchemaValidationError, Violation};
pub use schema_registry::SchemaRegistry;
pub use storage_backend::{IStorageBackend, StorageBackend};
pub use value::{InvalidObjectId, ObjectId, Value};
