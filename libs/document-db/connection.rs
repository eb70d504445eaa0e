use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};
use ulid::Generator;

use crate::{
    backend::{FileBackend, InMemoryBackend},
    connection_config::ConnectionConfig,
    Dao, ConnectionString, ObjectId, SchemaRegistry, StorageBackend, StoreError, StoreResult,
};

/// Handle on one database, cheap to clone and shared between threads
#[derive(Clone)]
pub struct Connection {
    pub(crate) database_name: String,
    pub(crate) backend: StorageBackend,
    pub(crate) schemas: Arc<SchemaRegistry>,
    id_generator: Arc<Mutex<Generator>>,
}

impl Connection {
    #[instrument(skip(config), fields(connection_string = %config.connection_string))]
    pub fn initialize(config: ConnectionConfig) -> StoreResult<Connection> {
        config.schemas.check()?;

        let connection_string = ConnectionString::parse(&config.connection_string)?;
        let backend = match &connection_string {
            ConnectionString::InMemory { .. } => StorageBackend::new(InMemoryBackend::new()),
            ConnectionString::File { root, database } => StorageBackend::new(FileBackend::open(
                root.join(database),
                config.document_parser,
            )?),
        };

        debug!("Connection initialized");
        Ok(Self::with_backend(
            connection_string.database_name(),
            backend,
            config.schemas,
        ))
    }

    /// Build a connection on top of an already opened backend
    pub fn with_backend(
        database_name: &str,
        backend: StorageBackend,
        schemas: SchemaRegistry,
    ) -> Connection {
        Self {
            database_name: database_name.to_owned(),
            backend,
            schemas: Arc::new(schemas),
            id_generator: Arc::new(Mutex::new(Generator::new())),
        }
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn dao(&self, collection: &str) -> StoreResult<Dao> {
        Dao::new(self, collection)
    }

    #[instrument(skip(self), fields(database = %self.database_name))]
    pub fn drop_database(&self) -> StoreResult<()> {
        debug!("Dropping database");
        self.backend.drop_database()
    }

    pub(crate) fn generate_id(&self) -> StoreResult<ObjectId> {
        let mut generator = self
            .id_generator
            .lock()
            .map_err(StoreError::operation_failed)?;
        generator
            .generate()
            .map(ObjectId::from)
            .map_err(StoreError::operation_failed)
    }
}
