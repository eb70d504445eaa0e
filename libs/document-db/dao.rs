use std::sync::Arc;

use tracing::{debug, instrument, trace, warn};

use crate::{CollectionSchema, Connection, Document, Filter, StoreError, StoreResult, ID_FIELD};

/// Operations on the documents of a single collection
pub trait DocumentGateway: Send + Sync {
    /// Validate `document` against the collection schema and store it with a
    /// freshly generated identifier
    fn create(&self, document: Document) -> StoreResult<Document>;

    /// Documents matching `filter`, in store order
    fn find(&self, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// Remove every document of the collection
    fn drop_collection(&self) -> StoreResult<()>;
}

/// Data access object bound to one collection of a connection
#[derive(Clone)]
pub struct Dao {
    connection: Connection,
    collection: String,
    schema: Arc<CollectionSchema>,
}

impl Dao {
    pub fn new(connection: &Connection, collection: &str) -> StoreResult<Dao> {
        let schema = connection
            .schemas
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_owned()))?;

        Ok(Self {
            connection: connection.clone(),
            collection: collection.to_owned(),
            schema,
        })
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }
}

impl DocumentGateway for Dao {
    #[instrument(skip(self, document), fields(collection = %self.collection))]
    fn create(&self, mut document: Document) -> StoreResult<Document> {
        // Identifiers are owned by the store
        document.remove(ID_FIELD);

        if let Err(e) = self.schema.validate(&document) {
            warn!(error = %e, "Document rejected");
            return Err(e.into());
        }

        let mut document = document.normalized();
        let id = self.connection.generate_id()?;
        document.insert(ID_FIELD, id);

        self.connection.backend.insert(&self.collection, &document)?;
        debug!(%id, "Document created");
        Ok(document)
    }

    #[instrument(skip(self), fields(collection = %self.collection))]
    fn find(&self, filter: &Filter) -> StoreResult<Vec<Document>> {
        trace!("Find documents");
        Ok(self
            .connection
            .backend
            .scan(&self.collection)?
            .into_iter()
            .filter(|document| filter.matches(document))
            .collect())
    }

    #[instrument(skip(self), fields(collection = %self.collection))]
    fn drop_collection(&self) -> StoreResult<()> {
        debug!("Dropping collection");
        self.connection.backend.drop_collection(&self.collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{doc, utils::test_utilities::memory_connection, ObjectId, Value};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_unknown_collection() {
        let connection = memory_connection("edutask_test");
        assert!(matches!(
            Dao::new(&connection, "project"),
            Err(StoreError::UnknownCollection(name)) if name == "project"
        ));
    }

    #[test]
    fn test_create_replaces_caller_identifier() {
        let dao = memory_connection("edutask_test").dao("todo").unwrap();
        let forged = ObjectId::new();

        let created = dao
            .create(doc! { ID_FIELD => forged, "description" => "Do X" })
            .unwrap();

        assert_ne!(created.id(), Some(forged));
        assert!(created.id().is_some());
    }

    #[test]
    fn test_create_ignores_string_identifier_field() {
        let dao = memory_connection("edutask_test").dao("todo").unwrap();

        let created = dao
            .create(doc! { ID_FIELD => "custom", "description" => "Do X" })
            .unwrap();
        assert!(created.id().is_some());
    }

    #[test]
    fn test_create_truncates_dates() {
        let dao = memory_connection("edutask_test").dao("task").unwrap();
        let startdate = Utc.timestamp_opt(1_700_000_000, 999_999_999).unwrap();

        let created = dao
            .create(doc! { "title" => "T", "description" => "D", "startdate" => startdate })
            .unwrap();

        assert_eq!(
            created.get("startdate"),
            Some(&Value::Date(Utc.timestamp_opt(1_700_000_000, 999_000_000).unwrap()))
        );
        assert_eq!(dao.find(&Filter::new()).unwrap(), vec![created]);
    }

    #[test]
    fn test_find_filters_on_collection() {
        let connection = memory_connection("edutask_test");
        let users = connection.dao("user").unwrap();

        for email in ["a@example.com", "b@example.com", "a@example.com"] {
            users
                .create(doc! { "firstName" => "F", "lastName" => "L", "email" => email })
                .unwrap();
        }

        let found = users.find(&Filter::new().eq("email", "a@example.com")).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].id() < found[1].id());
        assert!(connection.dao("task").unwrap().find(&Filter::new()).unwrap().is_empty());
    }

    #[test]
    fn test_drop_collection_only_drops_its_collection() {
        let connection = memory_connection("edutask_test");
        let todos = connection.dao("todo").unwrap();
        let videos = connection.dao("video").unwrap();
        todos.create(doc! { "description" => "x" }).unwrap();
        videos.create(doc! { "url" => "y" }).unwrap();

        todos.drop_collection().unwrap();
        todos.drop_collection().unwrap();

        assert!(todos.find(&Filter::new()).unwrap().is_empty());
        assert_eq!(videos.find(&Filter::new()).unwrap().len(), 1);
    }
}
