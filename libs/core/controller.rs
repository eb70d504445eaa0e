use edutask_document_db::{Document, DocumentGateway, StoreResult};

/// Entry point of the application logic for one collection
pub struct Controller<G> {
    gateway: G,
}

impl<G: DocumentGateway> Controller<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn create(&self, document: Document) -> StoreResult<Document> {
        self.gateway.create(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edutask_document_db::{doc, Connection, ConnectionConfig, DocumentGateway, Filter};

    #[test]
    fn test_create_goes_through_the_gateway() {
        let config = ConnectionConfig::builder()
            .connection_string("memory://edutask_test")
            .build();
        let connection = Connection::initialize(config).unwrap();
        let controller = Controller::new(connection.dao("video").unwrap());

        let created = controller.create(doc! { "url" => "http://video" }).unwrap();

        assert!(created.id().is_some());
        assert_eq!(
            controller.gateway().find(&Filter::new()).unwrap(),
            vec![created]
        );
        assert!(controller.create(doc! { "url" => 1 }).unwrap_err().is_schema_validation());
    }
}
