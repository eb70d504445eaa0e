use thiserror::Error;

use crate::schema::SchemaValidationError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("couldn't parse store document: {0}")]
    CorruptedDocument(String),
    #[error("couldn't parse document {0}")]
    DocumentParseError(String),
    #[error(transparent)]
    SchemaValidation(#[from] SchemaValidationError),
    #[error("no schema registered for collection '{0}'")]
    UnknownCollection(String),
    #[error("invalid connection string '{0}': {1}")]
    InvalidConnectionString(String, String),
    #[error("invalid schema definition: {0}")]
    InvalidSchema(String),
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl StoreError {
    pub(crate) fn corrupted_document(e: impl ToString) -> Self {
        Self::CorruptedDocument(e.to_string())
    }

    pub(crate) fn document_parse_error(e: impl ToString) -> Self {
        Self::DocumentParseError(e.to_string())
    }

    pub(crate) fn invalid_schema(e: impl ToString) -> Self {
        Self::InvalidSchema(e.to_string())
    }

    pub(crate) fn operation_failed(e: impl ToString) -> Self {
        Self::OperationFailed(e.to_string())
    }

    /// True when the document was refused by the collection schema
    pub fn is_schema_validation(&self) -> bool {
        matches!(self, Self::SchemaValidation(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
