use edutask_document_db::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserControllerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
