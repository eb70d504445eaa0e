use edutask_document_db::{Connection, Dao, StoreResult};

mod controller;
mod errors;
mod load;
#[cfg(test)]
mod test_utilities;
pub mod tracing;
mod user_controller;

pub use controller::Controller;
pub use errors::UserControllerError;
pub use load::{connect, load};
pub use user_controller::UserController;

pub struct App {
    connection: Connection,
    /// Ok - found | Err - not found with error reason
    found_config_file: Result<(), eyre::Error>,
}

impl App {
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn controller(&self, collection: &str) -> StoreResult<Controller<Dao>> {
        Ok(Controller::new(self.connection.dao(collection)?))
    }

    pub fn user_controller(&self) -> StoreResult<UserController<Dao>> {
        Ok(UserController::new(self.connection.dao("user")?))
    }

    pub fn has_found_config_file(&self) -> &Result<(), eyre::Error> {
        &self.found_config_file
    }
}
