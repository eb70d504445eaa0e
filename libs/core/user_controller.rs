use derive_more::Deref;
use edutask_document_db::{Document, DocumentGateway, Filter};
use lazy_regex::regex_is_match;
use tracing::{instrument, warn};

use crate::{Controller, UserControllerError};

#[derive(Deref)]
pub struct UserController<G> {
    controller: Controller<G>,
}

impl<G: DocumentGateway> UserController<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            controller: Controller::new(gateway),
        }
    }

    /// Look up the user registered with `email`.
    ///
    /// When several users share the address the first one in store order is
    /// returned and the anomaly is reported as a warning.
    #[instrument(skip(self))]
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<Document>, UserControllerError> {
        if !is_email_shaped(email) {
            return Err(UserControllerError::InvalidArgument(format!(
                "'{email}' is not a valid email address"
            )));
        }

        let users = self.gateway().find(&Filter::new().eq("email", email))?;
        if users.len() > 1 {
            warn!("Error: more than one user found with mail {email}");
        }

        Ok(users.into_iter().next())
    }
}

/// Exactly one `@` with at least one `.` after it
fn is_email_shaped(email: &str) -> bool {
    regex_is_match!(r"^[^@]*@[^@]*\.[^@]*$", email)
}
