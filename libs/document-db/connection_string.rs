use std::{path::PathBuf, str::FromStr};

use lazy_regex::regex_is_match;

use crate::{StoreError, StoreResult};

const MEMORY_SCHEME: &str = "memory://";
const FILE_SCHEME: &str = "file://";

/// Where a database lives, parsed from `memory://<database>` or
/// `file://<directory>/<database>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionString {
    InMemory { database: String },
    File { root: PathBuf, database: String },
}

impl ConnectionString {
    pub fn parse(connection_string: &str) -> StoreResult<Self> {
        let invalid = |reason: &str| {
            StoreError::InvalidConnectionString(connection_string.to_owned(), reason.to_owned())
        };

        if let Some(rest) = connection_string.strip_prefix(MEMORY_SCHEME) {
            let database = rest.trim_end_matches('/');
            check_database_name(database).map_err(|reason| invalid(&reason))?;
            return Ok(Self::InMemory {
                database: database.to_owned(),
            });
        }

        if let Some(rest) = connection_string.strip_prefix(FILE_SCHEME) {
            let expanded = shellexpand::full(rest).map_err(|e| invalid(&e.to_string()))?;
            let path = PathBuf::from(expanded.trim_end_matches('/'));
            let database = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| invalid("missing database name"))?
                .to_owned();
            check_database_name(&database).map_err(|reason| invalid(&reason))?;
            let root = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default();
            return Ok(Self::File { root, database });
        }

        Err(invalid("unsupported scheme, expected memory:// or file://"))
    }

    pub fn database_name(&self) -> &str {
        match self {
            Self::InMemory { database } | Self::File { database, .. } => database,
        }
    }
}

impl FromStr for ConnectionString {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn check_database_name(database: &str) -> Result<(), String> {
    if database.is_empty() {
        return Err("missing database name".to_owned());
    }
    if !regex_is_match!(r"^[A-Za-z0-9_\-]+$", database) {
        return Err(format!("'{database}' is not a valid database name"));
    }
    Ok(())
}
