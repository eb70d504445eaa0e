use std::path::Path;

use edutask_config::{Config, DatabaseConfig, DocumentFormat};
use edutask_document_db::{
    document_parser::{DocumentParser, JsonParser, TomlParser, YamlParser},
    Connection, ConnectionConfig, SchemaRegistry,
};
use tracing::debug;

use crate::App;

pub fn load(config_path: impl AsRef<Path>) -> eyre::Result<App> {
    let (config, found_config_file) = read_config(config_path.as_ref())?;
    let connection = connect(&config.database)?;

    Ok(App {
        connection,
        found_config_file,
    })
}

/// Read the configuration file, a missing file falls back to the defaults
/// and the reason is kept so frontends can report it. A file that exists but
/// can't be used is an error.
fn read_config(config_path: &Path) -> eyre::Result<(Config, Result<(), eyre::Error>)> {
    match edutask_config::load(config_path)? {
        Some(config) => Ok((config, Ok(()))),
        None => {
            debug!(path = %config_path.display(), "Using default configuration");
            let reason = eyre::eyre!("config path '{}' was not found", config_path.display());
            Ok((Config::default(), Err(reason)))
        }
    }
}

pub fn connect(database: &DatabaseConfig) -> eyre::Result<Connection> {
    let document_parser = get_document_parser(database.document_format);
    let schemas = match database.get_schema_dir() {
        Some(dir) => SchemaRegistry::from_dir(&dir, &document_parser)?,
        None => SchemaRegistry::builtin(),
    };

    let config = ConnectionConfig::builder()
        .connection_string(database.resolve_url())
        .document_parser(document_parser)
        .schemas(schemas)
        .build();

    Ok(Connection::initialize(config)?)
}

fn get_document_parser(format: DocumentFormat) -> DocumentParser {
    match format {
        DocumentFormat::Json => JsonParser::get(),
        DocumentFormat::Yaml => YamlParser::get(),
        DocumentFormat::Toml => TomlParser::get(),
    }
}
