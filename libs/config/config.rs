use std::path::PathBuf;

use serde_derive::Deserialize;

/// Environment variable overriding `database.url`
pub const DATABASE_URL_ENV: &str = "EDUTASK_DB_URL";

const DEFAULT_DATABASE_URL: &str = "file://~/.local/share/edutask/edutask";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string of the document store (e.g. `memory://edutask`,
    /// `file://~/.local/share/edutask/edutask`)
    pub url: Option<String>,

    /// Format documents are written in on disk (default: json)
    #[serde(default)]
    pub document_format: DocumentFormat,

    /// Directory holding one schema file per collection, builtin schemas are
    /// used when unset
    pub schema_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl DatabaseConfig {
    /// Return the connection string to use, `EDUTASK_DB_URL` takes precedence
    /// over the configuration file
    pub fn resolve_url(&self) -> String {
        self.resolve_url_with(std::env::var(DATABASE_URL_ENV).ok())
    }

    fn resolve_url_with(&self, env_url: Option<String>) -> String {
        env_url
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.url.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned())
    }

    pub fn get_schema_dir(&self) -> Option<PathBuf> {
        self.schema_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_wins_over_file() {
        let config = DatabaseConfig {
            url: Some("memory://from_file".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            config.resolve_url_with(Some("memory://from_env".to_owned())),
            "memory://from_env"
        );
        assert_eq!(config.resolve_url_with(None), "memory://from_file");
        assert_eq!(
            config.resolve_url_with(Some("  ".to_owned())),
            "memory://from_file"
        );
    }

    #[test]
    fn test_default_url() {
        let config = DatabaseConfig::default();
        assert_eq!(config.resolve_url_with(None), DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_parse_document_format() {
        let config: Config = toml::from_str(
            r#"
            [database]
            url = "memory://edutask"
            document_format = "yaml"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.document_format, DocumentFormat::Yaml);
        assert_eq!(config.database.url.as_deref(), Some("memory://edutask"));
        assert!(config.database.get_schema_dir().is_none());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.database.document_format, DocumentFormat::Json);
        assert!(config.database.url.is_none());
    }
}
