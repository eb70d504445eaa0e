use std::sync::Arc;

use derive_more::Deref;

use crate::Document;

/// Format documents are written in by the file backend
#[derive(Deref, Clone)]
#[deref(forward)]
pub struct DocumentParser(Arc<dyn IDocumentParser>);

pub trait IDocumentParser: Send + Sync {
    fn deserialize(&self, data: &str) -> eyre::Result<serde_json::Value>;
    fn serialize(&self, document: &Document) -> eyre::Result<String>;
    fn file_extension(&self) -> &'static str;
}

impl std::fmt::Debug for DocumentParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentParser({})", self.file_extension())
    }
}

macro_rules! impl_file_parser {
    ($FormatType:ident, $deserialize:expr, $serialize:expr, $file_extension:expr) => {
        pub struct $FormatType;
        impl $FormatType {
            pub fn get() -> DocumentParser {
                DocumentParser(Arc::new($FormatType {}))
            }
        }
        impl IDocumentParser for $FormatType {
            fn deserialize(&self, data: &str) -> eyre::Result<serde_json::Value> {
                let data: serde_json::Value = $deserialize(data)?;
                Ok(data)
            }

            fn serialize(&self, document: &Document) -> eyre::Result<String> {
                Ok($serialize(document)?)
            }

            fn file_extension(&self) -> &'static str {
                $file_extension
            }
        }
    };
}

impl_file_parser!(
    JsonParser,
    serde_json::from_str,
    serde_json::to_string_pretty,
    "json"
);

impl_file_parser!(TomlParser, toml_from_str, toml_to_string, "toml");

impl_file_parser!(
    YamlParser,
    serde_yaml::from_str,
    serde_yaml::to_string,
    "yaml"
);

// TOML has no null, null values are written as `{ "$null" = true }`. Stored
// documents never hold keys starting with `$`.
const NULL_KEY: &str = "$null";

fn toml_to_string(document: &Document) -> Result<String, toml::ser::Error> {
    toml::to_string(&tag_nulls(document.to_json()))
}

fn toml_from_str(data: &str) -> Result<serde_json::Value, toml::de::Error> {
    toml::from_str(data).map(untag_nulls)
}

fn tag_nulls(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Json::Null => {
            let mut marker = serde_json::Map::new();
            marker.insert(NULL_KEY.to_owned(), Json::Bool(true));
            Json::Object(marker)
        }
        Json::Array(values) => Json::Array(values.into_iter().map(tag_nulls).collect()),
        Json::Object(map) => Json::Object(
            map.into_iter()
                .map(|(key, value)| (key, tag_nulls(value)))
                .collect(),
        ),
        other => other,
    }
}

fn untag_nulls(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Json::Object(map) if map.len() == 1 && map.get(NULL_KEY) == Some(&Json::Bool(true)) => {
            Json::Null
        }
        Json::Array(values) => Json::Array(values.into_iter().map(untag_nulls).collect()),
        Json::Object(map) => Json::Object(
            map.into_iter()
                .map(|(key, value)| (key, untag_nulls(value)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{doc, ObjectId, Value, ID_FIELD};
    use chrono::{TimeZone, Utc};

    fn sample() -> Document {
        doc! {
            ID_FIELD => ObjectId::new(),
            "title" => "T1",
            "startdate" => Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            "categories" => vec!["a", "b"],
            "done" => true,
        }
    }

    #[test]
    fn test_parsers_keep_tagged_values() {
        for parser in [JsonParser::get(), YamlParser::get(), TomlParser::get()] {
            let document = sample();
            let serialized = parser.serialize(&document).unwrap();
            let parsed = Document::from_json(parser.deserialize(&serialized).unwrap()).unwrap();

            assert_eq!(parsed, document, "{parser:?} changed the document");
        }
    }

    #[test]
    fn test_toml_keeps_null_values() {
        let parser = TomlParser::get();
        let document = doc! {
            "description" => "x",
            "note" => Value::Null,
            "history" => vec![Value::Null, Value::from(1)],
        };

        let serialized = parser.serialize(&document).unwrap();
        assert!(serialized.contains("$null"));

        let parsed = Document::from_json(parser.deserialize(&serialized).unwrap()).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn test_file_extensions() {
        assert_eq!(JsonParser::get().file_extension(), "json");
        assert_eq!(TomlParser::get().file_extension(), "toml");
        assert_eq!(YamlParser::get().file_extension(), "yaml");
    }

    #[test]
    fn test_invalid_content() {
        assert!(JsonParser::get().deserialize("{ not json").is_err());
    }
}
