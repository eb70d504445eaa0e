use tempfile::TempDir;

use crate::{document_parser::DocumentParser, Connection, ConnectionConfig};

#[macro_export]
macro_rules! assert_value_eq_json {
    ($value:expr, $($json:tt)*) => {
        let v: ::serde_json::Value = ::serde_json::json!($($json)*);

        let left = ::serde_json::to_string(&$value).unwrap();
        let right = ::serde_json::to_string(&v).unwrap();

        assert_eq!(left, right, "json are not equals");
    };
}

#[macro_export]
macro_rules! documents_vec {
    ($($json:tt)*) => {{
        let val = ::serde_json::json!($($json)*);
        let data: Vec<$crate::Document> = ::serde_json::from_value(val).unwrap();
        data
    }};
}

pub fn memory_connection(database: &str) -> Connection {
    let config = ConnectionConfig::builder()
        .connection_string(format!("memory://{database}"))
        .build();

    Connection::initialize(config).unwrap()
}

pub fn file_connection(parser: DocumentParser) -> (TempDir, Connection) {
    let temp = tempfile::tempdir().unwrap();
    let config = ConnectionConfig::builder()
        .connection_string(format!("file://{}/edutask_test", temp.path().display()))
        .document_parser(parser)
        .build();

    (temp, Connection::initialize(config).unwrap())
}
