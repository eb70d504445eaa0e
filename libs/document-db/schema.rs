use std::{collections::BTreeMap, fmt};

use serde_derive::Deserialize;
use thiserror::Error;

use crate::{Document, Value};

/// Expected type of a document field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Bool,
    Int,
    Double,
    Date,
    /// Identifier of a document of the named collection
    Reference(String),
    Array(Box<FieldType>),
}

impl FieldType {
    pub fn reference(collection: &str) -> Self {
        Self::Reference(collection.to_owned())
    }

    pub fn array_of(field_type: FieldType) -> Self {
        Self::Array(Box::new(field_type))
    }

    /// Collections referenced by this type, nested arrays included
    pub(crate) fn referenced_collection(&self) -> Option<&str> {
        match self {
            Self::Reference(collection) => Some(collection.as_str()),
            Self::Array(inner) => inner.referenced_collection(),
            _ => None,
        }
    }

    // Array elements are checked one by one so the offending index ends up
    // in the reported field path.
    fn check(&self, path: String, value: &Value, violations: &mut Vec<Violation>) {
        let matches = match (self, value) {
            (Self::String, Value::String(_))
            | (Self::Bool, Value::Bool(_))
            | (Self::Int, Value::Int(_))
            | (Self::Double, Value::Double(_))
            | (Self::Date, Value::Date(_))
            | (Self::Reference(_), Value::ObjectId(_)) => true,
            (Self::Array(inner), Value::Array(values)) => {
                for (index, value) in values.iter().enumerate() {
                    inner.check(format!("{path}[{index}]"), value, violations);
                }
                true
            }
            _ => false,
        };

        if !matches {
            violations.push(Violation::TypeMismatch {
                field: path,
                expected: self.clone(),
                found: value.type_name(),
            });
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Double => write!(f, "double"),
            Self::Date => write!(f, "date"),
            Self::Reference(collection) => write!(f, "reference<{collection}>"),
            Self::Array(inner) => write!(f, "array<{inner}>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSpec {
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Fields expected in the documents of one collection.
///
/// Fields that are not declared are stored untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CollectionSchema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSpec>,
}

impl CollectionSchema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            fields: BTreeMap::new(),
        }
    }

    pub fn required(mut self, field: &str, field_type: FieldType) -> Self {
        self.fields.insert(
            field.to_owned(),
            FieldSpec {
                required: true,
                field_type,
            },
        );
        self
    }

    pub fn optional(mut self, field: &str, field_type: FieldType) -> Self {
        self.fields.insert(
            field.to_owned(),
            FieldSpec {
                required: false,
                field_type,
            },
        );
        self
    }

    pub fn validate(&self, document: &Document) -> Result<(), SchemaValidationError> {
        let mut violations = Vec::new();

        for (field, spec) in self.fields.iter() {
            match document.get(field) {
                Some(value) => spec.field_type.check(field.clone(), value, &mut violations),
                None if spec.required => violations.push(Violation::MissingField {
                    field: field.clone(),
                }),
                None => {}
            }
        }

        for (field, value) in document.iter() {
            check_reserved_keys(field.clone(), field, value, &mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError {
                collection: self.name.clone(),
                violations,
            })
        }
    }
}

/// Keys starting with `$` are reserved for tagged values (`$date`, `$oid`),
/// at the top level as well as in nested objects
fn check_reserved_keys(
    path: String,
    key: &str,
    value: &Value,
    violations: &mut Vec<Violation>,
) {
    if key.starts_with('$') {
        violations.push(Violation::ReservedKey {
            field: path.clone(),
        });
    }

    match value {
        Value::Object(map) => {
            for (key, value) in map.iter() {
                check_reserved_keys(format!("{path}.{key}"), key, value, violations);
            }
        }
        Value::Array(values) => {
            for (index, value) in values.iter().enumerate() {
                check_reserved_keys(format!("{path}[{index}]"), "", value, violations);
            }
        }
        _ => {}
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingField {
        field: String,
    },
    ReservedKey {
        field: String,
    },
    TypeMismatch {
        field: String,
        expected: FieldType,
        found: &'static str,
    },
}

impl Violation {
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field }
            | Self::ReservedKey { field }
            | Self::TypeMismatch { field, .. } => field,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "missing required field '{field}'"),
            Self::ReservedKey { field } => {
                write!(f, "field '{field}' uses a key starting with '$'")
            }
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "field '{field}' must be {expected}, found {found}"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("document failed validation for collection '{collection}': {}", join_violations(.violations))]
pub struct SchemaValidationError {
    pub collection: String,
    pub violations: Vec<Violation>,
}

impl SchemaValidationError {
    /// Names of the offending fields, in schema order
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(Violation::field).collect()
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
