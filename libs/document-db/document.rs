use std::collections::BTreeMap;

use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::{ObjectId, StoreError, StoreResult, Value};

/// Reserved field holding the store generated identifier
pub const ID_FIELD: &str = "_id";

/// A document is a mapping from field name to value, its identifier lives
/// under [`ID_FIELD`].
#[derive(Debug, Clone, Default, PartialEq, Deref, DerefMut)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<ObjectId> {
        self.0.get(ID_FIELD).and_then(Value::as_object_id)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }

    pub(crate) fn normalized(self) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|(field, value)| (field, value.normalized()))
                .collect(),
        )
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.0
                .iter()
                .map(|(field, value)| (field.clone(), value.to_json()))
                .collect(),
        )
    }

    pub fn from_json(json: JsonValue) -> StoreResult<Self> {
        match Value::from_json(json) {
            Value::Object(map) => Ok(Self(map)),
            other => Err(StoreError::document_parse_error(format!(
                "expected an object, found {}",
                other.type_name()
            ))),
        }
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self(value)
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = JsonValue::deserialize(deserializer)?;
        Document::from_json(json).map_err(serde::de::Error::custom)
    }
}

/// Build a [`Document`] from `field => value` pairs
#[macro_export]
macro_rules! doc {
    () => {
        $crate::Document::new()
    };
    ($($field:expr => $value:expr),+ $(,)?) => {{
        let mut document = $crate::Document::new();
        $(
            document.insert($field, $value);
        )+
        document
    }};
}
