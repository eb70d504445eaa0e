use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Datelike, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value as JsonValue};
use thiserror::Error;
use ulid::Ulid;

const OID_KEY: &str = "$oid";
const DATE_KEY: &str = "$date";
const NUMBER_LONG_KEY: &str = "$numberLong";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a valid object id")]
pub struct InvalidObjectId(pub String);

/// Store generated document identifier.
///
/// Identifiers are ULIDs, identifiers handed out by the same connection are
/// strictly increasing so sorting them gives back the creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(Ulid);

impl ObjectId {
    /// Random identifier, not ordered with identifiers produced by a
    /// connection
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.0.timestamp_ms()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Ulid> for ObjectId {
    fn from(value: Ulid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s)
            .map(Self)
            .map_err(|_| InvalidObjectId(s.to_owned()))
    }
}

/// A single field value of a document.
///
/// Dates and references are their own variants so they can never be mistaken
/// for a plain string. In extended JSON they are rendered as `{"$date": ..}`
/// and `{"$oid": ..}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Date(DateTime<Utc>),
    ObjectId(ObjectId),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::ObjectId(_) => "object id",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Self::ObjectId(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Dates are stored with millisecond precision
    pub(crate) fn normalized(self) -> Self {
        match self {
            Self::Date(date) => {
                let millis = date.timestamp_millis();
                Self::Date(Utc.timestamp_millis_opt(millis).single().unwrap_or(date))
            }
            Self::Array(values) => {
                Self::Array(values.into_iter().map(Value::normalized).collect())
            }
            Self::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, value.normalized()))
                    .collect(),
            ),
            other => other,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(i) => JsonValue::Number((*i).into()),
            Self::Double(d) => Number::from_f64(*d)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Date(date) => tagged(DATE_KEY, date_to_json(date)),
            Self::ObjectId(id) => tagged(OID_KEY, JsonValue::String(id.to_string())),
            Self::Array(values) => JsonValue::Array(values.iter().map(Value::to_json).collect()),
            Self::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(values) => {
                Self::Array(values.into_iter().map(Value::from_json).collect())
            }
            JsonValue::Object(map) => {
                if let Some(tagged) = untag(&map) {
                    return tagged;
                }
                Self::Object(
                    map.into_iter()
                        .map(|(key, value)| (key, Value::from_json(value)))
                        .collect(),
                )
            }
        }
    }
}

fn tagged(key: &str, payload: JsonValue) -> JsonValue {
    let mut map = Map::new();
    map.insert(key.to_owned(), payload);
    JsonValue::Object(map)
}

// RFC 3339 only covers years 0 to 9999, other dates are written as
// milliseconds since the epoch.
fn date_to_json(date: &DateTime<Utc>) -> JsonValue {
    match date.year() {
        0..=9999 => JsonValue::String(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
        _ => tagged(
            NUMBER_LONG_KEY,
            JsonValue::String(date.timestamp_millis().to_string()),
        ),
    }
}

fn date_from_json(payload: &JsonValue) -> Option<DateTime<Utc>> {
    match payload {
        JsonValue::String(date) => DateTime::parse_from_rfc3339(date)
            .ok()
            .map(|date| date.with_timezone(&Utc)),
        JsonValue::Object(map) if map.len() == 1 => {
            let millis = map.get(NUMBER_LONG_KEY)?.as_str()?.parse::<i64>().ok()?;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

// A malformed payload is not an error here, the object is kept as is and
// schema validation refuses it later.
fn untag(map: &Map<String, JsonValue>) -> Option<Value> {
    if map.len() != 1 {
        return None;
    }

    match map.iter().next()? {
        (key, JsonValue::String(payload)) if key == OID_KEY => {
            payload.parse::<ObjectId>().ok().map(Value::ObjectId)
        }
        (key, payload) if key == DATE_KEY => date_from_json(payload).map(Value::Date),
        _ => None,
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        JsonValue::deserialize(deserializer).map(Value::from_json)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Self {
        Self::ObjectId(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_value_eq_json;
    use serde_json::json;

    #[test]
    fn test_object_id_parse() {
        let id = ObjectId::new();
        assert_eq!(id.to_string().parse::<ObjectId>().unwrap(), id);
        assert_eq!(
            "not-an-oid".parse::<ObjectId>(),
            Err(InvalidObjectId("not-an-oid".to_string()))
        );
        assert!("".parse::<ObjectId>().is_err());
    }

    #[test]
    fn test_tagged_rendering() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let id: ObjectId = "01HQZ3G9V8T6YQ2K4N5M7P8R9S".parse().unwrap();

        assert_value_eq_json!(Value::Date(date), { "$date": "2024-03-01T12:30:00.000Z" });
        assert_value_eq_json!(Value::ObjectId(id), { "$oid": "01HQZ3G9V8T6YQ2K4N5M7P8R9S" });
    }

    #[test]
    fn test_dates_outside_rfc3339_range() {
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        let before_zero = Utc.with_ymd_and_hms(-1, 6, 15, 12, 0, 0).unwrap();

        assert_value_eq_json!(Value::Date(far), {
            "$date": { "$numberLong": far.timestamp_millis().to_string() }
        });
        for date in [far, before_zero] {
            assert_eq!(Value::from_json(Value::Date(date).to_json()), Value::Date(date));
        }

        let value = Value::from_json(json!({ "$date": { "$numberLong": "soon" } }));
        assert_eq!(value.type_name(), "object");
    }

    #[test]
    fn test_from_json_recognizes_tags() {
        let value = Value::from_json(json!({
            "when": { "$date": "2024-03-01T12:30:00.000Z" },
            "ref": { "$oid": "01HQZ3G9V8T6YQ2K4N5M7P8R9S" },
            "count": 3,
            "ratio": 0.5,
        }));

        let Value::Object(map) = value else {
            panic!("expected an object");
        };
        assert!(matches!(map["when"], Value::Date(_)));
        assert!(matches!(map["ref"], Value::ObjectId(_)));
        assert_eq!(map["count"], Value::Int(3));
        assert_eq!(map["ratio"], Value::Double(0.5));
    }

    #[test]
    fn test_from_json_keeps_malformed_tags() {
        let value = Value::from_json(json!({ "$oid": "not-an-oid" }));
        assert_eq!(value.type_name(), "object");

        let value = Value::from_json(json!({ "$date": "yesterday" }));
        assert_eq!(value.type_name(), "object");

        let value = Value::from_json(json!({ "$oid": "01HQZ3G9V8T6YQ2K4N5M7P8R9S", "x": 1 }));
        assert_eq!(value.type_name(), "object");
    }

    #[test]
    fn test_normalized_truncates_dates() {
        let date = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let normalized = Value::Array(vec![Value::Date(date)]).normalized();

        let expected = Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap();
        assert_eq!(normalized, Value::Array(vec![Value::Date(expected)]));
    }
}
