use std::fmt::{self, Display};

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlx::{
    query::Query,
    sqlite::{SqliteArguments, SqliteRow},
    Row, Sqlite, TypeInfo, ValueRef,
};

/// A single property value of a model.
///
/// A property missing from a model is "unset"; a property holding
/// `Value::Null` has been explicitly set to null.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Lists and maps are stored as their serialized form.
    pub fn is_compound(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(data) => Some(data),
            _ => None,
        }
    }

    pub fn serialize(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Turns text read from the store back into a value. Text holding a
    /// serialized list or map is rehydrated, anything else stays a string.
    ///
    /// This is lossy for plain strings that happen to be valid JSON arrays
    /// or objects: a property saved as the string `"[1,2]"` reads back as a
    /// list, and [`Model::same_properties`](crate::Model::same_properties)
    /// then sees it as changed against the string it was saved from.
    pub fn unserialize(text: &str) -> Self {
        let trimmed = text.trim_start();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            if let Ok(value) = serde_json::from_str::<Value>(text) {
                if value.is_compound() {
                    return value;
                }
            }
        }
        Self::String(text.to_owned())
    }

    /// The string a scalar is coerced to when compared or matched as text.
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(true) => "1".to_owned(),
            Self::Bool(false) => String::new(),
            Self::Int(data) => data.to_string(),
            Self::Float(data) => data.to_string(),
            Self::String(data) => data.to_owned(),
            Self::List(_) | Self::Map(_) => self.serialize().unwrap_or_default(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(data) => *data,
            Self::Int(data) => *data != 0,
            Self::Float(data) => *data != 0.0,
            Self::String(data) => !data.is_empty() && data != "0",
            Self::List(data) => !data.is_empty(),
            Self::Map(data) => !data.is_empty(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(data) => Some(*data as f64),
            Self::Float(data) => Some(*data),
            Self::String(data) => data.trim().parse().ok(),
            _ => None,
        }
    }

    /// Coercive comparison in the manner of the loosely typed store the data
    /// layer was written against:
    /// - null equals every "empty" value (`false`, `0`, `""`, empty list),
    /// - a bool equals any value of the same truthiness,
    /// - numbers and numeric strings compare by numeric value,
    /// - other strings compare exactly, lists and maps by serialized form.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Null, other) | (other, Self::Null) => !other.is_truthy(),
            (Self::Bool(data), other) | (other, Self::Bool(data)) => *data == other.is_truthy(),
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::String(a), Self::String(b)) => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => a == b,
            },
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_) | Self::String(_))
            | (Self::String(_), Self::Int(_) | Self::Float(_)) => {
                match (self.as_number(), other.as_number()) {
                    (Some(a), Some(b)) => a == b,
                    _ => self.to_text() == other.to_text(),
                }
            }
            (Self::List(_) | Self::Map(_), Self::List(_) | Self::Map(_)) => {
                self.serialize().ok() == other.serialize().ok()
            }
            _ => false,
        }
    }

    pub fn from_serde_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(data) => Self::Bool(*data),
            serde_json::Value::Number(data) => match data.as_i64() {
                Some(data) => Self::Int(data),
                None => Self::Float(data.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(data) => Self::String(data.to_owned()),
            serde_json::Value::Array(data) => {
                Self::List(data.iter().map(Self::from_serde_json).collect())
            }
            serde_json::Value::Object(data) => Self::Map(
                data.iter()
                    .map(|(key, value)| (key.to_owned(), Self::from_serde_json(value)))
                    .collect(),
            ),
        }
    }

    pub fn to_serde_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(data) => serde_json::json!(data),
            Self::Int(data) => serde_json::json!(data),
            Self::Float(data) => serde_json::json!(data),
            Self::String(data) => serde_json::json!(data),
            Self::List(data) => {
                serde_json::Value::Array(data.iter().map(Self::to_serde_json).collect())
            }
            Self::Map(data) => serde_json::Value::Object(
                data.iter()
                    .map(|(key, value)| (key.to_owned(), value.to_serde_json()))
                    .collect(),
            ),
        }
    }

    pub fn from_sqlitedb_model(row: &SqliteRow, index: usize) -> Result<Self> {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Self::Null);
        }
        let kind = raw.type_info().name().to_owned();

        match kind.as_str() {
            "INTEGER" | "BOOLEAN" => Ok(Self::Int(row.try_get::<i64, _>(index)?)),
            "REAL" => Ok(Self::Float(row.try_get::<f64, _>(index)?)),
            "BLOB" => {
                let bytes = row.try_get::<Vec<u8>, _>(index)?;
                Ok(Self::unserialize(&String::from_utf8_lossy(&bytes)))
            }
            _ => Ok(Self::unserialize(&row.try_get::<String, _>(index)?)),
        }
    }

    pub fn to_sqlitedb_model<'a>(
        &self,
        query: Query<'a, Sqlite, SqliteArguments<'a>>,
    ) -> Result<Query<'a, Sqlite, SqliteArguments<'a>>> {
        match self {
            Self::Null => Ok(query.bind(None::<String>)),
            Self::Bool(data) => Ok(query.bind(*data)),
            Self::Int(data) => Ok(query.bind(*data)),
            Self::Float(data) => Ok(query.bind(*data)),
            Self::String(data) => Ok(query.bind(data.to_owned())),
            Self::List(_) | Self::Map(_) => Ok(query.bind(self.serialize()?)),
        }
    }
}

pub fn bind_all<'a>(
    mut query: Query<'a, Sqlite, SqliteArguments<'a>>,
    params: &[Value],
) -> Result<Query<'a, Sqlite, SqliteArguments<'a>>> {
    for param in params {
        query = param.to_sqlitedb_model(query)?;
    }
    Ok(query)
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::String(data) => write!(f, "'{data}'"),
            _ => write!(f, "{}", self.to_text()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
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

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_values_survive_serialization() {
        let mut map = IndexMap::new();
        map.insert("de".to_owned(), Value::from("Haus"));
        map.insert("en".to_owned(), Value::from("house"));
        let value = Value::List(vec![Value::from(1), Value::Map(map), Value::Null]);

        let text = value.serialize().unwrap();
        assert_eq!(text, r#"[1,{"de":"Haus","en":"house"},null]"#);
        assert_eq!(Value::unserialize(&text), value);
    }

    #[test]
    fn plain_text_is_not_rehydrated() {
        assert_eq!(Value::unserialize("[draft"), Value::from("[draft"));
        assert_eq!(Value::unserialize("42"), Value::from("42"));
        assert_eq!(Value::unserialize("\"quoted\""), Value::from("\"quoted\""));
    }

    #[test]
    fn json_looking_text_reads_back_as_compound() {
        assert_eq!(
            Value::unserialize("[1,2]"),
            Value::List(vec![Value::from(1), Value::from(2)])
        );
        assert!(Value::unserialize(r#"{"a":1}"#).is_compound());
    }

    #[test]
    fn loose_equality_coerces_scalars() {
        assert!(Value::from(1).loose_eq(&Value::from("1")));
        assert!(Value::from("1.0").loose_eq(&Value::from("1")));
        assert!(Value::from(2.0).loose_eq(&Value::from(2)));
        assert!(Value::Null.loose_eq(&Value::from("")));
        assert!(Value::Null.loose_eq(&Value::from(0)));
        assert!(Value::from(true).loose_eq(&Value::from("yes")));
        assert!(Value::from(false).loose_eq(&Value::from("0")));

        assert!(!Value::from("abc").loose_eq(&Value::from("ABC")));
        assert!(!Value::from("abc").loose_eq(&Value::from(0)));
        assert!(!Value::Null.loose_eq(&Value::from("x")));
        assert!(!Value::List(vec![]).loose_eq(&Value::from("")));
    }

    #[test]
    fn serde_json_conversion_keeps_shape() {
        let json = serde_json::json!({"a": [1, 2.5, "x", null, true]});
        let value = Value::from_serde_json(&json);
        assert_eq!(value.to_serde_json(), json);
    }

    #[test]
    fn text_coercion_follows_store_conventions() {
        assert_eq!(Value::from(true).to_text(), "1");
        assert_eq!(Value::from(false).to_text(), "");
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::from(12).to_string(), "12");
        assert_eq!(Value::from("Ann").to_string(), "'Ann'");
    }
}
