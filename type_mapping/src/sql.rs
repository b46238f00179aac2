//! Column type definitions
//!
//! This module holds the allow-list of supported column types and
//! their SQLite equivalents.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::types::Value;

/// Supported storage types for a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Array,
    Boolean,
    Date,
    Increments,
    Json,
    Number,
    Object,
    String,
}

impl ColumnType {
    /// Every supported column type, in allow-list order
    pub const ALL: [ColumnType; 8] = [
        ColumnType::Array,
        ColumnType::Boolean,
        ColumnType::Date,
        ColumnType::Increments,
        ColumnType::Json,
        ColumnType::Number,
        ColumnType::Object,
        ColumnType::String,
    ];

    /// Match a type name against the allow-list, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|column_type| column_type.as_str() == lowered)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Array => "array",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Increments => "increments",
            ColumnType::Json => "json",
            ColumnType::Number => "number",
            ColumnType::Object => "object",
            ColumnType::String => "string",
        }
    }

    /// SQLite column type used for DDL generation
    pub fn sqlite_type(&self) -> &'static str {
        match self {
            ColumnType::Array | ColumnType::Json | ColumnType::Object | ColumnType::String => {
                "TEXT"
            }
            ColumnType::Boolean | ColumnType::Number | ColumnType::Increments => "INTEGER",
            ColumnType::Date => "DATETIME",
        }
    }

    /// Auto-incrementing columns are always primary keys
    pub fn is_auto_increment(&self) -> bool {
        matches!(self, ColumnType::Increments)
    }

    /// Types stored as serialized JSON text
    pub fn is_serialized(&self) -> bool {
        matches!(
            self,
            ColumnType::Array | ColumnType::Json | ColumnType::Object
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether a type name is in the column type allow-list
pub fn is_supported_column_type(name: &str) -> bool {
    ColumnType::from_name(name).is_some()
}

/// Rust types that can stand in for a column kind constructor
///
/// `CONSTRUCTOR` is the constructor name matched against the allow-list and
/// `coerce` converts an arbitrary value the way that constructor would.
pub trait StorageKind {
    const CONSTRUCTOR: &'static str;

    fn coerce(value: Value) -> Value;
}

impl StorageKind for String {
    const CONSTRUCTOR: &'static str = "String";

    fn coerce(value: Value) -> Value {
        match value {
            Value::Text(s) => Value::Text(s),
            other => Value::Text(other.to_string()),
        }
    }
}

impl StorageKind for f64 {
    const CONSTRUCTOR: &'static str = "Number";

    fn coerce(value: Value) -> Value {
        let n = match value {
            Value::Null => 0.0,
            Value::Number(n) => n,
            Value::Boolean(b) => f64::from(u8::from(b)),
            Value::Text(s) if s.trim().is_empty() => 0.0,
            Value::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            Value::Date(dt) => dt.timestamp_millis() as f64,
            _ => f64::NAN,
        };
        Value::Number(n)
    }
}

impl StorageKind for bool {
    const CONSTRUCTOR: &'static str = "Boolean";

    fn coerce(value: Value) -> Value {
        let truthy = match value {
            Value::Null => false,
            Value::Boolean(b) => b,
            Value::Number(n) => n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
            _ => true,
        };
        Value::Boolean(truthy)
    }
}

impl StorageKind for DateTime<Utc> {
    const CONSTRUCTOR: &'static str = "Date";

    fn coerce(value: Value) -> Value {
        match value {
            Value::Date(dt) => Value::Date(dt),
            Value::Number(n) => Utc
                .timestamp_millis_opt(n as i64)
                .single()
                .map(Value::Date)
                .unwrap_or(Value::Null),
            Value::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Value::Date(dt.with_timezone(&Utc)))
                .unwrap_or(Value::Null),
            _ => Value::Date(Utc::now()),
        }
    }
}

impl StorageKind for Vec<Value> {
    const CONSTRUCTOR: &'static str = "Array";

    fn coerce(value: Value) -> Value {
        match value {
            Value::Array(items) => Value::Array(items),
            other => Value::Array(vec![other]),
        }
    }
}

impl StorageKind for BTreeMap<String, Value> {
    const CONSTRUCTOR: &'static str = "Object";

    fn coerce(value: Value) -> Value {
        match value {
            Value::Record(map) => Value::Record(map),
            _ => Value::record(),
        }
    }
}
