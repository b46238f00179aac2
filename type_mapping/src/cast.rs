//! Storage casting utilities
//!
//! This module converts runtime values into the form they are stored in
//! SQLite and back, based on a column's declared type.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::sql::ColumnType;
use crate::types::Value;

/// Value as it is written to and read from the database
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StorageValue {
    Null,
    Number(f64),
    Text(String),
    Date(DateTime<Utc>),
}

impl From<StorageValue> for Value {
    fn from(val: StorageValue) -> Self {
        match val {
            StorageValue::Null => Value::Null,
            StorageValue::Number(n) => Value::Number(n),
            StorageValue::Text(s) => Value::Text(s),
            StorageValue::Date(dt) => Value::Date(dt),
        }
    }
}

/// Casting errors
#[derive(Debug, Error, PartialEq)]
pub enum CastError {
    #[error("Cannot cast {value} to a '{kind}' column")]
    Unsupported { kind: ColumnType, value: String },

    #[error("Invalid JSON stored in '{kind}' column: {message}")]
    InvalidJson { kind: ColumnType, message: String },
}

fn unsupported(kind: ColumnType, value: &Value) -> CastError {
    CastError::Unsupported {
        kind,
        value: value.to_string(),
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Convert a runtime value into its storage form for a column of `kind`
pub fn to_storage(kind: ColumnType, value: &Value) -> Result<StorageValue, CastError> {
    if value.is_null() {
        return Ok(StorageValue::Null);
    }

    match kind {
        ColumnType::Array | ColumnType::Json | ColumnType::Object => {
            if matches!(value, Value::Function(_)) {
                return Err(unsupported(kind, value));
            }
            let json = serde_json::Value::from(value);
            Ok(StorageValue::Text(json.to_string()))
        }
        ColumnType::Boolean => match value {
            Value::Boolean(b) => Ok(StorageValue::Number(f64::from(u8::from(*b)))),
            Value::Number(n) => Ok(StorageValue::Number(if *n != 0.0 { 1.0 } else { 0.0 })),
            _ => Err(unsupported(kind, value)),
        },
        ColumnType::Date => match value {
            Value::Date(dt) => Ok(StorageValue::Date(*dt)),
            Value::Text(s) => parse_date(s)
                .map(StorageValue::Date)
                .ok_or_else(|| unsupported(kind, value)),
            _ => Err(unsupported(kind, value)),
        },
        ColumnType::Number | ColumnType::Increments => match value {
            Value::Number(n) => Ok(StorageValue::Number(*n)),
            Value::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(StorageValue::Number)
                .map_err(|_| unsupported(kind, value)),
            _ => Err(unsupported(kind, value)),
        },
        ColumnType::String => match value {
            Value::Text(s) => Ok(StorageValue::Text(s.clone())),
            Value::Number(_) | Value::Boolean(_) => Ok(StorageValue::Text(value.to_string())),
            Value::Date(dt) => Ok(StorageValue::Text(dt.to_rfc3339())),
            _ => Err(unsupported(kind, value)),
        },
    }
}

/// Convert a stored value back into its runtime form for a column of `kind`
pub fn from_storage(kind: ColumnType, stored: &StorageValue) -> Result<Value, CastError> {
    match (kind, stored) {
        (_, StorageValue::Null) => Ok(Value::Null),
        (ColumnType::Array | ColumnType::Json | ColumnType::Object, StorageValue::Text(text)) => {
            serde_json::from_str::<serde_json::Value>(text)
                .map(Value::from)
                .map_err(|e| CastError::InvalidJson {
                    kind,
                    message: e.to_string(),
                })
        }
        (ColumnType::Boolean, StorageValue::Number(n)) => Ok(Value::Boolean(*n != 0.0)),
        (ColumnType::Boolean, StorageValue::Text(text)) => {
            Ok(Value::Boolean(matches!(text.as_str(), "true" | "1")))
        }
        (ColumnType::Date, StorageValue::Date(dt)) => Ok(Value::Date(*dt)),
        (ColumnType::Date, StorageValue::Text(text)) => parse_date(text)
            .map(Value::Date)
            .ok_or_else(|| unsupported(kind, &Value::Text(text.clone()))),
        (ColumnType::Date, StorageValue::Number(ms)) => Utc
            .timestamp_millis_opt(*ms as i64)
            .single()
            .map(Value::Date)
            .ok_or_else(|| unsupported(kind, &Value::Number(*ms))),
        (ColumnType::Number | ColumnType::Increments, StorageValue::Number(n)) => {
            Ok(Value::Number(*n))
        }
        (ColumnType::Number | ColumnType::Increments, StorageValue::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| unsupported(kind, &Value::Text(text.clone()))),
        (ColumnType::String, StorageValue::Text(text)) => Ok(Value::Text(text.clone())),
        (ColumnType::String, StorageValue::Number(n)) => {
            Ok(Value::Text(Value::Number(*n).to_string()))
        }
        (ColumnType::String, StorageValue::Date(dt)) => Ok(Value::Text(dt.to_rfc3339())),
        (_, other) => Err(unsupported(kind, &Value::from(other.clone()))),
    }
}
