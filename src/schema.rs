//! Model schemas
//!
//! A raw schema maps column names to either a bare column kind or a full
//! descriptor. Normalizing it yields a [`Schema`] of descriptors only.

use std::collections::BTreeMap;

use type_mapping::{
    from_storage, to_storage, CastError, ColumnType, StorageValue, ToValue, Value,
};
use validation::{dictionary_of, DictionaryOf, Union, Validator};

use crate::column::{column_descriptor, column_kind, ColumnDescriptor, ColumnKind};

/// Column names added when a model enables timestamps
pub const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// A column as written in a raw schema
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaEntry {
    Kind(ColumnKind),
    Descriptor(ColumnDescriptor),
}

impl ToValue for SchemaEntry {
    fn to_value(&self) -> Value {
        match self {
            SchemaEntry::Kind(kind) => kind.to_value(),
            SchemaEntry::Descriptor(descriptor) => descriptor.to_value(),
        }
    }
}

impl From<SchemaEntry> for ColumnDescriptor {
    fn from(entry: SchemaEntry) -> Self {
        match entry {
            SchemaEntry::Kind(kind) => ColumnDescriptor::of_kind(kind),
            SchemaEntry::Descriptor(descriptor) => descriptor,
        }
    }
}

pub type SchemaRaw = BTreeMap<String, SchemaEntry>;

/// `{ [column]: ColumnKind | ColumnDescriptor }`
pub fn schema_raw() -> DictionaryOf<Union<SchemaEntry>> {
    dictionary_of(
        column_kind()
            .map(SchemaEntry::Kind)
            .or(column_descriptor().map(SchemaEntry::Descriptor)),
    )
}

/// Normalized model schema
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    columns: BTreeMap<String, ColumnDescriptor>,
}

/// Expand bare column kinds into descriptors
pub fn normalize_schema(raw: SchemaRaw) -> Schema {
    let columns = raw
        .into_iter()
        .map(|(name, entry)| (name, ColumnDescriptor::from(entry)))
        .collect::<BTreeMap<_, _>>();
    crate::trace_log!(columns = columns.len(), "normalized schema");
    Schema { columns }
}

impl Schema {
    pub fn new(columns: BTreeMap<String, ColumnDescriptor>) -> Self {
        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&ColumnDescriptor> {
        self.columns.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnDescriptor)> {
        self.columns.iter().map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn insert(&mut self, column: impl Into<String>, descriptor: ColumnDescriptor) {
        self.columns.insert(column.into(), descriptor);
    }

    /// Add `created_at`/`updated_at` date columns unless already declared
    pub fn with_timestamps(mut self) -> Self {
        for column in TIMESTAMP_COLUMNS {
            self.columns
                .entry(column.to_string())
                .or_insert_with(|| ColumnDescriptor::of_kind(ColumnType::Date));
        }
        self
    }

    /// Columns marked primary, in name order
    pub fn primary_columns(&self) -> Vec<&str> {
        self.columns()
            .filter(|(_, descriptor)| descriptor.is_primary())
            .map(|(name, _)| name)
            .collect()
    }

    /// Column type of a declared column
    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.get(column).and_then(ColumnDescriptor::column_type)
    }

    /// Cast a value for storage in `column`; unknown or untyped columns pass through
    pub fn cast_to_storage(&self, column: &str, value: &Value) -> Result<Value, CastError> {
        match self.column_type(column) {
            Some(column_type) => to_storage(column_type, value).map(Value::from),
            None => Ok(value.clone()),
        }
    }

    /// Cast a stored value read from `column` back to its runtime form
    pub fn cast_from_storage(
        &self,
        column: &str,
        stored: &StorageValue,
    ) -> Result<Value, CastError> {
        match self.column_type(column) {
            Some(column_type) => from_storage(column_type, stored),
            None => Ok(Value::from(stored.clone())),
        }
    }

    /// Cast a whole record for storage, running each column's setter first
    pub fn to_storage_record(
        &self,
        record: &BTreeMap<String, Value>,
    ) -> Result<BTreeMap<String, Value>, CastError> {
        record
            .iter()
            .map(|(column, value)| {
                let value = match self.get(column) {
                    Some(descriptor) => descriptor.apply_set(value.clone()),
                    None => value.clone(),
                };
                Ok((column.clone(), self.cast_to_storage(column, &value)?))
            })
            .collect()
    }

    /// Cast a stored row back, running each column's getter afterwards
    pub fn from_storage_record(
        &self,
        row: &BTreeMap<String, StorageValue>,
    ) -> Result<BTreeMap<String, Value>, CastError> {
        row.iter()
            .map(|(column, stored)| {
                let value = self.cast_from_storage(column, stored)?;
                let value = match self.get(column) {
                    Some(descriptor) => descriptor.apply_get(value),
                    None => value,
                };
                Ok((column.clone(), value))
            })
            .collect()
    }
}

impl ToValue for Schema {
    fn to_value(&self) -> Value {
        self.columns.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use type_mapping::Callable;
    use validation::validate;

    fn raw(json: serde_json::Value) -> SchemaRaw {
        validate(Some(&Value::from(json)), &schema_raw(), None).unwrap()
    }

    #[test]
    fn test_bare_kinds_become_descriptors() {
        let schema = normalize_schema(raw(json!({
            "name": "string",
            "age": { "type": "number", "nullable": false },
        })));

        assert_eq!(schema.len(), 2);
        assert_eq!(
            schema.get("name"),
            Some(&ColumnDescriptor::of_kind(ColumnKind::Name("string".to_string())))
        );
        assert_eq!(schema.column_type("age"), Some(ColumnType::Number));
        assert!(!schema.get("age").unwrap().is_nullable());
    }

    #[test]
    fn test_constructor_kinds_are_accepted() {
        let input = Value::record_from([(
            "id",
            Value::Function(Callable::constructor::<f64>()),
        )]);
        let raw = validate(Some(&input), &schema_raw(), None).unwrap();
        let schema = normalize_schema(raw);
        assert_eq!(schema.column_type("id"), Some(ColumnType::Number));
    }

    #[test]
    fn test_invalid_columns_are_reported_by_name() {
        let failure = validate(
            Some(&Value::from(json!({ "ok": "string", "bad": "bogus" }))),
            &schema_raw(),
            None,
        )
        .unwrap_err();

        assert!(failure.mentions("bad"));
        assert!(!failure.mentions("ok"));
    }

    #[test]
    fn test_timestamps_are_added_once() {
        let schema = normalize_schema(raw(json!({ "created_at": "string" }))).with_timestamps();

        assert_eq!(schema.column_type("created_at"), Some(ColumnType::String));
        assert_eq!(schema.column_type("updated_at"), Some(ColumnType::Date));
    }

    #[test]
    fn test_primary_columns() {
        let schema = normalize_schema(raw(json!({
            "id": "increments",
            "code": { "type": "string", "primary": true },
            "name": "string",
        })));
        assert_eq!(schema.primary_columns(), vec!["code", "id"]);
    }

    #[test]
    fn test_record_casting_applies_transforms() {
        let mut schema = normalize_schema(raw(json!({ "tags": "array", "active": "boolean" })));
        let mut name = ColumnDescriptor::of_kind(ColumnType::String);
        name.set = Some(Callable::new("trim", |value| match value {
            Value::Text(s) => Value::Text(s.trim().to_string()),
            other => other,
        }));
        schema.insert("name", name);

        let record = match Value::from(json!({
            "tags": ["a", "b"],
            "active": true,
            "name": "  ada ",
            "extra": 1,
        })) {
            Value::Record(map) => map,
            _ => unreachable!(),
        };

        let stored = schema.to_storage_record(&record).unwrap();
        assert_eq!(stored["tags"], Value::from(r#"["a","b"]"#));
        assert_eq!(stored["active"], Value::Number(1.0));
        assert_eq!(stored["name"], Value::from("ada"));
        assert_eq!(stored["extra"], Value::Number(1.0));

        let row = BTreeMap::from([
            ("tags".to_string(), StorageValue::Text(r#"["a","b"]"#.to_string())),
            ("active".to_string(), StorageValue::Number(0.0)),
        ]);
        let restored = schema.from_storage_record(&row).unwrap();
        assert_eq!(restored["tags"], Value::from(json!(["a", "b"])));
        assert_eq!(restored["active"], Value::Boolean(false));
    }

    #[test]
    fn test_cast_errors_propagate() {
        let schema = normalize_schema(raw(json!({ "age": "number" })));
        assert!(schema.cast_to_storage("age", &Value::from("old")).is_err());
        assert_eq!(
            schema.cast_to_storage("unknown", &Value::from("old")).unwrap(),
            Value::from("old")
        );
    }
}
