//! Convenience re-exports for common Trilogy usage
//!
//! # Example
//!
//! ```rust
//! use trilogy::prelude::*;
//!
//! let options = TrilogyOptions::new(&Value::record()).unwrap();
//! assert_eq!(options.client, Client::Sqlite3);
//! ```

pub use crate::column::{column_descriptor, column_kind, ColumnDescriptor, ColumnKind};
pub use crate::criteria::{
    cast_criteria, criteria, where_clause, where_multiple, where_tuple, Condition, Criteria,
    QueryOperator, WhereClause, WhereMultiple, WhereTuple,
};
pub use crate::errors::TrilogyError;
pub use crate::identifiers::{IdentifierError, ValidatedColumnName, ValidatedTableName};
pub use crate::model::{index, model_options, Index, IndexEntry, ModelDefinition, ModelOptions};
pub use crate::query_options::{
    AggregateOptions, CreateOptions, FindOptions, Order, Pagination, SortOrder, UpdateOptions,
};
pub use crate::schema::{normalize_schema, schema_raw, Schema, SchemaEntry, SchemaRaw};

pub use config::{trilogy_options, Client, ConfigError, ConnectionOptions, TrilogyOptions};
pub use type_mapping::{Callable, CastError, ColumnType, StorageValue, ToValue, Value};
pub use validation::{validate, with_default, with_default_fn, ValidationFailure, Validator};
