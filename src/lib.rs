//! # Trilogy
//!
//! Runtime-checked shapes for a SQLite model layer: connection options,
//! model options, column descriptors, where clause criteria and the option
//! bags accepted by aggregate, create, find and update calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use trilogy::prelude::*;
//!
//! let model = ModelDefinition::new(
//!     "people",
//!     &Value::from(json!({
//!         "id": "increments",
//!         "name": { "type": "string", "notNullable": true },
//!     })),
//!     Some(&Value::from(json!({ "timestamps": true }))),
//! )?;
//! assert_eq!(model.primary_key(), vec!["id"]);
//!
//! let criteria = validate(Some(&Value::from(json!(["name", "like", "a%"]))), &criteria(), None)?;
//! let conditions = cast_criteria(&criteria, model.schema())?.conditions()?;
//! assert_eq!(conditions[0].operator, QueryOperator::Like);
//!
//! let find = FindOptions::parse(Some(&Value::from(json!({ "limit": 10 }))))?;
//! assert_eq!(find.pagination().limit, Some(10));
//! # Ok::<(), trilogy::TrilogyError>(())
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod column;
pub mod criteria;
pub mod errors;
pub mod identifiers;
pub mod model;
pub mod prelude;
pub mod query_options;
pub mod schema;

pub use column::{column_descriptor, column_kind, ColumnDescriptor, ColumnKind};
pub use criteria::{cast_criteria, criteria, Condition, Criteria, QueryOperator, WhereClause, WhereTuple};
pub use errors::TrilogyError;
pub use model::{index, model_options, Index, IndexEntry, ModelDefinition, ModelOptions};
pub use schema::{normalize_schema, schema_raw, Schema, SchemaEntry, SchemaRaw};

// Re-export centralized config
pub use config::{Client, ConnectionOptions, TrilogyOptions};

// Re-export internal crates used by the public API
pub use config;
pub use type_mapping;
pub use validation;
