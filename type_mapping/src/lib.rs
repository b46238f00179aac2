//! Runtime value model and column type mapping
//! This crate provides the dynamic `Value` that validators decode from, the
//! column type allow-list, and casting between runtime and SQLite storage values.

pub mod cast;
pub mod sql;
pub mod types;

pub use cast::{from_storage, to_storage, CastError, StorageValue};
pub use sql::{is_supported_column_type, ColumnType, StorageKind};
pub use types::{Callable, ToValue, Value};
