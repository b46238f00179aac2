//! Query option bags
//!
//! Options accepted by aggregate, create, find and update calls. Each bag
//! is a partial record, and a missing or null bag decodes as empty.

pub mod aggregation;
pub mod options;
pub mod ordering;
pub mod pagination;

pub use aggregation::{aggregate_options, AggregateOptions, AggregateOptionsType};
pub use options::{
    create_options, find_options, update_options, CreateOptions, CreateOptionsType, FindOptions,
    FindOptionsType, UpdateOptions, UpdateOptionsType,
};
pub use ordering::{group_order, Order, SortOrder};
pub use pagination::Pagination;

use type_mapping::Value;
use validation::{validate, ValidationFailure, Validator};

/// Decode an option bag, treating absent or null input as `{}`
pub(crate) fn parse_bag<V>(input: Option<&Value>, validator: &V) -> Result<V::Output, ValidationFailure>
where
    V: Validator,
{
    match input {
        None | Some(Value::Null) => validate(Some(&Value::record()), validator, None),
        Some(value) => validate(Some(value), validator, None),
    }
}
