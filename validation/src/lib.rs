//! Runtime validation of dynamic values
//!
//! This crate provides the [`Validator`] trait, primitive validators,
//! combinators and the [`validate`] helper used to decode option bags,
//! column descriptors and criteria.
//!
//! ```rust
//! use type_mapping::Value;
//! use validation::{string, validate, with_default};
//!
//! let client = with_default(string(), "sqlite3".to_string());
//! assert_eq!(validate(None, &client, None).unwrap(), "sqlite3");
//! assert_eq!(validate(Some(&Value::from("sql.js")), &client, None).unwrap(), "sql.js");
//! ```

pub mod combinators;
pub mod errors;
pub mod partial;
pub mod primitives;
pub mod validator;

pub use combinators::{
    array, dictionary_of, tuple2, tuple3, with_default, with_default_fn, ArrayOf, DictionaryOf,
    Map, Refinement, Tuple2, Tuple3, Union, WithDefault,
};
pub use errors::{Context, ContextEntry, Validation, ValidationError, ValidationFailure};
pub use partial::{PartialRecord, RecordEncoder};
pub use primitives::{
    any, boolean, dictionary, function, literal, number, string, AnyType, BooleanType,
    DictionaryType, FunctionType, LiteralType, NumberType, StringType,
};
pub use validator::{validate, BoxedValidator, Validator};
