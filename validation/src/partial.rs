//! Partial record decoding
//!
//! Every option bag is a partial record: each declared key is optional, and
//! undeclared keys are ignored. A field validator without a default that
//! fails on an absent key leaves the field unset. Any other failure is
//! reported, including one on an explicit `null` or on a substituted default.

use std::collections::BTreeMap;

use type_mapping::Value;

use crate::errors::{failure, Context, Validation, ValidationError};
use crate::validator::Validator;

/// Field-by-field decoder over a record input
pub struct PartialRecord<'a> {
    record: &'a BTreeMap<String, Value>,
    context: &'a Context,
    errors: Vec<ValidationError>,
}

impl<'a> PartialRecord<'a> {
    /// Start decoding; fails when `input` is not a record
    pub fn new(input: Option<&'a Value>, context: &'a Context) -> Validation<Self> {
        match input {
            Some(Value::Record(record)) => Ok(Self {
                record,
                context,
                errors: Vec::new(),
            }),
            other => failure(other, context),
        }
    }

    /// Decode `key` with `validator`
    pub fn field<V>(&mut self, key: &str, validator: &V) -> Option<V::Output>
    where
        V: Validator + ?Sized,
    {
        let value = self.record.get(key);
        let field_context = self.context.append(key, validator.name());
        match validator.validate(value, &field_context) {
            Ok(decoded) => Some(decoded),
            Err(_) if value.is_none() && !validator.has_default() => None,
            Err(errors) => {
                self.errors.extend(errors);
                None
            }
        }
    }

    /// Finish decoding, yielding `output` when no field failed
    pub fn finish<T>(self, output: T) -> Validation<T> {
        if self.errors.is_empty() {
            Ok(output)
        } else {
            Err(self.errors)
        }
    }

    /// Finish decoding for outputs whose fields must all be set
    ///
    /// `build` returns `None` when a required field is missing, which is
    /// reported against the whole record.
    pub fn finish_with<T>(self, build: impl FnOnce() -> Option<T>) -> Validation<T> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        match build() {
            Some(output) => Ok(output),
            None => {
                let input = Value::Record(self.record.clone());
                failure(Some(&input), self.context)
            }
        }
    }
}

/// Builds the encoded form of a partial record, skipping unset fields
#[derive(Debug, Default)]
pub struct RecordEncoder {
    fields: BTreeMap<String, Value>,
}

impl RecordEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<V>(mut self, key: &str, validator: &V, output: Option<&V::Output>) -> Self
    where
        V: Validator + ?Sized,
    {
        if let Some(output) = output {
            self.fields.insert(key.to_string(), validator.encode(output));
        }
        self
    }

    pub fn finish(self) -> Value {
        Value::Record(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::with_default;
    use crate::primitives::{boolean, literal, number};
    use serde_json::json;

    struct Limits {
        limit: Option<f64>,
        raw: Option<bool>,
    }

    fn decode(input: &Value) -> Validation<Limits> {
        let context = Context::root("Limits");
        let mut record = PartialRecord::new(Some(input), &context)?;
        let limit = record.field("limit", &number());
        let raw = record.field("raw", &with_default(boolean(), false));
        record.finish(Limits { limit, raw })
    }

    #[test]
    fn test_absent_fields_are_unset_or_defaulted() {
        let decoded = decode(&Value::from(json!({}))).unwrap();
        assert_eq!(decoded.limit, None);
        assert_eq!(decoded.raw, Some(false));
    }

    #[test]
    fn test_present_fields_decode() {
        let decoded = decode(&Value::from(json!({ "limit": 10, "raw": true, "other": 1 }))).unwrap();
        assert_eq!(decoded.limit, Some(10.0));
        assert_eq!(decoded.raw, Some(true));
    }

    #[test]
    fn test_null_is_rejected_without_default() {
        let errors = decode(&Value::from(json!({ "limit": null }))).err().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_at("limit"));
    }

    #[test]
    fn test_non_record_input_fails() {
        assert!(decode(&Value::from(json!([]))).is_err());
        assert!(decode(&Value::Null).is_err());
    }

    #[test]
    fn test_encoder_skips_unset_fields() {
        let encoded = RecordEncoder::new()
            .field("limit", &number(), Some(&5.0))
            .field("raw", &boolean(), None)
            .finish();
        assert_eq!(encoded, Value::from(json!({ "limit": 5 })));
    }

    #[test]
    fn test_failing_default_is_reported() {
        let input = Value::record();
        let context = Context::root("Options");
        let mut record = PartialRecord::new(Some(&input), &context).unwrap();
        let client = record.field("client", &with_default(literal("sqlite3"), "pg".to_string()));

        assert_eq!(client, None);
        let errors = record.finish(()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_at("client"));
    }
}
