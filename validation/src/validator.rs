//! The validator trait and the fatal `validate` helper

use std::marker::PhantomData;

use type_mapping::{ToValue, Value};

use crate::combinators::{Map, Refinement, Union};
use crate::errors::{Context, Validation, ValidationFailure};

/// A runtime-checked schema able to decode and encode values
pub trait Validator {
    type Output: ToValue;

    /// Display name used in error paths
    fn name(&self) -> String;

    /// Decode `input`, where `None` means the value was absent
    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Self::Output>;

    /// Whether `value` already conforms, without substituting any default
    fn is(&self, value: &Value) -> bool {
        self.decode(Some(value)).is_ok()
    }

    /// Encode a decoded output back into a value
    fn encode(&self, output: &Self::Output) -> Value {
        output.to_value()
    }

    /// Whether absent input is replaced by a default before decoding
    fn has_default(&self) -> bool {
        false
    }

    /// Decode from the root context
    fn decode(&self, input: Option<&Value>) -> Validation<Self::Output> {
        self.validate(input, &Context::root(self.name()))
    }

    fn map<F, T>(self, f: F) -> Map<Self, F, T>
    where
        Self: Sized,
        F: Fn(Self::Output) -> T,
        T: ToValue,
    {
        Map {
            base: self,
            f,
            _output: PhantomData,
        }
    }

    fn refine<P>(self, name: impl Into<String>, predicate: P) -> Refinement<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Output) -> bool,
    {
        Refinement {
            base: self,
            name: name.into(),
            predicate,
        }
    }

    fn or<W>(self, other: W) -> Union<Self::Output>
    where
        Self: Sized + Send + Sync + 'static,
        W: Validator<Output = Self::Output> + Send + Sync + 'static,
    {
        Union::new(vec![Box::new(self), Box::new(other)])
    }
}

/// Boxed validator, used for union members
pub type BoxedValidator<T> = Box<dyn Validator<Output = T> + Send + Sync>;

impl<V: Validator + ?Sized> Validator for Box<V> {
    type Output = V::Output;

    fn name(&self) -> String {
        (**self).name()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Self::Output> {
        (**self).validate(input, context)
    }

    fn is(&self, value: &Value) -> bool {
        (**self).is(value)
    }

    fn encode(&self, output: &Self::Output) -> Value {
        (**self).encode(output)
    }

    fn has_default(&self) -> bool {
        (**self).has_default()
    }
}

/// Decode `input` with `validator`, failing with every accumulated error
///
/// `fallback` is returned in place of a decoded value that encodes to null.
/// A default substituted by [`with_default`](crate::with_default) is never
/// replaced.
pub fn validate<V>(
    input: Option<&Value>,
    validator: &V,
    fallback: Option<V::Output>,
) -> Result<V::Output, ValidationFailure>
where
    V: Validator + ?Sized,
{
    let decoded = validator.decode(input).map_err(|errors| {
        #[cfg(feature = "debug-logging")]
        tracing::debug!(
            validator = %validator.name(),
            errors = errors.len(),
            "validation failed"
        );
        ValidationFailure::new(errors)
    })?;

    match fallback {
        Some(fallback) if validator.encode(&decoded).is_null() => Ok(fallback),
        _ => Ok(decoded),
    }
}
