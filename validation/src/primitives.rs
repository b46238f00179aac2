//! Primitive validators

use std::collections::BTreeMap;

use type_mapping::{Callable, Value};

use crate::errors::{failure, Context, Validation};
use crate::validator::Validator;

#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberType;

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionType;

/// Accepts any present value, including null
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyType;

/// Accepts any plain object (arrays are rejected)
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryType;

/// Accepts exactly one string
#[derive(Debug, Clone, Copy)]
pub struct LiteralType {
    value: &'static str,
}

pub fn string() -> StringType {
    StringType
}

pub fn number() -> NumberType {
    NumberType
}

pub fn boolean() -> BooleanType {
    BooleanType
}

pub fn function() -> FunctionType {
    FunctionType
}

pub fn any() -> AnyType {
    AnyType
}

pub fn dictionary() -> DictionaryType {
    DictionaryType
}

pub fn literal(value: &'static str) -> LiteralType {
    LiteralType { value }
}

impl Validator for StringType {
    type Output = String;

    fn name(&self) -> String {
        "string".to_string()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<String> {
        match input {
            Some(Value::Text(s)) => Ok(s.clone()),
            other => failure(other, context),
        }
    }
}

impl Validator for NumberType {
    type Output = f64;

    fn name(&self) -> String {
        "number".to_string()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<f64> {
        match input {
            Some(Value::Number(n)) => Ok(*n),
            other => failure(other, context),
        }
    }
}

impl Validator for BooleanType {
    type Output = bool;

    fn name(&self) -> String {
        "boolean".to_string()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<bool> {
        match input {
            Some(Value::Boolean(b)) => Ok(*b),
            other => failure(other, context),
        }
    }
}

impl Validator for FunctionType {
    type Output = Callable;

    fn name(&self) -> String {
        "Function".to_string()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Callable> {
        match input {
            Some(Value::Function(f)) => Ok(f.clone()),
            other => failure(other, context),
        }
    }
}

impl Validator for AnyType {
    type Output = Value;

    fn name(&self) -> String {
        "any".to_string()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Value> {
        match input {
            Some(value) => Ok(value.clone()),
            None => failure(None, context),
        }
    }
}

impl Validator for DictionaryType {
    type Output = BTreeMap<String, Value>;

    fn name(&self) -> String {
        "Dictionary".to_string()
    }

    fn validate(
        &self,
        input: Option<&Value>,
        context: &Context,
    ) -> Validation<BTreeMap<String, Value>> {
        match input {
            Some(Value::Record(map)) => Ok(map.clone()),
            other => failure(other, context),
        }
    }
}

impl Validator for LiteralType {
    type Output = String;

    fn name(&self) -> String {
        format!("\"{}\"", self.value)
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<String> {
        match input {
            Some(Value::Text(s)) if s == self.value => Ok(s.clone()),
            other => failure(other, context),
        }
    }
}
