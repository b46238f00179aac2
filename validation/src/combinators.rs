//! Validator combinators
//!
//! Arrays, exact-length tuples, keyed dictionaries, unions, maps and
//! refinements, plus `with_default`, which substitutes a default for
//! null or absent input before delegating to its base validator.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use type_mapping::{ToValue, Value};

use crate::errors::{failure, Context, Validation, ValidationError};
use crate::validator::{BoxedValidator, Validator};

/// Homogeneous array
#[derive(Debug, Clone)]
pub struct ArrayOf<V> {
    item: V,
}

pub fn array<V: Validator>(item: V) -> ArrayOf<V> {
    ArrayOf { item }
}

impl<V: Validator> Validator for ArrayOf<V> {
    type Output = Vec<V::Output>;

    fn name(&self) -> String {
        format!("Array<{}>", self.item.name())
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Self::Output> {
        let items = match input {
            Some(Value::Array(items)) => items,
            other => return failure(other, context),
        };

        let item_name = self.item.name();
        let mut output = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let item_context = context.append(i.to_string(), item_name.as_str());
            match self.item.validate(Some(item), &item_context) {
                Ok(decoded) => output.push(decoded),
                Err(errs) => errors.extend(errs),
            }
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }

    fn encode(&self, output: &Self::Output) -> Value {
        Value::Array(output.iter().map(|item| self.item.encode(item)).collect())
    }
}

fn tuple_items<'a>(
    input: Option<&'a Value>,
    len: usize,
    context: &Context,
) -> Validation<&'a [Value]> {
    match input {
        Some(Value::Array(items)) if items.len() == len => Ok(items),
        other => failure(other, context),
    }
}

fn collect_pair<A, B>(a: Validation<A>, b: Validation<B>) -> Validation<(A, B)> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (a, b) => {
            let mut errors = Vec::new();
            if let Err(errs) = a {
                errors.extend(errs);
            }
            if let Err(errs) = b {
                errors.extend(errs);
            }
            Err(errors)
        }
    }
}

/// Exact-length pair
#[derive(Debug, Clone)]
pub struct Tuple2<A, B> {
    first: A,
    second: B,
}

pub fn tuple2<A: Validator, B: Validator>(first: A, second: B) -> Tuple2<A, B> {
    Tuple2 { first, second }
}

impl<A: Validator, B: Validator> Validator for Tuple2<A, B> {
    type Output = (A::Output, B::Output);

    fn name(&self) -> String {
        format!("[{}, {}]", self.first.name(), self.second.name())
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Self::Output> {
        let items = tuple_items(input, 2, context)?;
        let a = self
            .first
            .validate(Some(&items[0]), &context.append("0", self.first.name()));
        let b = self
            .second
            .validate(Some(&items[1]), &context.append("1", self.second.name()));
        collect_pair(a, b)
    }

    fn encode(&self, output: &Self::Output) -> Value {
        Value::Array(vec![
            self.first.encode(&output.0),
            self.second.encode(&output.1),
        ])
    }
}

/// Exact-length triple
#[derive(Debug, Clone)]
pub struct Tuple3<A, B, C> {
    first: A,
    second: B,
    third: C,
}

pub fn tuple3<A: Validator, B: Validator, C: Validator>(
    first: A,
    second: B,
    third: C,
) -> Tuple3<A, B, C> {
    Tuple3 {
        first,
        second,
        third,
    }
}

impl<A: Validator, B: Validator, C: Validator> Validator for Tuple3<A, B, C> {
    type Output = (A::Output, B::Output, C::Output);

    fn name(&self) -> String {
        format!(
            "[{}, {}, {}]",
            self.first.name(),
            self.second.name(),
            self.third.name()
        )
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Self::Output> {
        let items = tuple_items(input, 3, context)?;
        let a = self
            .first
            .validate(Some(&items[0]), &context.append("0", self.first.name()));
        let b = self
            .second
            .validate(Some(&items[1]), &context.append("1", self.second.name()));
        let c = self
            .third
            .validate(Some(&items[2]), &context.append("2", self.third.name()));
        let ((a, b), c) = collect_pair(collect_pair(a, b), c)?;
        Ok((a, b, c))
    }

    fn encode(&self, output: &Self::Output) -> Value {
        Value::Array(vec![
            self.first.encode(&output.0),
            self.second.encode(&output.1),
            self.third.encode(&output.2),
        ])
    }
}

/// String-keyed dictionary whose values all match one validator
#[derive(Debug, Clone)]
pub struct DictionaryOf<V> {
    value: V,
}

pub fn dictionary_of<V: Validator>(value: V) -> DictionaryOf<V> {
    DictionaryOf { value }
}

impl<V: Validator> Validator for DictionaryOf<V> {
    type Output = BTreeMap<String, V::Output>;

    fn name(&self) -> String {
        format!("{{ [K in string]: {} }}", self.value.name())
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Self::Output> {
        let map = match input {
            Some(Value::Record(map)) => map,
            other => return failure(other, context),
        };

        let value_name = self.value.name();
        let mut output = BTreeMap::new();
        let mut errors = Vec::new();
        for (key, item) in map {
            let entry_context = context.append(key.as_str(), value_name.as_str());
            match self.value.validate(Some(item), &entry_context) {
                Ok(decoded) => {
                    output.insert(key.clone(), decoded);
                }
                Err(errs) => errors.extend(errs),
            }
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }

    fn encode(&self, output: &Self::Output) -> Value {
        Value::Record(
            output
                .iter()
                .map(|(k, v)| (k.clone(), self.value.encode(v)))
                .collect(),
        )
    }
}

/// First matching member wins; all member errors are reported otherwise
pub struct Union<T> {
    members: Vec<BoxedValidator<T>>,
}

impl<T: ToValue> Union<T> {
    pub fn new(members: Vec<BoxedValidator<T>>) -> Self {
        Self { members }
    }

    /// Append another member
    pub fn or<W>(mut self, other: W) -> Self
    where
        W: Validator<Output = T> + Send + Sync + 'static,
    {
        self.members.push(Box::new(other));
        self
    }
}

impl<T: ToValue> Validator for Union<T> {
    type Output = T;

    fn name(&self) -> String {
        let names: Vec<String> = self.members.iter().map(|m| m.name()).collect();
        format!("({})", names.join(" | "))
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<T> {
        let mut errors = Vec::new();
        for (i, member) in self.members.iter().enumerate() {
            match member.validate(input, &context.append(i.to_string(), member.name())) {
                Ok(decoded) => return Ok(decoded),
                Err(errs) => errors.extend(errs),
            }
        }
        if errors.is_empty() {
            return failure(input, context);
        }
        Err(errors)
    }

    fn is(&self, value: &Value) -> bool {
        self.members.iter().any(|member| member.is(value))
    }
}

/// Converts a base validator's output
pub struct Map<V, F, T> {
    pub(crate) base: V,
    pub(crate) f: F,
    pub(crate) _output: PhantomData<fn() -> T>,
}

impl<V, F, T> Validator for Map<V, F, T>
where
    V: Validator,
    F: Fn(V::Output) -> T,
    T: ToValue,
{
    type Output = T;

    fn name(&self) -> String {
        self.base.name()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<T> {
        self.base.validate(input, context).map(&self.f)
    }

    fn is(&self, value: &Value) -> bool {
        self.base.is(value)
    }

    fn has_default(&self) -> bool {
        self.base.has_default()
    }
}

/// Base validator plus a predicate on its output
pub struct Refinement<V, P> {
    pub(crate) base: V,
    pub(crate) name: String,
    pub(crate) predicate: P,
}

impl<V, P> Validator for Refinement<V, P>
where
    V: Validator,
    P: Fn(&V::Output) -> bool,
{
    type Output = V::Output;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<V::Output> {
        let decoded = self.base.validate(input, context)?;
        if (self.predicate)(&decoded) {
            Ok(decoded)
        } else {
            Err(vec![ValidationError::new(input, context)])
        }
    }

    fn encode(&self, output: &V::Output) -> Value {
        self.base.encode(output)
    }

    fn has_default(&self) -> bool {
        self.base.has_default()
    }
}

/// Validator that replaces null or absent input with a default
pub struct WithDefault<V> {
    base: V,
    default: Value,
}

/// Wrap `base` so null or absent input validates as `default`
pub fn with_default<V: Validator>(base: V, default: V::Output) -> WithDefault<V> {
    let default = base.encode(&default);
    WithDefault { base, default }
}

/// Like [`with_default`], with the default produced once, right away
pub fn with_default_fn<V, F>(base: V, producer: F) -> WithDefault<V>
where
    V: Validator,
    F: FnOnce() -> V::Output,
{
    with_default(base, producer())
}

impl<V: Validator> WithDefault<V> {
    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

impl<V: Validator> Validator for WithDefault<V> {
    type Output = V::Output;

    fn name(&self) -> String {
        match &self.default {
            Value::Function(_) => format!("withDefault({}, undefined)", self.base.name()),
            default => format!("withDefault({}, {})", self.base.name(), default),
        }
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<V::Output> {
        match input {
            None | Some(Value::Null) => self.base.validate(Some(&self.default), context),
            Some(value) => self.base.validate(Some(value), context),
        }
    }

    fn is(&self, value: &Value) -> bool {
        self.base.is(value)
    }

    fn encode(&self, output: &V::Output) -> Value {
        self.base.encode(output)
    }

    fn has_default(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{any, boolean, literal, number, string};
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_array_collects_every_item_error() {
        let validator = array(string());
        let errors = validator.decode(Some(&v(json!(["a", 1, "b", false])))).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].context.keys(), vec!["1"]);
        assert_eq!(errors[1].context.keys(), vec!["3"]);
        assert_eq!(validator.name(), "Array<string>");
    }

    #[test]
    fn test_tuples_are_exact_length() {
        let pair = tuple2(string(), any());
        let triple = tuple3(string(), string(), any());

        assert!(pair.is(&v(json!(["id", 1]))));
        assert!(!pair.is(&v(json!(["id"]))));
        assert!(!pair.is(&v(json!(["id", "=", 1]))));
        assert!(triple.is(&v(json!(["id", "<", 1]))));
        assert!(!triple.is(&v(json!(["id", "<", 1, 2]))));
        assert!(!triple.is(&v(json!([1, "<", 1]))));
    }

    #[test]
    fn test_dictionary_of() {
        let validator = dictionary_of(array(string()));
        let decoded = validator
            .decode(Some(&v(json!({ "by_name": ["first", "last"] }))))
            .unwrap();
        assert_eq!(decoded["by_name"], vec!["first", "last"]);

        let errors = validator.decode(Some(&v(json!({ "bad": [1] })))).unwrap_err();
        assert_eq!(errors[0].context.keys(), vec!["bad", "0"]);
    }

    #[test]
    fn test_union_takes_first_match() {
        let validator = literal("sqlite3").or(literal("sql.js"));
        assert_eq!(validator.name(), "(\"sqlite3\" | \"sql.js\")");
        assert_eq!(validator.decode(Some(&v(json!("sql.js")))).unwrap(), "sql.js");

        let errors = validator.decode(Some(&v(json!("pg")))).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_map_and_refine() {
        let positive = number().refine("Positive", |n| *n > 0.0);
        assert!(positive.is(&Value::from(2)));
        assert!(!positive.is(&Value::from(-2)));
        assert_eq!(positive.name(), "Positive");

        let doubled = number().map(|n| n * 2.0);
        assert_eq!(doubled.decode(Some(&Value::from(2))).unwrap(), 4.0);
    }

    #[test]
    fn test_with_default_substitutes_null_and_absent() {
        let base = string();
        let validator = with_default(string(), "sqlite3".to_string());
        let default = Value::from("sqlite3");
        let context = Context::root("client");

        assert_eq!(
            validator.validate(None, &context),
            base.validate(Some(&default), &context)
        );
        assert_eq!(
            validator.validate(Some(&Value::Null), &context),
            base.validate(Some(&default), &context)
        );
        assert_eq!(validator.name(), "withDefault(string, \"sqlite3\")");
    }

    #[test]
    fn test_with_default_passes_present_values_through() {
        let validator = with_default(boolean(), true);
        let context = Context::root("flag");
        let samples = [json!(false), json!(true), json!("yes"), json!(0), json!([])];

        for sample in samples {
            let value = v(sample);
            assert_eq!(
                validator.validate(Some(&value), &context),
                boolean().validate(Some(&value), &context)
            );
        }
    }

    #[test]
    fn test_function_defaults_render_as_undefined() {
        let verbose = with_default(crate::primitives::function(), type_mapping::Callable::identity());
        assert_eq!(verbose.name(), "withDefault(Function, undefined)");
    }

    #[test]
    fn test_with_default_delegates_is_and_encode() {
        let validator = with_default(number(), 10.0);
        assert!(!validator.is(&Value::Null));
        assert!(validator.is(&Value::from(1)));
        assert_eq!(validator.encode(&3.0), Value::Number(3.0));
    }

    #[test]
    fn test_with_default_fn_runs_producer_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = AtomicUsize::new(0);
        let validator = with_default_fn(number(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            7.0
        });

        assert_eq!(validator.decode(None).unwrap(), 7.0);
        assert_eq!(validator.decode(Some(&Value::Null)).unwrap(), 7.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(validator.default_value(), &Value::Number(7.0));
    }

    #[test]
    fn test_with_default_propagates_base_failure() {
        let validator = with_default(number(), 1.0);
        let errors = validator.decode(Some(&Value::from("one"))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].value, Some(Value::from("one")));
    }
}
