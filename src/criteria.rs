//! Where clause criteria
//!
//! Criteria arrive as a `[column, value]` pair, a `[column, operator, value]`
//! triple, an object of column/value entries, or a list of any of these.
//! [`Criteria::conditions`] flattens them into [`Condition`]s.

use std::collections::BTreeMap;
use std::fmt;

use type_mapping::{ToValue, Value};
use validation::{any, array, dictionary_of, string, tuple2, tuple3, ArrayOf, Union, Validator};

use crate::errors::TrilogyError;
use crate::schema::Schema;

/// Comparison operators accepted in criteria triples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Eq,        // =
    Ne,        // != or <>
    Gt,        // >
    Gte,       // >=
    Lt,        // <
    Lte,       // <=
    Like,      // LIKE
    NotLike,   // NOT LIKE
    In,        // IN
    NotIn,     // NOT IN
    Is,        // IS
    IsNot,     // IS NOT
}

impl QueryOperator {
    /// Parse an operator, ignoring case and surrounding whitespace
    pub fn parse(operator: &str) -> Option<Self> {
        let normalized = operator
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        let parsed = match normalized.as_str() {
            "=" => Self::Eq,
            "!=" | "<>" => Self::Ne,
            ">" => Self::Gt,
            ">=" => Self::Gte,
            "<" => Self::Lt,
            "<=" => Self::Lte,
            "like" => Self::Like,
            "not like" => Self::NotLike,
            "in" => Self::In,
            "not in" => Self::NotIn,
            "is" => Self::Is,
            "is not" => Self::IsNot,
            _ => return None,
        };
        Some(parsed)
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
        }
    }

    /// Whether the operand is a list of values
    pub fn takes_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sql())
    }
}

/// `[column, value]` or `[column, operator, value]`
#[derive(Debug, Clone, PartialEq)]
pub enum WhereTuple {
    Pair(String, Value),
    Triple(String, String, Value),
}

impl ToValue for WhereTuple {
    fn to_value(&self) -> Value {
        match self {
            WhereTuple::Pair(column, value) => (column.clone(), value.clone()).to_value(),
            WhereTuple::Triple(column, operator, value) => {
                (column.clone(), operator.clone(), value.clone()).to_value()
            }
        }
    }
}

pub fn where_tuple() -> Union<WhereTuple> {
    tuple2(string(), any())
        .map(|(column, value)| WhereTuple::Pair(column, value))
        .or(tuple3(string(), string(), any())
            .map(|(column, operator, value)| WhereTuple::Triple(column, operator, value)))
}

/// A tuple or an object of column/value entries
#[derive(Debug, Clone, PartialEq)]
pub enum WhereClause {
    Tuple(WhereTuple),
    Object(BTreeMap<String, Value>),
}

impl ToValue for WhereClause {
    fn to_value(&self) -> Value {
        match self {
            WhereClause::Tuple(tuple) => tuple.to_value(),
            WhereClause::Object(entries) => entries.to_value(),
        }
    }
}

pub fn where_clause() -> Union<WhereClause> {
    where_tuple()
        .map(WhereClause::Tuple)
        .or(dictionary_of(any()).map(WhereClause::Object))
}

pub type WhereMultiple = Vec<WhereClause>;

pub fn where_multiple() -> ArrayOf<Union<WhereClause>> {
    array(where_clause())
}

/// A single clause or a list of clauses
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    Clause(WhereClause),
    List(WhereMultiple),
}

impl ToValue for Criteria {
    fn to_value(&self) -> Value {
        match self {
            Criteria::Clause(clause) => clause.to_value(),
            Criteria::List(clauses) => clauses.to_value(),
        }
    }
}

/// `WhereClause | WhereMultiple`, the single clause tried first
pub fn criteria() -> Union<Criteria> {
    where_clause()
        .map(Criteria::Clause)
        .or(where_multiple().map(Criteria::List))
}

/// One normalized comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: QueryOperator,
    pub value: Value,
}

impl Condition {
    pub fn new(column: impl Into<String>, operator: QueryOperator, value: Value) -> Self {
        Self {
            column: column.into(),
            operator,
            value,
        }
    }
}

fn parse_operator(operator: &str) -> Result<QueryOperator, TrilogyError> {
    QueryOperator::parse(operator).ok_or_else(|| TrilogyError::UnknownOperator(operator.to_string()))
}

impl WhereClause {
    pub fn conditions(&self) -> Result<Vec<Condition>, TrilogyError> {
        match self {
            WhereClause::Tuple(WhereTuple::Pair(column, value)) => {
                Ok(vec![Condition::new(column.as_str(), QueryOperator::Eq, value.clone())])
            }
            WhereClause::Tuple(WhereTuple::Triple(column, operator, value)) => Ok(vec![
                Condition::new(column.as_str(), parse_operator(operator)?, value.clone()),
            ]),
            WhereClause::Object(entries) => Ok(entries
                .iter()
                .map(|(column, value)| {
                    Condition::new(column.as_str(), QueryOperator::Eq, value.clone())
                })
                .collect()),
        }
    }
}

impl Criteria {
    /// Flatten into conditions, in declaration order
    pub fn conditions(&self) -> Result<Vec<Condition>, TrilogyError> {
        match self {
            Criteria::Clause(clause) => clause.conditions(),
            Criteria::List(clauses) => {
                let mut conditions = Vec::new();
                for clause in clauses {
                    conditions.extend(clause.conditions()?);
                }
                Ok(conditions)
            }
        }
    }
}

fn cast_operand(
    schema: &Schema,
    column: &str,
    operator: QueryOperator,
    value: &Value,
) -> Result<Value, TrilogyError> {
    match value {
        Value::Array(items) if operator.takes_list() => Ok(Value::Array(
            items
                .iter()
                .map(|item| schema.cast_to_storage(column, item))
                .collect::<Result<_, _>>()?,
        )),
        _ => Ok(schema.cast_to_storage(column, value)?),
    }
}

fn cast_clause(clause: &WhereClause, schema: &Schema) -> Result<WhereClause, TrilogyError> {
    let cast = match clause {
        WhereClause::Tuple(WhereTuple::Pair(column, value)) => WhereClause::Tuple(
            WhereTuple::Pair(column.clone(), cast_operand(schema, column, QueryOperator::Eq, value)?),
        ),
        WhereClause::Tuple(WhereTuple::Triple(column, operator, value)) => {
            let parsed = parse_operator(operator)?;
            WhereClause::Tuple(WhereTuple::Triple(
                column.clone(),
                operator.clone(),
                cast_operand(schema, column, parsed, value)?,
            ))
        }
        WhereClause::Object(entries) => WhereClause::Object(
            entries
                .iter()
                .map(|(column, value)| {
                    Ok((
                        column.clone(),
                        cast_operand(schema, column, QueryOperator::Eq, value)?,
                    ))
                })
                .collect::<Result<_, TrilogyError>>()?,
        ),
    };
    Ok(cast)
}

/// Cast every criteria value to its column's storage form
///
/// Columns missing from the schema keep their values. `in`/`not in`
/// operands are cast element by element.
pub fn cast_criteria(criteria: &Criteria, schema: &Schema) -> Result<Criteria, TrilogyError> {
    let cast = match criteria {
        Criteria::Clause(clause) => Criteria::Clause(cast_clause(clause, schema)?),
        Criteria::List(clauses) => Criteria::List(
            clauses
                .iter()
                .map(|clause| cast_clause(clause, schema))
                .collect::<Result<_, _>>()?,
        ),
    };
    crate::trace_log!(criteria = %cast.to_value(), "cast criteria");
    Ok(cast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDescriptor;
    use serde_json::json;
    use type_mapping::ColumnType;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_pairs_triples_and_objects_are_accepted() {
        let validator = criteria();

        assert_eq!(
            validator.decode(Some(&v(json!(["name", "ada"])))).unwrap(),
            Criteria::Clause(WhereClause::Tuple(WhereTuple::Pair(
                "name".to_string(),
                Value::from("ada")
            )))
        );
        assert_eq!(
            validator.decode(Some(&v(json!(["age", ">", 30])))).unwrap(),
            Criteria::Clause(WhereClause::Tuple(WhereTuple::Triple(
                "age".to_string(),
                ">".to_string(),
                Value::Number(30.0)
            )))
        );
        assert!(matches!(
            validator.decode(Some(&v(json!({ "name": "ada", "age": null })))).unwrap(),
            Criteria::Clause(WhereClause::Object(_))
        ));
    }

    #[test]
    fn test_lists_of_clauses_are_accepted() {
        let decoded = criteria()
            .decode(Some(&v(json!([["name", "ada"], { "age": 36 }, ["id", "in", [1, 2]]]))))
            .unwrap();

        match decoded {
            Criteria::List(clauses) => assert_eq!(clauses.len(), 3),
            other => panic!("Expected a list, got {other:?}"),
        }
    }

    #[test]
    fn test_four_element_arrays_are_rejected() {
        let validator = criteria();
        assert!(!validator.is(&v(json!(["a", "=", 1, 2]))));
        assert!(!where_tuple().is(&v(json!(["a", "=", 1, 2]))));
        assert!(!where_clause().is(&v(json!(["a"]))));
        assert!(!validator.is(&v(json!("name"))));
        assert!(!validator.is(&v(json!([1, 2]))));
    }

    #[test]
    fn test_operator_parsing() {
        assert_eq!(QueryOperator::parse("="), Some(QueryOperator::Eq));
        assert_eq!(QueryOperator::parse("<>"), Some(QueryOperator::Ne));
        assert_eq!(QueryOperator::parse("LIKE"), Some(QueryOperator::Like));
        assert_eq!(QueryOperator::parse("Not   In"), Some(QueryOperator::NotIn));
        assert_eq!(QueryOperator::parse(" is not "), Some(QueryOperator::IsNot));
        assert_eq!(QueryOperator::parse("=="), None);
        assert_eq!(QueryOperator::NotLike.to_string(), "NOT LIKE");
    }

    #[test]
    fn test_conditions() {
        let decoded = criteria()
            .decode(Some(&v(json!([["name", "ada"], { "age": 36 }, ["id", "not in", [1, 2]]]))))
            .unwrap();

        assert_eq!(
            decoded.conditions().unwrap(),
            vec![
                Condition::new("name", QueryOperator::Eq, Value::from("ada")),
                Condition::new("age", QueryOperator::Eq, Value::Number(36.0)),
                Condition::new("id", QueryOperator::NotIn, v(json!([1, 2]))),
            ]
        );
    }

    #[test]
    fn test_unknown_operator() {
        let decoded = criteria().decode(Some(&v(json!(["age", "~", 1])))).unwrap();
        match decoded.conditions().unwrap_err() {
            TrilogyError::UnknownOperator(operator) => assert_eq!(operator, "~"),
            other => panic!("Expected UnknownOperator, got {other:?}"),
        }
    }

    #[test]
    fn test_cast_criteria() {
        let mut schema = Schema::default();
        schema.insert("active", ColumnDescriptor::of_kind(ColumnType::Boolean));
        schema.insert("tags", ColumnDescriptor::of_kind(ColumnType::Array));

        let decoded = criteria()
            .decode(Some(&v(json!([
                { "active": true, "other": true },
                ["active", "in", [true, false]],
                ["tags", ["a"]],
            ]))))
            .unwrap();
        let cast = cast_criteria(&decoded, &schema).unwrap();

        assert_eq!(
            cast.conditions().unwrap(),
            vec![
                Condition::new("active", QueryOperator::Eq, Value::Number(1.0)),
                Condition::new("other", QueryOperator::Eq, Value::Boolean(true)),
                Condition::new("active", QueryOperator::In, v(json!([1, 0]))),
                Condition::new("tags", QueryOperator::Eq, Value::from(r#"["a"]"#)),
            ]
        );
    }

    #[test]
    fn test_cast_criteria_reports_bad_values() {
        let mut schema = Schema::default();
        schema.insert("age", ColumnDescriptor::of_kind(ColumnType::Number));

        let decoded = criteria().decode(Some(&v(json!(["age", "old"])))).unwrap();
        assert!(matches!(
            cast_criteria(&decoded, &schema),
            Err(TrilogyError::Cast(_))
        ));
    }
}
