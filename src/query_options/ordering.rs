//! Sort ordering

use type_mapping::{ToValue, Value};
use validation::{string, tuple2, Union, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `desc` in any case is descending, anything else ascending
    pub fn from_direction(direction: &str) -> Self {
        if direction.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A column, or a `[column, direction]` pair
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    Column(String),
    Directed(String, String),
}

impl Order {
    pub fn column(&self) -> &str {
        match self {
            Order::Column(column) | Order::Directed(column, _) => column,
        }
    }

    /// Column and resolved direction
    pub fn sort(&self) -> (&str, SortOrder) {
        match self {
            Order::Column(column) => (column, SortOrder::Asc),
            Order::Directed(column, direction) => (column, SortOrder::from_direction(direction)),
        }
    }
}

impl ToValue for Order {
    fn to_value(&self) -> Value {
        match self {
            Order::Column(column) => column.to_value(),
            Order::Directed(column, direction) => (column.clone(), direction.clone()).to_value(),
        }
    }
}

/// `string | [string, string]`
pub fn group_order() -> Union<Order> {
    string()
        .map(Order::Column)
        .or(tuple2(string(), string()).map(|(column, direction)| Order::Directed(column, direction)))
}
