//! Create, find and update call options

use type_mapping::{ToValue, Value};
use validation::{
    boolean, number, BooleanType, Context, NumberType, PartialRecord, RecordEncoder, Union,
    Validation, Validator, ValidationFailure,
};

use super::ordering::{group_order, Order};
use super::pagination::Pagination;
use super::parse_bag;

/// Options bag holding only the `raw` flag
macro_rules! raw_options {
    ($(#[$meta:meta])* $options:ident, $validator:ident, $constructor:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $options {
            pub raw: Option<bool>,
        }

        impl $options {
            pub fn parse(input: Option<&Value>) -> Result<Self, ValidationFailure> {
                parse_bag(input, &$constructor())
            }

            pub fn is_raw(&self) -> bool {
                self.raw == Some(true)
            }
        }

        impl ToValue for $options {
            fn to_value(&self) -> Value {
                RecordEncoder::new()
                    .field("raw", &boolean(), self.raw.as_ref())
                    .finish()
            }
        }

        pub struct $validator {
            raw: BooleanType,
        }

        pub fn $constructor() -> $validator {
            $validator { raw: boolean() }
        }

        impl Validator for $validator {
            type Output = $options;

            fn name(&self) -> String {
                $name.to_string()
            }

            fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<$options> {
                let mut record = PartialRecord::new(input, context)?;
                let options = $options {
                    raw: record.field("raw", &self.raw),
                };
                record.finish(options)
            }
        }
    };
}

raw_options!(
    /// Options for `create`
    CreateOptions,
    CreateOptionsType,
    create_options,
    "CreateOptions"
);

raw_options!(
    /// Options for `update`
    UpdateOptions,
    UpdateOptionsType,
    update_options,
    "UpdateOptions"
);

/// Options for `find` and `findOne`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FindOptions {
    pub limit: Option<f64>,
    pub order: Option<Order>,
    pub random: Option<bool>,
    pub raw: Option<bool>,
    pub skip: Option<f64>,
}

impl FindOptions {
    pub fn parse(input: Option<&Value>) -> Result<Self, ValidationFailure> {
        parse_bag(input, &find_options())
    }

    pub fn is_random(&self) -> bool {
        self.random == Some(true)
    }

    pub fn is_raw(&self) -> bool {
        self.raw == Some(true)
    }

    /// `limit` and `skip` as whole, non-negative counts
    pub fn pagination(&self) -> Pagination {
        Pagination::from_numbers(self.limit, self.skip)
    }
}

impl ToValue for FindOptions {
    fn to_value(&self) -> Value {
        let validator = find_options();
        RecordEncoder::new()
            .field("limit", &validator.count, self.limit.as_ref())
            .field("order", &validator.order, self.order.as_ref())
            .field("random", &validator.flag, self.random.as_ref())
            .field("raw", &validator.flag, self.raw.as_ref())
            .field("skip", &validator.count, self.skip.as_ref())
            .finish()
    }
}

pub struct FindOptionsType {
    count: NumberType,
    order: Union<Order>,
    flag: BooleanType,
}

pub fn find_options() -> FindOptionsType {
    FindOptionsType {
        count: number(),
        order: group_order(),
        flag: boolean(),
    }
}

impl Validator for FindOptionsType {
    type Output = FindOptions;

    fn name(&self) -> String {
        "FindOptions".to_string()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<FindOptions> {
        let mut record = PartialRecord::new(input, context)?;
        let options = FindOptions {
            limit: record.field("limit", &self.count),
            order: record.field("order", &self.order),
            random: record.field("random", &self.flag),
            raw: record.field("raw", &self.flag),
            skip: record.field("skip", &self.count),
        };
        record.finish(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_raw_options() {
        assert!(CreateOptions::parse(Some(&v(json!({ "raw": true })))).unwrap().is_raw());
        assert!(!UpdateOptions::parse(None).unwrap().is_raw());
        assert_eq!(
            UpdateOptions::parse(Some(&v(json!({ "raw": false, "extra": 1 })))).unwrap(),
            UpdateOptions { raw: Some(false) }
        );

        let failure = CreateOptions::parse(Some(&v(json!({ "raw": "yes" })))).unwrap_err();
        assert!(failure.mentions("raw"));
        assert!(failure.to_string().contains("CreateOptions/raw: boolean"));
    }

    #[test]
    fn test_find_options() {
        let options = FindOptions::parse(Some(&v(json!({
            "limit": 10,
            "skip": 20.9,
            "order": ["name", "asc"],
            "random": false,
        }))))
        .unwrap();

        assert_eq!(options.limit, Some(10.0));
        assert!(!options.is_random());
        assert!(!options.is_raw());
        assert_eq!(
            options.pagination(),
            Pagination::new().with_limit(10).with_offset(20)
        );
        assert_eq!(FindOptions::parse(Some(&options.to_value())).unwrap(), options);
    }

    #[test]
    fn test_find_options_reject_bad_fields() {
        let failure =
            FindOptions::parse(Some(&v(json!({ "limit": "ten", "order": 3 })))).unwrap_err();
        assert!(failure.mentions("limit"));
        assert!(failure.mentions("order"));
    }

    #[test]
    fn test_non_record_options_fail() {
        assert!(FindOptions::parse(Some(&v(json!([1])))).is_err());
        assert!(CreateOptions::parse(Some(&v(json!("raw")))).is_err());
    }
}
