//! Aggregate call options

use type_mapping::{ToValue, Value};
use validation::{
    boolean, BooleanType, Context, PartialRecord, RecordEncoder, Union, Validation, Validator,
    ValidationFailure,
};

use super::ordering::{group_order, Order};
use super::parse_bag;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateOptions {
    pub distinct: Option<bool>,
    pub group: Option<Order>,
    pub order: Option<Order>,
}

impl AggregateOptions {
    pub fn parse(input: Option<&Value>) -> Result<Self, ValidationFailure> {
        parse_bag(input, &aggregate_options())
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct == Some(true)
    }
}

impl ToValue for AggregateOptions {
    fn to_value(&self) -> Value {
        let validator = aggregate_options();
        RecordEncoder::new()
            .field("distinct", &validator.distinct, self.distinct.as_ref())
            .field("group", &validator.order, self.group.as_ref())
            .field("order", &validator.order, self.order.as_ref())
            .finish()
    }
}

pub struct AggregateOptionsType {
    distinct: BooleanType,
    order: Union<Order>,
}

pub fn aggregate_options() -> AggregateOptionsType {
    AggregateOptionsType {
        distinct: boolean(),
        order: group_order(),
    }
}

impl Validator for AggregateOptionsType {
    type Output = AggregateOptions;

    fn name(&self) -> String {
        "AggregateOptions".to_string()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<AggregateOptions> {
        let mut record = PartialRecord::new(input, context)?;
        let options = AggregateOptions {
            distinct: record.field("distinct", &self.distinct),
            group: record.field("group", &self.order),
            order: record.field("order", &self.order),
        };
        record.finish(options)
    }
}
