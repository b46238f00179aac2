//! Column kinds and descriptors
//!
//! A column kind is either a type name or a constructor-like function whose
//! name matches one of the supported column types, ignoring case.

use type_mapping::{Callable, ColumnType, ToValue, Value};
use validation::{
    any, boolean, function, string, AnyType, BooleanType, Context, FunctionType, PartialRecord,
    RecordEncoder, Refinement, StringType, Union, Validation, Validator,
};

/// Declared storage type of a column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Name(String),
    Constructor(Callable),
}

impl ColumnKind {
    /// The string itself, or the constructor's name
    pub fn type_name(&self) -> &str {
        match self {
            ColumnKind::Name(name) => name,
            ColumnKind::Constructor(constructor) => constructor.name(),
        }
    }

    /// Matching column type, `None` when the name is not supported
    pub fn column_type(&self) -> Option<ColumnType> {
        ColumnType::from_name(self.type_name())
    }
}

impl From<ColumnType> for ColumnKind {
    fn from(column_type: ColumnType) -> Self {
        ColumnKind::Name(column_type.as_str().to_string())
    }
}

impl ToValue for ColumnKind {
    fn to_value(&self) -> Value {
        match self {
            ColumnKind::Name(name) => Value::Text(name.clone()),
            ColumnKind::Constructor(constructor) => Value::Function(constructor.clone()),
        }
    }
}

fn is_supported_kind(kind: &ColumnKind) -> bool {
    kind.column_type().is_some()
}

pub type ColumnKindType = Refinement<Union<ColumnKind>, fn(&ColumnKind) -> bool>;

/// `string | Function`, refined to the supported column types
pub fn column_kind() -> ColumnKindType {
    string()
        .map(ColumnKind::Name)
        .or(function().map(ColumnKind::Constructor))
        .refine("ColumnKind", is_supported_kind as fn(&ColumnKind) -> bool)
}

/// Column definition as declared on a model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnDescriptor {
    pub default_to: Option<Value>,
    pub index: Option<String>,
    pub not_nullable: Option<bool>,
    pub nullable: Option<bool>,
    pub primary: Option<bool>,
    pub unique: Option<bool>,
    pub kind: Option<ColumnKind>,
    pub get: Option<Callable>,
    pub set: Option<Callable>,
}

impl ColumnDescriptor {
    /// Descriptor declaring only the column's kind
    pub fn of_kind(kind: impl Into<ColumnKind>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    pub fn column_type(&self) -> Option<ColumnType> {
        self.kind.as_ref().and_then(ColumnKind::column_type)
    }

    pub fn is_primary(&self) -> bool {
        self.primary == Some(true)
            || self
                .column_type()
                .is_some_and(|column_type| column_type.is_auto_increment())
    }

    pub fn is_unique(&self) -> bool {
        self.unique == Some(true)
    }

    /// Columns are nullable unless marked `notNullable` or `nullable: false`
    pub fn is_nullable(&self) -> bool {
        self.not_nullable != Some(true) && self.nullable != Some(false)
    }

    /// Run the getter on a value read from the database
    pub fn apply_get(&self, value: Value) -> Value {
        match &self.get {
            Some(get) => get.call(value),
            None => value,
        }
    }

    /// Run the setter on a value about to be written
    pub fn apply_set(&self, value: Value) -> Value {
        match &self.set {
            Some(set) => set.call(value),
            None => value,
        }
    }
}

impl ToValue for ColumnDescriptor {
    fn to_value(&self) -> Value {
        let validator = column_descriptor();
        RecordEncoder::new()
            .field("defaultTo", &validator.default_to, self.default_to.as_ref())
            .field("index", &validator.index, self.index.as_ref())
            .field("notNullable", &validator.flag, self.not_nullable.as_ref())
            .field("nullable", &validator.flag, self.nullable.as_ref())
            .field("primary", &validator.flag, self.primary.as_ref())
            .field("unique", &validator.flag, self.unique.as_ref())
            .field("type", &validator.kind, self.kind.as_ref())
            .field("get", &validator.transform, self.get.as_ref())
            .field("set", &validator.transform, self.set.as_ref())
            .finish()
    }
}

/// Validator for [`ColumnDescriptor`]
pub struct ColumnDescriptorType {
    default_to: AnyType,
    index: StringType,
    flag: BooleanType,
    kind: ColumnKindType,
    transform: FunctionType,
}

pub fn column_descriptor() -> ColumnDescriptorType {
    ColumnDescriptorType {
        default_to: any(),
        index: string(),
        flag: boolean(),
        kind: column_kind(),
        transform: function(),
    }
}

impl Validator for ColumnDescriptorType {
    type Output = ColumnDescriptor;

    fn name(&self) -> String {
        "ColumnDescriptor".to_string()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<ColumnDescriptor> {
        let mut record = PartialRecord::new(input, context)?;
        let descriptor = ColumnDescriptor {
            default_to: record.field("defaultTo", &self.default_to),
            index: record.field("index", &self.index),
            not_nullable: record.field("notNullable", &self.flag),
            nullable: record.field("nullable", &self.flag),
            primary: record.field("primary", &self.flag),
            unique: record.field("unique", &self.flag),
            kind: record.field("type", &self.kind),
            get: record.field("get", &self.transform),
            set: record.field("set", &self.transform),
        };
        record.finish(descriptor)
    }
}
