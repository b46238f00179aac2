//! Model options and definitions

use std::collections::BTreeMap;

use type_mapping::{ToValue, Value};
use validation::{
    array, boolean, dictionary_of, string, validate, ArrayOf, BooleanType, Context,
    PartialRecord, RecordEncoder, StringType, Union, Validation, Validator,
};

use crate::errors::TrilogyError;
use crate::identifiers::{ValidatedColumnName, ValidatedTableName};
use crate::schema::{normalize_schema, schema_raw, Schema};

/// One index: a single column or a composite of several
#[derive(Debug, Clone, PartialEq)]
pub enum IndexEntry {
    Column(String),
    Composite(Vec<String>),
}

impl IndexEntry {
    pub fn columns(&self) -> Vec<&str> {
        match self {
            IndexEntry::Column(column) => vec![column.as_str()],
            IndexEntry::Composite(columns) => columns.iter().map(String::as_str).collect(),
        }
    }
}

impl ToValue for IndexEntry {
    fn to_value(&self) -> Value {
        match self {
            IndexEntry::Column(column) => column.to_value(),
            IndexEntry::Composite(columns) => columns.to_value(),
        }
    }
}

/// Index specification of a model
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    /// `"column"`
    Single(String),
    /// `["a", ["b", "c"]]`
    List(Vec<IndexEntry>),
    /// `{ "by_name": ["first", "last"] }`
    Named(BTreeMap<String, IndexEntry>),
}

/// A resolved index, named when declared through the mapping form
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec<'a> {
    pub name: Option<&'a str>,
    pub columns: Vec<&'a str>,
}

impl Index {
    pub fn specs(&self) -> Vec<IndexSpec<'_>> {
        match self {
            Index::Single(column) => vec![IndexSpec {
                name: None,
                columns: vec![column.as_str()],
            }],
            Index::List(entries) => entries
                .iter()
                .map(|entry| IndexSpec {
                    name: None,
                    columns: entry.columns(),
                })
                .collect(),
            Index::Named(entries) => entries
                .iter()
                .map(|(name, entry)| IndexSpec {
                    name: Some(name.as_str()),
                    columns: entry.columns(),
                })
                .collect(),
        }
    }
}

impl ToValue for Index {
    fn to_value(&self) -> Value {
        match self {
            Index::Single(column) => column.to_value(),
            Index::List(entries) => entries.to_value(),
            Index::Named(entries) => entries.to_value(),
        }
    }
}

fn index_entry() -> Union<IndexEntry> {
    string()
        .map(IndexEntry::Column)
        .or(array(string()).map(IndexEntry::Composite))
}

/// `string | Array<string | string[]> | { [name]: string | string[] }`
pub fn index() -> Union<Index> {
    string()
        .map(Index::Single)
        .or(array(index_entry()).map(Index::List))
        .or(dictionary_of(index_entry()).map(Index::Named))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelOptions {
    pub index: Option<Index>,
    pub primary: Option<Vec<String>>,
    pub unique: Option<Vec<String>>,
    pub timestamps: Option<bool>,
}

impl ToValue for ModelOptions {
    fn to_value(&self) -> Value {
        let validator = model_options();
        RecordEncoder::new()
            .field("index", &validator.index, self.index.as_ref())
            .field("primary", &validator.columns, self.primary.as_ref())
            .field("unique", &validator.columns, self.unique.as_ref())
            .field("timestamps", &validator.timestamps, self.timestamps.as_ref())
            .finish()
    }
}

/// Validator for [`ModelOptions`]
pub struct ModelOptionsType {
    index: Union<Index>,
    columns: ArrayOf<StringType>,
    timestamps: BooleanType,
}

pub fn model_options() -> ModelOptionsType {
    ModelOptionsType {
        index: index(),
        columns: array(string()),
        timestamps: boolean(),
    }
}

impl Validator for ModelOptionsType {
    type Output = ModelOptions;

    fn name(&self) -> String {
        "ModelOptions".to_string()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<ModelOptions> {
        let mut record = PartialRecord::new(input, context)?;
        let options = ModelOptions {
            index: record.field("index", &self.index),
            primary: record.field("primary", &self.columns),
            unique: record.field("unique", &self.columns),
            timestamps: record.field("timestamps", &self.timestamps),
        };
        record.finish(options)
    }
}

/// A validated model: table name, normalized schema and options
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefinition {
    name: ValidatedTableName,
    schema: Schema,
    options: ModelOptions,
}

impl ModelDefinition {
    /// Validate and normalize a model declaration
    ///
    /// `options` may be absent or null, which means no options. Table and
    /// column names must be plain identifiers that are not SQLite keywords,
    /// so columns such as `order` or `group` are rejected.
    pub fn new(
        name: &str,
        schema: &Value,
        options: Option<&Value>,
    ) -> Result<Self, TrilogyError> {
        let name = ValidatedTableName::new(name)?;
        let raw = validate(Some(schema), &schema_raw(), None)?;
        let options = match options {
            None | Some(Value::Null) => ModelOptions::default(),
            Some(options) => validate(Some(options), &model_options(), None)?,
        };

        for column in raw.keys() {
            ValidatedColumnName::new(column)?;
        }

        let mut schema = normalize_schema(raw);
        if options.timestamps == Some(true) {
            schema = schema.with_timestamps();
        }

        let referenced = options
            .primary
            .iter()
            .chain(options.unique.iter())
            .flatten()
            .map(String::as_str)
            .chain(
                options
                    .index
                    .iter()
                    .flat_map(Index::specs)
                    .flat_map(|spec| spec.columns),
            );
        for column in referenced {
            if !schema.contains(column) {
                return Err(TrilogyError::UnknownColumn {
                    model: name.to_string(),
                    column: column.to_string(),
                });
            }
        }

        crate::debug_log!(
            model = %name,
            columns = schema.len(),
            timestamps = options.timestamps.unwrap_or(false),
            "defined model"
        );

        Ok(Self {
            name,
            schema,
            options,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Primary key columns: explicit `primary` option, else columns flagged primary
    pub fn primary_key(&self) -> Vec<&str> {
        match &self.options.primary {
            Some(columns) if !columns.is_empty() => columns.iter().map(String::as_str).collect(),
            _ => self.schema.primary_columns(),
        }
    }
}
