//! Connection options
//!
//! `TrilogyOptions` is a partial record whose every field has a default,
//! so decoding `{}` yields a complete set of options.

use std::env;
use std::path::{Path, PathBuf};

use type_mapping::{Callable, ToValue, Value};
use validation::{
    function, literal, string, validate, with_default, with_default_fn, Context, FunctionType,
    PartialRecord, RecordEncoder, StringType, Union, Validation, ValidationFailure, Validator,
    WithDefault,
};

/// In-memory SQLite database name
pub const MEMORY_FILENAME: &str = ":memory:";

/// Database engine backing a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Client {
    #[default]
    Sqlite3,
    SqlJs,
}

impl Client {
    pub fn as_str(&self) -> &'static str {
        match self {
            Client::Sqlite3 => "sqlite3",
            Client::SqlJs => "sql.js",
        }
    }
}

impl ToValue for Client {
    fn to_value(&self) -> Value {
        Value::from(self.as_str())
    }
}

/// `"sqlite3" | "sql.js"`
pub fn client() -> Union<Client> {
    literal("sqlite3")
        .map(|_| Client::Sqlite3)
        .or(literal("sql.js").map(|_| Client::SqlJs))
}

/// Nested connection settings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionOptions {
    pub filename: Option<String>,
}

impl ToValue for ConnectionOptions {
    fn to_value(&self) -> Value {
        RecordEncoder::new()
            .field("filename", &string(), self.filename.as_ref())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionOptionsType;

pub fn connection_options() -> ConnectionOptionsType {
    ConnectionOptionsType
}

impl Validator for ConnectionOptionsType {
    type Output = ConnectionOptions;

    fn name(&self) -> String {
        "ConnectionOptions".to_string()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<ConnectionOptions> {
        let mut record = PartialRecord::new(input, context)?;
        let filename = record.field("filename", &string());
        record.finish(ConnectionOptions { filename })
    }
}

/// Fully defaulted connection options
#[derive(Debug, Clone, PartialEq)]
pub struct TrilogyOptions {
    pub client: Client,
    pub connection: ConnectionOptions,
    pub dir: String,
    pub verbose: Callable,
}

fn current_dir() -> String {
    env::current_dir()
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_else(|_| ".".to_string())
}

impl Default for TrilogyOptions {
    fn default() -> Self {
        Self {
            client: Client::default(),
            connection: ConnectionOptions::default(),
            dir: current_dir(),
            verbose: Callable::identity(),
        }
    }
}

impl TrilogyOptions {
    /// Decode options from a user-supplied value
    pub fn new(input: &Value) -> Result<Self, ValidationFailure> {
        validate(Some(input), &trilogy_options(), None)
    }

    /// Absolute path of the database file, `None` for in-memory databases
    pub fn database_path(&self) -> Option<PathBuf> {
        match self.connection.filename.as_deref() {
            None | Some(MEMORY_FILENAME) => None,
            Some(filename) => Some(Path::new(&self.dir).join(filename)),
        }
    }

    /// Pass a query through the verbose callback
    pub fn log(&self, query: &str) {
        #[cfg(feature = "debug-logging")]
        tracing::debug!(client = self.client.as_str(), query, "executing query");
        self.verbose.call(Value::from(query));
    }
}

impl ToValue for TrilogyOptions {
    fn to_value(&self) -> Value {
        let validator = trilogy_options();
        RecordEncoder::new()
            .field("client", &validator.client, Some(&self.client))
            .field("connection", &validator.connection, Some(&self.connection))
            .field("dir", &validator.dir, Some(&self.dir))
            .field("verbose", &validator.verbose, Some(&self.verbose))
            .finish()
    }
}

/// Validator for [`TrilogyOptions`]
///
/// The `dir` default is the process directory at construction time.
pub struct TrilogyOptionsType {
    client: WithDefault<Union<Client>>,
    connection: WithDefault<ConnectionOptionsType>,
    dir: WithDefault<StringType>,
    verbose: WithDefault<FunctionType>,
}

pub fn trilogy_options() -> TrilogyOptionsType {
    TrilogyOptionsType {
        client: with_default(client(), Client::Sqlite3),
        connection: with_default(connection_options(), ConnectionOptions::default()),
        dir: with_default_fn(string(), current_dir),
        verbose: with_default(function(), Callable::identity()),
    }
}

impl Validator for TrilogyOptionsType {
    type Output = TrilogyOptions;

    fn name(&self) -> String {
        "TrilogyOptions".to_string()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<TrilogyOptions> {
        let mut record = PartialRecord::new(input, context)?;
        let client = record.field("client", &self.client);
        let connection = record.field("connection", &self.connection);
        let dir = record.field("dir", &self.dir);
        let verbose = record.field("verbose", &self.verbose);
        record.finish_with(|| {
            Some(TrilogyOptions {
                client: client?,
                connection: connection?,
                dir: dir?,
                verbose: verbose?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn record(entries: Vec<(&str, Value)>) -> Value {
        Value::record_from(entries)
    }

    #[test]
    fn test_empty_input_is_fully_defaulted() {
        let options = TrilogyOptions::new(&Value::record()).unwrap();

        assert_eq!(options.client, Client::Sqlite3);
        assert_eq!(options.connection, ConnectionOptions::default());
        assert_eq!(options.dir, current_dir());
        assert_eq!(options.verbose.name(), "identity");
        assert_eq!(options.verbose.call(Value::from("q")), Value::from("q"));
    }

    #[test]
    fn test_null_fields_take_defaults() {
        let input = record(vec![("client", Value::Null), ("connection", Value::Null)]);
        let options = TrilogyOptions::new(&input).unwrap();

        assert_eq!(options.client, Client::Sqlite3);
        assert_eq!(options.connection.filename, None);
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let input = record(vec![
            ("client", Value::from("sql.js")),
            (
                "connection",
                record(vec![("filename", Value::from("app.db"))]),
            ),
            ("dir", Value::from("/srv/data")),
        ]);
        let options = TrilogyOptions::new(&input).unwrap();

        assert_eq!(options.client, Client::SqlJs);
        assert_eq!(options.connection.filename.as_deref(), Some("app.db"));
        assert_eq!(options.dir, "/srv/data");
        assert_eq!(
            options.database_path(),
            Some(PathBuf::from("/srv/data/app.db"))
        );
    }

    #[test]
    fn test_unknown_client_is_rejected() {
        let input = record(vec![("client", Value::from("pg"))]);
        let failure = TrilogyOptions::new(&input).unwrap_err();

        assert!(failure.mentions("client"));
        assert!(failure.errors()[0]
            .to_string()
            .contains("Invalid value \"pg\" supplied to : TrilogyOptions/client"));
    }

    #[test]
    fn test_non_function_verbose_is_rejected() {
        let input = record(vec![("verbose", Value::from(true))]);
        let failure = TrilogyOptions::new(&input).unwrap_err();
        assert!(failure.mentions("verbose"));
    }

    #[test]
    fn test_non_record_input_is_rejected() {
        assert!(TrilogyOptions::new(&Value::from("sqlite3")).is_err());
    }

    #[test]
    fn test_memory_database_has_no_path() {
        let mut options = TrilogyOptions::default();
        assert_eq!(options.database_path(), None);

        options.connection.filename = Some(MEMORY_FILENAME.to_string());
        assert_eq!(options.database_path(), None);
    }

    #[test]
    fn test_log_calls_verbose() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let verbose = Callable::new("collect", move |value| {
            sink.lock().unwrap().push(value.clone());
            value
        });
        let input = record(vec![("verbose", Value::Function(verbose))]);

        let options = TrilogyOptions::new(&input).unwrap();
        options.log("select * from users");

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Value::from("select * from users")]
        );
    }

    #[test]
    fn test_encode_round_trips() {
        let options = TrilogyOptions::default();
        let decoded = TrilogyOptions::new(&options.to_value()).unwrap();
        assert_eq!(decoded, options);
    }
}
