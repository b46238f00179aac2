//! # Connection configuration for Trilogy
//!
//! This crate provides the connection options validator and loading of those
//! options from a TOML file.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{Client, TrilogyOptions};
//! use type_mapping::Value;
//!
//! let options = TrilogyOptions::new(&Value::record()).unwrap();
//! assert_eq!(options.client, Client::Sqlite3);
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! client = "sqlite3"
//! dir = "/var/lib/myapp"
//!
//! [connection]
//! filename = "app.db"
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::TrilogyOptions;
//!
//! // Load from TRILOGY_CONFIG or ./trilogy.toml
//! let options = TrilogyOptions::load()?;
//!
//! // Or load from custom path
//! let options = TrilogyOptions::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

pub mod options;

pub use options::{
    client, connection_options, trilogy_options, Client, ConnectionOptions,
    ConnectionOptionsType, TrilogyOptions, TrilogyOptionsType, MEMORY_FILENAME,
};

use std::{env, path::Path};
use thiserror::Error;
use type_mapping::Value;
use validation::ValidationFailure;

const DEFAULT_CONFIG_PATH: &str = "./trilogy.toml";
const CONFIG_PATH_VAR: &str = "TRILOGY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid options:\n{0}")]
    Validation(#[from] ValidationFailure),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl TrilogyOptions {
    /// Load options from the TOML file named in .env or the environment, or the default path
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in .env file as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load options from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        #[cfg(feature = "debug-logging")]
        tracing::debug!(path = %path.as_ref().display(), "loading trilogy options");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse options from TOML text
    ///
    /// `verbose` cannot be expressed in TOML and always takes its default.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content)?;
        let value = toml_to_value(toml::Value::Table(table));
        Ok(Self::new(&value)?)
    }
}

/// Convert a TOML value into a runtime [`Value`]
pub fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Text(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::Number(f),
        toml::Value::Boolean(b) => Value::Boolean(b),
        toml::Value::Datetime(dt) => {
            let text = dt.to_string();
            chrono::DateTime::parse_from_rfc3339(&text)
                .map(|parsed| Value::Date(parsed.with_timezone(&chrono::Utc)))
                .unwrap_or(Value::Text(text))
        }
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::Record(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_value(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_from_toml_str() {
        let options = TrilogyOptions::from_toml_str(
            r#"
            client = "sql.js"
            dir = "/tmp/trilogy"

            [connection]
            filename = "store.db"
            "#,
        )
        .unwrap();

        assert_eq!(options.client, Client::SqlJs);
        assert_eq!(options.dir, "/tmp/trilogy");
        assert_eq!(
            options.database_path(),
            Some(PathBuf::from("/tmp/trilogy/store.db"))
        );
        assert_eq!(options.verbose.name(), "identity");
    }

    #[test]
    fn test_empty_toml_is_defaulted() {
        let options = TrilogyOptions::from_toml_str("").unwrap();
        assert_eq!(options.client, Client::Sqlite3);
        assert_eq!(options.connection, ConnectionOptions::default());
    }

    #[test]
    fn test_invalid_toml_values_fail_validation() {
        let err = TrilogyOptions::from_toml_str("client = \"postgres\"").unwrap_err();
        match err {
            ConfigError::Validation(failure) => assert!(failure.mentions("client")),
            other => panic!("Expected validation error, got {other:?}"),
        }

        let err = TrilogyOptions::from_toml_str("[connection]\nfilename = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_malformed_toml_fails_parsing() {
        let err = TrilogyOptions::from_toml_str("client = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[connection]\nfilename = \":memory:\"").unwrap();

        let options = TrilogyOptions::from_file(file.path()).unwrap();
        assert_eq!(options.connection.filename.as_deref(), Some(MEMORY_FILENAME));
        assert_eq!(options.database_path(), None);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TrilogyOptions::from_file("/nonexistent/trilogy.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_toml_to_value() {
        let table: toml::Table = toml::from_str("n = 1\nf = 1.5\nlist = [\"a\"]").unwrap();
        let value = toml_to_value(toml::Value::Table(table));

        assert_eq!(value.get("n"), Some(&Value::Number(1.0)));
        assert_eq!(value.get("f"), Some(&Value::Number(1.5)));
        assert_eq!(
            value.get("list"),
            Some(&Value::Array(vec![Value::from("a")]))
        );
    }
}
