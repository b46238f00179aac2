//! Identifier validation
//!
//! Table and column names end up quoted into SQLite statements, so model
//! definitions check them up front.

use std::fmt;
use thiserror::Error;

/// Validation errors for database identifiers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IdentifierError {
    /// Name is empty
    #[error("Name cannot be empty")]
    Empty,
    /// Name starts with invalid character (must start with letter or underscore)
    #[error("Name '{0}' must start with a letter or underscore")]
    InvalidStartCharacter(String),
    /// Name contains invalid characters (only alphanumeric and underscore allowed)
    #[error("Invalid characters in name '{0}': only alphanumeric characters and underscores are allowed")]
    InvalidCharacters(String),
    /// Name is a reserved SQLite keyword
    #[error("Name '{0}' is a reserved SQL keyword")]
    ReservedKeyword(String),
    /// Name uses the `sqlite_` prefix reserved for internal tables
    #[error("Name '{0}' uses the reserved 'sqlite_' prefix")]
    ReservedPrefix(String),
}

fn validate_identifier(name: &str) -> Result<(), IdentifierError> {
    let first_char = name.chars().next().ok_or(IdentifierError::Empty)?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(IdentifierError::InvalidStartCharacter(name.to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(IdentifierError::InvalidCharacters(name.to_string()));
    }

    if name.to_ascii_lowercase().starts_with("sqlite_") {
        return Err(IdentifierError::ReservedPrefix(name.to_string()));
    }

    if is_reserved_keyword(name) {
        return Err(IdentifierError::ReservedKeyword(name.to_string()));
    }

    Ok(())
}

fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "ABORT", "ADD", "AFTER", "ALL", "ALTER", "ANALYZE", "AND", "AS", "ASC", "ATTACH",
        "AUTOINCREMENT", "BEFORE", "BEGIN", "BETWEEN", "BY", "CASCADE", "CASE", "CAST", "CHECK",
        "COLLATE", "COLUMN", "COMMIT", "CONFLICT", "CONSTRAINT", "CREATE", "CROSS",
        "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "DATABASE", "DEFAULT", "DEFERRABLE",
        "DEFERRED", "DELETE", "DESC", "DETACH", "DISTINCT", "DROP", "EACH", "ELSE", "END",
        "ESCAPE", "EXCEPT", "EXCLUSIVE", "EXISTS", "EXPLAIN", "FAIL", "FOR", "FOREIGN", "FROM",
        "FULL", "GLOB", "GROUP", "HAVING", "IF", "IGNORE", "IMMEDIATE", "IN", "INDEX", "INDEXED",
        "INITIALLY", "INNER", "INSERT", "INSTEAD", "INTERSECT", "INTO", "IS", "ISNULL", "JOIN",
        "LEFT", "LIKE", "LIMIT", "MATCH", "NATURAL", "NO", "NOT", "NOTNULL", "NULL", "OF",
        "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRAGMA", "PRIMARY", "RAISE",
        "RECURSIVE", "REFERENCES", "REGEXP", "REINDEX", "RELEASE", "RENAME", "REPLACE",
        "RESTRICT", "RIGHT", "ROLLBACK", "SAVEPOINT", "SELECT", "SET", "TABLE", "TEMP",
        "TEMPORARY", "THEN", "TO", "TRANSACTION", "TRIGGER", "UNION", "UNIQUE", "UPDATE", "USING",
        "VACUUM", "VALUES", "VIEW", "VIRTUAL", "WHEN", "WHERE", "WITH", "WITHOUT",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

/// A validated table name that is safe to use in SQL queries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedTableName(String);

impl ValidatedTableName {
    pub fn new(name: &str) -> Result<Self, IdentifierError> {
        validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated column name that is safe to use in SQL queries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedColumnName(String);

impl ValidatedColumnName {
    pub fn new(name: &str) -> Result<Self, IdentifierError> {
        validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatedColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        let valid_names = ["users", "user_profiles", "UserProfiles", "_private", "t1", "a"];

        for name in valid_names {
            assert!(
                ValidatedTableName::new(name).is_ok(),
                "Should accept valid name: {}",
                name
            );
        }
    }

    #[test]
    fn test_invalid_names() {
        let test_cases = [
            ("", IdentifierError::Empty),
            (
                "1table",
                IdentifierError::InvalidStartCharacter("1table".to_string()),
            ),
            (
                "user-name",
                IdentifierError::InvalidCharacters("user-name".to_string()),
            ),
            (
                "user name",
                IdentifierError::InvalidCharacters("user name".to_string()),
            ),
            ("select", IdentifierError::ReservedKeyword("select".to_string())),
            ("WHERE", IdentifierError::ReservedKeyword("WHERE".to_string())),
            (
                "sqlite_master",
                IdentifierError::ReservedPrefix("sqlite_master".to_string()),
            ),
        ];

        for (name, expected_error) in test_cases {
            assert_eq!(ValidatedTableName::new(name).unwrap_err(), expected_error);
        }
    }

    #[test]
    fn test_column_names_share_rules() {
        assert!(ValidatedColumnName::new("created_at").is_ok());
        assert!(ValidatedColumnName::new("order").is_err());
        assert!(ValidatedColumnName::new("9lives").is_err());
    }

    #[test]
    fn test_display() {
        let table = ValidatedTableName::new("people").unwrap();
        assert_eq!(table.to_string(), "people");
        assert_eq!(table.into_string(), "people");
    }
}
