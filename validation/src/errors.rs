//! Validation errors
//!
//! A failed decode yields one [`ValidationError`] per mismatch, each carrying
//! the path to the offending value. [`ValidationFailure`] is what callers
//! propagate.

use std::fmt;

use type_mapping::Value;

/// One step of the path from the root input to a nested value
#[derive(Debug, Clone, PartialEq)]
pub struct ContextEntry {
    pub key: String,
    pub type_name: String,
}

/// Path from the root input to the value being validated
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context {
    entries: Vec<ContextEntry>,
}

impl Context {
    /// Context for a top-level decode with the validator's name
    pub fn root(type_name: impl Into<String>) -> Self {
        Self {
            entries: vec![ContextEntry {
                key: String::new(),
                type_name: type_name.into(),
            }],
        }
    }

    /// Extend the path with a nested key
    pub fn append(&self, key: impl Into<String>, type_name: impl Into<String>) -> Self {
        let mut entries = self.entries.clone();
        entries.push(ContextEntry {
            key: key.into(),
            type_name: type_name.into(),
        });
        Self { entries }
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    /// Non-empty keys along the path, outermost first
    pub fn keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.key.as_str())
            .filter(|key| !key.is_empty())
            .collect()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}: {}", entry.key, entry.type_name)?;
        }
        Ok(())
    }
}

/// A single structural mismatch
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Offending value, `None` when the value was absent
    pub value: Option<Value>,
    pub context: Context,
    pub message: Option<String>,
}

impl ValidationError {
    pub fn new(value: Option<&Value>, context: &Context) -> Self {
        Self {
            value: value.cloned(),
            context: context.clone(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether `key` appears anywhere on this error's path
    pub fn is_at(&self, key: &str) -> bool {
        self.context.keys().contains(&key)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            return write!(f, "{}", message);
        }
        match &self.value {
            Some(value) => write!(f, "Invalid value {} supplied to {}", value, self.context),
            None => write!(f, "Invalid value undefined supplied to {}", self.context),
        }
    }
}

pub type Validation<T> = Result<T, Vec<ValidationError>>;

/// Single error failure with a value and the context it was found in
pub fn failure<T>(value: Option<&Value>, context: &Context) -> Validation<T> {
    Err(vec![ValidationError::new(value, context)])
}

/// Fatal result of a failed decode, carrying every mismatch found
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    errors: Vec<ValidationError>,
}

impl ValidationFailure {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Whether any of the errors points at `key`
    pub fn mentions(&self, key: &str) -> bool {
        self.errors.iter().any(|error| error.is_at(key))
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "Validation failed");
        }
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}
