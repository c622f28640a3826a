//! Error types for the row mapper.

use thiserror::Error;

use crate::core::value::{DeclaredType, SqlType};

/// Main error type for mapping operations.
#[derive(Error, Debug)]
pub enum MapError {
    /// A writable property has no column with the same name.
    #[error("No column found for property {record}.{property}")]
    SchemaMismatch {
        record: &'static str,
        property: String,
    },

    /// A writable property matches more than one column by name.
    #[error("Property {record}.{property} matches several columns (ordinals {ordinals:?})")]
    AmbiguousColumn {
        record: &'static str,
        property: String,
        ordinals: Vec<usize>,
    },

    /// No coercion exists between the column type and the property type.
    #[error("Can't convert column type {source_type} to {target} (property {record}.{property})")]
    UnsupportedConversion {
        record: &'static str,
        property: String,
        source_type: DeclaredType,
        target: SqlType,
    },

    /// A null cell was routed to a non-optional property.
    #[error("Trying to set null to non-nullable property {record}.{property} (column {ordinal})")]
    NonNullableColumnWasNull {
        record: &'static str,
        property: String,
        ordinal: usize,
    },

    /// A checked numeric conversion could not represent the value.
    #[error("Value {value} does not fit in {target} (property {record}.{property})")]
    NumericOverflow {
        record: &'static str,
        property: String,
        value: String,
        target: SqlType,
    },

    /// A cell does not hold a value of its column's declared type.
    #[error("Column {ordinal} declared as {expected} holds {found}")]
    InvalidCast {
        ordinal: usize,
        expected: SqlType,
        found: String,
    },

    /// Cursor collaborator failure.
    #[error("Cursor error: {0}")]
    Cursor(String),

    /// Configuration error (invalid dataset file, bad cell values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Cached materializer has an unexpected type.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MapError {
    /// Create a SchemaMismatch error.
    pub fn schema_mismatch(record: &'static str, property: impl Into<String>) -> Self {
        MapError::SchemaMismatch {
            record,
            property: property.into(),
        }
    }

    /// Create an UnsupportedConversion error.
    pub fn unsupported(
        record: &'static str,
        property: impl Into<String>,
        source_type: DeclaredType,
        target: SqlType,
    ) -> Self {
        MapError::UnsupportedConversion {
            record,
            property: property.into(),
            source_type,
            target,
        }
    }

    /// Create a NumericOverflow error.
    pub fn overflow(
        record: &'static str,
        property: impl Into<String>,
        value: impl ToString,
        target: SqlType,
    ) -> Self {
        MapError::NumericOverflow {
            record,
            property: property.into(),
            value: value.to_string(),
            target,
        }
    }

    /// Create an InvalidCast error from the value actually found.
    pub fn invalid_cast(ordinal: usize, expected: SqlType, found: impl std::fmt::Debug) -> Self {
        MapError::InvalidCast {
            ordinal,
            expected,
            found: format!("{:?}", found),
        }
    }

    /// Whether the error was raised while building a materializer.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            MapError::SchemaMismatch { .. }
                | MapError::AmbiguousColumn { .. }
                | MapError::UnsupportedConversion { .. }
        )
    }

    /// Whether the error was raised while materializing a single row.
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            MapError::NonNullableColumnWasNull { .. }
                | MapError::NumericOverflow { .. }
                | MapError::InvalidCast { .. }
        )
    }

    /// Process exit status for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            MapError::Config(_) | MapError::Yaml(_) | MapError::Json(_) => 1,
            e if e.is_compile_error() => 2,
            e if e.is_row_error() => 3,
            MapError::Cursor(_) => 4,
            MapError::Io(_) => 7,
            _ => 10,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, MapError>;
