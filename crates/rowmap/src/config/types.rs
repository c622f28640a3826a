//! Dataset file definitions.

use serde::{Deserialize, Serialize};

/// Root of a dataset file: column metadata plus the rows a cursor yields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Columns in ordinal order.
    pub columns: Vec<ColumnConfig>,

    /// Rows of cells, matched to columns by position.
    #[serde(default)]
    pub rows: Vec<Vec<serde_yaml::Value>>,
}

/// One column of a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Column name matched against record properties.
    pub name: String,

    /// Declared type name (e.g. "int32", "text", "timestamp").
    pub r#type: String,

    /// Whether the column is declared nullable (default: false).
    #[serde(default)]
    pub nullable: bool,
}
