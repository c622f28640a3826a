//! Dataset loading and validation.
//!
//! A dataset file describes a cursor: the columns it exposes and the rows
//! it yields. It drives the CLI and integration tests.
//!
//! ```yaml
//! columns:
//!   - { name: A, type: int32 }
//!   - { name: B, type: int32, nullable: true }
//! rows:
//!   - [1, 2]
//!   - [3, null]
//! ```

mod types;
mod validation;

pub use types::*;
pub use validation::parse_cell;

use crate::core::value::SqlValue;
use crate::error::{MapError, Result};
use crate::source::MemoryCursor;
use std::path::Path;

impl DatasetConfig {
    /// Load a dataset from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a dataset from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: DatasetConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the dataset.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self).map(|_| ())
    }

    /// Build a cursor over the dataset, parsing every cell against its
    /// column's declared type.
    pub fn to_cursor(&self) -> Result<MemoryCursor> {
        let types = validation::validate(self)?;

        let mut cursor = MemoryCursor::new();
        for (column, declared_type) in self.columns.iter().zip(&types) {
            cursor = cursor.column(column.name.clone(), *declared_type);
        }

        for (index, row) in self.rows.iter().enumerate() {
            let cells = row
                .iter()
                .zip(self.columns.iter().zip(&types))
                .map(|(cell, (column, declared_type))| {
                    parse_cell(cell, declared_type.sql_type).map_err(|e| {
                        MapError::Config(format!("rows[{}].{}: {}", index, column.name, e))
                    })
                })
                .collect::<Result<Vec<SqlValue>>>()?;
            cursor = cursor.row(cells);
        }

        Ok(cursor)
    }
}
