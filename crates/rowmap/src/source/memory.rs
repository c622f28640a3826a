//! In-memory cursor over owned rows.

use crate::core::traits::Cursor;
use crate::core::value::{DeclaredType, SqlValue};
use crate::error::{MapError, Result};

/// A [`Cursor`] over rows held in memory.
///
/// Useful for tests and for datasets loaded from configuration files. Column
/// metadata is fixed at construction; rows are read once, front to back.
///
/// ```rust
/// use rowmap::{Cursor, DeclaredType, MemoryCursor, SqlType, SqlValue};
///
/// let mut cursor = MemoryCursor::new()
///     .column("A", DeclaredType::required(SqlType::I32))
///     .row(vec![SqlValue::I32(1)]);
///
/// assert!(cursor.advance().unwrap());
/// assert_eq!(cursor.get_i32(0).unwrap(), 1);
/// assert!(!cursor.advance().unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    columns: Vec<(String, DeclaredType)>,
    rows: Vec<Vec<SqlValue>>,
    /// Index of the current row; `None` before the first advance.
    position: Option<usize>,
}

impl MemoryCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column.
    pub fn column(mut self, name: impl Into<String>, declared_type: DeclaredType) -> Self {
        self.columns.push((name.into(), declared_type));
        self
    }

    /// Add a row. Cells are matched to columns by position.
    pub fn row(mut self, cells: Vec<SqlValue>) -> Self {
        self.rows.push(cells);
        self
    }

    /// Add several rows.
    pub fn rows(mut self, rows: impl IntoIterator<Item = Vec<SqlValue>>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Total number of rows, read or not.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn cell(&self, ordinal: usize) -> Result<&SqlValue> {
        let row = self
            .position
            .and_then(|p| self.rows.get(p))
            .ok_or_else(|| MapError::Cursor("no current row".to_string()))?;
        row.get(ordinal).ok_or_else(|| {
            MapError::Cursor(format!(
                "ordinal {} out of range for a row of {} cells",
                ordinal,
                row.len()
            ))
        })
    }
}

impl Cursor for MemoryCursor {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, ordinal: usize) -> &str {
        &self.columns[ordinal].0
    }

    fn column_type(&self, ordinal: usize) -> DeclaredType {
        self.columns[ordinal].1
    }

    fn advance(&mut self) -> Result<bool> {
        let next = self.position.map_or(0, |p| p + 1);
        if next >= self.rows.len() {
            // Stay past the end so further reads fail.
            self.position = Some(self.rows.len());
            return Ok(false);
        }
        self.position = Some(next);
        Ok(true)
    }

    fn is_null(&self, ordinal: usize) -> Result<bool> {
        Ok(self.cell(ordinal)?.is_null())
    }

    fn get_value(&self, ordinal: usize) -> Result<SqlValue> {
        self.cell(ordinal).cloned()
    }
}
