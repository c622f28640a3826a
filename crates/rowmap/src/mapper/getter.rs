//! Null-aware cell extractors, one per column type.

use std::sync::Arc;

use dashmap::DashMap;

use crate::core::traits::Cursor;
use crate::core::value::{SqlType, SqlValue};
use crate::error::{MapError, Result};

/// Reads one cell: `None` when the cell is null.
pub type Getter = Arc<dyn Fn(&dyn Cursor, usize) -> Result<Option<SqlValue>> + Send + Sync>;

type Read = fn(&dyn Cursor, usize) -> Result<SqlValue>;

/// Builds and memoizes a [`Getter`] per column type.
///
/// Shared by every record type a [`Mapper`](super::Mapper) compiles.
#[derive(Default)]
pub struct GetterFactory {
    getters: DashMap<SqlType, Getter>,
}

impl GetterFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor for columns declared as `sql_type`.
    pub fn getter(&self, sql_type: SqlType) -> Getter {
        if let Some(getter) = self.getters.get(&sql_type) {
            return getter.value().clone();
        }
        self.getters
            .entry(sql_type)
            .or_insert_with(|| build(sql_type))
            .value()
            .clone()
    }

    /// Number of column types with a cached extractor.
    pub fn len(&self) -> usize {
        self.getters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.getters.is_empty()
    }
}

/// Dedicated cursor primitive for `sql_type`, if the cursor has one.
fn dedicated(sql_type: SqlType) -> Option<Read> {
    let read: Read = match sql_type {
        SqlType::I64 => |c, o| c.get_i64(o).map(SqlValue::I64),
        SqlType::I32 => |c, o| c.get_i32(o).map(SqlValue::I32),
        SqlType::I16 => |c, o| c.get_i16(o).map(SqlValue::I16),
        SqlType::Char => |c, o| c.get_char(o).map(SqlValue::Char),
        SqlType::U8 => |c, o| c.get_u8(o).map(SqlValue::U8),
        SqlType::Bool => |c, o| c.get_bool(o).map(SqlValue::Bool),
        SqlType::DateTime => |c, o| c.get_datetime(o).map(SqlValue::DateTime),
        SqlType::Decimal => |c, o| c.get_decimal(o).map(SqlValue::Decimal),
        SqlType::F64 => |c, o| c.get_f64(o).map(SqlValue::F64),
        SqlType::F32 => |c, o| c.get_f32(o).map(SqlValue::F32),
        SqlType::Uuid => |c, o| c.get_uuid(o).map(SqlValue::Uuid),
        SqlType::I8
        | SqlType::U16
        | SqlType::U32
        | SqlType::U64
        | SqlType::Text
        | SqlType::Bytes => return None,
    };
    Some(read)
}

fn build(sql_type: SqlType) -> Getter {
    match dedicated(sql_type) {
        Some(read) => Arc::new(move |cursor: &dyn Cursor, ordinal: usize| {
            if cursor.is_null(ordinal)? {
                return Ok(None);
            }
            read(cursor, ordinal).map(Some)
        }),
        // Untyped retrieval plus a checked downcast.
        None => Arc::new(move |cursor: &dyn Cursor, ordinal: usize| {
            if cursor.is_null(ordinal)? {
                return Ok(None);
            }
            let value = cursor.get_value(ordinal)?;
            if value.sql_type() == Some(sql_type) {
                Ok(Some(value))
            } else {
                Err(MapError::invalid_cast(ordinal, sql_type, value))
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::DeclaredType;
    use crate::source::MemoryCursor;

    fn cursor(ty: SqlType, cells: Vec<SqlValue>) -> MemoryCursor {
        let mut cursor = MemoryCursor::new().column("A", DeclaredType::optional(ty));
        for cell in cells {
            cursor = cursor.row(vec![cell]);
        }
        cursor
    }

    #[test]
    fn test_dedicated_getter_reads_value_and_null() {
        let factory = GetterFactory::new();
        let getter = factory.getter(SqlType::I32);
        let mut c = cursor(SqlType::I32, vec![SqlValue::I32(7), SqlValue::Null]);

        assert!(c.advance().unwrap());
        assert_eq!(getter(&c, 0).unwrap(), Some(SqlValue::I32(7)));
        assert!(c.advance().unwrap());
        assert_eq!(getter(&c, 0).unwrap(), None);
    }

    #[test]
    fn test_fallback_getter_checks_the_cell_type() {
        let factory = GetterFactory::new();
        let getter = factory.getter(SqlType::U32);
        let mut c = cursor(SqlType::U32, vec![SqlValue::U32(1), SqlValue::I32(1)]);

        c.advance().unwrap();
        assert_eq!(getter(&c, 0).unwrap(), Some(SqlValue::U32(1)));
        c.advance().unwrap();
        assert!(matches!(
            getter(&c, 0),
            Err(MapError::InvalidCast {
                expected: SqlType::U32,
                ..
            })
        ));
    }

    #[test]
    fn test_getters_are_cached_per_type() {
        let factory = GetterFactory::new();
        let a = factory.getter(SqlType::Text);
        let b = factory.getter(SqlType::Text);
        assert!(Arc::ptr_eq(&a, &b));
        factory.getter(SqlType::I64);
        assert_eq!(factory.len(), 2);
    }

    #[test]
    fn test_every_type_has_a_getter() {
        let factory = GetterFactory::new();
        for ty in SqlType::ALL {
            factory.getter(ty);
        }
        assert_eq!(factory.len(), SqlType::ALL.len());
    }
}
