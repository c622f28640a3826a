//! Core traits at the seams of the mapper.
//!
//! - [`Cursor`]: forward-only row source the mapper reads from
//! - [`FieldType`]: Rust field types a record property can store
//!
//! # Design Patterns
//!
//! - **Template Method**: the typed getters of [`Cursor`] default to the
//!   untyped [`Cursor::get_value`] plus a checked downcast, so a cursor only
//!   overrides the primitives it can serve natively.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{MapError, Result};

use super::schema::ColumnDescriptor;
use super::value::{DeclaredType, SqlType, SqlValue};

macro_rules! typed_getter {
    ($(#[$doc:meta])* $name:ident -> $t:ty, $variant:ident) => {
        $(#[$doc])*
        fn $name(&self, ordinal: usize) -> Result<$t> {
            match self.get_value(ordinal)? {
                SqlValue::$variant(v) => Ok(v),
                other => Err(MapError::invalid_cast(ordinal, SqlType::$variant, other)),
            }
        }
    };
}

/// Forward-only, single-pass source of rows.
///
/// Column metadata is available before the first [`advance`](Cursor::advance);
/// cell access is only valid after `advance` returned `true`. Ordinals passed
/// to the metadata accessors must be below [`column_count`](Cursor::column_count).
pub trait Cursor {
    /// Number of columns in every row.
    fn column_count(&self) -> usize;

    /// Name of the column at `ordinal`.
    fn column_name(&self, ordinal: usize) -> &str;

    /// Declared type of the column at `ordinal`.
    fn column_type(&self, ordinal: usize) -> DeclaredType;

    /// Move to the next row. Returns `false` once the cursor is exhausted.
    fn advance(&mut self) -> Result<bool>;

    /// Whether the cell at `ordinal` in the current row is absent.
    fn is_null(&self, ordinal: usize) -> Result<bool>;

    /// Untyped retrieval of the cell at `ordinal` in the current row.
    fn get_value(&self, ordinal: usize) -> Result<SqlValue>;

    typed_getter!(get_i64 -> i64, I64);
    typed_getter!(get_i32 -> i32, I32);
    typed_getter!(get_i16 -> i16, I16);
    typed_getter!(get_char -> char, Char);
    typed_getter!(
        /// Single byte retrieval (`uint8` columns).
        get_u8 -> u8, U8
    );
    typed_getter!(get_bool -> bool, Bool);
    typed_getter!(get_datetime -> NaiveDateTime, DateTime);
    typed_getter!(get_decimal -> Decimal, Decimal);
    typed_getter!(get_f64 -> f64, F64);
    typed_getter!(get_f32 -> f32, F32);
    typed_getter!(get_uuid -> Uuid, Uuid);

    /// Snapshot of every column the cursor exposes.
    fn columns(&self) -> Vec<ColumnDescriptor> {
        (0..self.column_count())
            .map(|ordinal| ColumnDescriptor {
                ordinal,
                name: self.column_name(ordinal).to_string(),
                declared_type: self.column_type(ordinal),
            })
            .collect()
    }
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    fn column_count(&self) -> usize {
        (**self).column_count()
    }

    fn column_name(&self, ordinal: usize) -> &str {
        (**self).column_name(ordinal)
    }

    fn column_type(&self, ordinal: usize) -> DeclaredType {
        (**self).column_type(ordinal)
    }

    fn advance(&mut self) -> Result<bool> {
        (**self).advance()
    }

    fn is_null(&self, ordinal: usize) -> Result<bool> {
        (**self).is_null(ordinal)
    }

    fn get_value(&self, ordinal: usize) -> Result<SqlValue> {
        (**self).get_value(ordinal)
    }

    fn get_i64(&self, ordinal: usize) -> Result<i64> {
        (**self).get_i64(ordinal)
    }

    fn get_i32(&self, ordinal: usize) -> Result<i32> {
        (**self).get_i32(ordinal)
    }

    fn get_i16(&self, ordinal: usize) -> Result<i16> {
        (**self).get_i16(ordinal)
    }

    fn get_char(&self, ordinal: usize) -> Result<char> {
        (**self).get_char(ordinal)
    }

    fn get_u8(&self, ordinal: usize) -> Result<u8> {
        (**self).get_u8(ordinal)
    }

    fn get_bool(&self, ordinal: usize) -> Result<bool> {
        (**self).get_bool(ordinal)
    }

    fn get_datetime(&self, ordinal: usize) -> Result<NaiveDateTime> {
        (**self).get_datetime(ordinal)
    }

    fn get_decimal(&self, ordinal: usize) -> Result<Decimal> {
        (**self).get_decimal(ordinal)
    }

    fn get_f64(&self, ordinal: usize) -> Result<f64> {
        (**self).get_f64(ordinal)
    }

    fn get_f32(&self, ordinal: usize) -> Result<f32> {
        (**self).get_f32(ordinal)
    }

    fn get_uuid(&self, ordinal: usize) -> Result<Uuid> {
        (**self).get_uuid(ordinal)
    }
}

/// A Rust type a record property can be declared with.
///
/// `SQL_TYPE` and `NULLABLE` feed the property descriptor; [`from_sql`]
/// unpacks a value that coercion already brought to `SQL_TYPE` (or `Null`
/// for nullable types).
///
/// [`from_sql`]: FieldType::from_sql
pub trait FieldType: Sized + 'static {
    const SQL_TYPE: SqlType;
    const NULLABLE: bool;

    fn from_sql(value: SqlValue) -> Option<Self>;
}

macro_rules! impl_field_type {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldType for $t {
                const SQL_TYPE: SqlType = SqlType::$variant;
                const NULLABLE: bool = false;

                fn from_sql(value: SqlValue) -> Option<Self> {
                    match value {
                        SqlValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }

            impl FieldType for Option<$t> {
                const SQL_TYPE: SqlType = SqlType::$variant;
                const NULLABLE: bool = true;

                fn from_sql(value: SqlValue) -> Option<Self> {
                    match value {
                        SqlValue::Null => Some(None),
                        SqlValue::$variant(v) => Some(Some(v)),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_field_type! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    String => Text,
    Vec<u8> => Bytes,
    Uuid => Uuid,
    NaiveDateTime => DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-row cursor holding one cell.
    struct OneCell(SqlValue);

    impl Cursor for OneCell {
        fn column_count(&self) -> usize {
            1
        }

        fn column_name(&self, _ordinal: usize) -> &str {
            "A"
        }

        fn column_type(&self, _ordinal: usize) -> DeclaredType {
            DeclaredType::optional(self.0.sql_type().unwrap_or(SqlType::I32))
        }

        fn advance(&mut self) -> Result<bool> {
            Ok(false)
        }

        fn is_null(&self, _ordinal: usize) -> Result<bool> {
            Ok(self.0.is_null())
        }

        fn get_value(&self, _ordinal: usize) -> Result<SqlValue> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_default_getters_downcast() {
        let cursor = OneCell(SqlValue::I32(5));
        assert_eq!(cursor.get_i32(0).unwrap(), 5);
        assert!(matches!(
            cursor.get_i64(0),
            Err(MapError::InvalidCast {
                expected: SqlType::I64,
                ..
            })
        ));
    }

    #[test]
    fn test_columns_snapshot() {
        let cursor = OneCell(SqlValue::Bool(true));
        let cols = cursor.columns();
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].name, "A");
        assert_eq!(cols[0].declared_type, DeclaredType::optional(SqlType::Bool));
    }

    #[test]
    fn test_field_type_unpacking() {
        assert_eq!(i16::from_sql(SqlValue::I16(3)), Some(3));
        assert_eq!(i16::from_sql(SqlValue::Null), None);
        assert_eq!(<Option<i16>>::from_sql(SqlValue::Null), Some(None));
        assert_eq!(
            <Option<String>>::from_sql(SqlValue::Text("x".into())),
            Some(Some("x".to_string()))
        );
        assert!(<Option<u32> as FieldType>::NULLABLE);
        assert_eq!(<Vec<u8> as FieldType>::SQL_TYPE, SqlType::Bytes);
    }
}
