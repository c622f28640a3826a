//! Scalar types and cell values shared by cursors and records.
//!
//! [`SqlType`] is the closed set of column and property types the mapper
//! understands. [`DeclaredType`] adds the nullability a cursor reports for a
//! column, and [`SqlValue`] is an owned cell value.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scalar type of a column or a record property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Text,
    Bytes,
    Uuid,
    DateTime,
}

/// Conversion category of a [`SqlType`].
///
/// Coercions are only ever built between two types of the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Character,
    Text,
    Binary,
    Uuid,
    Timestamp,
}

impl SqlType {
    /// All supported types, in declaration order.
    pub const ALL: [SqlType; 17] = [
        SqlType::Bool,
        SqlType::Char,
        SqlType::I8,
        SqlType::I16,
        SqlType::I32,
        SqlType::I64,
        SqlType::U8,
        SqlType::U16,
        SqlType::U32,
        SqlType::U64,
        SqlType::F32,
        SqlType::F64,
        SqlType::Decimal,
        SqlType::Text,
        SqlType::Bytes,
        SqlType::Uuid,
        SqlType::DateTime,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            SqlType::Bool => "bool",
            SqlType::Char => "char",
            SqlType::I8 => "int8",
            SqlType::I16 => "int16",
            SqlType::I32 => "int32",
            SqlType::I64 => "int64",
            SqlType::U8 => "uint8",
            SqlType::U16 => "uint16",
            SqlType::U32 => "uint32",
            SqlType::U64 => "uint64",
            SqlType::F32 => "float32",
            SqlType::F64 => "float64",
            SqlType::Decimal => "decimal",
            SqlType::Text => "text",
            SqlType::Bytes => "bytes",
            SqlType::Uuid => "uuid",
            SqlType::DateTime => "timestamp",
        }
    }

    pub fn category(self) -> TypeCategory {
        match self {
            SqlType::I8
            | SqlType::I16
            | SqlType::I32
            | SqlType::I64
            | SqlType::U8
            | SqlType::U16
            | SqlType::U32
            | SqlType::U64 => TypeCategory::Integer,
            SqlType::F32 | SqlType::F64 => TypeCategory::Float,
            SqlType::Decimal => TypeCategory::Decimal,
            SqlType::Bool => TypeCategory::Boolean,
            SqlType::Char => TypeCategory::Character,
            SqlType::Text => TypeCategory::Text,
            SqlType::Bytes => TypeCategory::Binary,
            SqlType::Uuid => TypeCategory::Uuid,
            SqlType::DateTime => TypeCategory::Timestamp,
        }
    }

    /// Reference types hold heap data and only support identity conversion.
    pub fn is_reference(self) -> bool {
        matches!(self, SqlType::Text | SqlType::Bytes)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SqlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim().to_lowercase().as_str() {
            "bool" | "boolean" | "bit" => SqlType::Bool,
            "char" => SqlType::Char,
            "int8" | "i8" | "sbyte" => SqlType::I8,
            "int16" | "i16" | "smallint" | "short" => SqlType::I16,
            "int32" | "i32" | "int" | "integer" => SqlType::I32,
            "int64" | "i64" | "bigint" | "long" => SqlType::I64,
            "uint8" | "u8" | "byte" | "tinyint" => SqlType::U8,
            "uint16" | "u16" | "ushort" => SqlType::U16,
            "uint32" | "u32" | "uint" => SqlType::U32,
            "uint64" | "u64" | "ulong" => SqlType::U64,
            "float32" | "f32" | "float" | "real" => SqlType::F32,
            "float64" | "f64" | "double" => SqlType::F64,
            "decimal" | "numeric" => SqlType::Decimal,
            "text" | "string" | "varchar" => SqlType::Text,
            "bytes" | "binary" | "varbinary" => SqlType::Bytes,
            "uuid" | "guid" | "uniqueidentifier" => SqlType::Uuid,
            "timestamp" | "datetime" => SqlType::DateTime,
            other => return Err(format!("unknown type '{}'", other)),
        };
        Ok(ty)
    }
}

/// Type reported by a cursor for one column before any row is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    pub sql_type: SqlType,
    pub nullable: bool,
}

impl DeclaredType {
    pub const fn required(sql_type: SqlType) -> Self {
        Self {
            sql_type,
            nullable: false,
        }
    }

    pub const fn optional(sql_type: SqlType) -> Self {
        Self {
            sql_type,
            nullable: true,
        }
    }
}

impl From<SqlType> for DeclaredType {
    fn from(sql_type: SqlType) -> Self {
        DeclaredType::required(sql_type)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.sql_type)
        } else {
            write!(f, "{}", self.sql_type)
        }
    }
}

/// Owned cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Absent value (null marker).
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    DateTime(NaiveDateTime),
}

impl SqlValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Type of the held value, `None` for NULL.
    #[must_use]
    pub fn sql_type(&self) -> Option<SqlType> {
        let ty = match self {
            SqlValue::Null => return None,
            SqlValue::Bool(_) => SqlType::Bool,
            SqlValue::Char(_) => SqlType::Char,
            SqlValue::I8(_) => SqlType::I8,
            SqlValue::I16(_) => SqlType::I16,
            SqlValue::I32(_) => SqlType::I32,
            SqlValue::I64(_) => SqlType::I64,
            SqlValue::U8(_) => SqlType::U8,
            SqlValue::U16(_) => SqlType::U16,
            SqlValue::U32(_) => SqlType::U32,
            SqlValue::U64(_) => SqlType::U64,
            SqlValue::F32(_) => SqlType::F32,
            SqlValue::F64(_) => SqlType::F64,
            SqlValue::Decimal(_) => SqlType::Decimal,
            SqlValue::Text(_) => SqlType::Text,
            SqlValue::Bytes(_) => SqlType::Bytes,
            SqlValue::Uuid(_) => SqlType::Uuid,
            SqlValue::DateTime(_) => SqlType::DateTime,
        };
        Some(ty)
    }

    /// Widen any integer value to `i128`, which holds every supported width.
    pub(crate) fn as_i128(&self) -> Option<i128> {
        match *self {
            SqlValue::I8(v) => Some(i128::from(v)),
            SqlValue::I16(v) => Some(i128::from(v)),
            SqlValue::I32(v) => Some(i128::from(v)),
            SqlValue::I64(v) => Some(i128::from(v)),
            SqlValue::U8(v) => Some(i128::from(v)),
            SqlValue::U16(v) => Some(i128::from(v)),
            SqlValue::U32(v) => Some(i128::from(v)),
            SqlValue::U64(v) => Some(i128::from(v)),
            _ => None,
        }
    }

    /// Narrow an integer into `target`, `None` when it does not fit.
    pub(crate) fn integer(target: SqlType, v: i128) -> Option<SqlValue> {
        match target {
            SqlType::I8 => i8::try_from(v).ok().map(SqlValue::I8),
            SqlType::I16 => i16::try_from(v).ok().map(SqlValue::I16),
            SqlType::I32 => i32::try_from(v).ok().map(SqlValue::I32),
            SqlType::I64 => i64::try_from(v).ok().map(SqlValue::I64),
            SqlType::U8 => u8::try_from(v).ok().map(SqlValue::U8),
            SqlType::U16 => u16::try_from(v).ok().map(SqlValue::U16),
            SqlType::U32 => u32::try_from(v).ok().map(SqlValue::U32),
            SqlType::U64 => u64::try_from(v).ok().map(SqlValue::U64),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(v) => write!(f, "{}", v),
            SqlValue::Char(v) => write!(f, "{}", v),
            SqlValue::I8(v) => write!(f, "{}", v),
            SqlValue::I16(v) => write!(f, "{}", v),
            SqlValue::I32(v) => write!(f, "{}", v),
            SqlValue::I64(v) => write!(f, "{}", v),
            SqlValue::U8(v) => write!(f, "{}", v),
            SqlValue::U16(v) => write!(f, "{}", v),
            SqlValue::U32(v) => write!(f, "{}", v),
            SqlValue::U64(v) => write!(f, "{}", v),
            SqlValue::F32(v) => write!(f, "{}", v),
            SqlValue::F64(v) => write!(f, "{}", v),
            SqlValue::Decimal(v) => write!(f, "{}", v),
            SqlValue::Text(v) => write!(f, "{:?}", v),
            SqlValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            SqlValue::Uuid(v) => write!(f, "{}", v),
            SqlValue::DateTime(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for SqlValue {
                fn from(v: $t) -> Self {
                    SqlValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value! {
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

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}
