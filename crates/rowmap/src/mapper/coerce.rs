//! Coercion from a column's declared type to a property's type.
//!
//! The null policy and the overflow policy are decided here, once per
//! property per schema shape:
//!
//! | cell    | property        | result                                  |
//! |---------|-----------------|-----------------------------------------|
//! | null    | optional        | `SqlValue::Null`                        |
//! | null    | non-optional    | [`MapError::NonNullableColumnWasNull`]  |
//! | present | same type       | value unchanged                         |
//! | present | same category   | checked conversion, [`MapError::NumericOverflow`] on loss |
//!
//! Any other pairing is rejected up front with
//! [`MapError::UnsupportedConversion`].

use std::sync::Arc;

use crate::core::schema::{Binding, PropertyDescriptor};
use crate::core::value::{DeclaredType, SqlType, SqlValue, TypeCategory};
use crate::error::{MapError, Result};

/// Converts an extracted cell into the property's representation.
pub type Coercion = Arc<dyn Fn(Option<SqlValue>) -> Result<SqlValue> + Send + Sync>;

/// How a present value is brought to the property type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Identity,
    Integer,
    Float,
}

fn conversion(source: SqlType, target: SqlType) -> Option<Conversion> {
    if source == target {
        return Some(Conversion::Identity);
    }
    // Reference types only ever convert to themselves.
    if source.is_reference() || target.is_reference() {
        return None;
    }
    match (source.category(), target.category()) {
        (TypeCategory::Integer, TypeCategory::Integer) => Some(Conversion::Integer),
        (TypeCategory::Float, TypeCategory::Float) => Some(Conversion::Float),
        _ => None,
    }
}

/// Build the coercion for one bound property.
pub fn resolve(
    record: &'static str,
    property: &PropertyDescriptor,
    binding: &Binding,
) -> Result<Coercion> {
    let source: DeclaredType = binding.column_type;
    let target = property.sql_type;
    let conversion = conversion(source.sql_type, target)
        .ok_or_else(|| MapError::unsupported(record, property.name, source, target))?;

    let name = property.name;
    let nullable = property.nullable;
    let ordinal = binding.ordinal;

    Ok(Arc::new(move |cell: Option<SqlValue>| {
        let value = match cell {
            Some(value) => value,
            None if nullable => return Ok(SqlValue::Null),
            None => {
                return Err(MapError::NonNullableColumnWasNull {
                    record,
                    property: name.to_string(),
                    ordinal,
                })
            }
        };

        match conversion {
            Conversion::Identity => Ok(value),
            Conversion::Integer => convert_integer(value, target)
                .map_err(|value| MapError::overflow(record, name, value, target)),
            Conversion::Float => convert_float(value, target)
                .map_err(|value| MapError::overflow(record, name, value, target)),
        }
    }))
}

/// Checked integer conversion. The error carries the offending value.
fn convert_integer(value: SqlValue, target: SqlType) -> std::result::Result<SqlValue, SqlValue> {
    match value.as_i128() {
        Some(v) => SqlValue::integer(target, v).ok_or(value),
        None => Err(value),
    }
}

/// Float conversion. Narrowing traps on finite values beyond `f32` range;
/// infinities and NaN carry over.
fn convert_float(value: SqlValue, target: SqlType) -> std::result::Result<SqlValue, SqlValue> {
    match (value, target) {
        (SqlValue::F32(v), SqlType::F64) => Ok(SqlValue::F64(f64::from(v))),
        (SqlValue::F64(v), SqlType::F32) => {
            if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                Err(SqlValue::F64(v))
            } else {
                Ok(SqlValue::F32(v as f32))
            }
        }
        (value, _) => Err(value),
    }
}
