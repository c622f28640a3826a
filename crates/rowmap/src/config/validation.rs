//! Dataset validation and cell parsing.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_yaml::Value;
use uuid::Uuid;

use super::DatasetConfig;
use crate::core::value::{DeclaredType, SqlType, SqlValue};
use crate::error::{MapError, Result};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Validate the dataset and resolve its declared column types.
pub fn validate(config: &DatasetConfig) -> Result<Vec<DeclaredType>> {
    let mut types = Vec::with_capacity(config.columns.len());
    for (ordinal, column) in config.columns.iter().enumerate() {
        if column.name.is_empty() {
            return Err(MapError::Config(format!(
                "columns[{}].name is required",
                ordinal
            )));
        }
        let sql_type = SqlType::from_str(&column.r#type).map_err(|e| {
            MapError::Config(format!("columns[{}] ({}): {}", ordinal, column.name, e))
        })?;
        types.push(DeclaredType {
            sql_type,
            nullable: column.nullable,
        });
    }

    for (index, row) in config.rows.iter().enumerate() {
        if row.len() != config.columns.len() {
            return Err(MapError::Config(format!(
                "rows[{}] has {} cells but {} columns are declared",
                index,
                row.len(),
                config.columns.len()
            )));
        }
    }

    Ok(types)
}

/// Parse one YAML cell as a value of `sql_type`.
///
/// YAML `null` is accepted in every column: cursors may report nulls in
/// columns declared non-nullable, and the mapper must handle them.
pub fn parse_cell(value: &Value, sql_type: SqlType) -> std::result::Result<SqlValue, String> {
    if value.is_null() {
        return Ok(SqlValue::Null);
    }

    let mismatch = || format!("expected {} value, got {:?}", sql_type, value);

    match sql_type {
        SqlType::Bool => value.as_bool().map(SqlValue::Bool).ok_or_else(mismatch),
        SqlType::Char => {
            let s = value.as_str().ok_or_else(mismatch)?;
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(SqlValue::Char(c)),
                _ => Err(format!("expected a single character, got {:?}", s)),
            }
        }
        SqlType::I8
        | SqlType::I16
        | SqlType::I32
        | SqlType::I64
        | SqlType::U8
        | SqlType::U16
        | SqlType::U32
        | SqlType::U64 => {
            let n = value
                .as_i64()
                .map(i128::from)
                .or_else(|| value.as_u64().map(i128::from))
                .ok_or_else(mismatch)?;
            SqlValue::integer(sql_type, n)
                .ok_or_else(|| format!("{} is out of range for {}", n, sql_type))
        }
        SqlType::F32 => {
            let v = value.as_f64().ok_or_else(mismatch)?;
            if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                return Err(format!("{} is out of range for {}", v, sql_type));
            }
            Ok(SqlValue::F32(v as f32))
        }
        SqlType::F64 => value.as_f64().map(SqlValue::F64).ok_or_else(mismatch),
        SqlType::Decimal => parse_decimal(value).ok_or_else(mismatch),
        SqlType::Text => value
            .as_str()
            .map(|s| SqlValue::Text(s.to_string()))
            .ok_or_else(mismatch),
        SqlType::Bytes => {
            let seq = value.as_sequence().ok_or_else(mismatch)?;
            seq.iter()
                .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(SqlValue::Bytes)
                .ok_or_else(|| "bytes must be a list of integers in 0..=255".to_string())
        }
        SqlType::Uuid => {
            let s = value.as_str().ok_or_else(mismatch)?;
            Uuid::parse_str(s)
                .map(SqlValue::Uuid)
                .map_err(|e| format!("invalid uuid {:?}: {}", s, e))
        }
        SqlType::DateTime => {
            let s = value.as_str().ok_or_else(mismatch)?;
            parse_datetime(s)
                .map(SqlValue::DateTime)
                .ok_or_else(|| format!("invalid timestamp {:?}", s))
        }
    }
}

fn parse_decimal(value: &Value) -> Option<SqlValue> {
    let decimal = match value {
        Value::String(s) => Decimal::from_str(s).ok()?,
        Value::Number(n) => match n.as_i64() {
            Some(i) => Decimal::from(i),
            None => Decimal::try_from(n.as_f64()?).ok()?,
        },
        _ => return None,
    };
    Some(SqlValue::Decimal(decimal))
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
