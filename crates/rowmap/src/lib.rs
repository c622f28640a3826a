//! # rowmap
//!
//! Materialize cursor rows into typed records.
//!
//! For a record type and the column layout of a cursor, rowmap compiles a
//! per-shape materializer once and reuses it for every later cursor with
//! the same layout:
//!
//! - **Schema probing** binds record properties to columns by name
//! - **Typed getters** read each column with its declared type
//! - **Checked coercion** for numeric widening and narrowing
//! - **Shared cache** keyed by record type and column layout
//! - **Lazy enumeration** pulling one row per step
//!
//! ## Example
//!
//! ```rust
//! use rowmap::{record, DeclaredType, Mapper, MemoryCursor, SqlType, SqlValue};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Dto {
//!     a: i32,
//!     b: Option<i64>,
//! }
//!
//! record! { Dto { a: i32 => "A", b: Option<i64> => "B" } }
//!
//! let cursor = MemoryCursor::new()
//!     .column("A", DeclaredType::required(SqlType::I32))
//!     .column("B", DeclaredType::optional(SqlType::I32))
//!     .row(vec![SqlValue::I32(1), SqlValue::Null])
//!     .row(vec![SqlValue::I32(2), SqlValue::I32(3)]);
//!
//! let rows: Vec<Dto> = Mapper::new().read_all(cursor)?;
//! assert_eq!(rows, vec![Dto { a: 1, b: None }, Dto { a: 2, b: Some(3) }]);
//! # Ok::<(), rowmap::MapError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod mapper;
pub mod source;

// Re-exports for convenient access
pub use crate::config::{ColumnConfig, DatasetConfig};
pub use crate::core::{
    Binding, ColumnDescriptor, Cursor, DeclaredType, FieldType, Property, PropertyDescriptor,
    Record, SchemaSignature, SqlType, SqlValue, TypeCategory,
};
pub use crate::error::{MapError, Result};
pub use crate::mapper::{CacheStats, CompiledMaterializer, Mapper, MapperCache, Probe, Rows};
pub use crate::source::MemoryCursor;
