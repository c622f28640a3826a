//! Core abstractions shared by cursors, records, and the mapper.
//!
//! - [`value`]: scalar types, declared column types, and cell values
//! - [`schema`]: column, property, and binding metadata
//! - [`traits`]: the [`Cursor`] seam and the [`FieldType`] mapping
//! - [`record`]: compile-time registration of destination types
//!
//! # Design Patterns
//!
//! - **Template Method**: `Cursor` typed getters default to untyped retrieval
//! - **Registry**: `Record::properties` replaces runtime reflection

pub mod record;
pub mod schema;
pub mod traits;
pub mod value;

pub use record::{Property, Record};
pub use schema::{Binding, ColumnDescriptor, PropertyDescriptor, SchemaSignature};
pub use traits::{Cursor, FieldType};
pub use value::{DeclaredType, SqlType, SqlValue, TypeCategory};
