//! Column, property, and binding metadata.
//!
//! These types describe the two sides of a mapping (the columns a cursor
//! exposes and the properties a record accepts) and the resolved pairing
//! between them that identifies a compiled materializer.

use std::any::TypeId;
use std::fmt;

use sha2::{Digest, Sha256};

use super::value::{DeclaredType, SqlType};

/// One column as reported by a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Zero-based position in the row.
    pub ordinal: usize,

    /// Column name used for property matching.
    pub name: String,

    /// Declared type reported before rows are read.
    pub declared_type: DeclaredType,
}

/// One property of a registered record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Name matched against column names (exact, case-sensitive).
    pub name: &'static str,

    /// Scalar type the property stores.
    pub sql_type: SqlType,

    /// Whether the property accepts an absent value (`Option<_>` fields).
    pub nullable: bool,

    /// Read-only properties are skipped when binding.
    pub writable: bool,
}

/// A writable property resolved to a column of one cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Index into the record's property list.
    pub property: usize,

    pub property_name: &'static str,

    /// Column ordinal the property reads from.
    pub ordinal: usize,

    /// Declared type of that column.
    pub column_type: DeclaredType,
}

/// Cache identity of a (record type, resolved bindings) pair.
///
/// Two signatures are equal when they name the same record type and list the
/// same `(ordinal, declared type)` pairs in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaSignature {
    record: TypeId,
    record_name: &'static str,
    columns: Vec<(usize, DeclaredType)>,
}

impl SchemaSignature {
    pub fn new<T: 'static>(record_name: &'static str, bindings: &[Binding]) -> Self {
        Self {
            record: TypeId::of::<T>(),
            record_name,
            columns: bindings
                .iter()
                .map(|b| (b.ordinal, b.column_type))
                .collect(),
        }
    }

    pub fn record_name(&self) -> &'static str {
        self.record_name
    }

    pub fn columns(&self) -> &[(usize, DeclaredType)] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Stable hex digest of the signature, for logs and diagnostics.
    ///
    /// `TypeId` is not stable across builds, so the digest covers the record
    /// name and column shape only.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.record_name.as_bytes());
        for (ordinal, ty) in &self.columns {
            hasher.update(format!("|{}:{}", ordinal, ty).as_bytes());
        }
        let digest = format!("{:x}", hasher.finalize());
        digest[..16].to_string()
    }
}

impl fmt::Display for SchemaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.record_name)?;
        for (i, (ordinal, ty)) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "#{}:{}", ordinal, ty)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct First;
    struct Second;

    fn binding(ordinal: usize, ty: DeclaredType) -> Binding {
        Binding {
            property: 0,
            property_name: "A",
            ordinal,
            column_type: ty,
        }
    }

    #[test]
    fn test_signature_equality() {
        let int = DeclaredType::required(SqlType::I32);
        let a = SchemaSignature::new::<First>("First", &[binding(0, int)]);
        let b = SchemaSignature::new::<First>("First", &[binding(0, int)]);
        assert_eq!(a, b);

        // Different ordinal, declared type, or record type all differ.
        assert_ne!(a, SchemaSignature::new::<First>("First", &[binding(1, int)]));
        assert_ne!(
            a,
            SchemaSignature::new::<First>(
                "First",
                &[binding(0, DeclaredType::optional(SqlType::I32))]
            )
        );
        assert_ne!(a, SchemaSignature::new::<Second>("First", &[binding(0, int)]));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let int = DeclaredType::required(SqlType::I32);
        let a = SchemaSignature::new::<First>("First", &[binding(0, int)]);
        let b = SchemaSignature::new::<First>("First", &[binding(0, int)]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);
        assert_eq!(a.to_string(), "First(#0:int32)");
    }
}
