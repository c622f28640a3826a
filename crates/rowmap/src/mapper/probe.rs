//! Schema probing: pair each writable property with a column.

use std::collections::HashMap;

use crate::core::record::Record;
use crate::core::schema::{Binding, SchemaSignature};
use crate::core::traits::Cursor;
use crate::error::{MapError, Result};

/// Outcome of probing one record type against one cursor.
#[derive(Debug, Clone)]
pub struct Probe {
    pub signature: SchemaSignature,
    pub bindings: Vec<Binding>,
}

/// Resolve every writable property of `T` to the column with exactly the
/// same name.
///
/// Columns nobody binds to are ignored, including duplicated names. A bound
/// name that appears more than once fails with [`MapError::AmbiguousColumn`].
pub fn probe<T: Record>(cursor: &dyn Cursor) -> Result<Probe> {
    let mut ordinals: HashMap<&str, Vec<usize>> = HashMap::with_capacity(cursor.column_count());
    for ordinal in 0..cursor.column_count() {
        ordinals
            .entry(cursor.column_name(ordinal))
            .or_default()
            .push(ordinal);
    }

    let mut bindings = Vec::new();
    for (index, property) in T::properties().iter().enumerate() {
        let desc = property.descriptor();
        if !desc.writable {
            continue;
        }

        let ordinal = match ordinals.get(desc.name).map(Vec::as_slice) {
            None | Some([]) => return Err(MapError::schema_mismatch(T::record_name(), desc.name)),
            Some([ordinal]) => *ordinal,
            Some(many) => {
                return Err(MapError::AmbiguousColumn {
                    record: T::record_name(),
                    property: desc.name.to_string(),
                    ordinals: many.to_vec(),
                })
            }
        };

        bindings.push(Binding {
            property: index,
            property_name: desc.name,
            ordinal,
            column_type: cursor.column_type(ordinal),
        });
    }

    let signature = SchemaSignature::new::<T>(T::record_name(), &bindings);
    Ok(Probe {
        signature,
        bindings,
    })
}
