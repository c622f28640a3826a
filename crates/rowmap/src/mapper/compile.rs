//! Materializer compilation.

use std::fmt;

use tracing::debug;

use crate::core::record::{Record, Step};
use crate::core::schema::SchemaSignature;
use crate::core::traits::Cursor;
use crate::error::{MapError, Result};

use super::coerce;
use super::getter::GetterFactory;
use super::probe::Probe;

/// Fills one record instance from the current row of a cursor.
///
/// Built once per [`SchemaSignature`] and reused for every row and every
/// cursor of the same shape. Reads are ordinal-indexed; no names are looked
/// up per row.
pub struct CompiledMaterializer<T> {
    signature: SchemaSignature,
    steps: Vec<Step<T>>,
}

impl<T> CompiledMaterializer<T> {
    /// Apply every bound property, in declaration order, to `dto`.
    pub fn apply(&self, cursor: &dyn Cursor, dto: &mut T) -> Result<()> {
        for step in &self.steps {
            step(cursor, dto)?;
        }
        Ok(())
    }

    pub fn signature(&self) -> &SchemaSignature {
        &self.signature
    }

    /// Number of bound properties.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<T> fmt::Debug for CompiledMaterializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMaterializer")
            .field("signature", &self.signature)
            .field("steps", &self.steps.len())
            .finish()
    }
}

/// Compose getter, coercion, and setter for every binding of `probe`.
///
/// Fails on the first property whose column type can't be coerced; nothing
/// is returned for partially valid shapes.
pub fn compile<T: Record>(
    probe: Probe,
    getters: &GetterFactory,
) -> Result<CompiledMaterializer<T>> {
    let record = T::record_name();
    let properties = T::properties();
    let mut steps = Vec::with_capacity(probe.bindings.len());

    for binding in &probe.bindings {
        let property = properties.get(binding.property).ok_or_else(|| {
            MapError::Internal(format!(
                "binding for {}.{} points past the property list",
                record, binding.property_name
            ))
        })?;

        let coercion = coerce::resolve(record, property.descriptor(), binding)?;
        let getter = getters.getter(binding.column_type.sql_type);
        let step = property
            .bind(record, binding.ordinal, getter, coercion)
            .ok_or_else(|| {
                MapError::Internal(format!(
                    "property {}.{} is read-only",
                    record, binding.property_name
                ))
            })?;
        steps.push(step);
    }

    debug!(
        "Compiled materializer {} ({} bindings, fingerprint {})",
        probe.signature,
        steps.len(),
        probe.signature.fingerprint()
    );

    Ok(CompiledMaterializer {
        signature: probe.signature,
        steps,
    })
}
