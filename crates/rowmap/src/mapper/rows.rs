//! Row enumeration.

use std::iter::FusedIterator;
use std::sync::Arc;

use tracing::debug;

use crate::core::traits::Cursor;
use crate::error::Result;

use super::compile::CompiledMaterializer;

/// Lazy, forward-only sequence of materialized records.
///
/// Each pull advances the cursor, builds a fresh instance from the factory,
/// and fills it. The first error ends the sequence: later pulls return
/// `None`, since neither the cursor position nor the instance can be rolled
/// back.
pub struct Rows<T, C, F> {
    cursor: C,
    factory: F,
    materializer: Arc<CompiledMaterializer<T>>,
    rows: u64,
    done: bool,
}

impl<T, C, F> Rows<T, C, F>
where
    C: Cursor,
    F: FnMut() -> T,
{
    pub(crate) fn new(cursor: C, factory: F, materializer: Arc<CompiledMaterializer<T>>) -> Self {
        Self {
            cursor,
            factory,
            materializer,
            rows: 0,
            done: false,
        }
    }

    /// Rows yielded so far.
    pub fn rows_read(&self) -> u64 {
        self.rows
    }

    fn next_row(&mut self) -> Result<Option<T>> {
        if !self.cursor.advance()? {
            return Ok(None);
        }
        let mut dto = (self.factory)();
        self.materializer.apply(&self.cursor, &mut dto)?;
        Ok(Some(dto))
    }
}

impl<T, C, F> Iterator for Rows<T, C, F>
where
    C: Cursor,
    F: FnMut() -> T,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_row() {
            Ok(Some(dto)) => {
                self.rows += 1;
                Some(Ok(dto))
            }
            Ok(None) => {
                self.done = true;
                debug!(
                    "Finished materializing {} rows for {}",
                    self.rows,
                    self.materializer.signature()
                );
                None
            }
            Err(e) => {
                self.done = true;
                debug!("Materialization aborted after {} rows: {}", self.rows, e);
                Some(Err(e))
            }
        }
    }
}

impl<T, C, F> FusedIterator for Rows<T, C, F>
where
    C: Cursor,
    F: FnMut() -> T,
{
}
