//! Mapper generation and caching.
//!
//! [`Mapper`] is the entry point. For a record type and a cursor it
//!
//! 1. probes the cursor's columns ([`probe`]) to build a [`SchemaSignature`],
//! 2. looks the signature up in its [`MapperCache`],
//! 3. on a miss, compiles a [`CompiledMaterializer`] from per-type getters
//!    ([`GetterFactory`]) and per-property coercions ([`coerce`]),
//! 4. hands back a [`Rows`] iterator that applies it to every row.
//!
//! A `Mapper` is cheap to clone. Clones, and mappers built with
//! [`Mapper::with_cache`] over the same cache, share compiled materializers
//! and getters, so one cache can serve every thread of a process.
//!
//! [`SchemaSignature`]: crate::core::SchemaSignature

pub mod cache;
pub mod coerce;
pub mod compile;
pub mod getter;
pub mod probe;
pub mod rows;

use std::sync::Arc;

use crate::core::record::Record;
use crate::core::traits::Cursor;
use crate::error::Result;

pub use cache::{CacheStats, MapperCache};
pub use coerce::Coercion;
pub use compile::CompiledMaterializer;
pub use getter::{Getter, GetterFactory};
pub use probe::Probe;
pub use rows::Rows;

/// Compiles and caches materializers, and drives row enumeration.
#[derive(Clone, Default)]
pub struct Mapper {
    cache: Arc<MapperCache>,
}

impl Mapper {
    /// Mapper with a fresh, private cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapper backed by an existing cache.
    pub fn with_cache(cache: Arc<MapperCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<MapperCache> {
        &self.cache
    }

    pub fn getters(&self) -> &GetterFactory {
        self.cache.getters()
    }

    /// Bindings `T` would use against `cursor`, without compiling.
    pub fn probe<T: Record>(&self, cursor: &dyn Cursor) -> Result<Probe> {
        probe::probe::<T>(cursor)
    }

    /// Materializer for `T` against the columns `cursor` currently exposes.
    pub fn resolve<T: Record>(&self, cursor: &dyn Cursor) -> Result<Arc<CompiledMaterializer<T>>> {
        let probe = probe::probe::<T>(cursor)?;
        let signature = probe.signature.clone();
        self.cache
            .get_or_compile(signature, |_| compile::compile::<T>(probe, self.cache.getters()))
    }

    /// Materialize every remaining row of `cursor` into instances from
    /// `factory`.
    ///
    /// The materializer is resolved before the first row is read, so shape
    /// errors surface here even for an empty cursor.
    pub fn materialize<T, C, F>(&self, cursor: C, factory: F) -> Result<Rows<T, C, F>>
    where
        T: Record,
        C: Cursor,
        F: FnMut() -> T,
    {
        let materializer = self.resolve::<T>(&cursor)?;
        Ok(Rows::new(cursor, factory, materializer))
    }

    /// [`materialize`](Self::materialize) with `T::default` as the factory.
    pub fn materialize_default<T, C>(&self, cursor: C) -> Result<Rows<T, C, fn() -> T>>
    where
        T: Record + Default,
        C: Cursor,
    {
        self.materialize(cursor, T::default as fn() -> T)
    }

    /// Collect every row, stopping at the first error.
    pub fn read_all<T, C>(&self, cursor: C) -> Result<Vec<T>>
    where
        T: Record + Default,
        C: Cursor,
    {
        self.materialize_default::<T, C>(cursor)?.collect()
    }
}
