//! Process-scoped store of compiled materializers.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::{trace, warn};

use crate::core::schema::SchemaSignature;
use crate::error::{MapError, Result};

use super::compile::CompiledMaterializer;
use super::getter::GetterFactory;

type Entry = Arc<dyn Any + Send + Sync>;

/// Counters describing cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Distinct signatures currently held.
    pub entries: usize,

    /// Lookups answered from the cache.
    pub hits: u64,

    /// Successful compilations, including ones that lost an insert race.
    pub compilations: u64,
}

/// Concurrent [`SchemaSignature`] → [`CompiledMaterializer`] map.
///
/// Entries are never evicted: the key space is bounded by the distinct
/// (record type, column shape) pairs a process observes. Failed compilations
/// are not stored, so a bad shape fails the same way on every attempt.
///
/// The cache also owns the [`GetterFactory`], so every mapper sharing a cache
/// shares its per-type getters too.
#[derive(Default)]
pub struct MapperCache {
    entries: DashMap<SchemaSignature, Entry>,
    getters: GetterFactory,
    hits: AtomicU64,
    compilations: AtomicU64,
}

impl MapperCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the materializer for `signature`, compiling it on a miss.
    ///
    /// `compile` runs without holding any lock. Two threads missing on the
    /// same key may both compile; the first insert wins and both callers get
    /// the retained entry.
    pub fn get_or_compile<T, F>(
        &self,
        signature: SchemaSignature,
        compile: F,
    ) -> Result<Arc<CompiledMaterializer<T>>>
    where
        T: 'static,
        F: FnOnce(SchemaSignature) -> Result<CompiledMaterializer<T>>,
    {
        let cached = self.entries.get(&signature).map(|e| e.value().clone());
        if let Some(entry) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!("Materializer cache hit for {}", signature);
            return downcast(entry, &signature);
        }

        let compiled: Entry = Arc::new(compile(signature.clone())?);
        self.compilations.fetch_add(1, Ordering::Relaxed);

        let retained = self
            .entries
            .entry(signature.clone())
            .or_insert_with(|| compiled.clone())
            .value()
            .clone();
        if !Arc::ptr_eq(&retained, &compiled) {
            warn!("Discarding duplicate materializer compiled concurrently for {}", signature);
        }
        downcast(retained, &signature)
    }

    /// Per-type getters shared by every materializer this cache compiles.
    pub fn getters(&self) -> &GetterFactory {
        &self.getters
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            compilations: self.compilations.load(Ordering::Relaxed),
        }
    }

    /// Drop every compiled entry and reset counters. Getters are kept.
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.compilations.store(0, Ordering::Relaxed);
    }
}

fn downcast<T: 'static>(
    entry: Entry,
    signature: &SchemaSignature,
) -> Result<Arc<CompiledMaterializer<T>>> {
    entry.downcast::<CompiledMaterializer<T>>().map_err(|_| {
        MapError::Internal(format!(
            "cached materializer for {} has an unexpected type",
            signature
        ))
    })
}
