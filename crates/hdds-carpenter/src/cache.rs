// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent LRU cache of fabricated types.
//!
//! Lets repeated deserializations of the same shape reuse one fabricated
//! type instead of defining a new one per envelope. Lookups take a read
//! lock; a miss re-checks under the write lock and builds while holding it,
//! so at most one builder runs per fingerprint and two callers can never
//! install divergent types under the same key. A secondary dashset keeps
//! "pinned" entries that must never be evicted.

use crate::config::CarpenterConfig;
use crate::graph::SchemaNode;
use crate::registry::TypeResolver;
use crate::runtime::RuntimeType;
use dashmap::DashSet;
use lru::LruCache;
use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::time::Instant;

/// Identity of a schema node together with the exact types it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaFingerprint(u64);

impl SchemaFingerprint {
    /// Fingerprint `node` as it would be built against `resolver`.
    ///
    /// Covers the node's full shape plus the name and origin of every
    /// resolved dependency, so a cached type is only reused when its field
    /// and interface types are the very same types.
    pub fn compute(node: &SchemaNode, resolver: &dyn TypeResolver) -> Self {
        let mut hasher = DefaultHasher::new();
        node.schema().hash(&mut hasher);
        node.interfaces().hash(&mut hasher);

        let references: BTreeSet<&str> = node
            .interfaces()
            .iter()
            .map(String::as_str)
            .chain(
                node.schema()
                    .fields
                    .iter()
                    .flat_map(|f| f.type_ref.referenced_names()),
            )
            .filter(|name| *name != node.name())
            .collect();
        for name in references {
            name.hash(&mut hasher);
            resolver.resolve(name).map(|ty| ty.origin()).hash(&mut hasher);
        }
        Self(hasher.finish())
    }

    /// Raw hash value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub last_miss_ns: u64,
}

/// LRU-based concurrent cache of fabricated types.
pub struct TypeCache {
    inner: RwLock<LruCache<SchemaFingerprint, RuntimeType>>,
    pinned: DashSet<SchemaFingerprint>,
    stats: RwLock<CacheStats>,
}

impl TypeCache {
    /// Create a cache holding up to `capacity` types (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: RwLock::new(LruCache::new(capacity)),
            pinned: DashSet::new(),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Create a cache sized from configuration.
    #[must_use]
    pub fn from_config(config: &CarpenterConfig) -> Self {
        Self::new(config.cache_capacity)
    }

    /// Return the cached type for `key`, or build and cache it.
    ///
    /// A failing builder caches nothing.
    pub fn get_or_try_build<F, E>(&self, key: SchemaFingerprint, build: F) -> Result<RuntimeType, E>
    where
        F: FnOnce() -> Result<RuntimeType, E>,
    {
        if let Some(hit) = self.try_peek(&key) {
            self.record_hit();
            return Ok(hit);
        }

        let mut cache = self.inner.write();
        if let Some(hit) = cache.get(&key) {
            let hit = hit.clone();
            drop(cache);
            self.record_hit();
            return Ok(hit);
        }

        let start = Instant::now();
        let built = build()?;

        if cache.len() >= cache.cap().get() && !self.free_slot(&mut cache) {
            log::debug!(
                "[cache] all {} entries pinned; {} not cached",
                cache.len(),
                built.name()
            );
            drop(cache);
            self.record_miss(start);
            return Ok(built);
        }

        cache.put(key, built.clone());
        drop(cache);
        log::debug!("[cache] cached {} under {:016x}", built.name(), key.as_u64());
        self.record_miss(start);
        Ok(built)
    }

    /// Look up a cached type without building.
    pub fn get(&self, key: &SchemaFingerprint) -> Option<RuntimeType> {
        self.try_peek(key)
    }

    /// Never evict the entry under `key`.
    pub fn pin(&self, key: SchemaFingerprint) {
        self.pinned.insert(key);
    }

    /// Number of cached types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        *self.stats.read()
    }

    fn try_peek(&self, key: &SchemaFingerprint) -> Option<RuntimeType> {
        let cache = self.inner.read();
        cache.peek(key).cloned()
    }

    fn free_slot(&self, cache: &mut LruCache<SchemaFingerprint, RuntimeType>) -> bool {
        if cache.len() < cache.cap().get() {
            return true;
        }

        let attempts = cache.len();
        for _ in 0..attempts {
            if let Some((old_key, old_value)) = cache.pop_lru() {
                if self.pinned.contains(&old_key) {
                    cache.put(old_key, old_value);
                } else {
                    return true;
                }
            } else {
                break;
            }
        }
        false
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_miss(&self, start: Instant) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        stats.last_miss_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
    }
}

impl Default for TypeCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CACHE_CAPACITY)
    }
}
