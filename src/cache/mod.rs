//! Memoization for the digit arithmetic exercise.
//!
//! `MemoCache` is a bounded map: least recently used entries are dropped once
//! `capacity` is reached and entries older than the TTL count as misses.
//! `DigitCache` keys it by the exact (digits, digits, operation) triple.

use crate::config::CacheConfig;
use crate::exercises::digits::{self, DigitArray, Operation};
use crate::exercises::ExerciseResult;
use lru::LruCache;
use serde::Serialize;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.map_or(false, |ttl| self.created_at.elapsed() > ttl)
    }
}

pub struct MemoCache<K: Hash + Eq, V> {
    entries: LruCache<K, CacheEntry<V>>,
    ttl: Option<Duration>,
    stats: CacheStats,
}

impl<K, V> MemoCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// `ttl = None` keeps entries until they are pushed out by capacity.
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
            stats: CacheStats::default(),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                self.stats.hits += 1;
                debug!("Cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.pop(key);
            debug!("Expired cache entry dropped");
        }
        self.stats.misses += 1;
        debug!("Cache miss");
        None
    }

    pub fn insert(&mut self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
        };
        if let Some((evicted, _)) = self.entries.push(key.clone(), entry) {
            if evicted != key {
                self.stats.evictions += 1;
                debug!("Cache entry evicted");
            }
        }
    }

    /// Returns the cached value or runs `compute` and stores what it returns.
    /// Errors are passed through and not cached.
    pub fn get_or_try_insert_with<E, F>(&mut self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute(&key)?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        debug!("Cache cleared");
    }
}

pub type DigitKey = (Vec<u8>, Vec<u8>, Operation);

/// Cached front of [`digits::compute`].
pub struct DigitCache {
    memo: MemoCache<DigitKey, DigitArray>,
}

impl DigitCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_limits(config.capacity, config.ttl_seconds)
    }

    /// `ttl_seconds = 0` disables expiry.
    pub fn with_limits(capacity: usize, ttl_seconds: u64) -> Self {
        let ttl = (ttl_seconds > 0).then(|| Duration::from_secs(ttl_seconds));
        Self {
            memo: MemoCache::new(capacity, ttl),
        }
    }

    pub fn compute(&mut self, first: &[i64], second: &[i64], symbol: &str) -> ExerciseResult<DigitArray> {
        self.compute_with(first, second, symbol, digits::apply)
    }

    /// Like [`DigitCache::compute`] with the arithmetic supplied by the caller.
    pub fn compute_with<F>(
        &mut self,
        first: &[i64],
        second: &[i64],
        symbol: &str,
        arithmetic: F,
    ) -> ExerciseResult<DigitArray>
    where
        F: FnOnce(&[u8], &[u8], Operation) -> DigitArray,
    {
        let operation = Operation::from_symbol(symbol)?;
        let first = digits::to_digits(first)?;
        let second = digits::to_digits(second)?;
        self.memo
            .get_or_try_insert_with((first, second, operation), |(a, b, op)| {
                Ok(arithmetic(a.as_slice(), b.as_slice(), *op))
            })
    }

    pub fn stats(&self) -> CacheStats {
        self.memo.stats()
    }

    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    pub fn clear(&mut self) {
        self.memo.clear();
    }
}

#[cfg(test)]
mod tests;
