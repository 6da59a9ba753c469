//! Unit tests for memoization, eviction and expiry.

use super::*;
use crate::exercises::ExerciseError;
use std::cell::Cell;
use std::thread;

#[test]
fn repeated_calls_compute_once() {
    let mut cache = DigitCache::with_limits(16, 60);
    let calls = Cell::new(0);
    let counted = |a: &[u8], b: &[u8], op: Operation| {
        calls.set(calls.get() + 1);
        digits::apply(a, b, op)
    };

    let first = cache.compute_with(&[1, 2, 3], &[4, 5, 6], "+", counted).unwrap();
    let second = cache.compute_with(&[1, 2, 3], &[4, 5, 6], "+", counted).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, DigitArray::positive(vec![5, 7, 9]));
    assert_eq!(calls.get(), 1);
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.stats().misses, 1);
}

#[test]
fn key_includes_operation_and_exact_digits() {
    let mut cache = DigitCache::with_limits(16, 0);
    cache.compute(&[1], &[2], "+").unwrap();
    cache.compute(&[1], &[2], "-").unwrap();
    cache.compute(&[0, 1], &[2], "+").unwrap();
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.stats().hits, 0);
}

#[test]
fn errors_are_not_cached() {
    let mut cache = DigitCache::with_limits(16, 0);
    assert_eq!(
        cache.compute(&[1], &[2], "*"),
        Err(ExerciseError::UnsupportedOperation("*".into()))
    );
    assert!(cache.compute(&[10], &[2], "+").is_err());
    assert!(cache.is_empty());
}

#[test]
fn least_recently_used_entry_is_evicted() {
    let mut memo: MemoCache<u32, u32> = MemoCache::new(2, None);
    memo.insert(1, 10);
    memo.insert(2, 20);
    assert_eq!(memo.get(&1), Some(10));
    memo.insert(3, 30);

    assert_eq!(memo.len(), 2);
    assert_eq!(memo.get(&2), None);
    assert_eq!(memo.get(&1), Some(10));
    assert_eq!(memo.stats().evictions, 1);
}

#[test]
fn reinserting_a_key_is_not_an_eviction() {
    let mut memo: MemoCache<u32, u32> = MemoCache::new(2, None);
    memo.insert(1, 10);
    memo.insert(1, 11);
    assert_eq!(memo.get(&1), Some(11));
    assert_eq!(memo.stats().evictions, 0);
}

#[test]
fn expired_entries_are_misses() {
    let mut memo: MemoCache<&str, u32> = MemoCache::new(4, Some(Duration::from_millis(20)));
    memo.insert("k", 1);
    assert_eq!(memo.get(&"k"), Some(1));
    thread::sleep(Duration::from_millis(40));
    assert_eq!(memo.get(&"k"), None);
    assert!(memo.is_empty());
}

#[test]
fn get_or_try_insert_with_passes_errors_through() {
    let mut memo: MemoCache<u8, u8> = MemoCache::new(4, None);
    let err: Result<u8, &str> = memo.get_or_try_insert_with(1, |_| Err("boom"));
    assert_eq!(err, Err("boom"));
    assert!(memo.is_empty());

    let ok: Result<u8, &str> = memo.get_or_try_insert_with(1, |k| Ok(k + 6));
    assert_eq!(ok, Ok(7));
    let again: Result<u8, &str> = memo.get_or_try_insert_with(1, |_| panic!("should be cached"));
    assert_eq!(again, Ok(7));
}

#[test]
fn zero_capacity_still_holds_one_entry() {
    let memo: MemoCache<u8, u8> = MemoCache::new(0, None);
    assert_eq!(memo.capacity(), 1);
}
