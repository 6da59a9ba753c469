//! Timing and memory measurements for the exercises.
//!
//! Every number in a [`BenchReport`] is measured on this run. Peak memory is
//! only meaningful in a binary that installs [`alloc::TrackingAllocator`].

pub mod alloc;

use crate::cache::DigitCache;
use crate::dialog::generator::random_values;
use crate::exercises::{self, ExerciseError, ExerciseResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const DIGITS_FIRST: [i64; 3] = [1, 2, 3];
const DIGITS_SECOND: [i64; 3] = [4, 5, 6];
const SUBARRAY_TARGET: i64 = 5;

#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Length of the generated arrays for exercises 1 and 5
    pub size: usize,
    /// Timed calls per exercise 1 / exercise 5 measurement
    pub iterations: u32,
    /// Timed calls per exercise 4 measurement
    pub cache_iterations: u32,
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: 1000,
            iterations: 100,
            cache_iterations: 1000,
            seed: None,
        }
    }
}

/// Average wall time of one call of `f` over `iterations` calls (at least one).
pub fn measure_time<T, F: FnMut() -> T>(iterations: u32, mut f: F) -> Duration {
    let iterations = iterations.max(1);
    let start = Instant::now();
    for _ in 0..iterations {
        black_box(f());
    }
    start.elapsed() / iterations
}

/// Runs `f` once and returns its result with the peak bytes allocated above
/// the live size at the start of the call.
pub fn measure_peak<T, F: FnOnce() -> T>(f: F) -> (T, usize) {
    alloc::reset_peak();
    let baseline = alloc::current_bytes();
    let result = f();
    let peak = alloc::peak_bytes().saturating_sub(baseline);
    (result, peak)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub avg: Duration,
    pub peak_bytes: usize,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3} ms/call, peak {:.2} KB",
            self.avg.as_secs_f64() * 1000.0,
            self.peak_bytes as f64 / 1024.0
        )
    }
}

#[derive(Debug, Clone)]
pub struct BenchReport {
    pub size: usize,
    pub iterations: u32,
    pub cache_iterations: u32,
    pub seed: u64,
    pub reconcile: Measurement,
    pub digits_uncached: Measurement,
    pub digits_cached: Measurement,
    pub cache_hit_rate: f64,
    pub subarray_naive: Measurement,
    pub subarray_prefix: Measurement,
    pub subarray_count: usize,
}

/// `slow / fast`, or `None` when `fast` is too small to measure.
pub fn ratio(slow: Duration, fast: Duration) -> Option<f64> {
    if fast.is_zero() {
        None
    } else {
        Some(slow.as_secs_f64() / fast.as_secs_f64())
    }
}

fn write_ratio(f: &mut fmt::Formatter<'_>, label: &str, slow: Duration, fast: Duration) -> fmt::Result {
    match ratio(slow, fast) {
        Some(r) => writeln!(f, "  {}: {:.1}x", label, r),
        None => writeln!(f, "  {}: n/a", label),
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "size={} iterations={} cache_iterations={} seed={}",
            self.size, self.iterations, self.cache_iterations, self.seed
        )?;
        writeln!(f, "\nЗадание 1 (reconcile)")?;
        writeln!(f, "  {}", self.reconcile)?;

        writeln!(f, "\nЗадание 4 (digits {:?} + {:?})", DIGITS_FIRST, DIGITS_SECOND)?;
        writeln!(f, "  uncached: {}", self.digits_uncached)?;
        writeln!(f, "  cached:   {}", self.digits_cached)?;
        writeln!(f, "  hit rate: {:.1}%", self.cache_hit_rate * 100.0)?;
        write_ratio(f, "speedup", self.digits_uncached.avg, self.digits_cached.avg)?;

        writeln!(f, "\nЗадание 5 (target {}, {} subarrays)", SUBARRAY_TARGET, self.subarray_count)?;
        writeln!(f, "  O(n^2):     {}", self.subarray_naive)?;
        writeln!(f, "  prefix sum: {}", self.subarray_prefix)?;
        write_ratio(f, "speedup", self.subarray_naive.avg, self.subarray_prefix.avg)
    }
}

pub fn run(config: &BenchConfig) -> ExerciseResult<BenchReport> {
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    info!(size = config.size, seed, "Running benchmarks");

    let first = random_values(&mut rng, config.size, -100, 100);
    let second = random_values(&mut rng, config.size, -100, 100);
    let (checked, peak) = measure_peak(|| exercises::reconcile(&first, &second));
    checked?;
    let reconcile = Measurement {
        avg: measure_time(config.iterations, || exercises::reconcile(&first, &second)),
        peak_bytes: peak,
    };
    debug!(?reconcile, "Exercise 1 measured");

    let (checked, peak) = measure_peak(|| exercises::compute(&DIGITS_FIRST, &DIGITS_SECOND, "+"));
    checked?;
    let digits_uncached = Measurement {
        avg: measure_time(config.cache_iterations, || {
            exercises::compute(&DIGITS_FIRST, &DIGITS_SECOND, "+")
        }),
        peak_bytes: peak,
    };

    let mut cache = DigitCache::with_limits(16, 0);
    let (checked, peak) = measure_peak(|| cache.compute(&DIGITS_FIRST, &DIGITS_SECOND, "+"));
    checked?;
    let digits_cached = Measurement {
        avg: measure_time(config.cache_iterations, || {
            cache.compute(&DIGITS_FIRST, &DIGITS_SECOND, "+")
        }),
        peak_bytes: peak,
    };
    let cache_hit_rate = cache.stats().hit_rate();
    debug!(?digits_uncached, ?digits_cached, cache_hit_rate, "Exercise 4 measured");

    let values = random_values(&mut rng, config.size, -10, 10);
    let (naive_count, naive_peak) =
        measure_peak(|| exercises::count_subarrays(&values, SUBARRAY_TARGET));
    let (prefix_count, prefix_peak) =
        measure_peak(|| exercises::count_subarrays_prefix(&values, SUBARRAY_TARGET));
    if naive_count != prefix_count {
        return Err(ExerciseError::Internal(format!(
            "subarray counts disagree: {} vs {}",
            naive_count, prefix_count
        )));
    }
    let subarray_naive = Measurement {
        avg: measure_time(config.iterations, || {
            exercises::count_subarrays(&values, SUBARRAY_TARGET)
        }),
        peak_bytes: naive_peak,
    };
    let subarray_prefix = Measurement {
        avg: measure_time(config.iterations, || {
            exercises::count_subarrays_prefix(&values, SUBARRAY_TARGET)
        }),
        peak_bytes: prefix_peak,
    };
    debug!(?subarray_naive, ?subarray_prefix, "Exercise 5 measured");

    Ok(BenchReport {
        size: config.size,
        iterations: config.iterations,
        cache_iterations: config.cache_iterations,
        seed,
        reconcile,
        digits_uncached,
        digits_cached,
        cache_hit_rate,
        subarray_naive,
        subarray_prefix,
        subarray_count: naive_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> BenchConfig {
        BenchConfig {
            size: 50,
            iterations: 2,
            cache_iterations: 10,
            seed: Some(7),
        }
    }

    #[test]
    fn measure_time_calls_at_least_once() {
        let mut calls = 0;
        measure_time(0, || calls += 1);
        assert_eq!(calls, 1);

        let mut calls = 0;
        measure_time(5, || calls += 1);
        assert_eq!(calls, 5);
    }

    #[test]
    fn run_reports_cache_hits() {
        let report = run(&small()).unwrap();
        assert_eq!(report.size, 50);
        assert_eq!(report.seed, 7);
        // one miss from the warm-up, every timed call hits
        let expected = 10.0 / 11.0;
        assert!((report.cache_hit_rate - expected).abs() < 1e-9);
    }

    #[test]
    fn seeded_runs_agree() {
        let a = run(&small()).unwrap();
        let b = run(&small()).unwrap();
        assert_eq!(a.subarray_count, b.subarray_count);
    }

    #[test]
    fn zero_size_is_rejected() {
        let config = BenchConfig { size: 0, ..small() };
        assert_eq!(run(&config).unwrap_err(), ExerciseError::EmptyInput);
    }

    #[test]
    fn ratio_guards_zero() {
        assert_eq!(ratio(Duration::from_millis(4), Duration::ZERO), None);
        assert_eq!(
            ratio(Duration::from_millis(4), Duration::from_millis(2)),
            Some(2.0)
        );
    }

    #[test]
    fn report_prints_measured_ratios() {
        let text = run(&small()).unwrap().to_string();
        assert!(text.contains("seed=7"));
        assert!(text.contains("Задание 4"));
        assert!(text.contains("prefix sum"));
    }
}
