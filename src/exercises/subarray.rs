use std::collections::HashMap;

/// Counts contiguous subarrays (by start/end index) summing to `target`.
///
/// Extends a running sum from every start index, so O(n²). Sums are kept in
/// `i128`, which no slice of `i64` values can overflow.
pub fn count_subarrays(values: &[i64], target: i64) -> usize {
    let target = i128::from(target);
    let mut count = 0;
    for start in 0..values.len() {
        let mut sum: i128 = 0;
        for &value in &values[start..] {
            sum += i128::from(value);
            if sum == target {
                count += 1;
            }
        }
    }
    count
}

/// Same count in a single pass over prefix sums.
///
/// Only the benchmark uses this; the bot runs [`count_subarrays`].
pub fn count_subarrays_prefix(values: &[i64], target: i64) -> usize {
    let target = i128::from(target);
    let mut seen: HashMap<i128, usize> = HashMap::with_capacity(values.len() + 1);
    seen.insert(0, 1);

    let mut prefix: i128 = 0;
    let mut count = 0;
    for &value in values {
        prefix += i128::from(value);
        count += seen.get(&(prefix - target)).copied().unwrap_or(0);
        *seen.entry(prefix).or_insert(0) += 1;
    }
    count
}
