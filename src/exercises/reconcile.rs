use super::{ExerciseError, ExerciseResult};

/// Sorts `first` descending and `second` ascending, pairs them up and keeps
/// `0` for equal pairs, the sum otherwise. The output is sorted ascending.
///
/// Pair sums are widened to `i128` so any two `i64` values add exactly.
pub fn reconcile(first: &[i64], second: &[i64]) -> ExerciseResult<Vec<i128>> {
    if first.len() != second.len() {
        return Err(ExerciseError::LengthMismatch {
            first: first.len(),
            second: second.len(),
        });
    }
    if first.is_empty() {
        return Err(ExerciseError::EmptyInput);
    }

    let mut descending = first.to_vec();
    descending.sort_unstable_by(|a, b| b.cmp(a));
    let mut ascending = second.to_vec();
    ascending.sort_unstable();

    let mut result: Vec<i128> = descending
        .iter()
        .zip(ascending.iter())
        .map(|(&x, &y)| if x == y { 0 } else { i128::from(x) + i128::from(y) })
        .collect();

    result.sort_unstable();
    Ok(result)
}
