use crate::exercises::digits::digits_of;
use crate::exercises::ExerciseId;
use crate::session::ExerciseData;
use rand::Rng;

/// Random input for `exercise`, sized for reading in a chat window.
pub fn generate<R: Rng + ?Sized>(exercise: ExerciseId, rng: &mut R) -> ExerciseData {
    match exercise {
        ExerciseId::Reconcile => ExerciseData::Reconcile {
            first: random_values(rng, 5, -10, 10),
            second: random_values(rng, 5, -10, 10),
        },
        ExerciseId::Digits => ExerciseData::Digits {
            first: random_number_digits(rng),
            second: random_number_digits(rng),
            operation: None,
        },
        ExerciseId::Subarray => ExerciseData::Subarray {
            values: random_values(rng, 8, -5, 10),
            target: rng.gen_range(0..=20),
        },
    }
}

pub fn random_values<R: Rng + ?Sized>(rng: &mut R, len: usize, low: i64, high: i64) -> Vec<i64> {
    (0..len).map(|_| rng.gen_range(low..=high)).collect()
}

fn random_number_digits<R: Rng + ?Sized>(rng: &mut R) -> Vec<i64> {
    digits_of(rng.gen_range(100..=999))
        .into_iter()
        .map(i64::from)
        .collect()
}
