//! The three exercises the bot offers, as plain functions over integer slices.
//!
//! Nothing in here knows about chats or sessions; the dialog layer calls these
//! and turns the outcome into a reply.

pub mod digits;
pub mod reconcile;
pub mod subarray;

pub use digits::{compute, DigitArray, Operation};
pub use reconcile::reconcile;
pub use subarray::{count_subarrays, count_subarrays_prefix};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Exercises offered in the main menu, numbered as the menu shows them.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExerciseId {
    Reconcile,
    Digits,
    Subarray,
}

impl ExerciseId {
    pub const ALL: [ExerciseId; 3] = [ExerciseId::Reconcile, ExerciseId::Digits, ExerciseId::Subarray];

    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            1 => Some(ExerciseId::Reconcile),
            4 => Some(ExerciseId::Digits),
            5 => Some(ExerciseId::Subarray),
            _ => None,
        }
    }

    pub fn number(&self) -> u32 {
        match self {
            ExerciseId::Reconcile => 1,
            ExerciseId::Digits => 4,
            ExerciseId::Subarray => 5,
        }
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Coarse classification of [`ExerciseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unsupported,
    Internal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExerciseError {
    #[error("Arrays differ in length: {first} vs {second}")]
    LengthMismatch { first: usize, second: usize },
    #[error("Arrays must not be empty")]
    EmptyInput,
    #[error("Element {value} is not a decimal digit")]
    NotADigit { value: i64 },
    #[error("Unsupported operation: {0:?}")]
    UnsupportedOperation(String),
    #[error("Computation failed: {0}")]
    Internal(String),
}

impl ExerciseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LengthMismatch { .. } | Self::EmptyInput | Self::NotADigit { .. } => {
                ErrorKind::Validation
            }
            Self::UnsupportedOperation(_) => ErrorKind::Unsupported,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Text shown to the chat user.
    pub fn user_message(&self) -> String {
        match self {
            Self::LengthMismatch { .. } => "Массивы должны быть одинаковой длины".to_string(),
            Self::EmptyInput => "Массивы не могут быть пустыми".to_string(),
            Self::NotADigit { value } => format!("{} не является цифрой (допустимо 0-9)", value),
            Self::UnsupportedOperation(op) => format!("Неизвестная операция: {}", op),
            Self::Internal(reason) => format!("Ошибка вычислений: {}", reason),
        }
    }
}

pub type ExerciseResult<T> = Result<T, ExerciseError>;

/// Last computed output of any exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseOutcome {
    Reconciled(Vec<i128>),
    Digits(DigitArray),
    SubarrayCount(usize),
}

impl fmt::Display for ExerciseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseOutcome::Reconciled(values) => write!(f, "{:?}", values),
            ExerciseOutcome::Digits(digits) => write!(f, "{}", digits),
            ExerciseOutcome::SubarrayCount(count) => write!(f, "{}", count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_numbers_round_trip() {
        for id in ExerciseId::ALL {
            assert_eq!(ExerciseId::from_number(id.number()), Some(id));
        }
        assert_eq!(ExerciseId::from_number(2), None);
    }

    #[test]
    fn error_kinds() {
        assert_eq!(ExerciseError::EmptyInput.kind(), ErrorKind::Validation);
        assert_eq!(
            ExerciseError::UnsupportedOperation("*".into()).kind(),
            ErrorKind::Unsupported
        );
        assert_eq!(ExerciseError::Internal("overflow".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(ExerciseOutcome::Reconciled(vec![0, 4, 4]).to_string(), "[0, 4, 4]");
        assert_eq!(ExerciseOutcome::SubarrayCount(2).to_string(), "2");
    }
}
