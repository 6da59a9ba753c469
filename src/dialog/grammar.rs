//! Free-text input formats, one per exercise.
//!
//! ```text
//! exercise 1:  "1 2 3;4 5 6"
//! exercise 4:  "1 2 3|4 5 6;+"   (or a bare "+" / "-")
//! exercise 5:  "1 2 3 4;5"
//! ```

use crate::exercises::ExerciseId;
use crate::session::ExerciseData;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected exactly one '{0}'")]
    Separator(char),
    #[error("not an integer: {0:?}")]
    NotAnInteger(String),
    #[error("missing target")]
    MissingTarget,
}

pub fn parse(exercise: ExerciseId, text: &str) -> Result<ExerciseData, ParseError> {
    match exercise {
        ExerciseId::Reconcile => parse_reconcile(text),
        ExerciseId::Digits => parse_digits(text),
        ExerciseId::Subarray => parse_subarray(text),
    }
}

/// A bare `+` or `-`.
pub fn parse_operator(text: &str) -> Option<&'static str> {
    match text.trim() {
        "+" => Some("+"),
        "-" => Some("-"),
        _ => None,
    }
}

pub fn format_hint(exercise: ExerciseId) -> &'static str {
    match exercise {
        ExerciseId::Reconcile => "Формат: '1 2 3;4 5 6'",
        ExerciseId::Digits => "Формат: '1 2 3|4 5 6;+'",
        ExerciseId::Subarray => "Формат: '1 2 3 4;5'",
    }
}

fn parse_reconcile(text: &str) -> Result<ExerciseData, ParseError> {
    let (first, second) = split_exact(text, ';')?;
    Ok(ExerciseData::Reconcile {
        first: parse_ints(first)?,
        second: parse_ints(second)?,
    })
}

// An empty operation part leaves it unset; execution then asks for one.
fn parse_digits(text: &str) -> Result<ExerciseData, ParseError> {
    let (numbers, operation) = split_exact(text, ';')?;
    let (first, second) = split_exact(numbers, '|')?;
    let operation = operation.trim();
    Ok(ExerciseData::Digits {
        first: parse_ints(first)?,
        second: parse_ints(second)?,
        operation: (!operation.is_empty()).then(|| operation.to_string()),
    })
}

fn parse_subarray(text: &str) -> Result<ExerciseData, ParseError> {
    let (values, target) = split_exact(text, ';')?;
    let target = target.trim();
    if target.is_empty() {
        return Err(ParseError::MissingTarget);
    }
    Ok(ExerciseData::Subarray {
        values: parse_ints(values)?,
        target: parse_int(target)?,
    })
}

fn split_exact(text: &str, separator: char) -> Result<(&str, &str), ParseError> {
    match text.split_once(separator) {
        Some((left, right)) if !right.contains(separator) => Ok((left, right)),
        _ => Err(ParseError::Separator(separator)),
    }
}

fn parse_ints(text: &str) -> Result<Vec<i64>, ParseError> {
    text.split_whitespace().map(parse_int).collect()
}

fn parse_int(token: &str) -> Result<i64, ParseError> {
    token
        .parse::<i64>()
        .map_err(|_| ParseError::NotAnInteger(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconcile_input() {
        assert_eq!(
            parse(ExerciseId::Reconcile, "1 2 3;4 5 6"),
            Ok(ExerciseData::Reconcile {
                first: vec![1, 2, 3],
                second: vec![4, 5, 6]
            })
        );
        // lengths are checked when the exercise runs
        assert!(parse(ExerciseId::Reconcile, "1 2;3").is_ok());
        assert_eq!(
            parse(ExerciseId::Reconcile, "1 2 3"),
            Err(ParseError::Separator(';'))
        );
        assert_eq!(
            parse(ExerciseId::Reconcile, "1;2;3"),
            Err(ParseError::Separator(';'))
        );
        assert_eq!(
            parse(ExerciseId::Reconcile, "1 x;2 3"),
            Err(ParseError::NotAnInteger("x".into()))
        );
    }

    #[test]
    fn digits_input() {
        assert_eq!(
            parse(ExerciseId::Digits, "1 2 3|4 5 6;+"),
            Ok(ExerciseData::Digits {
                first: vec![1, 2, 3],
                second: vec![4, 5, 6],
                operation: Some("+".into())
            })
        );
        assert_eq!(
            parse(ExerciseId::Digits, "1|2; * "),
            Ok(ExerciseData::Digits {
                first: vec![1],
                second: vec![2],
                operation: Some("*".into())
            })
        );
        assert_eq!(
            parse(ExerciseId::Digits, "1 2|3"),
            Err(ParseError::Separator(';'))
        );
        assert_eq!(
            parse(ExerciseId::Digits, "1 2|3; "),
            Ok(ExerciseData::Digits {
                first: vec![1, 2],
                second: vec![3],
                operation: None
            })
        );
        assert_eq!(
            parse(ExerciseId::Digits, "1 2 3;+"),
            Err(ParseError::Separator('|'))
        );
    }

    #[test]
    fn subarray_input() {
        assert_eq!(
            parse(ExerciseId::Subarray, "1 2 3; 3"),
            Ok(ExerciseData::Subarray {
                values: vec![1, 2, 3],
                target: 3
            })
        );
        assert_eq!(
            parse(ExerciseId::Subarray, ";-4"),
            Ok(ExerciseData::Subarray {
                values: vec![],
                target: -4
            })
        );
        assert_eq!(
            parse(ExerciseId::Subarray, "1 2 3;"),
            Err(ParseError::MissingTarget)
        );
        assert_eq!(
            parse(ExerciseId::Subarray, "1 2;3 4"),
            Err(ParseError::NotAnInteger("3 4".into()))
        );
    }

    #[test]
    fn bare_operators() {
        assert_eq!(parse_operator("+"), Some("+"));
        assert_eq!(parse_operator(" - "), Some("-"));
        assert_eq!(parse_operator("+-"), None);
        assert_eq!(parse_operator(""), None);
    }
}
