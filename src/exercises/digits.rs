//! Arithmetic on numbers written as arrays of decimal digits.
//!
//! `[1, 2, 3]` is 123, the empty array is 0. Results come back in the same
//! shape, with a leading sign marker when negative. The arithmetic runs
//! digit by digit, so input length is not bounded by any integer width.

use super::{ExerciseError, ExerciseResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
}

impl Operation {
    pub fn from_symbol(symbol: &str) -> ExerciseResult<Self> {
        match symbol {
            "+" => Ok(Operation::Add),
            "-" => Ok(Operation::Subtract),
            other => Err(ExerciseError::UnsupportedOperation(other.to_string())),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
        }
    }
}

/// A signed number as a sign flag plus most-significant-first digits.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigitArray {
    pub negative: bool,
    pub digits: Vec<u8>,
}

impl DigitArray {
    pub fn positive(digits: Vec<u8>) -> Self {
        Self {
            negative: false,
            digits,
        }
    }

    pub fn negative(digits: Vec<u8>) -> Self {
        Self {
            negative: true,
            digits,
        }
    }
}

impl fmt::Display for DigitArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut first = true;
        if self.negative {
            write!(f, "-")?;
            first = false;
        }
        for digit in &self.digits {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", digit)?;
            first = false;
        }
        write!(f, "]")
    }
}

/// Checks that every element is a single decimal digit.
pub fn to_digits(values: &[i64]) -> ExerciseResult<Vec<u8>> {
    values
        .iter()
        .map(|&value| match u8::try_from(value) {
            Ok(d) if d <= 9 => Ok(d),
            _ => Err(ExerciseError::NotADigit { value }),
        })
        .collect()
}

/// Splits a non-negative number into its decimal digits.
pub fn digits_of(mut number: u64) -> Vec<u8> {
    let mut digits = Vec::new();
    loop {
        digits.push((number % 10) as u8);
        number /= 10;
        if number == 0 {
            break;
        }
    }
    digits.reverse();
    digits
}

/// Uncached entry point: validates the input and runs the operation.
pub fn compute(first: &[i64], second: &[i64], symbol: &str) -> ExerciseResult<DigitArray> {
    let operation = Operation::from_symbol(symbol)?;
    let first = to_digits(first)?;
    let second = to_digits(second)?;
    Ok(apply(&first, &second, operation))
}

/// Applies `operation` to two already validated digit arrays.
pub fn apply(first: &[u8], second: &[u8], operation: Operation) -> DigitArray {
    let a = strip_leading_zeros(first);
    let b = strip_leading_zeros(second);
    match operation {
        Operation::Add => DigitArray::positive(add(a, b)),
        Operation::Subtract => match compare(a, b) {
            Ordering::Less => DigitArray::negative(subtract(b, a)),
            _ => DigitArray::positive(subtract(a, b)),
        },
    }
}

fn strip_leading_zeros(digits: &[u8]) -> &[u8] {
    let start = digits.iter().position(|&d| d != 0).unwrap_or(digits.len());
    &digits[start..]
}

fn compare(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn add(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(a.len().max(b.len()) + 1);
    let mut carry = 0u8;
    let mut ia = a.iter().rev();
    let mut ib = b.iter().rev();
    loop {
        let (x, y) = (ia.next(), ib.next());
        if x.is_none() && y.is_none() {
            break;
        }
        let sum = x.copied().unwrap_or(0) + y.copied().unwrap_or(0) + carry;
        out.push(sum % 10);
        carry = sum / 10;
    }
    if carry > 0 {
        out.push(carry);
    }
    finish(out)
}

// Requires a >= b.
fn subtract(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0u8;
    let mut ib = b.iter().rev();
    for &x in a.iter().rev() {
        let y = ib.next().copied().unwrap_or(0) + borrow;
        if x >= y {
            out.push(x - y);
            borrow = 0;
        } else {
            out.push(x + 10 - y);
            borrow = 1;
        }
    }
    finish(out)
}

// Takes least-significant-first digits.
fn finish(mut reversed: Vec<u8>) -> Vec<u8> {
    while reversed.len() > 1 && reversed.last() == Some(&0) {
        reversed.pop();
    }
    if reversed.is_empty() {
        reversed.push(0);
    }
    reversed.reverse();
    reversed
}
