//! Numeric values produced by the evaluator.
//!
//! Integers and floats are kept apart so that `2+2` prints `4` while
//! `9/3` prints `3.0`. Integer operations that overflow fall back to
//! floating point; non-finite floats are reported as errors.

use std::fmt;

use crate::error::EvalError;

/// A calculator value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    /// The value as a float, regardless of variant.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Check if the value is zero (integer or float).
    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    /// Reject infinities and NaN.
    fn finite(value: f64) -> Result<Number, EvalError> {
        if value.is_nan() {
            Err(EvalError::NotReal)
        } else if value.is_infinite() {
            Err(EvalError::Overflow)
        } else {
            Ok(Number::Float(value))
        }
    }

    pub fn neg(self) -> Result<Number, EvalError> {
        match self {
            Number::Int(i) => Ok(i
                .checked_neg()
                .map(Number::Int)
                .unwrap_or(Number::Float(-(i as f64)))),
            Number::Float(f) => Ok(Number::Float(-f)),
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_add(b) {
                Some(v) => Ok(Number::Int(v)),
                None => Self::finite(a as f64 + b as f64),
            },
            (a, b) => Self::finite(a.as_f64() + b.as_f64()),
        }
    }

    pub fn sub(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_sub(b) {
                Some(v) => Ok(Number::Int(v)),
                None => Self::finite(a as f64 - b as f64),
            },
            (a, b) => Self::finite(a.as_f64() - b.as_f64()),
        }
    }

    pub fn mul(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_mul(b) {
                Some(v) => Ok(Number::Int(v)),
                None => Self::finite(a as f64 * b as f64),
            },
            (a, b) => Self::finite(a.as_f64() * b.as_f64()),
        }
    }

    /// True division; always a float.
    pub fn div(self, rhs: Number) -> Result<Number, EvalError> {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        Self::finite(self.as_f64() / rhs.as_f64())
    }

    /// Floored modulo: the result carries the sign of the divisor.
    pub fn rem(self, rhs: Number) -> Result<Number, EvalError> {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                // i128::MIN % -1 is the only overflowing case, and it is 0
                let r = a.checked_rem(b).unwrap_or(0);
                if r != 0 && (r < 0) != (b < 0) {
                    Ok(Number::Int(r + b))
                } else {
                    Ok(Number::Int(r))
                }
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                let r = a % b;
                if r != 0.0 && (r < 0.0) != (b < 0.0) {
                    Self::finite(r + b)
                } else {
                    Self::finite(r)
                }
            }
        }
    }

    pub fn pow(self, rhs: Number) -> Result<Number, EvalError> {
        if self.is_zero() && rhs.as_f64() < 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        match (self, rhs) {
            (Number::Int(base), Number::Int(exp)) if exp >= 0 => {
                let exact = u32::try_from(exp)
                    .ok()
                    .and_then(|e| base.checked_pow(e));
                match exact {
                    Some(v) => Ok(Number::Int(v)),
                    None => Self::finite((base as f64).powf(exp as f64)),
                }
            }
            (base, exp) => {
                let (base, exp) = (base.as_f64(), exp.as_f64());
                if base < 0.0 && exp.fract() != 0.0 {
                    return Err(EvalError::NotReal);
                }
                Self::finite(base.powf(exp))
            }
        }
    }

    pub fn sqrt(self) -> Result<Number, EvalError> {
        let value = self.as_f64();
        if value < 0.0 {
            return Err(EvalError::NotReal);
        }
        Self::finite(value.sqrt())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => f.write_str(&format_float(x)),
        }
    }
}

/// Shortest round-trip float text with a mandatory fractional part.
///
/// Magnitudes below `1e-4` or from `1e16` up switch to exponent form with a
/// signed, zero-padded exponent (`1e+16`, `2.5e-07`).
fn format_float(x: f64) -> String {
    let magnitude = x.abs();
    if x != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{:e}", x);
        return match text.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            None => text,
        };
    }

    let text = format!("{}", x);
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_arithmetic_stays_int() {
        assert_eq!(Number::Int(2).add(Number::Int(2)), Ok(Number::Int(4)));
        assert_eq!(Number::Int(2).mul(Number::Int(-3)), Ok(Number::Int(-6)));
        assert_eq!(Number::Int(2).pow(Number::Int(10)), Ok(Number::Int(1024)));
    }

    #[test]
    fn test_division_is_float() {
        assert_eq!(Number::Int(9).div(Number::Int(3)), Ok(Number::Float(3.0)));
        assert_eq!(
            Number::Int(1).div(Number::Int(0)),
            Err(EvalError::DivisionByZero)
        );
        assert_eq!(
            Number::Float(1.0).div(Number::Float(0.0)),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn test_floored_modulo() {
        assert_eq!(Number::Int(7).rem(Number::Int(3)), Ok(Number::Int(1)));
        assert_eq!(Number::Int(-7).rem(Number::Int(3)), Ok(Number::Int(2)));
        assert_eq!(Number::Int(7).rem(Number::Int(-3)), Ok(Number::Int(-2)));
        assert_eq!(Number::Float(-1.0).rem(Number::Int(3)), Ok(Number::Float(2.0)));
        assert_eq!(Number::Int(1).rem(Number::Int(0)), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_pow_edge_cases() {
        assert_eq!(Number::Int(2).pow(Number::Int(-1)), Ok(Number::Float(0.5)));
        assert_eq!(Number::Int(0).pow(Number::Int(-1)), Err(EvalError::DivisionByZero));
        assert_eq!(
            Number::Int(-8).pow(Number::Float(0.5)),
            Err(EvalError::NotReal)
        );
        assert_eq!(Number::Float(10.0).pow(Number::Int(400)), Err(EvalError::Overflow));
    }

    #[test]
    fn test_int_overflow_promotes() {
        let big = Number::Int(i128::MAX).add(Number::Int(1)).unwrap();
        assert!(matches!(big, Number::Float(_)));

        let huge = Number::Int(2).pow(Number::Int(200)).unwrap();
        assert!(matches!(huge, Number::Float(_)));
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(Number::Int(9).sqrt(), Ok(Number::Float(3.0)));
        assert_eq!(Number::Int(-1).sqrt(), Err(EvalError::NotReal));
    }

    #[test]
    fn test_format() {
        assert_eq!(Number::Int(120).to_string(), "120");
        assert_eq!(Number::Float(3.0).to_string(), "3.0");
        assert_eq!(Number::Float(0.5).to_string(), "0.5");
        assert_eq!(Number::Float(-2.25).to_string(), "-2.25");
        assert_eq!(Number::Float(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Number::Float(1e16).to_string(), "1e+16");
        assert_eq!(Number::Float(1.5e300).to_string(), "1.5e+300");
        assert_eq!(Number::Float(0.00001).to_string(), "1e-05");
        assert_eq!(Number::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Number::Float(1e15).to_string(), "1000000000000000.0");
    }
}
