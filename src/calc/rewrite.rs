//! Display-to-arithmetic rewriting.
//!
//! The calculator display uses glyphs (`÷ × π ^ √ !`) the arithmetic parser
//! does not know. A [`Rewrite`] turns the display text into an ordered list
//! of segments that renders to a plain arithmetic string.

use std::fmt;

use crate::error::EvalError;

/// One piece of a rewritten expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A character passed through (or produced by glyph substitution).
    Literal(char),
    /// `√<operand>`, rendered as `sqrt(<operand>)`.
    Sqrt(String),
}

/// The result of running all rewrite passes over a display string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    segments: Vec<Segment>,
}

/// Glyph substitutions applied before the root and factorial passes.
const GLYPHS: &[(char, &str)] = &[('÷', "/"), ('×', "*"), ('π', "pi"), ('^', "**")];

impl Rewrite {
    /// Rewrite a display string.
    pub fn parse(display: &str) -> Result<Self, EvalError> {
        let segments = substitute_glyphs(display);
        let segments = resolve_roots(segments)?;
        let segments = resolve_factorials(segments)?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Rewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(c) => write!(f, "{}", c)?,
                Segment::Sqrt(operand) => write!(f, "sqrt({})", operand)?,
            }
        }
        Ok(())
    }
}

fn is_operand_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn substitute_glyphs(display: &str) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(display.len());
    for c in display.chars() {
        match GLYPHS.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, replacement)) => segments.extend(replacement.chars().map(Segment::Literal)),
            None => segments.push(Segment::Literal(c)),
        }
    }
    segments
}

/// Replace each `√` and the digits that follow it with a root segment.
fn resolve_roots(segments: Vec<Segment>) -> Result<Vec<Segment>, EvalError> {
    let mut out = Vec::with_capacity(segments.len());
    let mut iter = segments.into_iter().peekable();

    while let Some(segment) = iter.next() {
        if segment != Segment::Literal('√') {
            out.push(segment);
            continue;
        }

        let mut operand = String::new();
        while let Some(Segment::Literal(c)) = iter.peek() {
            if !is_operand_char(*c) {
                break;
            }
            operand.push(*c);
            iter.next();
        }

        if operand.is_empty() {
            return Err(EvalError::MissingOperand { symbol: '√' });
        }
        out.push(Segment::Sqrt(operand));
    }

    Ok(out)
}

/// Replace each `<digits>!` with the factorial's decimal digits.
///
/// Results are spliced back as literal digits, so a following `!` sees
/// them as its operand (`3!!` is `720`).
fn resolve_factorials(segments: Vec<Segment>) -> Result<Vec<Segment>, EvalError> {
    let mut out: Vec<Segment> = Vec::with_capacity(segments.len());

    for segment in segments {
        if segment != Segment::Literal('!') {
            out.push(segment);
            continue;
        }

        let mut split = out.len();
        while split > 0 {
            match &out[split - 1] {
                Segment::Literal(c) if is_operand_char(*c) => split -= 1,
                _ => break,
            }
        }

        let operand: String = out
            .drain(split..)
            .filter_map(|s| match s {
                Segment::Literal(c) => Some(c),
                Segment::Sqrt(_) => None,
            })
            .collect();

        if operand.is_empty() {
            return Err(EvalError::MissingOperand { symbol: '!' });
        }

        let value = factorial(&operand)?;
        out.extend(value.to_string().chars().map(Segment::Literal));
    }

    Ok(out)
}

/// Factorial of a non-negative integer operand.
pub fn factorial(operand: &str) -> Result<u128, EvalError> {
    let n: u32 = operand.parse().map_err(|_| {
        if operand.bytes().all(|b| b.is_ascii_digit()) {
            EvalError::Overflow
        } else {
            EvalError::InvalidFactorial {
                operand: operand.to_string(),
            }
        }
    })?;

    (2..=n as u128).try_fold(1u128, |acc, k| acc.checked_mul(k).ok_or(EvalError::Overflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(display: &str) -> Result<String, EvalError> {
        Rewrite::parse(display).map(|r| r.to_string())
    }

    #[test]
    fn test_glyph_substitution() {
        assert_eq!(rewrite("8÷2×3").unwrap(), "8/2*3");
        assert_eq!(rewrite("2^3").unwrap(), "2**3");
        assert_eq!(rewrite("2×π").unwrap(), "2*pi");
    }

    #[test]
    fn test_roots() {
        assert_eq!(rewrite("√9").unwrap(), "sqrt(9)");
        assert_eq!(rewrite("√2.25+√16").unwrap(), "sqrt(2.25)+sqrt(16)");
        assert_eq!(
            Rewrite::parse("1+√4").unwrap().segments().last(),
            Some(&Segment::Sqrt("4".to_string()))
        );
    }

    #[test]
    fn test_root_without_operand() {
        assert_eq!(rewrite("√(9)"), Err(EvalError::MissingOperand { symbol: '√' }));
        assert_eq!(rewrite("√π"), Err(EvalError::MissingOperand { symbol: '√' }));
        assert_eq!(rewrite("2+√"), Err(EvalError::MissingOperand { symbol: '√' }));
    }

    #[test]
    fn test_factorials() {
        assert_eq!(rewrite("5!").unwrap(), "120");
        assert_eq!(rewrite("2+3!×2").unwrap(), "2+6*2");
        assert_eq!(rewrite("0!").unwrap(), "1");
        assert_eq!(rewrite("3!!").unwrap(), "720");
    }

    #[test]
    fn test_factorial_operand_errors() {
        assert_eq!(
            rewrite("2.5!"),
            Err(EvalError::InvalidFactorial {
                operand: "2.5".to_string()
            })
        );
        assert_eq!(rewrite("(3)!"), Err(EvalError::MissingOperand { symbol: '!' }));
        assert_eq!(rewrite("√9!"), Err(EvalError::MissingOperand { symbol: '!' }));
        assert_eq!(rewrite("!"), Err(EvalError::MissingOperand { symbol: '!' }));
    }

    #[test]
    fn test_factorial_limits() {
        assert_eq!(factorial("34").unwrap(), (2..=34u128).product::<u128>());
        assert_eq!(factorial("35"), Err(EvalError::Overflow));
        assert_eq!(factorial("99999999999"), Err(EvalError::Overflow));
    }
}
