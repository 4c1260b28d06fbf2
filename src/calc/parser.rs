//! Restricted arithmetic parser and evaluator.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/' | '%') factor)*
//! factor  := ('+' | '-') factor | power
//! power   := primary ('**' factor)?
//! primary := NUMBER | 'pi' | 'sqrt' '(' expr ')' | '(' expr ')'
//! ```
//!
//! `**` is right-associative and binds tighter than a unary sign on its
//! left, so `-2**2` is `-4` and `2**-1` is `0.5`.
//!
//! Brackets, `sqrt` calls and `**` exponents may nest at most
//! [`MAX_NESTING`] levels. Sign runs and operator chains of any length are
//! handled without recursion.

use std::f64::consts::PI;

use crate::error::EvalError;

use super::number::Number;

/// Deepest allowed nesting of brackets, roots and exponents.
pub const MAX_NESTING: usize = 200;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

/// A parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal: `12`, `1.5`, `1e3`
    Number(Number),
    /// The circle constant: `pi`
    Pi,
    /// Unary minus: `-x`
    Neg(Box<Expr>),
    /// A binary operation: `a + b`
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Square root call: `sqrt(x)`
    Sqrt(Box<Expr>),
}

impl Expr {
    /// Parse an arithmetic string.
    pub fn parse(input: &str) -> Result<Self, EvalError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.expr()?;

        match parser.peek() {
            None => Ok(expr),
            Some((Token::RParen, _)) => Err(EvalError::UnbalancedBrackets),
            Some((token, position)) => Err(EvalError::UnexpectedToken {
                token: token.to_string(),
                position: *position,
            }),
        }
    }

    /// Evaluate the expression tree.
    pub fn eval(&self) -> Result<Number, EvalError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Pi => Ok(Number::Float(PI)),
            Expr::Neg(inner) => inner.eval()?.neg(),
            Expr::Sqrt(inner) => inner.eval()?.sqrt(),
            Expr::Binary { .. } => {
                // `a+b+c+...` grows down the left side; fold it in a loop
                let mut spine = Vec::new();
                let mut node = self;
                while let Expr::Binary { op, lhs, rhs } = node {
                    spine.push((*op, rhs.as_ref()));
                    node = lhs.as_ref();
                }

                let mut value = node.eval()?;
                for (op, rhs) in spine.into_iter().rev() {
                    value = op.apply(value, rhs.eval()?)?;
                }
                Ok(value)
            }
        }
    }
}

impl BinaryOp {
    fn apply(self, a: Number, b: Number) -> Result<Number, EvalError> {
        match self {
            BinaryOp::Add => a.add(b),
            BinaryOp::Sub => a.sub(b),
            BinaryOp::Mul => a.mul(b),
            BinaryOp::Div => a.div(b),
            BinaryOp::Rem => a.rem(b),
            BinaryOp::Pow => a.pow(b),
        }
    }
}

// Long operator chains would otherwise drop one box per stack frame
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(expr: &mut Expr, pending: &mut Vec<Expr>) {
    match expr {
        Expr::Neg(inner) | Expr::Sqrt(inner) => {
            pending.push(std::mem::replace(&mut **inner, Expr::Pi));
        }
        Expr::Binary { lhs, rhs, .. } => {
            pending.push(std::mem::replace(&mut **lhs, Expr::Pi));
            pending.push(std::mem::replace(&mut **rhs, Expr::Pi));
        }
        Expr::Number(_) | Expr::Pi => {}
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Number),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Ident(name) => f.write_str(name),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::StarStar => f.write_str("**"),
            Token::Slash => f.write_str("/"),
            Token::Percent => f.write_str("%"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// Split the input into tokens, tagging each with its character offset.
fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;

        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                Token::StarStar
            }
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => {
                let (number, end) = lex_number(&chars, i)?;
                i = end;
                tokens.push((Token::Number(number), start));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                tokens.push((Token::Ident(name), start));
                continue;
            }
            other => {
                return Err(EvalError::UnexpectedToken {
                    token: other.to_string(),
                    position: start,
                })
            }
        };

        tokens.push((token, start));
        i += 1;
    }

    Ok(tokens)
}

/// Lex a numeric literal starting at `start`. Returns the value and the
/// index just past it.
fn lex_number(chars: &[char], start: usize) -> Result<(Number, usize), EvalError> {
    let mut i = start;
    let mut is_float = false;

    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        is_float = true;
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }

    // A lone '.' is not a number
    if i - start == 1 && chars[start] == '.' {
        return Err(EvalError::UnexpectedToken {
            token: ".".to_string(),
            position: start,
        });
    }

    // Exponent only when digits follow: `1e5`, `1e-5`
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            is_float = true;
            i = j;
        }
    }

    let text: String = chars[start..i].iter().collect();
    let invalid = || EvalError::UnexpectedToken {
        token: text.clone(),
        position: start,
    };

    let number = if is_float {
        Number::Float(text.parse::<f64>().map_err(|_| invalid())?)
    } else {
        match text.parse::<i128>() {
            Ok(v) => Number::Int(v),
            Err(_) => Number::Float(text.parse::<f64>().map_err(|_| invalid())?),
        }
    };

    if let Number::Float(f) = number {
        if f.is_infinite() {
            return Err(EvalError::Overflow);
        }
    }

    Ok((number, i))
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(Token, usize)> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Run `parse` one nesting level deeper.
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Expr, EvalError>,
    ) -> Result<Expr, EvalError> {
        if self.depth >= MAX_NESTING {
            return Err(EvalError::TooDeep);
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn factor(&mut self) -> Result<Expr, EvalError> {
        let mut negate = false;
        loop {
            match self.peek_token() {
                Some(Token::Plus) => {}
                Some(Token::Minus) => negate = !negate,
                _ => break,
            }
            self.pos += 1;
        }

        let operand = self.power()?;
        if negate {
            Ok(Expr::Neg(Box::new(operand)))
        } else {
            Ok(operand)
        }
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.primary()?;
        if self.peek_token() == Some(&Token::StarStar) {
            self.pos += 1;
            let exponent = self.nested(Self::factor)?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let (token, position) = self.next().ok_or(EvalError::UnexpectedEnd)?;
        match token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::LParen => self.parenthesized(),
            Token::Ident(name) => match name.as_str() {
                "pi" => Ok(Expr::Pi),
                "sqrt" => match self.next() {
                    Some((Token::LParen, _)) => Ok(Expr::Sqrt(Box::new(self.parenthesized()?))),
                    Some((other, position)) => Err(EvalError::UnexpectedToken {
                        token: other.to_string(),
                        position,
                    }),
                    None => Err(EvalError::UnexpectedEnd),
                },
                _ => Err(EvalError::UnexpectedToken {
                    token: name,
                    position,
                }),
            },
            Token::RParen => Err(EvalError::UnbalancedBrackets),
            other => Err(EvalError::UnexpectedToken {
                token: other.to_string(),
                position,
            }),
        }
    }

    /// Parse the rest of a bracketed group after its opening `(`.
    fn parenthesized(&mut self) -> Result<Expr, EvalError> {
        // `(` directly at the end is a dangling bracket, not a short expression
        if self.peek().is_none() {
            return Err(EvalError::UnbalancedBrackets);
        }
        let inner = self.nested(Self::expr)?;
        match self.next() {
            Some((Token::RParen, _)) => Ok(inner),
            Some((other, position)) => Err(EvalError::UnexpectedToken {
                token: other.to_string(),
                position,
            }),
            None => Err(EvalError::UnbalancedBrackets),
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
