//! Formula evaluation for planning definitions.
//!
//! Planning values can be written as small arithmetic expressions such as
//! `5000*28%` or `(3000-6%)-500`. This module tokenizes and evaluates them
//! with a recursive-descent parser; nothing in the input is ever executed.
//!
//! ## Language
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor
//!         | number '-' number '%'     -- a - a*b/100
//!         | number '%'                -- n/100
//!         | number
//!         | '(' expr ')'
//! ```
//!
//! Whitespace is ignored everywhere (`1 000` is `1000`). The
//! `number '-' number '%'` production binds as one parenthesized unit, so
//! `3000-6%` is `2820`, not `2999.94`, while `(3000)-6%` is `2999.94`.
//! Results are rounded to two decimals, half away from zero. Groups and
//! unary signs may nest at most [`MAX_NESTING_DEPTH`] levels deep.

use std::fmt;

pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaErrorKind {
    /// The text is not a well-formed expression
    Syntax,
    /// The expression parsed but did not produce a usable number
    Result,
}

/// Positions refer to the formula with whitespace removed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormulaError {
    #[error("Formula is empty")]
    Empty,
    #[error("Character '{ch}' is not allowed in a formula (position {position})")]
    DisallowedCharacter { ch: char, position: usize },
    #[error("Invalid number '{literal}'")]
    InvalidNumber { literal: String },
    #[error("Unexpected '{token}' at position {position}")]
    UnexpectedToken { token: String, position: usize },
    #[error("Formula ends unexpectedly")]
    UnexpectedEnd,
    #[error("Operator '{operator}' is not supported (position {position})")]
    MalformedOperator { operator: String, position: usize },
    #[error("Formula nests deeper than {max} levels (position {position})")]
    TooDeeplyNested { max: usize, position: usize },
    #[error("Formula does not produce a finite number")]
    NonFinite,
}

impl FormulaError {
    pub fn kind(&self) -> FormulaErrorKind {
        match self {
            FormulaError::NonFinite => FormulaErrorKind::Result,
            _ => FormulaErrorKind::Syntax,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::Percent => f.write_str("%"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Spanned {
    token: Token,
    position: usize,
}

/// Stateless evaluator for the planning formula language.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaEvaluator;

impl FormulaEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a formula to a value rounded to two decimals.
    pub fn evaluate(&self, formula: &str) -> Result<f64, FormulaError> {
        let normalized: String = formula
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        if normalized.is_empty() {
            return Err(FormulaError::Empty);
        }

        let tokens = tokenize(&normalized)?;
        let mut parser = Parser { tokens: &tokens, index: 0, depth: 0 };
        let value = parser.expression()?;
        if let Some(extra) = parser.peek(0) {
            return Err(FormulaError::UnexpectedToken {
                token: extra.token.to_string(),
                position: extra.position,
            });
        }

        // Scaling to cents can overflow for finite values near f64::MAX
        let rounded = round_to_cents(value);
        if !rounded.is_finite() {
            return Err(FormulaError::NonFinite);
        }
        Ok(rounded)
    }
}

/// Round half away from zero to two decimal places.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn tokenize(input: &str) -> Result<Vec<Spanned>, FormulaError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let token = match c {
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = parse_number(&literal)?;
                tokens.push(Spanned { token: Token::Number(value), position: start });
                continue;
            }
            '+' | '-' => {
                // `++` and `--` are increment/decrement, never arithmetic
                if chars.get(i + 1) == Some(&c) {
                    return Err(FormulaError::MalformedOperator {
                        operator: format!("{}{}", c, c),
                        position: i,
                    });
                }
                if c == '+' { Token::Plus } else { Token::Minus }
            }
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(FormulaError::DisallowedCharacter { ch: other, position: i });
            }
        };
        tokens.push(Spanned { token, position: i });
        i += 1;
    }

    Ok(tokens)
}

fn parse_number(literal: &str) -> Result<f64, FormulaError> {
    let invalid = || FormulaError::InvalidNumber { literal: literal.to_string() };
    if literal == "." || literal.matches('.').count() > 1 {
        return Err(invalid());
    }
    literal.parse::<f64>().map_err(|_| invalid())
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    index: usize,
    /// Open groups and unary signs on the current path
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self, offset: usize) -> Option<Spanned> {
        self.tokens.get(self.index + offset).copied()
    }

    fn peek_token(&self, offset: usize) -> Option<Token> {
        self.peek(offset).map(|s| s.token)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let current = self.peek(0);
        if current.is_some() {
            self.index += 1;
        }
        current
    }

    fn expression(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.term()?;
        loop {
            match self.peek_token(0) {
                Some(Token::Plus) => {
                    self.advance();
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.factor()?;
        loop {
            match self.peek_token(0) {
                Some(Token::Star) => {
                    self.advance();
                    value *= self.factor()?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    value /= self.factor()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<f64, FormulaError> {
        let current = self.advance().ok_or(FormulaError::UnexpectedEnd)?;
        match current.token {
            Token::Plus => self.nested(current.position, Self::factor),
            Token::Minus => Ok(-self.nested(current.position, Self::factor)?),
            Token::LParen => {
                let value = self.nested(current.position, Self::expression)?;
                match self.advance() {
                    Some(Spanned { token: Token::RParen, .. }) => Ok(value),
                    Some(other) => Err(FormulaError::UnexpectedToken {
                        token: other.token.to_string(),
                        position: other.position,
                    }),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            Token::Number(base) => Ok(self.number_suffix(base)),
            other => Err(FormulaError::UnexpectedToken {
                token: other.to_string(),
                position: current.position,
            }),
        }
    }

    /// Runs `rule` one level deeper, failing instead of recursing past the limit.
    fn nested(
        &mut self,
        position: usize,
        rule: fn(&mut Self) -> Result<f64, FormulaError>,
    ) -> Result<f64, FormulaError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(FormulaError::TooDeeplyNested {
                max: MAX_NESTING_DEPTH,
                position,
            });
        }
        self.depth += 1;
        let value = rule(self);
        self.depth -= 1;
        value
    }

    /// Applies the percent forms that may follow a literal.
    fn number_suffix(&mut self, base: f64) -> f64 {
        if let (Some(Token::Minus), Some(Token::Number(rate)), Some(Token::Percent)) =
            (self.peek_token(0), self.peek_token(1), self.peek_token(2))
        {
            self.index += 3;
            return base - base * rate / 100.0;
        }
        if self.peek_token(0) == Some(Token::Percent) {
            self.index += 1;
            return base / 100.0;
        }
        base
    }
}
