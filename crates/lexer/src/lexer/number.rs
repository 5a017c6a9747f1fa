//! Numeric literals: integers, decimals, percentages and exponents.

use super::Lexer;
use crate::error::{LexError, SyntaxError, SyntaxErrorKind, SyntaxErrorReporter};
use crate::source::CharSource;
use crate::token::{Payload, Token, TokenKind};

impl<S: CharSource, R: SyntaxErrorReporter> Lexer<S, R> {
    /// Scan `-?digits(.digits)?(%|[eE]-?digits)?`.
    ///
    /// Integers are `i64`; anything with a fraction, percent sign or exponent
    /// is an `f64`. An `e`/`E` that is not followed by exponent digits is
    /// given back so it starts the next lexeme (`10em` is `10` then `em`).
    pub(super) fn scan_number(&mut self, line: u32, column: u32) -> Result<Token, LexError> {
        let negative = self.current.ch == Some('-');
        if negative {
            self.advance()?;
        }
        if !self.current.ch.is_some_and(|ch| ch.is_ascii_digit()) {
            if negative {
                // Leave the cursor on the `-` so recovery skips exactly it.
                self.rewind(1);
            }
            return Err(SyntaxError::new(SyntaxErrorKind::MalformedNumber, line, column).into());
        }

        let mut literal = Literal::default();
        while let Some(digit) = self.current_digit() {
            literal.push_integer_digit(digit);
            self.advance()?;
        }

        let mut fractional = false;
        match self.current.ch {
            Some('%') => {
                self.advance()?;
                return Ok(literal.percent(negative, line, column));
            }
            Some('.') => {
                fractional = true;
                self.advance()?;
                while let Some(digit) = self.current_digit() {
                    literal.push_fraction_digit(digit);
                    self.advance()?;
                }
                if self.current.ch == Some('%') {
                    self.advance()?;
                    return Ok(literal.percent(negative, line, column));
                }
            }
            Some('e' | 'E') => {}
            _ => return literal.integer(negative, line, column),
        }

        let mut exponent: Option<i32> = None;
        if matches!(self.current.ch, Some('e' | 'E')) {
            self.advance()?;
            let mut consumed = 1;
            let exponent_negative = self.current.ch == Some('-');
            if exponent_negative {
                self.advance()?;
                consumed += 1;
            }
            if self.current_digit().is_some() {
                let mut value: i32 = 0;
                while let Some(digit) = self.current_digit() {
                    value = value.saturating_mul(10).saturating_add(digit as i32);
                    self.advance()?;
                }
                exponent = Some(if exponent_negative { -value } else { value });
            } else {
                self.rewind(consumed);
            }
        }

        match exponent {
            Some(exponent) => Ok(literal.float(negative, exponent, line, column)),
            None if fractional => Ok(literal.float(negative, 0, line, column)),
            None => literal.integer(negative, line, column),
        }
    }

    fn current_digit(&self) -> Option<u32> {
        self.current.ch.and_then(|ch| ch.to_digit(10))
    }
}

/// Digits accumulated so far.
#[derive(Debug, Default)]
struct Literal {
    /// Magnitude of the integer part; the sign is applied at the end so
    /// `i64::MIN` stays representable.
    integer: u64,
    /// The integer part no longer fits in `u64`.
    overflowed: bool,
    /// All digits (integer and fraction) as one magnitude.
    digits: f64,
    fraction_digits: i32,
}

impl Literal {
    fn push_integer_digit(&mut self, digit: u32) {
        match self
            .integer
            .checked_mul(10)
            .and_then(|value| value.checked_add(u64::from(digit)))
        {
            Some(value) => self.integer = value,
            None => self.overflowed = true,
        }
        self.digits = self.digits * 10.0 + f64::from(digit);
    }

    fn push_fraction_digit(&mut self, digit: u32) {
        self.digits = self.digits * 10.0 + f64::from(digit);
        self.fraction_digits = self.fraction_digits.saturating_add(1);
    }

    fn integer(&self, negative: bool, line: u32, column: u32) -> Result<Token, LexError> {
        let value = if self.overflowed {
            None
        } else if negative {
            0i64.checked_sub_unsigned(self.integer)
        } else {
            i64::try_from(self.integer).ok()
        };
        match value {
            Some(value) => Ok(Token::new(TokenKind::Integer, line, column, Payload::Int(value))),
            None => Err(SyntaxError::new(SyntaxErrorKind::NumberOutOfRange, line, column).into()),
        }
    }

    fn float(&self, negative: bool, exponent: i32, line: u32, column: u32) -> Token {
        let value = scale(self.digits, exponent.saturating_sub(self.fraction_digits));
        Token::new(
            TokenKind::Float,
            line,
            column,
            Payload::Float {
                value: if negative { -value } else { value },
                percent: false,
            },
        )
    }

    fn percent(&self, negative: bool, line: u32, column: u32) -> Token {
        let value = scale(self.digits, -self.fraction_digits.saturating_add(2));
        Token::new(
            TokenKind::Float,
            line,
            column,
            Payload::Float {
                value: if negative { -value } else { value },
                percent: true,
            },
        )
    }
}

/// `digits * 10^power`, dividing for negative powers so short decimal
/// literals come out exact. Large powers are applied in steps so the result
/// saturates to zero or infinity instead of becoming NaN.
fn scale(mut digits: f64, mut power: i32) -> f64 {
    const STEP: i32 = 300;
    while power > 0 && digits.is_finite() && digits != 0.0 {
        let step = power.min(STEP);
        digits *= 10f64.powi(step);
        power -= step;
    }
    while power < 0 && digits.is_finite() && digits != 0.0 {
        let step = power.saturating_neg().min(STEP);
        digits /= 10f64.powi(step);
        power += step;
    }
    digits
}
