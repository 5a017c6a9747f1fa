//! Double-quoted values.

use super::Lexer;
use crate::error::{LexError, SyntaxError, SyntaxErrorKind, SyntaxErrorReporter};
use crate::source::CharSource;
use crate::token::{Token, TokenKind};

impl<S: CharSource, R: SyntaxErrorReporter> Lexer<S, R> {
    /// Scan a quoted value. The opening `"` has already been consumed.
    ///
    /// Only `\"` is an escape: the backslash is dropped and the quote becomes
    /// part of the value. Any other backslash is kept verbatim.
    pub(super) fn scan_quoted_value(&mut self, line: u32, column: u32) -> Result<Token, LexError> {
        let unterminated =
            || SyntaxError::new(SyntaxErrorKind::UnterminatedQuotedValue, line, column);

        if self.current.ch == Some('"') {
            self.advance()?;
            return Ok(Token::text_payload(
                TokenKind::QuotedValue,
                line,
                column,
                String::new(),
            ));
        }

        let mut value = String::new();
        loop {
            let Some(ch) = self.current.ch else {
                return Err(unterminated().into());
            };
            value.push(ch);
            self.advance()?;
            match self.current.ch {
                Some('\\') => {
                    self.advance()?;
                    if self.current.ch != Some('"') {
                        value.push('\\');
                    }
                }
                Some('"') => break,
                None => return Err(unterminated().into()),
                Some(_) => {}
            }
        }
        // closing quote
        self.advance()?;
        Ok(Token::text_payload(TokenKind::QuotedValue, line, column, value))
    }
}
