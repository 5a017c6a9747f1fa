//! Text content between a `>` and the next `<`.

use super::{Expecting, Lexer};
use crate::error::{LexError, SyntaxError, SyntaxErrorKind, SyntaxErrorReporter};
use crate::source::CharSource;
use crate::token::{Token, TokenKind};

impl<S: CharSource, R: SyntaxErrorReporter> Lexer<S, R> {
    /// Scan free text up to (not including) the next `<`.
    ///
    /// Every interior whitespace run collapses to one space; a run that
    /// directly precedes the closing `<` is dropped. A backslash right before
    /// `<` is dropped, but the `<` still ends the text.
    pub(super) fn scan_free_text(&mut self, line: u32, column: u32) -> Result<Token, LexError> {
        let unterminated = || SyntaxError::new(SyntaxErrorKind::UnterminatedFreeText, line, column);

        let mut text = String::new();
        loop {
            let Some(ch) = self.current.ch else {
                return Err(unterminated().into());
            };
            text.push(ch);
            self.advance()?;
            match self.current.ch {
                Some('\\') => {
                    self.advance()?;
                    if self.current.ch != Some('<') {
                        text.push('\\');
                    }
                }
                Some('<') => break,
                None => return Err(unterminated().into()),
                Some(_) => {}
            }

            if self.skip_whitespace()? {
                match self.current.ch {
                    Some('<') => {}
                    None => return Err(unterminated().into()),
                    Some(_) => text.push(' '),
                }
            }
            if self.current.ch == Some('<') {
                break;
            }
        }

        self.set_expecting(Expecting::Structural);
        if text.ends_with(['\n', '\r']) {
            text.pop();
        }
        Ok(Token::text_payload(TokenKind::FreeText, line, column, text))
    }
}
