//! Raw script bodies.
//!
//! The scanner runs one character behind the cursor: the character being
//! appended is `lookback(1)` while `current` serves as one character of
//! lookahead, so the end marker `</` is seen as `lookback(1) == '<'` and
//! `current == '/'`. On the marker the lexer rewinds one character, leaving
//! `<` under the cursor for the next `scan()`.

use super::Lexer;
use crate::error::{LexError, SyntaxError, SyntaxErrorKind, SyntaxErrorReporter};
use crate::source::CharSource;
use crate::token::{Token, TokenKind};

/// Lookback used to decide whether a closing quote was escaped. It does not
/// point at the character right before the quote; that mismatch is part of
/// the established heuristic and is kept as is.
const QUOTE_ESCAPE_LOOKBACK: usize = 4;

impl<S: CharSource, R: SyntaxErrorReporter> Lexer<S, R> {
    pub(super) fn scan_script_body(&mut self, line: u32, column: u32) -> Result<Token, LexError> {
        let unterminated =
            || SyntaxError::new(SyntaxErrorKind::UnterminatedScriptBody, line, column);

        if self.current.ch.is_none() {
            return Err(unterminated().into());
        }
        self.advance()?;

        if self.at_end_marker() {
            // `<script></script>`
            self.rewind(1);
            return Ok(Token::text_payload(
                TokenKind::RawScriptBody,
                line,
                column,
                String::new(),
            ));
        }

        let mut body = String::new();
        let mut quote: Option<char> = None;
        loop {
            if quote.is_none() && self.at_end_marker() {
                self.rewind(1);
                break;
            }
            if self.current.ch.is_none() {
                return Err(unterminated().into());
            }
            let Some(ch) = self.lookback(1) else {
                return Err(unterminated().into());
            };

            match quote {
                None if ch == '"' || ch == '\'' => quote = Some(ch),
                Some(open) if ch == open && self.lookback(QUOTE_ESCAPE_LOOKBACK) != Some('\\') => {
                    quote = None
                }
                _ => {}
            }

            body.push(ch);
            self.advance()?;
        }

        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "hnml.lexer",
            "script body: {} chars @{line}:{column}",
            body.chars().count()
        );
        Ok(Token::text_payload(TokenKind::RawScriptBody, line, column, body))
    }

    fn at_end_marker(&self) -> bool {
        self.lookback(1) == Some('<') && self.current.ch == Some('/')
    }
}
