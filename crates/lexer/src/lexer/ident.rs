//! Identifiers and reserved words.

use super::Lexer;
use crate::error::{LexError, SyntaxErrorReporter};
use crate::source::CharSource;
use crate::token::{Token, TokenKind};

/// Distance from the character after `style` back to the character before it.
const STYLE_TAG_LOOKBACK: usize = "style".len() + 1;

impl<S: CharSource, R: SyntaxErrorReporter> Lexer<S, R> {
    /// Scan `[A-Za-z_][A-Za-z0-9._-]*` and classify reserved words.
    pub(super) fn scan_identifier(&mut self, line: u32, column: u32) -> Result<Token, LexError> {
        let mut word = String::new();
        while let Some(ch) = self.current.ch.filter(|&ch| is_identifier_char(ch)) {
            word.push(ch);
            self.advance()?;
        }

        let kind = TokenKind::reserved(&word).unwrap_or(TokenKind::Id);
        match kind {
            TokenKind::Script => self.script_tag = self.script_tag.saturating_add(1),
            TokenKind::Style => {
                // Toggles on a `<style` tag name, clears on any later `style`.
                let opens = self.lookback(STYLE_TAG_LOOKBACK) == Some('<');
                self.in_style = !self.in_style && opens;
                #[cfg(any(test, feature = "debug-stats"))]
                log::trace!(target: "hnml.lexer", "in_style={} @{line}:{column}", self.in_style);
            }
            _ => {}
        }
        Ok(Token::text_payload(kind, line, column, word))
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_')
}
