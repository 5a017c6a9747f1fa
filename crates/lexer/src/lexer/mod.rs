//! Single-pass, mode-switching lexer.
//!
//! The lexer is pull-based: each `scan()` call consumes exactly one lexeme
//! from the character source and returns one token. It disambiguates tag
//! syntax, text content and style declarations from a handful of flags plus
//! a short history window; it never backtracks further than the two-character
//! replay window.
//!
//! Invariants:
//! - `current` always equals `history.peek_back(replay)`; while `replay > 0`
//!   `advance()` re-presents history entries instead of reading the source.
//! - `replay <= MAX_REPLAY`.
//! - Script bodies are only scanned when the caller asks for them through
//!   `scan_raw_script_body()`; `scan()` alone never decides that a script body
//!   starts.

use crate::error::{
    LexError, Recovery, SkipOnError, SyntaxError, SyntaxErrorKind, SyntaxErrorReporter,
};
use crate::history::HistoryBuffer;
use crate::source::{CharSource, SourceError};
use crate::token::{Token, TokenKind};

mod ident;
mod number;
mod quoted;
mod script;
mod text;

/// Capacity of the lookback window.
pub const HISTORY_CAPACITY: usize = 7;

/// Maximum number of consumed characters that can be re-presented.
const MAX_REPLAY: usize = 2;

/// Script-tag counter value once `<`, `script` and `>` have been seen in a row.
const SCRIPT_OPENED: u8 = 3;

/// What the next non-punctuation lexeme is expected to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expecting {
    /// Tag names, attributes, values, style declarations.
    Structural,
    /// Text content after a `>`.
    FreeText,
}

#[derive(Clone, Debug)]
pub struct LexerConfig {
    /// Upper bound on skip-and-continue recoveries over the lexer lifetime.
    /// The next syntax error past this bound aborts even if the reporter asks
    /// to continue.
    pub max_recoveries: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            max_recoveries: 1024,
        }
    }
}

/// Minimal lexer instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LexerStats {
    /// Characters pulled from the source (replays excluded).
    pub chars_read: u64,
    pub replays: u64,
    pub tokens_emitted: u64,
    pub errors_reported: u64,
    pub recoveries: u64,
}

/// A consumed character and where it was read. `ch == None` marks the end of
/// input; it is pushed into the history once so replay can return to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Scanned {
    ch: Option<char>,
    line: u32,
    column: u32,
}

pub struct Lexer<S, R = SkipOnError> {
    source: S,
    reporter: R,
    config: LexerConfig,
    current: Scanned,
    history: HistoryBuffer<Scanned, HISTORY_CAPACITY>,
    replay: usize,
    expecting: Expecting,
    script_tag: u8,
    in_style: bool,
    started: bool,
    exhausted: bool,
    stats: LexerStats,
}

impl<S: CharSource> Lexer<S, SkipOnError> {
    /// Lexer with the default skip-one-character recovery policy.
    pub fn new(source: S) -> Self {
        Self::with_reporter(source, SkipOnError::new(), LexerConfig::default())
    }
}

impl<S: CharSource, R: SyntaxErrorReporter> Lexer<S, R> {
    pub fn with_reporter(source: S, reporter: R, config: LexerConfig) -> Self {
        Self {
            source,
            reporter,
            config,
            current: Scanned::default(),
            history: HistoryBuffer::new(),
            replay: 0,
            expecting: Expecting::Structural,
            script_tag: 0,
            in_style: false,
            started: false,
            exhausted: false,
            stats: LexerStats::default(),
        }
    }

    /// Scan the next token. `Ok(None)` signals end of input.
    pub fn scan(&mut self) -> Result<Option<Token>, LexError> {
        self.ensure_started()?;
        loop {
            self.skip_whitespace()?;
            let Scanned { ch, line, column } = self.current;
            let Some(ch) = ch else {
                return Ok(None);
            };
            match self.dispatch(ch, line, column) {
                Ok(token) => return Ok(Some(self.emit(token))),
                Err(LexError::Syntax(err)) => self.recover(err)?,
                Err(err) => return Err(err),
            }
        }
    }

    /// Scan the verbatim body of a script element.
    ///
    /// Only valid immediately after the caller consumed the `>` closing a
    /// `<script ...>` open tag; the lexer cannot tell on its own.
    pub fn scan_raw_script_body(&mut self) -> Result<Option<Token>, LexError> {
        self.ensure_started()?;
        let Scanned { line, column, .. } = self.current;
        match self.scan_script_body(line, column) {
            Ok(token) => Ok(Some(self.emit(token))),
            Err(LexError::Syntax(err)) => {
                self.recover(err)?;
                self.scan()
            }
            Err(err) => Err(err),
        }
    }

    /// Consume characters until the current one is `target`. Returns `false`
    /// if the input ran out first.
    pub fn skip_until(&mut self, target: char) -> Result<bool, LexError> {
        self.ensure_started()?;
        loop {
            match self.current.ch {
                Some(ch) if ch == target => return Ok(true),
                Some(_) => self.advance()?,
                None => return Ok(false),
            }
        }
    }

    pub fn expecting(&self) -> Expecting {
        self.expecting
    }

    /// `true` once `<`, `script` and `>` were scanned back to back; the
    /// caller should now invoke `scan_raw_script_body()`.
    pub fn script_tag_opened(&self) -> bool {
        self.script_tag >= SCRIPT_OPENED
    }

    pub fn in_style(&self) -> bool {
        self.in_style
    }

    pub fn stats(&self) -> LexerStats {
        self.stats
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Release the character source and hand back the reporter.
    pub fn close(self) -> R {
        let Lexer {
            mut source,
            reporter,
            stats,
            ..
        } = self;
        source.close();
        log::debug!(
            target: "hnml.lexer",
            "closed: chars={} tokens={} errors={} replays={}",
            stats.chars_read,
            stats.tokens_emitted,
            stats.errors_reported,
            stats.replays
        );
        reporter
    }

    fn dispatch(&mut self, ch: char, line: u32, column: u32) -> Result<Token, LexError> {
        match ch {
            '<' => {
                self.script_tag = 1;
                self.set_expecting(Expecting::Structural);
                self.advance()?;
                return Ok(Token::punct(TokenKind::LAngle, line, column));
            }
            '>' => {
                self.script_tag = self.script_tag.saturating_add(1);
                self.set_expecting(Expecting::FreeText);
                self.advance()?;
                return Ok(Token::punct(TokenKind::RAngle, line, column));
            }
            '"' => {
                self.script_tag = 0;
                self.advance()?;
                return self.scan_quoted_value(line, column);
            }
            _ => {}
        }

        if let Some(kind) = TokenKind::punctuation(ch) {
            self.script_tag = 0;
            self.advance()?;
            return Ok(Token::punct(kind, line, column));
        }

        if self.expecting == Expecting::FreeText
            && self.script_tag < SCRIPT_OPENED
            && !self.in_style
        {
            return self.scan_free_text(line, column);
        }

        if ch.is_ascii_digit() || ch == '-' {
            self.script_tag = 0;
            return self.scan_number(line, column);
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            return self.scan_identifier(line, column);
        }

        Err(SyntaxError::new(SyntaxErrorKind::UnknownToken(ch), line, column).into())
    }

    /// Hand a syntax error to the reporter. `Ok(())` means the offending
    /// input was skipped and scanning may continue.
    fn recover(&mut self, err: SyntaxError) -> Result<(), LexError> {
        self.stats.errors_reported = self.stats.errors_reported.saturating_add(1);
        let decision = self.reporter.report(&err);
        let exhausted_budget = self.stats.recoveries >= self.config.max_recoveries as u64;
        if decision == Recovery::Abort || exhausted_budget {
            return Err(LexError::Syntax(err));
        }
        self.stats.recoveries = self.stats.recoveries.saturating_add(1);
        if lexeme_consumed(&err.kind) {
            return Ok(());
        }
        self.advance()
    }

    fn ensure_started(&mut self) -> Result<(), LexError> {
        if !self.started {
            self.started = true;
            self.advance()?;
        }
        Ok(())
    }

    /// Move to the next character, replaying history first.
    fn advance(&mut self) -> Result<(), LexError> {
        if self.replay > 0 {
            self.replay -= 1;
            self.current = self.history.peek_back(self.replay);
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(
                target: "hnml.lexer",
                "replay {:?} (pending={})",
                self.current.ch,
                self.replay
            );
            return Ok(());
        }
        if self.exhausted {
            return Ok(());
        }
        match self.source.advance() {
            Ok(()) => {
                self.current = Scanned {
                    ch: Some(self.source.current()),
                    line: self.source.line(),
                    column: self.source.column(),
                };
                self.stats.chars_read = self.stats.chars_read.saturating_add(1);
            }
            Err(SourceError::EndOfInput) => {
                self.exhausted = true;
                self.current.ch = None;
            }
            Err(SourceError::Io(err)) => return Err(LexError::Source(err)),
        }
        self.history.push(self.current);
        Ok(())
    }

    /// Step back `n` consumed characters; the following `advance()` calls
    /// re-present them in order before the source is read again.
    fn rewind(&mut self, n: usize) {
        assert!(
            n > 0 && self.replay + n <= MAX_REPLAY,
            "rewind by {n} exceeds replay window (pending={}, max={MAX_REPLAY})",
            self.replay
        );
        self.replay += n;
        self.current = self.history.peek_back(self.replay);
        self.stats.replays = self.stats.replays.saturating_add(1);
    }

    /// Character `n` positions before the current one.
    fn lookback(&self, n: usize) -> Option<char> {
        self.history.peek_back(self.replay + n).ch
    }

    fn skip_whitespace(&mut self) -> Result<bool, LexError> {
        let mut skipped = false;
        while self.current.ch.is_some_and(is_whitespace) {
            skipped = true;
            self.advance()?;
        }
        Ok(skipped)
    }

    fn set_expecting(&mut self, next: Expecting) {
        if self.expecting == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "hnml.lexer",
            "expecting {:?} -> {:?} @{}:{}",
            self.expecting,
            next,
            self.current.line,
            self.current.column
        );
        self.expecting = next;
    }

    fn emit(&mut self, token: Token) -> Token {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "hnml.lexer", "emit token: {token:?}");
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
        token
    }
}

/// Errors raised after the whole lexeme was read. The cursor already sits on
/// the character that follows it, so recovery must not skip anything.
fn lexeme_consumed(kind: &SyntaxErrorKind) -> bool {
    matches!(kind, SyntaxErrorKind::NumberOutOfRange)
}

/// Whitespace skipped between lexemes and collapsed inside text content.
fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\r' | '\n' | '\t' | '\x0c' | '\x08')
}

#[cfg(test)]
mod tests;
