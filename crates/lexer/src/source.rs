//! Character sources feeding the lexer.
//!
//! A source is positioned *before* its first character until the first
//! `advance()`. After that, `current()`, `line()` and `column()` describe the
//! character under the cursor (1-based positions).

use std::fmt;
use std::io::{self, BufRead};

/// Failure to produce the next character.
#[derive(Debug)]
pub enum SourceError {
    /// The source is exhausted. This is a normal termination signal.
    EndOfInput,
    /// The underlying reader failed (including invalid UTF-8).
    Io(io::Error),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::EndOfInput => f.write_str("end of input"),
            SourceError::Io(err) => write!(f, "source read failed: {err}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::EndOfInput => None,
            SourceError::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for SourceError {
    fn from(err: io::Error) -> Self {
        SourceError::Io(err)
    }
}

/// One-character-at-a-time input with position tracking.
pub trait CharSource {
    /// Move to the next character.
    fn advance(&mut self) -> Result<(), SourceError>;

    /// Character under the cursor. Unspecified before the first successful
    /// `advance()`.
    fn current(&self) -> char;

    fn line(&self) -> u32;

    fn column(&self) -> u32;

    /// Release the underlying resource. Further `advance()` calls report
    /// `EndOfInput`.
    fn close(&mut self);
}

/// Tracks the 1-based position of the character under the cursor.
#[derive(Clone, Copy, Debug)]
struct LineTracker {
    line: u32,
    column: u32,
    /// Position of the next character is on a new line.
    pending_newline: bool,
    started: bool,
}

impl LineTracker {
    fn new() -> Self {
        Self {
            line: 1,
            column: 0,
            pending_newline: false,
            started: false,
        }
    }

    fn step(&mut self, ch: char) {
        if self.pending_newline {
            self.line = self.line.saturating_add(1);
            self.column = 1;
        } else if self.started {
            self.column = self.column.saturating_add(1);
        } else {
            self.column = 1;
        }
        self.started = true;
        self.pending_newline = ch == '\n';
    }
}

/// In-memory source over decoded text.
#[derive(Debug)]
pub struct StrSource {
    text: String,
    /// Byte offset of the next character to read.
    offset: usize,
    current: char,
    position: LineTracker,
    closed: bool,
}

impl StrSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offset: 0,
            current: '\0',
            position: LineTracker::new(),
            closed: false,
        }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl CharSource for StrSource {
    fn advance(&mut self) -> Result<(), SourceError> {
        if self.closed {
            return Err(SourceError::EndOfInput);
        }
        let Some(ch) = self.text[self.offset..].chars().next() else {
            return Err(SourceError::EndOfInput);
        };
        self.offset += ch.len_utf8();
        self.current = ch;
        self.position.step(ch);
        Ok(())
    }

    fn current(&self) -> char {
        self.current
    }

    fn line(&self) -> u32 {
        self.position.line
    }

    fn column(&self) -> u32 {
        self.position.column
    }

    fn close(&mut self) {
        self.closed = true;
        self.text = String::new();
        self.offset = 0;
    }
}

/// Buffered stream source.
///
/// Refills one line at a time so a multi-byte character never straddles two
/// reads; invalid UTF-8 surfaces as `SourceError::Io`.
pub struct ReaderSource<R> {
    reader: Option<R>,
    line_buf: String,
    /// Byte offset into `line_buf` of the next character.
    offset: usize,
    current: char,
    position: LineTracker,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            line_buf: String::new(),
            offset: 0,
            current: '\0',
            position: LineTracker::new(),
        }
    }

    fn refill(&mut self) -> Result<bool, SourceError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };
        self.line_buf.clear();
        self.offset = 0;
        let read = reader.read_line(&mut self.line_buf)?;
        Ok(read > 0)
    }
}

impl<R: BufRead> CharSource for ReaderSource<R> {
    fn advance(&mut self) -> Result<(), SourceError> {
        loop {
            if let Some(ch) = self.line_buf[self.offset..].chars().next() {
                self.offset += ch.len_utf8();
                self.current = ch;
                self.position.step(ch);
                return Ok(());
            }
            if !self.refill()? {
                return Err(SourceError::EndOfInput);
            }
        }
    }

    fn current(&self) -> char {
        self.current
    }

    fn line(&self) -> u32 {
        self.position.line
    }

    fn column(&self) -> u32 {
        self.position.column
    }

    fn close(&mut self) {
        self.reader = None;
        self.line_buf = String::new();
        self.offset = 0;
    }
}

impl<R> fmt::Debug for ReaderSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderSource")
            .field("open", &self.reader.is_some())
            .field("line", &self.position.line)
            .field("column", &self.position.column)
            .finish()
    }
}
