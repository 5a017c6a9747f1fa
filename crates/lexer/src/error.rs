//! Syntax errors and the recovery policy seam.

use std::fmt;
use std::io;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// No sub-scanner accepts this leading character.
    UnknownToken(char),
    /// A number start (`-`) not followed by a digit.
    MalformedNumber,
    /// Integer literal does not fit in `i64`. Reported once the whole literal
    /// has been read; recovery resumes right after it.
    NumberOutOfRange,
    UnterminatedQuotedValue,
    UnterminatedFreeText,
    UnterminatedScriptBody,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::UnknownToken(ch) => write!(f, "unknown token {ch:?}"),
            SyntaxErrorKind::MalformedNumber => f.write_str("malformed number"),
            SyntaxErrorKind::NumberOutOfRange => f.write_str("integer literal out of range"),
            SyntaxErrorKind::UnterminatedQuotedValue => f.write_str("unterminated quoted value"),
            SyntaxErrorKind::UnterminatedFreeText => {
                f.write_str("unterminated text content (missing '<')")
            }
            SyntaxErrorKind::UnterminatedScriptBody => {
                f.write_str("unterminated script body (missing '</')")
            }
        }
    }
}

/// Malformed lexeme at a 1-based source position (start of the lexeme).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub line: u32,
    pub column: u32,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, line: u32, column: u32) -> Self {
        Self { kind, line, column }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.kind, self.line, self.column)
    }
}

impl std::error::Error for SyntaxError {}

/// Fatal outcome of a `scan` call. End of input is not an error; it is
/// reported as `Ok(None)`.
#[derive(Debug)]
pub enum LexError {
    /// The reporter chose to abort on this syntax error.
    Syntax(SyntaxError),
    /// The character source failed.
    Source(io::Error),
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::Syntax(err) => write!(f, "syntax error: {err}"),
            LexError::Source(err) => write!(f, "read error: {err}"),
        }
    }
}

impl std::error::Error for LexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LexError::Syntax(err) => Some(err),
            LexError::Source(err) => Some(err),
        }
    }
}

impl From<SyntaxError> for LexError {
    fn from(err: SyntaxError) -> Self {
        LexError::Syntax(err)
    }
}

/// What the lexer should do after a syntax error was reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
    Abort,
    /// Skip the offending character and scan again. A literal that was read
    /// in full (an out-of-range integer) is dropped as a whole instead.
    SkipOneAndContinue,
}

/// Receives every syntax error and decides whether scanning continues.
///
/// Called synchronously from inside `scan`; the decision only affects the
/// current call.
pub trait SyntaxErrorReporter {
    fn report(&mut self, error: &SyntaxError) -> Recovery;
}

impl<F> SyntaxErrorReporter for F
where
    F: FnMut(&SyntaxError) -> Recovery,
{
    fn report(&mut self, error: &SyntaxError) -> Recovery {
        self(error)
    }
}

/// Strict mode: the first syntax error fails the scan.
#[derive(Clone, Copy, Debug, Default)]
pub struct AbortOnError;

impl SyntaxErrorReporter for AbortOnError {
    fn report(&mut self, _error: &SyntaxError) -> Recovery {
        Recovery::Abort
    }
}

/// Best-effort mode: record the error, skip one character, keep going.
#[derive(Clone, Debug, Default)]
pub struct SkipOnError {
    errors: Vec<SyntaxError>,
}

impl SkipOnError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }
}

impl SyntaxErrorReporter for SkipOnError {
    fn report(&mut self, error: &SyntaxError) -> Recovery {
        log::warn!(target: "hnml.lexer", "recovering from {error}");
        self.errors.push(error.clone());
        Recovery::SkipOneAndContinue
    }
}
