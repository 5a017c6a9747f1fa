//! Lexer for a hybrid markup language: HTML-like tags, inline style blocks and
//! opaque script bodies.
//!
//! The lexer is pull-based. A caller (normally the grammar layer) asks for one
//! token at a time with [`Lexer::scan`] and switches to
//! [`Lexer::scan_raw_script_body`] itself right after it has consumed a
//! `<script ...>` open tag. [`Lexer::tokens`] and [`tokenize`] wrap that
//! decision for callers that just want the whole token sequence.

pub mod error;
pub mod history;
pub mod source;
pub mod token;
pub mod token_fmt;

mod lexer;
mod stream;

pub use crate::error::{
    AbortOnError, LexError, Recovery, SkipOnError, SyntaxError, SyntaxErrorKind,
    SyntaxErrorReporter,
};
pub use crate::history::HistoryBuffer;
pub use crate::lexer::{Expecting, HISTORY_CAPACITY, Lexer, LexerConfig, LexerStats};
pub use crate::source::{CharSource, ReaderSource, SourceError, StrSource};
pub use crate::stream::{TokenStream, Tokens, tokenize, tokenize_strict};
pub use crate::token::{Payload, Token, TokenKind};
pub use crate::token_fmt::{format_token, format_token_at};
