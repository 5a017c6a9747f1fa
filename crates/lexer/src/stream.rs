//! Grammar-context driver over a `Lexer`.
//!
//! Tracks just enough tag structure to know when a `<script ...>` open tag has
//! been closed, and pulls the following body with `scan_raw_script_body()`.
//! Everything else is plain `scan()`.

use crate::error::{AbortOnError, LexError, SyntaxError, SyntaxErrorReporter};
use crate::lexer::{Lexer, LexerConfig};
use crate::source::{CharSource, StrSource};
use crate::token::{Token, TokenKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TagContext {
    Outside,
    /// Just saw `<`.
    TagOpen,
    /// Inside `<script ...`; `self_closing` is set while the last token was `/`.
    ScriptOpenTag { self_closing: bool },
    /// `>` of a script open tag was emitted; the body comes next.
    ScriptBodyNext,
}

/// Iterator of tokens that hands script bodies to the raw-script scanner.
///
/// Fused: after the first error or end of input it yields `None`.
pub struct Tokens<'l, S, R> {
    lexer: &'l mut Lexer<S, R>,
    context: TagContext,
    done: bool,
}

impl<'l, S: CharSource, R: SyntaxErrorReporter> Tokens<'l, S, R> {
    pub fn new(lexer: &'l mut Lexer<S, R>) -> Self {
        Self {
            lexer,
            context: TagContext::Outside,
            done: false,
        }
    }

    fn observe(&mut self, kind: TokenKind) {
        self.context = match (self.context, kind) {
            (_, TokenKind::LAngle) => TagContext::TagOpen,
            (TagContext::TagOpen, TokenKind::Script) => {
                TagContext::ScriptOpenTag { self_closing: false }
            }
            (TagContext::ScriptOpenTag { self_closing }, TokenKind::RAngle) => {
                if self_closing {
                    TagContext::Outside
                } else {
                    TagContext::ScriptBodyNext
                }
            }
            (TagContext::ScriptOpenTag { .. }, TokenKind::Slash) => {
                TagContext::ScriptOpenTag { self_closing: true }
            }
            (TagContext::ScriptOpenTag { .. }, _) => {
                TagContext::ScriptOpenTag { self_closing: false }
            }
            _ => TagContext::Outside,
        };
    }
}

impl<S: CharSource, R: SyntaxErrorReporter> Iterator for Tokens<'_, S, R> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = if self.context == TagContext::ScriptBodyNext {
            self.lexer.scan_raw_script_body()
        } else {
            self.lexer.scan()
        };
        match result {
            Ok(Some(token)) => {
                self.observe(token.kind());
                Some(Ok(token))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<S: CharSource, R: SyntaxErrorReporter> Lexer<S, R> {
    /// Script-aware token iterator borrowing this lexer.
    pub fn tokens(&mut self) -> Tokens<'_, S, R> {
        Tokens::new(self)
    }
}

/// All tokens of a document plus the syntax errors recovered from.
#[derive(Debug, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    errors: Vec<SyntaxError>,
}

impl TokenStream {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

/// Tokenize a whole document with skip-one-character recovery.
///
/// Fails only when the recovery budget is exhausted.
pub fn tokenize(input: &str) -> Result<TokenStream, LexError> {
    let mut lexer = Lexer::new(StrSource::new(input));
    let tokens = lexer.tokens().collect::<Result<Vec<_>, _>>()?;
    let errors = lexer.close().into_errors();
    Ok(TokenStream { tokens, errors })
}

/// Tokenize a whole document, failing on the first syntax error.
pub fn tokenize_strict(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer =
        Lexer::with_reporter(StrSource::new(input), AbortOnError, LexerConfig::default());
    let tokens = lexer.tokens().collect::<Result<Vec<_>, _>>()?;
    lexer.close();
    Ok(tokens)
}
