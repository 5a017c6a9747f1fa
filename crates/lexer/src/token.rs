//! Token model.

/// Kind of a scanned token.
///
/// Reserved-word kinds (`Template` through `Style`) are recognized by a
/// case-insensitive string match only; the lexer has no notion of where a tag
/// name may appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenKind {
    /// `<`
    LAngle,
    /// `>`
    RAngle,
    /// `/`
    Slash,
    /// `=`
    Equals,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `#`
    Hash,
    /// `*`
    Star,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `!`
    Bang,
    Integer,
    Float,
    /// Double-quoted value, quotes stripped.
    QuotedValue,
    /// Text content between `>` and the next `<`.
    FreeText,
    /// Verbatim body of a script element.
    RawScriptBody,
    Id,
    /// `template` or `body`.
    Template,
    Script,
    Head,
    Meta,
    Link,
    Html,
    Title,
    Style,
}

impl TokenKind {
    /// Punctuation kind for a single structural character.
    pub fn punctuation(ch: char) -> Option<TokenKind> {
        let kind = match ch {
            '<' => TokenKind::LAngle,
            '>' => TokenKind::RAngle,
            '/' => TokenKind::Slash,
            '=' => TokenKind::Equals,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '#' => TokenKind::Hash,
            '*' => TokenKind::Star,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '!' => TokenKind::Bang,
            _ => return None,
        };
        Some(kind)
    }

    /// Reserved-word kind for an identifier, matched ignoring ASCII case.
    pub fn reserved(word: &str) -> Option<TokenKind> {
        const RESERVED: [(&str, TokenKind); 9] = [
            ("template", TokenKind::Template),
            ("body", TokenKind::Template),
            ("script", TokenKind::Script),
            ("head", TokenKind::Head),
            ("meta", TokenKind::Meta),
            ("link", TokenKind::Link),
            ("html", TokenKind::Html),
            ("title", TokenKind::Title),
            ("style", TokenKind::Style),
        ];
        RESERVED
            .iter()
            .find(|(name, _)| word.eq_ignore_ascii_case(name))
            .map(|(_, kind)| *kind)
    }

    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            TokenKind::Template
                | TokenKind::Script
                | TokenKind::Head
                | TokenKind::Meta
                | TokenKind::Link
                | TokenKind::Html
                | TokenKind::Title
                | TokenKind::Style
        )
    }

    /// Stable upper-case name used by snapshot formatting.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::LAngle => "LT",
            TokenKind::RAngle => "GT",
            TokenKind::Slash => "SLASH",
            TokenKind::Equals => "EQ",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Hash => "HASH",
            TokenKind::Star => "STAR",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Colon => "COLON",
            TokenKind::Semicolon => "SEMI",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Bang => "BANG",
            TokenKind::Integer => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::QuotedValue => "VALUE",
            TokenKind::FreeText => "TEXT",
            TokenKind::RawScriptBody => "SCRIPT_BODY",
            TokenKind::Id => "ID",
            TokenKind::Template => "TEMPLATE",
            TokenKind::Script => "SCRIPT",
            TokenKind::Head => "HEAD",
            TokenKind::Meta => "META",
            TokenKind::Link => "LINK",
            TokenKind::Html => "HTML",
            TokenKind::Title => "TITLE",
            TokenKind::Style => "STYLE",
        }
    }
}

/// Token payload.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Payload {
    None,
    Int(i64),
    /// `percent` marks a literal written with a trailing `%`; `value` has
    /// already been divided by 100.
    Float { value: f64, percent: bool },
    Text(String),
}

/// Immutable scanned token. `line`/`column` are 1-based and point at the
/// first character of the lexeme.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    kind: TokenKind,
    line: u32,
    column: u32,
    payload: Payload,
}

impl Token {
    pub fn new(kind: TokenKind, line: u32, column: u32, payload: Payload) -> Self {
        Self {
            kind,
            line,
            column,
            payload,
        }
    }

    pub(crate) fn punct(kind: TokenKind, line: u32, column: u32) -> Self {
        Self::new(kind, line, column, Payload::None)
    }

    pub(crate) fn text_payload(kind: TokenKind, line: u32, column: u32, text: String) -> Self {
        Self::new(kind, line, column, Payload::Text(text))
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn int(&self) -> Option<i64> {
        match self.payload {
            Payload::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn float(&self) -> Option<f64> {
        match self.payload {
            Payload::Float { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_percent(&self) -> bool {
        matches!(self.payload, Payload::Float { percent: true, .. })
    }
}
