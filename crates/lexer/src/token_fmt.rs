//! Deterministic one-line token formatting for golden tests and the CLI.

use crate::token::{Payload, Token};
use std::fmt::Write;

/// Format a token without its position, e.g. `ID text="div"` or `INT value=42`.
pub fn format_token(token: &Token) -> String {
    let mut out = String::from(token.kind().name());
    match token.payload() {
        Payload::None => {}
        Payload::Int(value) => {
            let _ = write!(&mut out, " value={value}");
        }
        Payload::Float { value, percent } => {
            let _ = write!(&mut out, " value={value:?}");
            if *percent {
                out.push_str(" percent=true");
            }
        }
        Payload::Text(text) => {
            let _ = write!(&mut out, " text=\"{}\"", escape_text(text));
        }
    }
    out
}

/// Format a token prefixed with its `line:column`.
pub fn format_token_at(token: &Token) -> String {
    format!("{}:{} {}", token.line(), token.column(), format_token(token))
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' || ch == '\u{7f}' => {
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}
