use super::{Expecting, Lexer, LexerConfig};
use crate::error::{AbortOnError, LexError, Recovery, SyntaxError, SyntaxErrorKind};
use crate::source::{ReaderSource, StrSource};
use crate::token::{Token, TokenKind};
use crate::token_fmt::{format_token, format_token_at};
use std::io::Cursor;

fn strict(input: &str) -> Lexer<StrSource, AbortOnError> {
    Lexer::with_reporter(StrSource::new(input), AbortOnError, LexerConfig::default())
}

/// Plain `scan()` until end of input, no script handling.
fn scan_all(input: &str) -> Vec<Token> {
    let mut lexer = strict(input);
    let mut out = Vec::new();
    while let Some(token) = lexer
        .scan()
        .unwrap_or_else(|err| panic!("unexpected lex error for {input:?}: {err}"))
    {
        out.push(token);
    }
    out
}

fn scan_fmt(input: &str) -> Vec<String> {
    scan_all(input).iter().map(format_token).collect()
}

/// Script-aware token sequence.
fn tokens_fmt(input: &str) -> Vec<String> {
    let mut lexer = strict(input);
    lexer
        .tokens()
        .map(|token| {
            format_token(
                &token.unwrap_or_else(|err| panic!("unexpected lex error for {input:?}: {err}")),
            )
        })
        .collect()
}

fn single(input: &str) -> Token {
    let tokens = scan_all(input);
    assert_eq!(tokens.len(), 1, "expected one token for {input:?}: {tokens:?}");
    tokens.into_iter().next().expect("one token")
}

#[test]
fn integers_round_trip_with_sign() {
    for n in [0i64, 7, 42, 1_234_567_890, i64::MAX] {
        let token = single(&n.to_string());
        assert_eq!(token.kind(), TokenKind::Integer);
        assert_eq!(token.int(), Some(n));

        let token = single(&format!("-{n}"));
        assert_eq!(token.kind(), TokenKind::Integer);
        assert_eq!(token.int(), Some(-n));
    }
}

#[test]
fn percentages_are_divided_by_one_hundred() {
    let token = single("42%");
    assert_eq!(token.kind(), TokenKind::Float);
    assert_eq!(token.float(), Some(0.42));
    assert!(token.is_percent());

    let token = single("-3.5%");
    assert_eq!(token.float(), Some(-0.035));
    assert!(token.is_percent());
}

#[test]
fn decimals_and_exponents_are_floats() {
    assert_eq!(single("1.25e2").float(), Some(125.0));
    assert_eq!(single("1e-1").float(), Some(0.1));
    assert_eq!(single("1E3").float(), Some(1000.0));
    assert_eq!(single("2.5").float(), Some(2.5));
    assert_eq!(single("-0.5").float(), Some(-0.5));
    assert!(!single("1.25e2").is_percent());
}

#[test]
fn exponent_marker_without_digits_starts_next_lexeme() {
    assert_eq!(scan_fmt("10em"), vec!["INT value=10", "ID text=\"em\""]);
    assert_eq!(scan_fmt("2e-x"), vec!["INT value=2", "ID text=\"e-x\""]);
    assert_eq!(scan_fmt("1.5em"), vec!["FLOAT value=1.5", "ID text=\"em\""]);
}

#[test]
fn number_followed_by_punctuation_is_not_duplicated() {
    assert_eq!(
        scan_fmt("1.5;2;"),
        vec!["FLOAT value=1.5", "SEMI", "INT value=2", "SEMI"]
    );
}

#[test]
fn integer_overflow_is_a_syntax_error() {
    let mut lexer = strict("99999999999999999999");
    match lexer.scan() {
        Err(LexError::Syntax(err)) => {
            assert_eq!(err.kind, SyntaxErrorKind::NumberOutOfRange);
            assert_eq!((err.line, err.column), (1, 1));
        }
        other => panic!("expected overflow error, got {other:?}"),
    }
    // Fractions take the float path and never overflow.
    assert_eq!(
        single("99999999999999999999.5").kind(),
        TokenKind::Float
    );
}

#[test]
fn integer_bounds_follow_i64() {
    assert_eq!(single("-9223372036854775808").int(), Some(i64::MIN));
    assert_eq!(single("9223372036854775807").int(), Some(i64::MAX));
    match strict("9223372036854775808").scan() {
        Err(LexError::Syntax(err)) => assert_eq!(err.kind, SyntaxErrorKind::NumberOutOfRange),
        other => panic!("expected overflow error, got {other:?}"),
    }
    match strict("-9223372036854775809").scan() {
        Err(LexError::Syntax(err)) => assert_eq!(err.kind, SyntaxErrorKind::NumberOutOfRange),
        other => panic!("expected overflow error, got {other:?}"),
    }
}

#[test]
fn out_of_range_integer_is_dropped_without_eating_the_next_character() {
    let mut lexer = Lexer::new(StrSource::new("<a x=99999999999999999999>hi</a>"));
    let mut seen = Vec::new();
    while let Some(token) = lexer.scan().expect("recovers") {
        seen.push(format_token_at(&token));
    }
    assert_eq!(
        seen,
        vec![
            "1:1 LT",
            "1:2 ID text=\"a\"",
            "1:4 ID text=\"x\"",
            "1:5 EQ",
            "1:26 GT",
            "1:27 TEXT text=\"hi\"",
            "1:29 LT",
            "1:30 SLASH",
            "1:31 ID text=\"a\"",
            "1:32 GT",
        ]
    );
    assert_eq!(
        lexer.close().errors(),
        &[SyntaxError::new(SyntaxErrorKind::NumberOutOfRange, 1, 6)]
    );
}

#[test]
fn lone_minus_is_a_malformed_number() {
    let mut lexer = strict("-x");
    match lexer.scan() {
        Err(LexError::Syntax(err)) => assert_eq!(err.kind, SyntaxErrorKind::MalformedNumber),
        other => panic!("expected malformed number, got {other:?}"),
    }

    let mut lexer = Lexer::new(StrSource::new("-x"));
    let token = lexer.scan().expect("recovers").expect("token");
    assert_eq!(format_token(&token), "ID text=\"x\"");
    assert_eq!(lexer.close().errors().len(), 1);
}

#[test]
fn quoted_values() {
    assert_eq!(scan_fmt(r#""abc""#), vec![r#"VALUE text="abc""#]);
    assert_eq!(scan_fmt(r#""""#), vec![r#"VALUE text="""#]);
    let token = single(r#""a\"b""#);
    assert_eq!(token.kind(), TokenKind::QuotedValue);
    assert_eq!(token.text(), Some("a\"b"));
    // Only `\"` is an escape.
    assert_eq!(single(r#""a\nb""#).text(), Some("a\\nb"));
}

#[test]
fn unterminated_quoted_value_reports_lexeme_start() {
    let mut lexer = strict("<a href=\n  \"abc");
    for _ in 0..4 {
        lexer.scan().expect("tag prefix").expect("token");
    }
    match lexer.scan() {
        Err(LexError::Syntax(err)) => {
            assert_eq!(err.kind, SyntaxErrorKind::UnterminatedQuotedValue);
            assert_eq!((err.line, err.column), (2, 3));
        }
        other => panic!("expected unterminated value, got {other:?}"),
    }
}

#[test]
fn free_text_collapses_whitespace_and_trims_the_end() {
    assert_eq!(
        scan_fmt(">hello   world\n<"),
        vec!["GT", "TEXT text=\"hello world\"", "LT"]
    );
    assert_eq!(
        scan_fmt("<p>\n  two\t\tlines\r\n  here  </p>"),
        vec![
            "LT",
            "ID text=\"p\"",
            "GT",
            "TEXT text=\"two lines here\"",
            "LT",
            "SLASH",
            "ID text=\"p\"",
            "GT",
        ]
    );
}

#[test]
fn free_text_drops_backslash_before_angle() {
    assert_eq!(
        scan_fmt(r"<p>a\<b</p>"),
        vec![
            "LT",
            "ID text=\"p\"",
            "GT",
            "TEXT text=\"a\"",
            "LT",
            "ID text=\"b\"",
            "LT",
            "SLASH",
            "ID text=\"p\"",
            "GT",
        ]
    );
    assert_eq!(scan_fmt(r">a\b<")[1], r#"TEXT text="a\\b""#);
}

#[test]
fn punctuation_wins_over_free_text_at_lexeme_start() {
    assert_eq!(
        scan_fmt("<p>/path</p>"),
        vec![
            "LT",
            "ID text=\"p\"",
            "GT",
            "SLASH",
            "TEXT text=\"path\"",
            "LT",
            "SLASH",
            "ID text=\"p\"",
            "GT",
        ]
    );
    assert_eq!(
        scan_fmt("<p>\"q\" tail</p>")[3..5],
        ["VALUE text=\"q\"", "TEXT text=\"tail\""]
    );
    // Once text has started, quotes and punctuation are content.
    assert_eq!(
        scan_fmt("<p>a \"b\"; c</p>")[3],
        r#"TEXT text="a \"b\"; c""#
    );
}

#[test]
fn unterminated_free_text_is_reported() {
    let mut lexer = strict("<p>abc");
    for _ in 0..3 {
        lexer.scan().expect("tag").expect("token");
    }
    match lexer.scan() {
        Err(LexError::Syntax(err)) => {
            assert_eq!(err.kind, SyntaxErrorKind::UnterminatedFreeText);
            assert_eq!((err.line, err.column), (1, 4));
        }
        other => panic!("expected unterminated text, got {other:?}"),
    }
}

#[test]
fn script_body_ignores_end_marker_inside_quotes() {
    assert_eq!(
        tokens_fmt(r#"<script>var x = "</not-a-tag>";</script>"#),
        vec![
            "LT",
            "SCRIPT text=\"script\"",
            "GT",
            r#"SCRIPT_BODY text="var x = \"</not-a-tag>\";""#,
            "LT",
            "SLASH",
            "SCRIPT text=\"script\"",
            "GT",
        ]
    );
    assert_eq!(
        tokens_fmt("<script>s = '</b>' + 1</script>")[3],
        r#"SCRIPT_BODY text="s = '</b>' + 1""#
    );
}

#[test]
fn script_body_is_verbatim() {
    let mut lexer = strict("<script>\n  if (a < b) {\n\tf();\n  }\n</script>");
    let body = lexer
        .tokens()
        .map(|token| token.expect("lexes"))
        .find(|token| token.kind() == TokenKind::RawScriptBody)
        .expect("script body");
    assert_eq!(body.text(), Some("\n  if (a < b) {\n\tf();\n  }\n"));
    assert_eq!((body.line(), body.column()), (1, 9));
}

/// Body of the first script element, driven through the manual API.
fn first_script_body(input: &str) -> String {
    let mut lexer = strict(input);
    for _ in 0..3 {
        lexer.scan().expect("open tag").expect("token");
    }
    assert!(lexer.script_tag_opened(), "{input}");
    let body = lexer
        .scan_raw_script_body()
        .expect("body")
        .expect("token");
    body.text().expect("text payload").to_string()
}

#[test]
fn backslash_three_before_closing_quote_keeps_string_open() {
    // The quote after `xy` looks escaped, so the `</b>` that follows is still
    // inside the string and the body runs on to the next `"`.
    assert_eq!(
        first_script_body(r#"<script>a = "\xy"</b>";</script>"#),
        r#"a = "\xy"</b>";"#
    );
}

#[test]
fn backslash_right_before_closing_quote_does_not_escape_it() {
    // Only the character three before the quote is inspected, so `\"` closes
    // the string and the following `</` ends the body.
    assert_eq!(
        first_script_body(r#"<script>a = "xy\"</b>";</script>"#),
        r#"a = "xy\""#
    );
}

#[test]
fn empty_script_element_yields_empty_body() {
    assert_eq!(
        tokens_fmt("<script></script>"),
        vec![
            "LT",
            "SCRIPT text=\"script\"",
            "GT",
            "SCRIPT_BODY text=\"\"",
            "LT",
            "SLASH",
            "SCRIPT text=\"script\"",
            "GT",
        ]
    );
}

#[test]
fn raw_script_scanner_is_driven_by_the_caller() {
    let mut lexer = strict("<script>go()</script>");
    for _ in 0..3 {
        lexer.scan().expect("open tag").expect("token");
    }
    assert!(lexer.script_tag_opened());
    let body = lexer
        .scan_raw_script_body()
        .expect("body")
        .expect("token");
    assert_eq!(body.kind(), TokenKind::RawScriptBody);
    assert_eq!(body.text(), Some("go()"));

    let lt = lexer.scan().expect("lt").expect("token");
    assert_eq!((lt.kind(), lt.line(), lt.column()), (TokenKind::LAngle, 1, 13));
    assert!(lexer.stats().replays >= 1);
}

#[test]
fn script_with_attributes_uses_grammar_context() {
    assert_eq!(
        tokens_fmt("<script type=\"lua\">print(1)</script>")[6],
        r#"SCRIPT_BODY text="print(1)""#
    );
    // Self-closing script tags have no body.
    assert_eq!(
        tokens_fmt("<script src=\"a.js\"/><p>x</p>")[7],
        "LT"
    );
}

#[test]
fn unterminated_script_body_is_reported() {
    let mut lexer = strict("<script>var a = 1;");
    let err = lexer
        .tokens()
        .find_map(Result::err)
        .expect("unterminated script");
    match err {
        LexError::Syntax(err) => {
            assert_eq!(err.kind, SyntaxErrorKind::UnterminatedScriptBody);
            assert_eq!((err.line, err.column), (1, 9));
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn script_keyword_is_case_insensitive() {
    for input in ["<SCRIPT>", "<Script>", "<script>"] {
        let mut lexer = strict(input);
        assert!(!lexer.script_tag_opened());
        lexer.scan().expect("lt").expect("token");
        let keyword = lexer.scan().expect("keyword").expect("token");
        assert_eq!(keyword.kind(), TokenKind::Script);
        assert_eq!(keyword.text(), Some(&input[1..7]));
        lexer.scan().expect("gt").expect("token");
        assert!(lexer.script_tag_opened(), "{input}");
    }
}

#[test]
fn script_counter_resets_on_other_punctuation() {
    let mut lexer = strict("<script =>");
    for _ in 0..4 {
        lexer.scan().expect("token").expect("token");
    }
    assert!(!lexer.script_tag_opened());
}

#[test]
fn reserved_words_map_to_structural_kinds() {
    let kinds: Vec<TokenKind> = scan_all("template BODY head meta Link html title div")
        .iter()
        .map(Token::kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Template,
            TokenKind::Template,
            TokenKind::Head,
            TokenKind::Meta,
            TokenKind::Link,
            TokenKind::Html,
            TokenKind::Title,
            TokenKind::Id,
        ]
    );
}

#[test]
fn identifiers_keep_original_case_and_allow_dots_and_dashes() {
    assert_eq!(
        scan_fmt("Foo.bar-baz_1 _x"),
        vec!["ID text=\"Foo.bar-baz_1\"", "ID text=\"_x\""]
    );
}

#[test]
fn style_element_body_is_structural() {
    let input = "<style>.a{color:red;}</style><p>x</p>";
    let mut lexer = strict(input);
    let mut seen = Vec::new();
    let mut style_flags = Vec::new();
    while let Some(token) = lexer.scan().expect("lexes") {
        seen.push(format_token(&token));
        style_flags.push(lexer.in_style());
    }
    assert_eq!(
        seen,
        vec![
            "LT",
            "STYLE text=\"style\"",
            "GT",
            "DOT",
            "ID text=\"a\"",
            "LBRACE",
            "ID text=\"color\"",
            "COLON",
            "ID text=\"red\"",
            "SEMI",
            "RBRACE",
            "LT",
            "SLASH",
            "STYLE text=\"style\"",
            "GT",
            "LT",
            "ID text=\"p\"",
            "GT",
            "TEXT text=\"x\"",
            "LT",
            "SLASH",
            "ID text=\"p\"",
            "GT",
        ]
    );
    assert!(style_flags[1], "style flag set after <style");
    assert!(!style_flags[13], "style flag cleared at </style");
}

#[test]
fn style_attribute_does_not_toggle_style_flag() {
    let mut lexer = strict("<p style=\"color:red\">");
    while lexer.scan().expect("lexes").is_some() {
        assert!(!lexer.in_style());
    }
}

#[test]
fn expectation_follows_angle_brackets() {
    let mut lexer = strict("<p>hi<");
    assert_eq!(lexer.expecting(), Expecting::Structural);
    lexer.scan().expect("lt");
    lexer.scan().expect("id");
    lexer.scan().expect("gt");
    assert_eq!(lexer.expecting(), Expecting::FreeText);
    lexer.scan().expect("text");
    assert_eq!(lexer.expecting(), Expecting::Structural);
}

#[test]
fn positions_are_one_based_lexeme_starts() {
    let formatted: Vec<String> = scan_all("<a>\n  <b x=12>")
        .iter()
        .map(format_token_at)
        .collect();
    assert_eq!(
        formatted,
        vec![
            "1:1 LT",
            "1:2 ID text=\"a\"",
            "1:3 GT",
            "2:3 LT",
            "2:4 ID text=\"b\"",
            "2:6 ID text=\"x\"",
            "2:7 EQ",
            "2:8 INT value=12",
            "2:10 GT",
        ]
    );
}

#[test]
fn unknown_character_reaches_reporter_with_position() {
    let mut reported: Vec<SyntaxError> = Vec::new();
    {
        let mut lexer = Lexer::with_reporter(
            StrSource::new("<a>\n<b\n   $"),
            |err: &SyntaxError| {
                reported.push(err.clone());
                Recovery::Abort
            },
            LexerConfig::default(),
        );
        let mut result = lexer.scan();
        while let Ok(Some(_)) = result {
            result = lexer.scan();
        }
        assert!(matches!(result, Err(LexError::Syntax(_))));
    }
    assert_eq!(
        reported,
        vec![SyntaxError::new(SyntaxErrorKind::UnknownToken('$'), 3, 4)]
    );
}

#[test]
fn skip_policy_resumes_after_one_character() {
    let mut lexer = Lexer::new(StrSource::new("a $ b"));
    let mut seen = Vec::new();
    while let Some(token) = lexer.scan().expect("recovering lexer never aborts here") {
        seen.push(format_token(&token));
    }
    assert_eq!(seen, vec!["ID text=\"a\"", "ID text=\"b\""]);
    assert_eq!(lexer.stats().errors_reported, 1);
    let reporter = lexer.close();
    assert_eq!(
        reporter.errors(),
        &[SyntaxError::new(SyntaxErrorKind::UnknownToken('$'), 1, 3)]
    );
}

#[test]
fn recovery_budget_bounds_cascades() {
    let mut lexer = Lexer::with_reporter(
        StrSource::new("$$$ a"),
        |_: &SyntaxError| Recovery::SkipOneAndContinue,
        LexerConfig { max_recoveries: 2 },
    );
    match lexer.scan() {
        Err(LexError::Syntax(err)) => assert_eq!((err.line, err.column), (1, 3)),
        other => panic!("expected abort after budget, got {other:?}"),
    }
    assert_eq!(lexer.stats().recoveries, 2);
    assert_eq!(lexer.stats().errors_reported, 3);
}

#[test]
fn skip_until_stops_on_target() {
    let mut lexer = strict("junk ; <p>");
    assert!(lexer.skip_until('<').expect("skip"));
    assert_eq!(
        format_token(&lexer.scan().expect("lt").expect("token")),
        "LT"
    );
    assert!(!lexer.skip_until('#').expect("skip"));
    assert!(lexer.scan().expect("eof").is_none());
}

#[test]
fn empty_and_blank_input_end_immediately() {
    assert!(scan_all("").is_empty());
    assert!(scan_all(" \t\r\n\x0c\x08 ").is_empty());
}

#[test]
fn reader_source_lexes_like_str_source() {
    let input = "<html>\n<head><title>T\u{e9}st</title></head>\n<body a=\"1\">x</body></html>\n";
    let mut lexer = Lexer::with_reporter(
        ReaderSource::new(Cursor::new(input.as_bytes().to_vec())),
        AbortOnError,
        LexerConfig::default(),
    );
    let from_reader: Vec<String> = lexer
        .tokens()
        .map(|token| format_token_at(&token.expect("lexes")))
        .collect();
    let from_str: Vec<String> = scan_all(input).iter().map(format_token_at).collect();
    assert_eq!(from_reader, from_str);
    assert!(from_reader.contains(&"2:14 TEXT text=\"T\u{e9}st\"".to_string()));
}

#[test]
fn stats_count_characters_and_tokens() {
    let mut lexer = strict("<a>");
    while lexer.scan().expect("lexes").is_some() {}
    let stats = lexer.stats();
    assert_eq!(stats.chars_read, 3);
    assert_eq!(stats.tokens_emitted, 3);
    assert_eq!(stats.errors_reported, 0);
}
