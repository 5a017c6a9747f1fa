#![no_main]

use lexer::{
    AbortOnError, Lexer, LexerConfig, ReaderSource, Recovery, StrSource, SyntaxError, tokenize,
    tokenize_strict,
};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        // The reader source must reject bad UTF-8 with an error, never a panic.
        let mut lexer = Lexer::with_reporter(
            ReaderSource::new(Cursor::new(data.to_vec())),
            AbortOnError,
            LexerConfig::default(),
        );
        for token in lexer.tokens() {
            if token.is_err() {
                break;
            }
        }
        return;
    };

    let recovered = tokenize(input);
    let strict = tokenize_strict(input);
    if let (Ok(stream), Ok(tokens)) = (&recovered, &strict) {
        assert!(stream.errors().is_empty());
        assert_eq!(stream.tokens(), tokens.as_slice());
    }

    // Token positions never go backwards.
    if let Ok(stream) = &recovered {
        let positions: Vec<_> = stream
            .tokens()
            .iter()
            .map(|token| (token.line(), token.column()))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    // Plain scanning without the script driver must terminate too.
    let mut lexer = Lexer::with_reporter(
        StrSource::new(input),
        |_: &SyntaxError| Recovery::SkipOneAndContinue,
        LexerConfig { max_recoveries: 64 },
    );
    while let Ok(Some(_)) = lexer.scan() {}
    let stats = lexer.stats();
    assert!(stats.recoveries <= 64);
    assert!(stats.chars_read <= input.chars().count() as u64);
});
