//! `hnml [--json] [--strict] [FILE]`: dump the token stream of a document.
//!
//! Reads FILE, or stdin when FILE is absent or `-`. One token per line on
//! stdout, as `line:column KIND ...` or as JSON with `--json`. Syntax errors
//! go to stderr; `--strict` stops at the first one.

use lexer::{
    AbortOnError, CharSource, LexError, Lexer, LexerConfig, ReaderSource, SyntaxError,
    SyntaxErrorReporter, Token, format_token_at,
};
use mimalloc::MiMalloc;
use std::env;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage: hnml [--json] [--strict] [FILE]";

#[derive(Debug, Default)]
struct Options {
    json: bool,
    strict: bool,
    path: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    for arg in args {
        match arg.as_str() {
            "--json" => options.json = true,
            "--strict" => options.strict = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            "-" => options.path = None,
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option '{flag}'\n{USAGE}"));
            }
            path => {
                if options.path.is_some() {
                    return Err(format!("more than one input file\n{USAGE}"));
                }
                options.path = Some(path.to_string());
            }
        }
    }
    Ok(options)
}

fn write_token(out: &mut impl Write, token: &Token, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, token).map_err(io::Error::other)?;
        writeln!(out)
    } else {
        writeln!(out, "{}", format_token_at(token))
    }
}

/// Drain the lexer into `out`. Returns the syntax error that stopped it, if
/// the reporter gave up.
fn dump<S: CharSource, R: SyntaxErrorReporter>(
    lexer: &mut Lexer<S, R>,
    out: &mut impl Write,
    json: bool,
) -> Result<Option<SyntaxError>, LexError> {
    for token in lexer.tokens() {
        match token {
            Ok(token) => write_token(out, &token, json).map_err(LexError::Source)?,
            Err(LexError::Syntax(err)) => return Ok(Some(err)),
            Err(err) => return Err(err),
        }
    }
    Ok(None)
}

/// Returns the number of syntax errors reported.
fn run<S: CharSource>(source: S, options: &Options) -> Result<usize, LexError> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let errors = if options.strict {
        let mut lexer = Lexer::with_reporter(source, AbortOnError, LexerConfig::default());
        let aborted = dump(&mut lexer, &mut out, options.json)?;
        lexer.close();
        if let Some(err) = &aborted {
            eprintln!("hnml: {err}");
        }
        usize::from(aborted.is_some())
    } else {
        // The reporter also records the error that exhausted the budget.
        let mut lexer = Lexer::new(source);
        dump(&mut lexer, &mut out, options.json)?;
        let recovered = lexer.close().into_errors();
        for err in &recovered {
            eprintln!("hnml: {err}");
        }
        recovered.len()
    };
    out.flush().map_err(LexError::Source)?;
    Ok(errors)
}

fn main() -> ExitCode {
    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let result = match &options.path {
        Some(path) => match File::open(path) {
            Ok(file) => run(ReaderSource::new(BufReader::new(file)), &options),
            Err(err) => {
                eprintln!("hnml: cannot open {path}: {err}");
                return ExitCode::from(2);
            }
        },
        None => run(ReaderSource::new(io::stdin().lock()), &options),
    };

    match result {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            eprintln!("hnml: {err}");
            ExitCode::from(2)
        }
    }
}
