//! Golden lexer fixtures: one TOML file per case.
//!
//! ```toml
//! input = "<p>hi</p>"
//! mode = "recover"        # or "strict"; default "recover"
//! status = "active"       # or "xfail" / "skip"; non-active needs `reason`
//! tokens = ["1:1 LT", "1:2 ID text=\"p\"", "..."]
//! errors = ["unknown token '$' at 1:3"]
//! ```
//!
//! In strict mode `errors` holds at most one entry: the error that aborted
//! the scan.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    #[default]
    Active,
    Xfail,
    Skip,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FixtureMode {
    /// Skip-one-character recovery, diagnostics collected.
    #[default]
    Recover,
    /// Abort on the first syntax error.
    Strict,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureFile {
    input: String,
    tokens: Vec<String>,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    mode: FixtureMode,
    #[serde(default)]
    status: FixtureStatus,
    reason: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Fixture {
    pub name: String,
    pub path: PathBuf,
    pub input: String,
    pub tokens: Vec<String>,
    pub errors: Vec<String>,
    pub mode: FixtureMode,
    pub status: FixtureStatus,
    pub reason: Option<String>,
}

/// Load every `*.toml` fixture under `root`, sorted by file name.
pub fn load_fixtures(root: &Path) -> Vec<Fixture> {
    let mut entries: Vec<_> = fs::read_dir(root)
        .unwrap_or_else(|err| panic!("failed to read fixture root {root:?}: {err}"))
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    entries.sort();
    entries.iter().map(|path| load_fixture(path)).collect()
}

pub fn load_fixture(path: &Path) -> Fixture {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}"));
    let file: FixtureFile = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse fixture {path:?}: {err}"));
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| panic!("fixture path has no file name: {path:?}"));

    if file.status != FixtureStatus::Active && file.reason.as_deref().unwrap_or("").is_empty() {
        panic!("non-active fixture missing reason in {path:?}");
    }
    if file.mode == FixtureMode::Strict && file.errors.len() > 1 {
        panic!("strict fixture lists more than one error in {path:?}");
    }

    Fixture {
        name,
        path: path.to_path_buf(),
        input: file.input,
        tokens: file.tokens,
        errors: file.errors,
        mode: file.mode,
        status: file.status,
        reason: file.reason,
    }
}

/// Substring filter on fixture names, read from an environment variable.
pub struct FixtureFilter {
    raw: Option<String>,
}

impl FixtureFilter {
    pub fn from_env(key: &str) -> Self {
        Self {
            raw: env::var(key).ok().filter(|value| !value.is_empty()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.raw {
            Some(filter) => name.contains(filter.as_str()),
            None => true,
        }
    }
}
