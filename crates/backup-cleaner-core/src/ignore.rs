use crate::error::Error;
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Whole-name, case-insensitive matching. Name separators carry no meaning
/// here since rules apply to bare folder/file names.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Default ignore file, written when none exists yet.
const DEFAULT_IGNORE_FILE: &str = "\
# backup-cleaner ignore file
# ==========================
# One pattern per line. Lines starting with # are comments.
#
# Supported wildcards:
#   *  matches zero or more characters
#   ?  matches exactly one character
#
# Patterns match the whole folder or file name, case-insensitively.
#
# Examples:
#   _*        ignore everything starting with an underscore
#   temp*     ignore everything starting with 'temp'
#   *.log     ignore all .log files
#   test_?    ignore test_1, test_2, ...
#   _Archive  ignore exactly the folder/file '_Archive'
#
# Active patterns below:

_*
";

/// A single compiled ignore rule.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pub raw: String,
    matcher: Pattern,
}

/// Compiled set of exclusion patterns for folder and file names.
///
/// An empty matcher ignores nothing: a missing or unreadable ignore source
/// fails open, never closed.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// Matcher with no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile an in-memory list of patterns, skipping any that fail to
    /// compile.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .filter_map(|raw| {
                let raw = raw.as_ref();
                match compile(raw) {
                    Ok(matcher) => Some(IgnoreRule {
                        raw: raw.to_string(),
                        matcher,
                    }),
                    Err(e) => {
                        warn!("Invalid ignore pattern '{}': {}", raw, e);
                        None
                    }
                }
            })
            .collect();
        Self { rules }
    }

    /// Parse ignore file content: one pattern per line, blank lines and
    /// `#` comments skipped.
    pub fn from_source(source: &str) -> Self {
        Self::from_patterns(
            source
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load patterns from a file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_source(&content))
    }

    /// Load patterns, materializing the default file first if none exists.
    /// Any failure is logged and yields an empty matcher (fail open).
    pub fn load_or_init(path: &Path) -> Self {
        if !path.exists() {
            if let Err(e) = Self::write_default_file(path) {
                warn!("Could not create default ignore file '{}': {}", path.display(), e);
                return Self::empty();
            }
            info!("Created default ignore file at {}", path.display());
        }

        match Self::load(path) {
            Ok(matcher) => matcher,
            Err(e) => {
                warn!("Could not load ignore file '{}': {}", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Write the default ignore file (commented usage guide plus the single
    /// active rule `_*`), creating parent directories as needed.
    pub fn write_default_file(path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, DEFAULT_IGNORE_FILE)?;
        Ok(())
    }

    /// True iff any rule matches the whole name.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.matcher.matches_with(name, MATCH_OPTIONS))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }
}

/// Compile one wildcard pattern. Only `*` and `?` are special; `[` and `]`
/// are class-wrapped so they match themselves.
fn compile(raw: &str) -> Result<Pattern, glob::PatternError> {
    let mut glob_source = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '[' => glob_source.push_str("[[]"),
            ']' => glob_source.push_str("[]]"),
            other => glob_source.push(other),
        }
    }
    Pattern::new(&glob_source)
}
