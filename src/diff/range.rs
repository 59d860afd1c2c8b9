//! Diff-range validation and argv construction.
//!
//! Range tokens are validated against a character allow-list before any
//! process is spawned, and the result is always a fixed argv array handed
//! to a launcher that performs no shell interpretation. Injection is ruled
//! out on both ends.

use crate::error::{RepocatError, Result};

/// Which diff invocation the argv is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    /// `git diff --name-only`: list touched file paths.
    NameOnly,
    /// `git diff --unified=0`: hunks without context, for line mapping.
    Unified0,
}

impl DiffMode {
    fn flag(self) -> &'static str {
        match self {
            DiffMode::NameOnly => "--name-only",
            DiffMode::Unified0 => "--unified=0",
        }
    }
}

/// Build the diff argv for an optional raw range string.
///
/// The range is split on whitespace; every token must consist of
/// characters from the allow-list (revision syntax including reflog
/// `HEAD@{1}` and peel `expr^{tree}` forms). The first offending token is
/// reported in the error.
pub fn build_args(mode: DiffMode, raw_range: Option<&str>) -> Result<Vec<String>> {
    let mut args = vec!["diff".to_string(), mode.flag().to_string()];

    if let Some(raw) = raw_range {
        for token in raw.split_whitespace() {
            if !token.chars().all(is_allowed_char) {
                return Err(RepocatError::InvalidRangeToken {
                    token: token.to_string(),
                });
            }
            args.push(token.to_string());
        }
    }

    Ok(args)
}

/// Characters permitted in a revision token. Braces are included for the
/// reflog and peel syntaxes; shell metacharacters are not.
fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '_' | '.' | '/' | '@' | '^' | '~' | ':' | '-' | '{' | '}')
}
