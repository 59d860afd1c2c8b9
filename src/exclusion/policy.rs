//! Exclusion policy compilation and matching.
//!
//! A compiled [`Matcher`] answers whether a root-relative path is excluded
//! from a scan. Sources are merged in fixed precedence: the mandatory
//! security patterns, then caller-supplied patterns, then ignore-file
//! layers. The mandatory set is checked through the same glob set as user
//! patterns, but since globs can only exclude (never re-include), no user
//! configuration can override it.

use super::mandatory::{DEPENDENCY_PATTERNS, MANDATORY_PATTERNS};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::gitignore::Gitignore;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Compiles pattern sets into a [`Matcher`].
pub struct ExclusionPolicy;

impl ExclusionPolicy {
    /// Compile mandatory, dependency, and caller patterns plus ignore-file
    /// layers into a matcher for paths relative to `root`.
    ///
    /// Malformed user patterns are logged and treated as inert rather than
    /// failing the scan.
    pub fn compile(
        user_patterns: &[String],
        include_dependencies: bool,
        ignore_layers: Vec<Gitignore>,
        root: &Path,
    ) -> Matcher {
        let mut builder = GlobSetBuilder::new();

        for pattern in MANDATORY_PATTERNS {
            Self::add_pattern(&mut builder, pattern);
        }

        if !include_dependencies {
            for pattern in DEPENDENCY_PATTERNS {
                Self::add_pattern(&mut builder, pattern);
            }
        }

        for pattern in user_patterns {
            Self::add_pattern(&mut builder, pattern);
        }

        // The static tables always compile; an empty set is unreachable but
        // handled the same way as a malformed user pattern.
        let globs = builder.build().unwrap_or_else(|err| {
            debug!(error = %err, "glob set failed to build, matching nothing");
            GlobSet::empty()
        });

        Matcher {
            globs,
            ignore_layers,
            root: root.to_path_buf(),
        }
    }

    /// Expand one pattern into anchored glob variants and add them.
    ///
    /// A bare name matches at any depth and, as a directory, its whole
    /// subtree. A pattern containing `/` is anchored at the root.
    fn add_pattern(builder: &mut GlobSetBuilder, pattern: &str) {
        let normalized = pattern.trim().trim_end_matches('/').replace('\\', "/");
        if normalized.is_empty() {
            return;
        }

        let variants: [String; 2] = if normalized.contains('/') {
            let anchored = normalized.trim_start_matches('/');
            [anchored.to_string(), format!("{anchored}/**")]
        } else {
            [format!("**/{normalized}"), format!("**/{normalized}/**")]
        };

        for variant in &variants {
            match Self::build_glob(variant) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => {
                    debug!(pattern, error = %err, "ignoring malformed exclusion pattern");
                }
            }
        }
    }

    fn build_glob(pattern: &str) -> Result<Glob, globset::Error> {
        GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
    }
}

/// Compiled exclusion matcher for one scan root.
pub struct Matcher {
    globs: GlobSet,
    ignore_layers: Vec<Gitignore>,
    root: PathBuf,
}

impl Matcher {
    /// Whether `relative_path` is excluded from the scan.
    ///
    /// A directory match excludes the entire subtree; the scanner must not
    /// descend into matched directories.
    pub fn is_excluded(&self, relative_path: &Path, is_dir: bool) -> bool {
        let normalized = relative_path.to_string_lossy().replace('\\', "/");
        if self.globs.is_match(normalized.as_str()) {
            return true;
        }

        if !self.ignore_layers.is_empty() {
            let absolute = self.root.join(relative_path);
            return self
                .ignore_layers
                .iter()
                .any(|layer| layer.matched(&absolute, is_dir).is_ignore());
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ignore_file::IgnoreFileLoader;
    use std::fs;
    use tempfile::TempDir;

    fn compile(user: &[&str]) -> Matcher {
        let patterns: Vec<String> = user.iter().map(|s| s.to_string()).collect();
        ExclusionPolicy::compile(&patterns, false, Vec::new(), Path::new("/project"))
    }

    #[test]
    fn test_mandatory_patterns_always_excluded() {
        let matcher = compile(&[]);

        assert!(matcher.is_excluded(Path::new(".env"), false));
        assert!(matcher.is_excluded(Path::new("config/.env"), false));
        assert!(matcher.is_excluded(Path::new("certs/server.pem"), false));
        assert!(matcher.is_excluded(Path::new("Cargo.lock"), false));
        assert!(matcher.is_excluded(Path::new(".git"), true));
        assert!(matcher.is_excluded(Path::new(".git/config"), false));
    }

    #[test]
    fn test_mandatory_cannot_be_overridden_by_user_patterns() {
        // Attempts to re-include via negation or matching literals have no
        // effect: globs only ever add exclusions.
        let matcher = compile(&["!.env", "!**/*.pem"]);

        assert!(matcher.is_excluded(Path::new(".env"), false));
        assert!(matcher.is_excluded(Path::new("deep/nested/server.pem"), false));
    }

    #[test]
    fn test_user_patterns_add_exclusions() {
        let matcher = compile(&["*.log", "generated"]);

        assert!(matcher.is_excluded(Path::new("debug.log"), false));
        assert!(matcher.is_excluded(Path::new("logs/debug.log"), false));
        assert!(matcher.is_excluded(Path::new("generated"), true));
        assert!(matcher.is_excluded(Path::new("generated/api.ts"), false));
        assert!(!matcher.is_excluded(Path::new("src/main.rs"), false));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let matcher = compile(&["*.log"]);

        assert!(matcher.is_excluded(Path::new("DEBUG.LOG"), false));
        assert!(matcher.is_excluded(Path::new("cargo.LOCK"), false));
    }

    #[test]
    fn test_anchored_pattern_with_separator() {
        let matcher = compile(&["docs/internal/**"]);

        assert!(matcher.is_excluded(Path::new("docs/internal/plan.md"), false));
        assert!(!matcher.is_excluded(Path::new("other/docs/internal/plan.md"), false));
    }

    #[test]
    fn test_double_star_matches_any_depth() {
        let matcher = compile(&["**/snapshots"]);

        assert!(matcher.is_excluded(Path::new("snapshots"), true));
        assert!(matcher.is_excluded(Path::new("a/b/c/snapshots"), true));
    }

    #[test]
    fn test_malformed_pattern_is_inert() {
        let matcher = compile(&["[invalid", "*.log"]);

        // The malformed pattern neither matches nor poisons the valid ones.
        assert!(!matcher.is_excluded(Path::new("[invalid"), false));
        assert!(matcher.is_excluded(Path::new("debug.log"), false));
        assert!(!matcher.is_excluded(Path::new("src/main.rs"), false));
    }

    #[test]
    fn test_dependency_dirs_toggle() {
        let patterns: Vec<String> = Vec::new();
        let excluded =
            ExclusionPolicy::compile(&patterns, false, Vec::new(), Path::new("/project"));
        let included =
            ExclusionPolicy::compile(&patterns, true, Vec::new(), Path::new("/project"));

        assert!(excluded.is_excluded(Path::new("node_modules"), true));
        assert!(excluded.is_excluded(Path::new("node_modules/react/index.js"), false));
        assert!(!included.is_excluded(Path::new("node_modules"), true));
        assert!(!included.is_excluded(Path::new("node_modules/react/index.js"), false));
    }

    #[test]
    fn test_ignore_file_layer_participates() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".repocatignore"), "*.generated.ts\n").unwrap();

        let layers = IgnoreFileLoader::new(false, true).load(dir.path());
        let matcher = ExclusionPolicy::compile(&[], false, layers, dir.path());

        assert!(matcher.is_excluded(Path::new("api.generated.ts"), false));
        assert!(!matcher.is_excluded(Path::new("api.ts"), false));
    }

    #[test]
    fn test_ignore_file_negation_cannot_unexclude_mandatory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".repocatignore"), "!.env\n").unwrap();

        let layers = IgnoreFileLoader::new(false, true).load(dir.path());
        let matcher = ExclusionPolicy::compile(&[], false, layers, dir.path());

        assert!(matcher.is_excluded(Path::new(".env"), false));
    }
}
