//! Loader for gitignore-style ignore files.
//!
//! Collects `.gitignore` and `.repocatignore` files found at the scan root
//! and in its ancestor directories, each compiled into a matcher layer that
//! the exclusion policy consults after the glob patterns.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;
use tracing::debug;

/// Loads ignore-file layers for a scan root.
pub struct IgnoreFileLoader {
    use_gitignore: bool,
    use_repocatignore: bool,
}

impl IgnoreFileLoader {
    pub fn new(use_gitignore: bool, use_repocatignore: bool) -> Self {
        Self {
            use_gitignore,
            use_repocatignore,
        }
    }

    /// Collect ignore layers from `root` and its ancestors.
    ///
    /// Ascent stops at the first directory containing `.git` (the repository
    /// boundary); ignore files above that are unrelated projects.
    pub fn load(&self, root: &Path) -> Vec<Gitignore> {
        let mut layers = Vec::new();

        for dir in root.ancestors() {
            if self.use_gitignore {
                if let Some(layer) = Self::compile(dir, &dir.join(".gitignore")) {
                    layers.push(layer);
                }
            }

            if self.use_repocatignore {
                if let Some(layer) = Self::compile(dir, &dir.join(".repocatignore")) {
                    layers.push(layer);
                }
            }

            if dir.join(".git").exists() {
                break;
            }
        }

        layers
    }

    /// Compile one ignore file into a matcher rooted at its directory.
    fn compile(dir: &Path, file: &Path) -> Option<Gitignore> {
        if !file.is_file() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(dir);
        if let Some(err) = builder.add(file) {
            debug!(file = %file.display(), error = %err, "skipping unparseable ignore file");
            return None;
        }

        match builder.build() {
            Ok(gitignore) => Some(gitignore),
            Err(err) => {
                debug!(file = %file.display(), error = %err, "skipping unparseable ignore file");
                None
            }
        }
    }
}
