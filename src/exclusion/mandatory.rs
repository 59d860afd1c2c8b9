//! Pattern tables applied by every exclusion policy.

/// Patterns unconditionally unioned into every compiled policy.
///
/// Covers secrets and credential material, lockfiles, and VCS/build caches.
/// User configuration can add patterns but can never remove these.
pub const MANDATORY_PATTERNS: &[&str] = &[
    // Secrets and credentials
    ".env",
    ".env.*",
    "*.pem",
    "*.key",
    "*.p12",
    "*.pfx",
    "*.jks",
    "*.keystore",
    "id_rsa",
    "id_rsa.*",
    "id_ed25519",
    "id_ed25519.*",
    "id_dsa",
    "id_dsa.*",
    ".npmrc",
    ".netrc",
    ".pypirc",
    ".aws",
    ".ssh",
    ".gnupg",
    "credentials",
    "credentials.*",
    "secrets.*",
    "*.secret",
    // Lockfiles
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "poetry.lock",
    "Pipfile.lock",
    "Gemfile.lock",
    "composer.lock",
    "go.sum",
    // VCS metadata and build caches
    ".git",
    ".hg",
    ".svn",
    "__pycache__",
    "*.pyc",
    ".cache",
    ".gradle",
    ".terraform",
    ".next",
    ".nuxt",
    ".turbo",
    ".parcel-cache",
    ".DS_Store",
];

/// Dependency directories excluded by default, re-included via
/// `ScanOptions::include_dependencies`.
pub const DEPENDENCY_PATTERNS: &[&str] = &[
    "node_modules",
    "bower_components",
    "vendor",
    "third_party",
    ".venv",
    "venv",
    "Pods",
];
