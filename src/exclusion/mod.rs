//! Exclusion-policy resolution: mandatory security patterns, caller
//! patterns, and ignore-file layers merged into one matcher.

pub mod ignore_file;
pub mod mandatory;
pub mod policy;

pub use ignore_file::IgnoreFileLoader;
pub use mandatory::{DEPENDENCY_PATTERNS, MANDATORY_PATTERNS};
pub use policy::{ExclusionPolicy, Matcher};
