pub mod cli;
pub mod diff;
pub mod error;
pub mod exclusion;
pub mod generator;
pub mod handlers;
pub mod scanner;

pub use cli::{Cli, DocumentFormat};
pub use diff::{build_args, parse, DiffInvoker, DiffMode, HunkLineMap};
pub use error::{RepocatError, Result};
pub use exclusion::{ExclusionPolicy, IgnoreFileLoader, Matcher};
pub use generator::{DocumentBuilder, DocumentGenerator, MarkdownGenerator, ScannedRoot, YamlGenerator};
pub use scanner::{
    DirectoryNode, DirectoryScanner, Estimate, FileRecord, ScanOptions, SizeEstimator, SkipReason,
};
