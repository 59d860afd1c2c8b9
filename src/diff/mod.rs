//! Diff extraction: range validation, safe tool invocation, and
//! unified-diff parsing into changed-line sets.

pub mod invoke;
pub mod parser;
pub mod range;

pub use invoke::DiffInvoker;
pub use parser::{parse, HunkLineMap};
pub use range::{build_args, DiffMode};
