use crate::scanner::tree::{ScanOptions, DEFAULT_MAX_FILE_SIZE};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    #[default]
    Markdown,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(
    name = "repocat",
    version,
    about = "Aggregate a project tree into a single Markdown or YAML document",
    long_about = "repocat scans one or more root directories (or the files touched by a git diff) \
and assembles their contents into one deterministic document for LLM consumption."
)]
pub struct Cli {
    /// Root directories to aggregate
    #[arg(required = true)]
    pub roots: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = DocumentFormat::Markdown)]
    pub format: DocumentFormat,

    /// Restrict output to files touched by a git diff
    #[arg(long)]
    pub diff: bool,

    /// Narrow diff output further to the changed lines of each file
    #[arg(long)]
    pub diff_lines: bool,

    /// Diff range, e.g. "HEAD~1..HEAD" (requires --diff or --diff-lines)
    #[arg(long, value_name = "RANGE")]
    pub range: Option<String>,

    /// Print size metrics instead of generating a document
    #[arg(long)]
    pub estimate: bool,

    /// Emit estimate metrics as JSON
    #[arg(long, requires = "estimate")]
    pub json: bool,

    /// Maximum file size in bytes; larger files are listed without content
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_FILE_SIZE)]
    pub max_file_size: u64,

    /// Additional exclusion glob (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Do not honor .gitignore files
    #[arg(long)]
    pub no_gitignore: bool,

    /// Do not honor .repocatignore files
    #[arg(long)]
    pub no_repocatignore: bool,

    /// Descend into dependency directories (node_modules, vendor, ...)
    #[arg(long)]
    pub include_deps: bool,

    /// Omit oversized/binary files from the outline instead of listing
    /// them without content
    #[arg(long)]
    pub drop_skipped: bool,

    /// Text prepended to the generated document
    #[arg(long, value_name = "TEXT")]
    pub prefix: Option<String>,

    /// Include file content in YAML output
    #[arg(long)]
    pub yaml_content: bool,

    /// Write the document to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_file_size: self.max_file_size,
            exclude_patterns: self.exclude.clone(),
            use_gitignore: !self.no_gitignore,
            use_repocatignore: !self.no_repocatignore,
            include_dependencies: self.include_deps,
            keep_skipped: !self.drop_skipped,
        }
    }

    pub fn diff_mode(&self) -> bool {
        self.diff || self.diff_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_basic_args() {
        let cli = Cli::try_parse_from(["repocat", "./project/"]).unwrap();
        assert_eq!(cli.roots.len(), 1);
        assert!(matches!(cli.format, DocumentFormat::Markdown));
        assert!(!cli.diff_mode());
    }

    #[test]
    fn test_parse_multiple_roots() {
        let cli = Cli::try_parse_from(["repocat", "./one/", "./two/"]).unwrap();
        assert_eq!(cli.roots.len(), 2);
    }

    #[test]
    fn test_parse_format_yaml() {
        let cli = Cli::try_parse_from(["repocat", "--format", "yaml", "./p/"]).unwrap();
        assert!(matches!(cli.format, DocumentFormat::Yaml));
    }

    #[test]
    fn test_parse_diff_with_range() {
        let cli =
            Cli::try_parse_from(["repocat", "--diff", "--range", "HEAD~1..HEAD", "./p/"]).unwrap();
        assert!(cli.diff_mode());
        assert_eq!(cli.range.as_deref(), Some("HEAD~1..HEAD"));
    }

    #[test]
    fn test_parse_diff_lines_implies_diff_mode() {
        let cli = Cli::try_parse_from(["repocat", "--diff-lines", "./p/"]).unwrap();
        assert!(cli.diff_mode());
    }

    #[test]
    fn test_parse_excludes_repeatable() {
        let cli =
            Cli::try_parse_from(["repocat", "-x", "*.log", "-x", "dist", "./p/"]).unwrap();
        assert_eq!(cli.exclude, vec!["*.log", "dist"]);
    }

    #[test]
    fn test_json_requires_estimate() {
        assert!(Cli::try_parse_from(["repocat", "--json", "./p/"]).is_err());
        assert!(Cli::try_parse_from(["repocat", "--estimate", "--json", "./p/"]).is_ok());
    }

    #[test]
    fn test_scan_options_mapping() {
        let cli = Cli::try_parse_from([
            "repocat",
            "--max-file-size",
            "2048",
            "--no-gitignore",
            "--include-deps",
            "--drop-skipped",
            "-x",
            "*.tmp",
            "./p/",
        ])
        .unwrap();
        let options = cli.scan_options();
        assert_eq!(options.max_file_size, 2048);
        assert!(!options.use_gitignore);
        assert!(options.use_repocatignore);
        assert!(options.include_dependencies);
        assert!(!options.keep_skipped);
        assert_eq!(options.exclude_patterns, vec!["*.tmp"]);
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["repocat", "./p/"]).unwrap();
        assert_eq!(cli.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert!(!cli.estimate);
        assert!(!cli.yaml_content);
        assert!(cli.output.is_none());
    }
}
