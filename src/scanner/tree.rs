//! Scan options and the in-memory tree model produced by a scan.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::diff::parser::HunkLineMap;

/// Default content cap per file: 1 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Options for one scan call. Immutable per call; concurrent root scans
/// each receive their own clone.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Files larger than this are recorded without content.
    pub max_file_size: u64,
    /// Caller-supplied exclusion globs, merged after the mandatory set.
    pub exclude_patterns: Vec<String>,
    /// Honor `.gitignore` files at or above the root.
    pub use_gitignore: bool,
    /// Honor `.repocatignore` files at or above the root.
    pub use_repocatignore: bool,
    /// Descend into dependency directories (node_modules, vendor, ...).
    pub include_dependencies: bool,
    /// Keep oversized/binary files in the tree as zero-content records.
    pub keep_skipped: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            exclude_patterns: Vec::new(),
            use_gitignore: true,
            use_repocatignore: true,
            include_dependencies: false,
            keep_skipped: true,
        }
    }
}

/// Why a discovered file carries no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Size exceeded `ScanOptions::max_file_size`; the file was never read.
    Size,
    /// Content classified as binary by the sniffing heuristic.
    Binary,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Size => "size",
            SkipReason::Binary => "binary",
        }
    }
}

/// One accepted or skipped file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub absolute_path: PathBuf,
    /// Relative to the scan call's root argument, never to a broader
    /// multi-root context.
    pub relative_path: PathBuf,
    pub size_bytes: u64,
    /// None when the file was skipped (see `skipped`).
    pub content: Option<String>,
    /// Fence language tag; empty when unknown.
    pub language: &'static str,
    pub skipped: Option<SkipReason>,
    /// New-side line numbers touched by a diff, when scanning in diff mode.
    pub changed_lines: Option<BTreeSet<u32>>,
}

/// Directory tree built from accepted records. Built once per scan and
/// never mutated afterwards except for diff-line annotation.
#[derive(Debug, Default)]
pub struct DirectoryNode {
    pub relative_path: PathBuf,
    /// Ordered lexicographically by relative path after `finalize`.
    pub files: Vec<FileRecord>,
    pub children: BTreeMap<String, DirectoryNode>,
}

impl DirectoryNode {
    pub fn new(relative_path: PathBuf) -> Self {
        Self {
            relative_path,
            files: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// Insert a record by walking its path segments.
    pub fn insert(&mut self, record: FileRecord) {
        let mut segments: Vec<String> = record
            .relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        segments.pop(); // file name stays on the record

        let mut node = self;
        let mut accumulated = PathBuf::new();
        for segment in segments {
            accumulated.push(&segment);
            let child_path = accumulated.clone();
            node = node
                .children
                .entry(segment)
                .or_insert_with(|| DirectoryNode::new(child_path));
        }
        node.files.push(record);
    }

    /// Sort files recursively; call once after all inserts.
    pub fn finalize(&mut self) {
        self.files
            .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        for child in self.children.values_mut() {
            child.finalize();
        }
    }

    /// Total discovered files, including skipped records.
    pub fn file_count(&self) -> usize {
        self.files.len()
            + self
                .children
                .values()
                .map(DirectoryNode::file_count)
                .sum::<usize>()
    }

    /// Files that carry content.
    pub fn accepted_file_count(&self) -> usize {
        self.files.iter().filter(|f| f.skipped.is_none()).count()
            + self
                .children
                .values()
                .map(DirectoryNode::accepted_file_count)
                .sum::<usize>()
    }

    /// Bytes contributed by content-bearing records only.
    pub fn content_bytes(&self) -> u64 {
        self.files
            .iter()
            .filter(|f| f.content.is_some())
            .map(|f| f.size_bytes)
            .sum::<u64>()
            + self
                .children
                .values()
                .map(DirectoryNode::content_bytes)
                .sum::<u64>()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.children.is_empty()
    }

    /// Attach changed-line sets from a parsed diff to matching records.
    pub fn annotate_changed_lines(&mut self, line_map: &HunkLineMap) {
        for file in &mut self.files {
            let key = file.relative_path.to_string_lossy().replace('\\', "/");
            if let Some(lines) = line_map.get(&key) {
                file.changed_lines = Some(lines.clone());
            }
        }
        for child in self.children.values_mut() {
            child.annotate_changed_lines(line_map);
        }
    }
}
