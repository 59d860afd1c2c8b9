//! Concurrent bounded file-tree scanning.
//!
//! A scan enumerates every candidate under a root with one recursive
//! listing, filters it through the compiled exclusion policy, then reads
//! the survivors in fixed-size batches with a bounded number of in-flight
//! reads. Per-file failures degrade to skips; only failures enumerating
//! the root itself abort the scan.

pub mod binary;
pub mod estimate;
pub mod language;
pub mod tree;

use crate::error::{RepocatError, Result};
use crate::exclusion::{ExclusionPolicy, IgnoreFileLoader};
use futures::{stream, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub use estimate::{Estimate, SizeEstimator, TOKEN_BYTES_PER_TOKEN};
pub use tree::{DirectoryNode, FileRecord, ScanOptions, SkipReason, DEFAULT_MAX_FILE_SIZE};

/// Files read per batch.
pub const BATCH_SIZE: usize = 100;

/// Reads in flight within a batch; caps open descriptors and peak memory.
pub const READ_CONCURRENCY: usize = 8;

/// A discovered file that survived exclusion filtering.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub absolute_path: PathBuf,
    pub relative_path: PathBuf,
    pub size_bytes: u64,
}

/// Scans one root into a [`DirectoryNode`] tree.
pub struct DirectoryScanner {
    options: ScanOptions,
}

impl DirectoryScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan `root` into a tree. Relative paths are computed against `root`
    /// itself, so sibling scans never collide on each other's namespace.
    pub async fn scan(&self, root: &Path) -> Result<DirectoryNode> {
        self.scan_filtered(root, None).await
    }

    /// Scan `root`, keeping only files whose root-relative path appears in
    /// `allowed`. Used by diff mode to restrict output to touched files.
    pub async fn scan_restricted(
        &self,
        root: &Path,
        allowed: &HashSet<PathBuf>,
    ) -> Result<DirectoryNode> {
        self.scan_filtered(root, Some(allowed)).await
    }

    async fn scan_filtered(
        &self,
        root: &Path,
        allowed: Option<&HashSet<PathBuf>>,
    ) -> Result<DirectoryNode> {
        let mut candidates =
            collect_candidates(root.to_path_buf(), self.options.clone()).await?;
        if let Some(allowed) = allowed {
            candidates.retain(|c| allowed.contains(&c.relative_path));
        }
        debug!(
            root = %root.display(),
            candidates = candidates.len(),
            "reading accepted candidates"
        );

        let mut tree = DirectoryNode::new(PathBuf::new());
        for batch in candidates.chunks(BATCH_SIZE) {
            let records: Vec<Option<FileRecord>> = stream::iter(
                batch
                    .iter()
                    .cloned()
                    .map(|candidate| read_record(candidate, &self.options)),
            )
            .buffer_unordered(READ_CONCURRENCY)
            .collect()
            .await;

            for record in records.into_iter().flatten() {
                tree.insert(record);
            }
        }

        tree.finalize();
        Ok(tree)
    }
}

/// Enumerate and filter candidates without reading any content.
///
/// Shared between the scanner and the size estimator so both agree on the
/// accepted file set.
pub(crate) async fn collect_candidates(
    root: PathBuf,
    options: ScanOptions,
) -> Result<Vec<Candidate>> {
    tokio::task::spawn_blocking(move || enumerate(&root, &options))
        .await
        .map_err(|err| RepocatError::Internal(err.to_string()))?
}

fn enumerate(root: &Path, options: &ScanOptions) -> Result<Vec<Candidate>> {
    let metadata =
        std::fs::metadata(root).map_err(|err| RepocatError::from_root_io(root, err))?;
    if !metadata.is_dir() {
        return Err(RepocatError::DirectoryNotFound(root.to_path_buf()));
    }
    // Surface an unreadable root as fatal before walking; errors deeper in
    // the tree degrade to skips.
    std::fs::read_dir(root).map_err(|err| RepocatError::from_root_io(root, err))?;

    let layers =
        IgnoreFileLoader::new(options.use_gitignore, options.use_repocatignore).load(root);
    let matcher =
        ExclusionPolicy::compile(&options.exclude_patterns, options.include_dependencies, layers, root);

    let mut candidates = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            let Ok(relative) = entry.path().strip_prefix(root) else {
                return true;
            };
            if relative.as_os_str().is_empty() {
                return true;
            }
            // A directory match prunes the whole subtree here.
            !matcher.is_excluded(relative, entry.file_type().is_dir())
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let size_bytes = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "skipping unstatable file");
                continue;
            }
        };
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        candidates.push(Candidate {
            relative_path: relative.to_path_buf(),
            absolute_path: entry.into_path(),
            size_bytes,
        });
    }

    Ok(candidates)
}

/// Read one candidate into a record, or None when it is dropped.
async fn read_record(candidate: Candidate, options: &ScanOptions) -> Option<FileRecord> {
    if candidate.size_bytes > options.max_file_size {
        debug!(
            path = %candidate.relative_path.display(),
            size = candidate.size_bytes,
            "skipped: size"
        );
        return skipped_record(candidate, SkipReason::Size, options.keep_skipped);
    }

    let bytes = match tokio::fs::read(&candidate.absolute_path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(
                path = %candidate.absolute_path.display(),
                error = %err,
                "skipping unreadable file"
            );
            return None;
        }
    };

    if binary::is_binary(&bytes) {
        debug!(path = %candidate.relative_path.display(), "skipped: binary");
        return skipped_record(candidate, SkipReason::Binary, options.keep_skipped);
    }

    let language = language::language_tag(&candidate.relative_path);
    Some(FileRecord {
        absolute_path: candidate.absolute_path,
        relative_path: candidate.relative_path,
        size_bytes: candidate.size_bytes,
        content: Some(String::from_utf8_lossy(&bytes).into_owned()),
        language,
        skipped: None,
        changed_lines: None,
    })
}

fn skipped_record(
    candidate: Candidate,
    reason: SkipReason,
    keep_skipped: bool,
) -> Option<FileRecord> {
    if !keep_skipped {
        return None;
    }
    let language = language::language_tag(&candidate.relative_path);
    Some(FileRecord {
        absolute_path: candidate.absolute_path,
        relative_path: candidate.relative_path,
        size_bytes: candidate.size_bytes,
        content: None,
        language,
        skipped: Some(reason),
        changed_lines: None,
    })
}
