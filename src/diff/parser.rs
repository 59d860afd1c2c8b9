//! Lenient unified-diff parsing into per-file changed-line sets.
//!
//! Only three line shapes matter: `diff --git` resets the current file,
//! `+++ <path>` selects it, and hunk headers contribute new-side line
//! ranges. Anything unparseable is skipped rather than failing the whole
//! parse; a partial line-map degrades gracefully to "include whole file".

use std::collections::{BTreeMap, BTreeSet};

/// Per-file set of new-side line numbers touched by a diff.
pub type HunkLineMap = BTreeMap<String, BTreeSet<u32>>;

/// Parse unified diff text into a [`HunkLineMap`].
pub fn parse(diff_text: &str) -> HunkLineMap {
    let mut map = HunkLineMap::new();
    let mut current_file: Option<String> = None;

    for line in diff_text.lines() {
        if line.starts_with("diff --git ") {
            current_file = None;
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            current_file = normalize_path(rest);
        } else if line.starts_with("@@") {
            let Some(file) = current_file.as_ref() else {
                continue;
            };
            let Some((start, len)) = parse_hunk_header(line) else {
                continue;
            };
            if len == 0 {
                // Pure deletion on the new side; nothing to record.
                continue;
            }
            let entry = map.entry(file.clone()).or_default();
            for line_number in start..start.saturating_add(len) {
                entry.insert(line_number);
            }
        }
    }

    map
}

/// Strip the `b/` (or `a/`) prefix from a `+++` path; None for the
/// null-device sentinel of a deleted file.
fn normalize_path(raw: &str) -> Option<String> {
    // git appends a tab before mode metadata on some paths.
    let path = raw.split('\t').next().unwrap_or(raw).trim();
    if path == "/dev/null" {
        return None;
    }
    let path = path
        .strip_prefix("b/")
        .or_else(|| path.strip_prefix("a/"))
        .unwrap_or(path);
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

/// Extract `(new_start, new_len)` from `@@ -old +newStart[,newLen] @@`.
/// `newLen` defaults to 1 when omitted.
fn parse_hunk_header(line: &str) -> Option<(u32, u32)> {
    let new_side = line
        .split_whitespace()
        .find(|token| token.starts_with('+'))?;
    let new_side = new_side.strip_prefix('+')?;

    match new_side.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((new_side.parse().ok()?, 1)),
    }
}
