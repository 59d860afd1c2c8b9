//! Markdown document generation: an outline per root followed by one
//! section per file.

use super::format::format_size;
use super::{DocumentGenerator, ScannedRoot};
use crate::scanner::tree::{DirectoryNode, FileRecord, SkipReason};
use std::collections::BTreeSet;

/// Context lines emitted around each changed line in diff-narrowed output.
pub const CHANGED_LINE_CONTEXT: u32 = 3;

pub struct MarkdownGenerator {
    context_lines: u32,
}

impl Default for MarkdownGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownGenerator {
    pub fn new() -> Self {
        Self {
            context_lines: CHANGED_LINE_CONTEXT,
        }
    }

    pub fn with_context_lines(mut self, context_lines: u32) -> Self {
        self.context_lines = context_lines;
        self
    }

    fn render_outline(node: &DirectoryNode, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        for (name, child) in &node.children {
            out.push_str(&format!("{indent}{name}/\n"));
            Self::render_outline(child, depth + 1, out);
        }
        for file in &node.files {
            let name = file
                .relative_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.relative_path.to_string_lossy().into_owned());
            out.push_str(&format!("{indent}{name}\n"));
        }
    }

    fn render_sections(&self, node: &DirectoryNode, out: &mut String) {
        for file in &node.files {
            self.render_file(file, out);
        }
        for child in node.children.values() {
            self.render_sections(child, out);
        }
    }

    fn render_file(&self, file: &FileRecord, out: &mut String) {
        let path = file.relative_path.to_string_lossy().replace('\\', "/");
        out.push_str(&format!("### `{path}`\n\n"));
        out.push_str(&format!("- Size: {}\n", format_size(file.size_bytes)));
        if !file.language.is_empty() {
            out.push_str(&format!("- Language: {}\n", file.language));
        }

        match (&file.content, file.skipped) {
            (_, Some(SkipReason::Size)) => {
                out.push_str("\n_Content omitted: exceeds size limit._\n\n");
            }
            (_, Some(SkipReason::Binary)) => {
                out.push_str("\n_Content omitted: binary file._\n\n");
            }
            (Some(content), None) => {
                let body = match &file.changed_lines {
                    Some(lines) => {
                        out.push_str("- Changed lines only\n");
                        narrow(content, lines, self.context_lines)
                    }
                    None => content.clone(),
                };
                let fence = fence_for(&body);
                out.push('\n');
                out.push_str(&format!("{fence}{}\n", file.language));
                out.push_str(&body);
                if !body.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&format!("{fence}\n\n"));
            }
            (None, None) => {
                out.push_str("\n_Content omitted._\n\n");
            }
        }
    }
}

impl DocumentGenerator for MarkdownGenerator {
    fn generate(&self, roots: &[ScannedRoot]) -> String {
        let mut out = String::new();
        for root in roots {
            out.push_str(&format!("# {}\n\n", root.label));
            out.push_str("## Outline\n\n```\n");
            Self::render_outline(&root.tree, 0, &mut out);
            out.push_str("```\n\n");
            out.push_str("## Files\n\n");
            self.render_sections(&root.tree, &mut out);
        }
        out
    }
}

/// Keep only changed lines plus a context window, with `...` markers for
/// elided regions.
fn narrow(content: &str, changed: &BTreeSet<u32>, context: u32) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len() as u32;

    let mut included: BTreeSet<u32> = BTreeSet::new();
    for &line in changed {
        let from = line.saturating_sub(context).max(1);
        let to = line.saturating_add(context).min(total);
        for n in from..=to {
            included.insert(n);
        }
    }

    let mut out = String::new();
    let mut previous: Option<u32> = None;
    for &n in &included {
        if n > total {
            break;
        }
        match previous {
            None if n > 1 => out.push_str("...\n"),
            Some(p) if n > p + 1 => out.push_str("...\n"),
            _ => {}
        }
        out.push_str(lines[(n - 1) as usize]);
        out.push('\n');
        previous = Some(n);
    }
    if let Some(p) = previous {
        if p < total {
            out.push_str("...\n");
        }
    }
    out
}

/// A fence one backtick longer than the longest run in the content, at
/// least three.
fn fence_for(content: &str) -> String {
    let mut longest = 0usize;
    let mut current = 0usize;
    for c in content.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(path: &str, content: &str) -> FileRecord {
        FileRecord {
            absolute_path: PathBuf::from("/p").join(path),
            relative_path: PathBuf::from(path),
            size_bytes: content.len() as u64,
            content: Some(content.to_string()),
            language: crate::scanner::language::language_tag(&PathBuf::from(path)),
            skipped: None,
            changed_lines: None,
        }
    }

    fn root_with(records: Vec<FileRecord>) -> ScannedRoot {
        let mut tree = DirectoryNode::new(PathBuf::new());
        for r in records {
            tree.insert(r);
        }
        tree.finalize();
        ScannedRoot {
            label: "project".to_string(),
            tree,
        }
    }

    #[test]
    fn test_outline_and_sections_present() {
        let root = root_with(vec![
            record("src/main.rs", "fn main() {}\n"),
            record("README.md", "# readme\n"),
        ]);
        let doc = MarkdownGenerator::new().generate(&[root]);

        assert!(doc.contains("# project\n"));
        assert!(doc.contains("## Outline"));
        assert!(doc.contains("src/\n  main.rs\n"));
        assert!(doc.contains("### `src/main.rs`"));
        assert!(doc.contains("```rust\nfn main() {}\n```"));
        assert!(doc.contains("- Size: 13 B"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let make = || {
            root_with(vec![
                record("b.txt", "b\n"),
                record("a.txt", "a\n"),
                record("sub/c.txt", "c\n"),
            ])
        };
        let first = MarkdownGenerator::new().generate(&[make()]);
        let second = MarkdownGenerator::new().generate(&[make()]);
        assert_eq!(first, second);
        // Lexicographic file order within the section body.
        let a = first.find("### `a.txt`").unwrap();
        let b = first.find("### `b.txt`").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_skipped_file_renders_note_without_fence() {
        let mut skipped = record("huge.txt", "");
        skipped.content = None;
        skipped.skipped = Some(SkipReason::Size);
        skipped.size_bytes = 5_000_000;

        let doc = MarkdownGenerator::new().generate(&[root_with(vec![skipped])]);
        assert!(doc.contains("### `huge.txt`"));
        assert!(doc.contains("exceeds size limit"));
        assert!(!doc.contains("```text"));
    }

    #[test]
    fn test_changed_lines_narrowing() {
        let content: String = (1..=20).map(|n| format!("line {n}\n")).collect();
        let mut file = record("src/app.rs", &content);
        file.changed_lines = Some(BTreeSet::from([10]));

        let doc = MarkdownGenerator::new().generate(&[root_with(vec![file])]);
        assert!(doc.contains("line 7\n"));
        assert!(doc.contains("line 10\n"));
        assert!(doc.contains("line 13\n"));
        assert!(!doc.contains("line 14\n"));
        assert!(!doc.contains("line 6\n"));
        assert!(doc.contains("...\n"));
    }

    #[test]
    fn test_fence_grows_past_embedded_backticks() {
        let file = record("doc.md", "````\ncode\n````\n");
        let doc = MarkdownGenerator::new().generate(&[root_with(vec![file])]);
        assert!(doc.contains("`````markdown\n"));
    }

    #[test]
    fn test_multiple_roots_grouped_separately() {
        let one = ScannedRoot {
            label: "alpha".to_string(),
            tree: {
                let mut t = DirectoryNode::new(PathBuf::new());
                t.insert(record("main.rs", "a\n"));
                t.finalize();
                t
            },
        };
        let two = ScannedRoot {
            label: "beta".to_string(),
            tree: {
                let mut t = DirectoryNode::new(PathBuf::new());
                t.insert(record("main.rs", "b\n"));
                t.finalize();
                t
            },
        };
        let doc = MarkdownGenerator::new().generate(&[one, two]);
        assert!(doc.contains("# alpha\n"));
        assert!(doc.contains("# beta\n"));
        assert_eq!(doc.matches("### `main.rs`").count(), 2);
    }

    #[test]
    fn test_narrow_elides_distant_regions() {
        let content: String = (1..=30).map(|n| format!("l{n}\n")).collect();
        let narrowed = narrow(&content, &BTreeSet::from([5, 25]), 1);
        assert!(narrowed.contains("l4\nl5\nl6\n"));
        assert!(narrowed.contains("l24\nl25\nl26\n"));
        assert!(narrowed.contains("...\n"));
        assert!(!narrowed.contains("l15\n"));
    }
}
