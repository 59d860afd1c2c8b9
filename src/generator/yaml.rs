//! YAML document generation: a nested mapping mirroring the directory
//! hierarchy.
//!
//! Directory keys carry a trailing `/` so they can never collide with file
//! names. Content inclusion is a toggle; full-content YAML can be far
//! larger than the Markdown equivalent for big trees.

use super::format::format_size;
use super::{DocumentGenerator, ScannedRoot};
use crate::scanner::tree::{DirectoryNode, FileRecord};
use serde_yaml::{Mapping, Value};

pub struct YamlGenerator {
    include_content: bool,
}

impl Default for YamlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlGenerator {
    pub fn new() -> Self {
        Self {
            include_content: false,
        }
    }

    pub fn with_content(mut self, include_content: bool) -> Self {
        self.include_content = include_content;
        self
    }

    fn directory_value(&self, node: &DirectoryNode) -> Value {
        let mut map = Mapping::new();
        for (name, child) in &node.children {
            map.insert(
                Value::String(format!("{name}/")),
                self.directory_value(child),
            );
        }
        for file in &node.files {
            let name = file
                .relative_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.relative_path.to_string_lossy().into_owned());
            map.insert(Value::String(name), self.file_value(file));
        }
        Value::Mapping(map)
    }

    fn file_value(&self, file: &FileRecord) -> Value {
        let mut map = Mapping::new();
        map.insert(
            Value::String("size".to_string()),
            Value::String(format_size(file.size_bytes)),
        );
        if !file.language.is_empty() {
            map.insert(
                Value::String("language".to_string()),
                Value::String(file.language.to_string()),
            );
        }
        if let Some(reason) = file.skipped {
            map.insert(
                Value::String("skipped".to_string()),
                Value::String(reason.as_str().to_string()),
            );
        }
        if let Some(lines) = &file.changed_lines {
            map.insert(
                Value::String("changed_lines".to_string()),
                Value::Sequence(lines.iter().map(|n| Value::from(u64::from(*n))).collect()),
            );
        }
        if self.include_content {
            if let Some(content) = &file.content {
                map.insert(
                    Value::String("content".to_string()),
                    Value::String(content.clone()),
                );
            }
        }
        Value::Mapping(map)
    }
}

impl DocumentGenerator for YamlGenerator {
    fn generate(&self, roots: &[ScannedRoot]) -> String {
        let mut top = Mapping::new();
        for root in roots {
            top.insert(
                Value::String(root.label.clone()),
                self.directory_value(&root.tree),
            );
        }
        // Mapping insertion order is deterministic: BTreeMap iteration for
        // directories, sorted records for files.
        serde_yaml::to_string(&Value::Mapping(top)).unwrap_or_default()
    }
}
