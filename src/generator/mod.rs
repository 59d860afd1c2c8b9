//! Deterministic document assembly from scanned trees.

pub mod format;
pub mod markdown;
pub mod yaml;

use crate::cli::DocumentFormat;
use crate::scanner::tree::DirectoryNode;

pub use format::format_size;
pub use markdown::MarkdownGenerator;
pub use yaml::YamlGenerator;

/// One scanned root with the label it is grouped under in the document.
/// Labels are unique across a request so identically named files from
/// different roots never collide.
pub struct ScannedRoot {
    pub label: String,
    pub tree: DirectoryNode,
}

/// A document serialization over scanned trees. The same trees always
/// serialize to the same byte sequence.
pub trait DocumentGenerator {
    fn generate(&self, roots: &[ScannedRoot]) -> String;
}

/// Selects the generator for the requested format and applies the shared
/// options (prefix text, YAML content toggle).
pub struct DocumentBuilder {
    format: DocumentFormat,
    prefix: Option<String>,
    yaml_content: bool,
}

impl DocumentBuilder {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            prefix: None,
            yaml_content: false,
        }
    }

    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_yaml_content(mut self, yaml_content: bool) -> Self {
        self.yaml_content = yaml_content;
        self
    }

    pub fn build(&self, roots: &[ScannedRoot]) -> String {
        let body = match self.format {
            DocumentFormat::Markdown => MarkdownGenerator::new().generate(roots),
            DocumentFormat::Yaml => YamlGenerator::new()
                .with_content(self.yaml_content)
                .generate(roots),
        };

        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}\n\n{body}"),
            _ => body,
        }
    }
}
