//! NAPI-exposed data structures.

use mdjsx_core::{Diagnostics, Warning};
use mdjsx_react::TransformOutput;
use napi_derive::napi;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Parsed frontmatter document plus any parser errors.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct FrontmatterResult {
    /// Structured frontmatter data represented as JSON.
    pub frontmatter: JsonValue,
    /// Markdown body following the front-matter block.
    pub body: String,
    /// Any syntax or parsing errors surfaced by the extractor.
    pub errors: Vec<String>,
}

/// Heading metadata collected while rendering.
#[napi(object)]
#[derive(Debug, Clone, Serialize)]
pub struct HeadingEntry {
    /// Heading depth (1-6).
    pub depth: u8,
    /// Slugified identifier.
    pub slug: String,
    /// Visible heading text.
    pub text: String,
}

/// A non-fatal problem reported by a transform.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct WarningEntry {
    /// Machine readable category (`rule_skipped`, `plugin_skipped`, `import`).
    pub kind: String,
    /// Human readable description.
    pub message: String,
}

impl From<&Warning> for WarningEntry {
    fn from(warning: &Warning) -> Self {
        Self {
            kind: warning.kind().to_string(),
            message: warning.to_string(),
        }
    }
}

/// Result of transforming one document.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Complete component module.
    pub code: String,
    /// JSX markup placed inside the component.
    pub jsx: String,
    /// Front-matter attributes.
    pub attributes: JsonValue,
    /// Import statements at the top of the module.
    pub imports: Vec<String>,
    /// Headings in document order.
    pub headings: Vec<HeadingEntry>,
    /// Config and transform warnings.
    pub warnings: Vec<WarningEntry>,
}

impl TransformResult {
    /// Converts a transform output, prepending warnings raised while the
    /// configuration was resolved.
    pub(crate) fn from_output(output: TransformOutput, config_warnings: &Diagnostics) -> Self {
        let warnings = config_warnings
            .warnings
            .iter()
            .chain(output.diagnostics.warnings.iter())
            .map(WarningEntry::from)
            .collect();
        Self {
            code: output.code,
            jsx: output.jsx,
            attributes: output.attributes,
            imports: output.imports,
            headings: output
                .headings
                .into_iter()
                .map(|h| HeadingEntry {
                    depth: h.depth,
                    slug: h.slug,
                    text: h.text,
                })
                .collect(),
            warnings,
        }
    }
}
