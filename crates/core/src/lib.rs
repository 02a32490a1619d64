#![deny(missing_docs)]
//! mdjsx core: front-matter splitting, import declarations, markdown parsing hooks and slugs.

/// Core error and diagnostic types.
pub mod error;
/// YAML front-matter extraction helpers.
pub mod frontmatter;
/// Import declarations from front-matter.
pub mod imports;
/// Markdown parsing utilities and extension hooks.
pub mod parse;
/// Slug generation utilities.
pub mod slug;

pub use error::{Diagnostics, HookStage, MdjsxError, SourceLocation, Warning};
pub use frontmatter::{
    Document, FrontmatterError, FrontmatterExtraction, extract_frontmatter, split_document,
};
pub use imports::{IMPORTS_ATTRIBUTE, declared_imports, merge_imports};
pub use parse::{AstTransform, ParseOptions, ParserPipeline, TextTransform};
pub use slug::{Slugger, slugify};
