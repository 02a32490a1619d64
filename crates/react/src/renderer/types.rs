//! Type definitions for the renderer.

use serde::Serialize;

/// Heading metadata extracted during rendering.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    /// Heading depth (1-6).
    pub depth: u8,
    /// Slugified identifier, unique within the document.
    pub slug: String,
    /// Visible heading text.
    pub text: String,
}

/// Output of [`MarkdownRenderer::render`](super::MarkdownRenderer::render).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    /// HTML markup, markdown-it style.
    pub html: String,
    /// Headings in document order.
    pub headings: Vec<HeadingEntry>,
}

/// Element the renderer is currently inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Document root.
    Root,
    /// `<p>`, also entered for the hidden paragraphs of tight lists.
    Paragraph,
    /// `<h1>`..`<h6>`.
    Heading,
    /// `<blockquote>`.
    Blockquote,
    /// `<ul>` or `<ol>`.
    List {
        /// No `<p>` wrappers around item paragraphs.
        tight: bool,
    },
    /// `<li>`.
    ListItem,
    /// `<table>`.
    Table,
    /// `<th>` or `<td>`.
    TableCell,
    /// `<a>`.
    Link,
    /// A footnote body rendered at the end of the document.
    Footnote,
}

impl Scope {
    /// Whether content in this scope is phrasing content.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            Scope::Paragraph | Scope::Heading | Scope::TableCell | Scope::Link
        )
    }
}
