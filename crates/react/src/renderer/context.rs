//! Rendering context: output buffer, scope stack and document-wide state.

use super::MarkdownRenderer;
use super::kinds::NodeKind;
use super::render;
use super::types::{HeadingEntry, Rendered, Scope};
use crate::options::MarkdownOptions;
use crate::transform::smarten;
use markdown::mdast::{Definition, FootnoteDefinition, Heading, Node};
use mdjsx_core::Slugger;
use std::borrow::Cow;
use std::collections::HashMap;

/// Rendering state for one document.
///
/// Rules receive the context and write markup through it. All text and
/// attribute values must go through [`push_text`](Self::push_text) or
/// [`push_attr_value`](Self::push_attr_value).
pub struct Context<'a> {
    renderer: &'a MarkdownRenderer,
    out: String,
    stack: Vec<Scope>,
    slugger: Slugger,
    headings: Vec<HeadingEntry>,
    /// Link reference definitions by normalized identifier (first one wins).
    definitions: HashMap<&'a str, &'a Definition>,
    footnotes: HashMap<&'a str, &'a FootnoteDefinition>,
    /// Referenced footnotes in order of first reference, with reference counts.
    footnote_order: Vec<(&'a str, usize)>,
    last_char: Option<char>,
}

impl<'a> Context<'a> {
    /// Creates a context for `root`, collecting its definitions up front.
    pub fn new(renderer: &'a MarkdownRenderer, root: &'a Node) -> Self {
        let mut ctx = Self {
            renderer,
            out: String::with_capacity(4096),
            stack: vec![Scope::Root],
            slugger: Slugger::new(),
            headings: Vec::new(),
            definitions: HashMap::new(),
            footnotes: HashMap::new(),
            footnote_order: Vec::new(),
            last_char: None,
        };
        ctx.collect_definitions(root);
        ctx
    }

    fn collect_definitions(&mut self, node: &'a Node) {
        match node {
            Node::Definition(definition) => {
                self.definitions
                    .entry(definition.identifier.as_str())
                    .or_insert(definition);
            }
            Node::FootnoteDefinition(footnote) => {
                self.footnotes
                    .entry(footnote.identifier.as_str())
                    .or_insert(footnote);
                for child in &footnote.children {
                    self.collect_definitions(child);
                }
            }
            _ => {
                if let Some(children) = node.children() {
                    for child in children {
                        self.collect_definitions(child);
                    }
                }
            }
        }
    }

    /// Renderer options.
    pub fn options(&self) -> &'a MarkdownOptions {
        self.renderer.options()
    }

    /// Renders `node` through its rule, or the default rendering when no
    /// rule is installed for its kind.
    pub fn render_node(&mut self, node: &Node) {
        let renderer = self.renderer;
        match NodeKind::of(node).and_then(|kind| renderer.rule(kind)) {
            Some(rule) => rule.render(node, self),
            None => render::render_default(node, self),
        }
    }

    /// Renders `node` the built-in way, bypassing any rule.
    pub fn render_default(&mut self, node: &Node) {
        render::render_default(node, self);
    }

    /// Renders each child in order.
    pub fn render_children(&mut self, children: &[Node]) {
        for child in children {
            self.render_node(child);
        }
    }

    /// Renders `children` inside `scope`.
    pub fn render_children_in(&mut self, scope: Scope, children: &[Node]) {
        self.enter(scope);
        self.render_children(children);
        self.exit();
    }

    /// Writes markup verbatim.
    pub fn push_raw(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Writes text content with `&`, `<` and `>` escaped.
    pub fn push_text(&mut self, s: &str) {
        html_escape::encode_text_to_string(s, &mut self.out);
        if let Some(last) = s.chars().next_back() {
            self.last_char = Some(last);
        }
    }

    /// Writes an escaped value for a double-quoted attribute.
    pub fn push_attr_value(&mut self, s: &str) {
        html_escape::encode_double_quoted_attribute_to_string(s, &mut self.out);
    }

    /// Writes ` name="value"`.
    pub fn push_attr(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.push_attr_value(value);
        self.out.push('"');
    }

    /// Ends a void tag: `>` or ` />` with `xhtmlOut`.
    pub fn push_void_end(&mut self) {
        let end = if self.options().xhtml_out { " />" } else { ">" };
        self.out.push_str(end);
    }

    /// Renders a text node value: typographer if enabled, then soft breaks
    /// become `<br>` when `breaks` is set.
    pub fn render_text(&mut self, value: &str, breaks: bool) {
        let value = if self.options().typographer {
            Cow::Owned(smarten(value, self.last_char))
        } else {
            Cow::Borrowed(value)
        };
        self.write_text(&value, breaks);
    }

    /// Renders a text node value without typographic replacements.
    pub fn render_plain_text(&mut self, value: &str) {
        self.write_text(value, self.options().breaks);
    }

    fn write_text(&mut self, value: &str, breaks: bool) {
        if !breaks || !value.contains('\n') {
            self.push_text(value);
            return;
        }

        let mut lines = value.split('\n').peekable();
        while let Some(line) = lines.next() {
            self.push_text(line);
            if lines.peek().is_some() {
                self.push_raw("<br");
                self.push_void_end();
                self.push_raw("\n");
            }
        }
    }

    /// Writes a code block, optionally through the configured highlighter.
    pub fn push_code_block(&mut self, value: &str, lang: &str, highlight: bool) {
        render::write_code_block(self, value, lang, highlight);
    }

    /// Writes an `<img>` tag. Unsafe sources degrade to the alt text.
    pub fn push_image(&mut self, url: &str, alt: &str, title: Option<&str>, extra: &[(&str, &str)]) {
        if !render::is_safe_url(url) {
            log::debug!("dropping image with unsafe source '{}'", url);
            self.push_text(alt);
            return;
        }

        self.push_raw("<img");
        self.push_attr("src", url);
        self.push_attr("alt", alt);
        if let Some(title) = title {
            self.push_attr("title", title);
        }
        for (name, value) in extra {
            self.push_attr(name, value);
        }
        self.push_void_end();
    }

    /// Writes an `<a>` around `children`. Unsafe targets render the children
    /// without a link.
    pub fn push_link(
        &mut self,
        url: &str,
        title: Option<&str>,
        children: &[Node],
        extra: &[(&str, &str)],
    ) {
        if !render::is_safe_url(url) {
            log::debug!("dropping link with unsafe target '{}'", url);
            self.render_children(children);
            return;
        }

        self.push_raw("<a");
        self.push_attr("href", url);
        if let Some(title) = title {
            self.push_attr("title", title);
        }
        for (name, value) in extra {
            self.push_attr(name, value);
        }
        self.push_raw(">");
        self.render_children_in(Scope::Link, children);
        self.push_raw("</a>");
    }

    /// Looks up a link reference definition.
    pub fn definition(&self, identifier: &str) -> Option<&'a Definition> {
        self.definitions.get(identifier).copied()
    }

    /// Registers a reference to the footnote `identifier`.
    ///
    /// Returns the footnote number (1-based, by first reference) and the
    /// index of this reference among all references to the same footnote.
    /// `None` when no such footnote is defined.
    pub fn reference_footnote(&mut self, identifier: &str) -> Option<(usize, usize)> {
        let (&key, _) = self.footnotes.get_key_value(identifier)?;
        match self.footnote_order.iter().position(|(id, _)| *id == key) {
            Some(index) => {
                let count = &mut self.footnote_order[index].1;
                *count += 1;
                Some((index + 1, *count - 1))
            }
            None => {
                self.footnote_order.push((key, 1));
                Some((self.footnote_order.len(), 0))
            }
        }
    }

    /// Referenced footnote at `index` with its reference count.
    pub(crate) fn referenced_footnote(&self, index: usize) -> Option<(&'a FootnoteDefinition, usize)> {
        let (id, count) = self.footnote_order.get(index)?;
        let definition = self.footnotes.get(id)?;
        Some((*definition, *count))
    }

    /// Computes a unique slug for `heading` and records it.
    pub fn record_heading(&mut self, heading: &Heading) -> HeadingEntry {
        let text = render::plain_text(&heading.children);
        let entry = HeadingEntry {
            depth: heading.depth,
            slug: self.slugger.next_slug(&text),
            text,
        };
        self.headings.push(entry.clone());
        entry
    }

    /// Enters a new scope.
    pub fn enter(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    /// Exits the current scope.
    pub fn exit(&mut self) -> Option<Scope> {
        self.stack.pop()
    }

    /// Scope at the top of the stack.
    pub fn current_scope(&self) -> Scope {
        self.stack.last().copied().unwrap_or(Scope::Root)
    }

    /// Whether the innermost list is tight.
    pub fn is_in_tight_list(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find_map(|scope| match scope {
                Scope::List { tight } => Some(*tight),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Whether output currently goes into phrasing content.
    pub fn is_inline(&self) -> bool {
        self.stack.iter().any(|scope| scope.is_inline())
    }

    /// Temporarily redirects output, returning what `f` wrote.
    pub(crate) fn capture(&mut self, f: impl FnOnce(&mut Self)) -> String {
        let saved = std::mem::take(&mut self.out);
        f(self);
        std::mem::replace(&mut self.out, saved)
    }

    /// Consumes the context, returning the markup and headings.
    pub fn finish(self) -> Rendered {
        Rendered {
            html: self.out,
            headings: self.headings,
        }
    }
}
