//! Markdown renderer with per-kind rule overrides and plugins.

mod context;
mod kinds;
mod render;
mod rules;
mod types;

pub use context::Context;
pub use kinds::NodeKind;
pub use rules::{ImageFigure, PlainCodeBlock, PlainText, RenderRule, RuleError};
pub use types::{HeadingEntry, Rendered, Scope};

use crate::options::MarkdownOptions;
use crate::plugins::{Plugin, PluginError};
use markdown::mdast::Node;
use mdjsx_core::{AstTransform, MdjsxError, ParserPipeline, TextTransform};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

/// Renders Markdown bodies to HTML.
///
/// Built from [`MarkdownOptions`], then customized with rules
/// ([`set_rule`](Self::set_rule)) and plugins ([`use_plugin`](Self::use_plugin)).
/// Rendering itself takes `&self`, so one renderer can serve many documents.
pub struct MarkdownRenderer {
    options: MarkdownOptions,
    pipeline: ParserPipeline,
    rules: HashMap<NodeKind, Arc<dyn RenderRule>>,
    plugins: Vec<String>,
}

impl MarkdownRenderer {
    /// Creates a renderer with default rendering for every kind.
    pub fn new(options: MarkdownOptions) -> Self {
        let pipeline = ParserPipeline::new(options.parse_options());
        Self {
            options,
            pipeline,
            rules: HashMap::new(),
            plugins: Vec::new(),
        }
    }

    /// Current options.
    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    /// Adjusts the options; parser constructs follow the change.
    pub fn configure(&mut self, f: impl FnOnce(&mut MarkdownOptions)) {
        f(&mut self.options);
        self.pipeline.set_options(self.options.parse_options());
    }

    /// Installs `rule` for the node kind called `name`, replacing any
    /// previous rule for that kind.
    pub fn set_rule(&mut self, name: &str, rule: impl RenderRule + 'static) -> Result<(), RuleError> {
        self.set_shared_rule(name, Arc::new(rule))
    }

    /// Like [`set_rule`](Self::set_rule) for an already shared rule.
    pub fn set_shared_rule(&mut self, name: &str, rule: Arc<dyn RenderRule>) -> Result<(), RuleError> {
        let kind = NodeKind::from_name(name).ok_or_else(|| RuleError::UnknownKind(name.to_string()))?;
        if self.rules.insert(kind, rule).is_some() {
            log::debug!("replacing the render rule for '{}'", kind);
        }
        Ok(())
    }

    /// Rule installed for `kind`, if any.
    pub fn rule(&self, kind: NodeKind) -> Option<&Arc<dyn RenderRule>> {
        self.rules.get(&kind)
    }

    /// Applies `plugin`. Plugins may install rules, transforms and adjust
    /// options.
    pub fn use_plugin(
        &mut self,
        plugin: &dyn Plugin,
        options: Option<&JsonValue>,
    ) -> Result<&mut Self, PluginError> {
        log::debug!("applying plugin '{}'", plugin.name());
        plugin.apply(self, options)?;
        self.plugins.push(plugin.name().to_string());
        Ok(self)
    }

    /// Names of the plugins applied so far.
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Adds a transform over the body text before parsing.
    pub fn add_text_transform<T: TextTransform + 'static>(&mut self, transform: T) {
        self.pipeline.add_text_transform(transform);
    }

    /// Adds a transform over the parsed tree.
    pub fn add_ast_transform<T: AstTransform + 'static>(&mut self, transform: T) {
        self.pipeline.add_ast_transform(transform);
    }

    /// Parses and renders `body` (front-matter already removed).
    pub fn render(&self, body: &str) -> Result<Rendered, MdjsxError> {
        let root = self.pipeline.parse(body)?;
        Ok(self.render_tree(&root))
    }

    /// Renders an already parsed tree.
    pub fn render_tree(&self, root: &Node) -> Rendered {
        let mut ctx = Context::new(self, root);
        ctx.render_node(root);
        render::render_footnotes(&mut ctx);
        ctx.finish()
    }
}

impl std::fmt::Debug for MarkdownRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rules: Vec<&str> = self.rules.keys().map(|kind| kind.name()).collect();
        rules.sort_unstable();
        f.debug_struct("MarkdownRenderer")
            .field("options", &self.options)
            .field("rules", &rules)
            .field("plugins", &self.plugins)
            .finish()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(MarkdownOptions::default())
    }
}
