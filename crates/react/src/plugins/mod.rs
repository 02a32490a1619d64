//! Renderer plugins.
//!
//! A plugin receives the renderer and its options and may install rules,
//! text or tree transforms, or adjust renderer options.

mod external_links;
mod heading_anchors;
mod lazy_images;

pub use external_links::{ExternalLinks, ExternalLinksOptions};
pub use heading_anchors::{HeadingAnchors, HeadingAnchorsOptions};
pub use lazy_images::LazyImages;

use crate::renderer::{MarkdownRenderer, RuleError};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors a plugin can raise while being applied.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The options did not have the expected shape.
    #[error("invalid options for '{plugin}': {message}")]
    InvalidOptions {
        /// Plugin name
        plugin: String,
        /// What was wrong
        message: String,
    },
    /// A rule could not be installed.
    #[error(transparent)]
    Rule(#[from] RuleError),
    /// Any other failure.
    #[error("{0}")]
    Failed(String),
}

/// An extension applied to a [`MarkdownRenderer`].
pub trait Plugin: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Applies the plugin.
    fn apply(&self, md: &mut MarkdownRenderer, options: Option<&JsonValue>) -> Result<(), PluginError>;
}

impl<F> Plugin for F
where
    F: Fn(&mut MarkdownRenderer, Option<&JsonValue>) -> Result<(), PluginError> + Send + Sync,
{
    fn apply(&self, md: &mut MarkdownRenderer, options: Option<&JsonValue>) -> Result<(), PluginError> {
        (self)(md, options)
    }
}

/// A plugin together with the options it is applied with.
#[derive(Clone)]
pub struct PluginEntry {
    /// The plugin.
    pub plugin: Arc<dyn Plugin>,
    /// Options handed to [`Plugin::apply`].
    pub options: Option<JsonValue>,
}

impl PluginEntry {
    /// Entry without options.
    pub fn new(plugin: impl Plugin + 'static) -> Self {
        Self {
            plugin: Arc::new(plugin),
            options: None,
        }
    }

    /// Sets the options.
    pub fn with_options(mut self, options: JsonValue) -> Self {
        self.options = Some(options);
        self
    }
}

impl fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginEntry")
            .field("plugin", &self.plugin.name())
            .field("options", &self.options)
            .finish()
    }
}

/// Reads typed plugin options; missing or `null` options give the defaults.
pub fn parse_options<T>(plugin: &str, options: Option<&JsonValue>) -> Result<T, PluginError>
where
    T: DeserializeOwned + Default,
{
    match options {
        None | Some(JsonValue::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|err| PluginError::InvalidOptions {
            plugin: plugin.to_string(),
            message: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MarkdownOptions;
    use crate::renderer::Context;
    use markdown::mdast::Node;
    use serde_json::json;

    fn emphasis_as_mark(node: &Node, ctx: &mut Context<'_>) {
        if let Node::Emphasis(emphasis) = node {
            ctx.push_raw("<mark>");
            ctx.render_children(&emphasis.children);
            ctx.push_raw("</mark>");
        }
    }

    fn mark_plugin(md: &mut MarkdownRenderer, options: Option<&JsonValue>) -> Result<(), PluginError> {
        if options.and_then(|o| o.get("typographer")).and_then(JsonValue::as_bool) == Some(true) {
            md.configure(|options| options.typographer = true);
        }
        md.set_rule("emphasis", emphasis_as_mark)?;
        Ok(())
    }

    fn broken_plugin(md: &mut MarkdownRenderer, _: Option<&JsonValue>) -> Result<(), PluginError> {
        md.set_rule("not-a-kind", emphasis_as_mark)?;
        Ok(())
    }

    #[test]
    fn functions_are_plugins() {
        let mut md = MarkdownRenderer::new(MarkdownOptions::default());
        md.use_plugin(&mark_plugin, Some(&json!({ "typographer": true })))
            .unwrap();
        assert!(md.options().typographer);
        assert_eq!(md.plugins(), ["anonymous"]);
        assert_eq!(md.render("*a* -- b").unwrap().html, "<p><mark>a</mark> \u{2013} b</p>\n");
    }

    #[test]
    fn rule_failures_surface_as_plugin_errors() {
        let mut md = MarkdownRenderer::default();
        let err = md.use_plugin(&broken_plugin, None).unwrap_err();
        assert!(matches!(err, PluginError::Rule(RuleError::UnknownKind(_))));
        assert!(md.plugins().is_empty());
    }

    #[test]
    fn options_parse_with_defaults() {
        let parsed: HeadingAnchorsOptions = parse_options("heading-anchors", None).unwrap();
        assert_eq!(parsed, HeadingAnchorsOptions::default());

        let err = parse_options::<HeadingAnchorsOptions>("heading-anchors", Some(&json!({ "levels": "all" })))
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid options for 'heading-anchors'"));
    }
}
