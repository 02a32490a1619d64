use super::{Plugin, PluginError, parse_options};
use crate::renderer::{Context, MarkdownRenderer, RenderRule};
use markdown::mdast::Node;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Options for [`ExternalLinks`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalLinksOptions {
    /// `target` attribute; empty to omit.
    pub target: String,
    /// `rel` attribute; empty to omit.
    pub rel: String,
}

impl Default for ExternalLinksOptions {
    fn default() -> Self {
        Self {
            target: "_blank".to_string(),
            rel: "noopener noreferrer".to_string(),
        }
    }
}

/// Opens absolute `http(s)` links in a new tab (`external-links`).
#[derive(Debug, Default, Clone, Copy)]
pub struct ExternalLinks;

impl Plugin for ExternalLinks {
    fn name(&self) -> &str {
        "external-links"
    }

    fn apply(&self, md: &mut MarkdownRenderer, options: Option<&JsonValue>) -> Result<(), PluginError> {
        let options: ExternalLinksOptions = parse_options(self.name(), options)?;
        let mut attrs = Vec::new();
        if !options.target.is_empty() {
            attrs.push(("target".to_string(), options.target));
        }
        if !options.rel.is_empty() {
            attrs.push(("rel".to_string(), options.rel));
        }
        md.set_rule("link", ExternalLink { attrs: attrs.clone() })?;
        md.set_rule("linkReference", ExternalLink { attrs })?;
        Ok(())
    }
}

struct ExternalLink {
    attrs: Vec<(String, String)>,
}

impl RenderRule for ExternalLink {
    fn render(&self, node: &Node, ctx: &mut Context<'_>) {
        let (url, title, children) = match node {
            Node::Link(link) => (link.url.as_str(), link.title.as_deref(), &link.children),
            Node::LinkReference(reference) => match ctx.definition(&reference.identifier) {
                Some(definition) => (
                    definition.url.as_str(),
                    definition.title.as_deref(),
                    &reference.children,
                ),
                None => return ctx.render_default(node),
            },
            _ => return ctx.render_default(node),
        };

        if !is_external(url) {
            return ctx.render_default(node);
        }
        let attrs: Vec<(&str, &str)> = self
            .attrs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        ctx.push_link(url, title, children, &attrs);
    }
}

fn is_external(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}
