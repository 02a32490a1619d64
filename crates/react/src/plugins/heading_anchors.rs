use super::{Plugin, PluginError, parse_options};
use crate::renderer::{Context, MarkdownRenderer, RenderRule, Scope};
use markdown::mdast::Node;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Options for [`HeadingAnchors`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingAnchorsOptions {
    /// Wrap the heading content in a link to itself.
    pub permalink: bool,
    /// Class of the self link.
    pub permalink_class: String,
    /// Heading depths that receive an id.
    pub levels: Vec<u8>,
}

impl Default for HeadingAnchorsOptions {
    fn default() -> Self {
        Self {
            permalink: false,
            permalink_class: "header-anchor".to_string(),
            levels: vec![1, 2, 3, 4, 5, 6],
        }
    }
}

/// Adds slug ids to headings (`heading-anchors`).
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadingAnchors;

impl Plugin for HeadingAnchors {
    fn name(&self) -> &str {
        "heading-anchors"
    }

    fn apply(&self, md: &mut MarkdownRenderer, options: Option<&JsonValue>) -> Result<(), PluginError> {
        let options: HeadingAnchorsOptions = parse_options(self.name(), options)?;
        if let Some(level) = options.levels.iter().find(|level| !(1..=6).contains(*level)) {
            return Err(PluginError::InvalidOptions {
                plugin: self.name().to_string(),
                message: format!("heading level {} is out of range 1-6", level),
            });
        }
        md.set_rule("heading", AnchoredHeading { options })?;
        Ok(())
    }
}

struct AnchoredHeading {
    options: HeadingAnchorsOptions,
}

impl RenderRule for AnchoredHeading {
    fn render(&self, node: &Node, ctx: &mut Context<'_>) {
        let Node::Heading(heading) = node else {
            return ctx.render_default(node);
        };
        if !self.options.levels.contains(&heading.depth) {
            return ctx.render_default(node);
        }

        let entry = ctx.record_heading(heading);
        let tag = format!("h{}", heading.depth);
        ctx.push_raw("<");
        ctx.push_raw(&tag);
        ctx.push_attr("id", &entry.slug);
        ctx.push_raw(">");

        // Nested anchors are invalid, so headings that already link keep
        // their content as is.
        let permalink = self.options.permalink && !contains_link(&heading.children);
        if permalink {
            ctx.push_raw("<a");
            ctx.push_attr("class", &self.options.permalink_class);
            ctx.push_attr("href", &format!("#{}", entry.slug));
            ctx.push_raw(">");
        }
        ctx.render_children_in(Scope::Heading, &heading.children);
        if permalink {
            ctx.push_raw("</a>");
        }

        ctx.push_raw("</");
        ctx.push_raw(&tag);
        ctx.push_raw(">\n");
    }
}

fn contains_link(children: &[Node]) -> bool {
    children.iter().any(|child| match child {
        Node::Link(_) | Node::LinkReference(_) => true,
        other => other.children().is_some_and(|children| contains_link(children)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer(options: Option<JsonValue>) -> MarkdownRenderer {
        let mut md = MarkdownRenderer::default();
        md.use_plugin(&HeadingAnchors, options.as_ref()).unwrap();
        md
    }

    #[test]
    fn adds_unique_ids() {
        let rendered = renderer(None).render("# Intro\n\n## Intro").unwrap();
        assert_eq!(
            rendered.html,
            "<h1 id=\"intro\">Intro</h1>\n<h2 id=\"intro-1\">Intro</h2>\n"
        );
        assert_eq!(rendered.headings.len(), 2);
    }

    #[test]
    fn permalink_wraps_content() {
        let md = renderer(Some(json!({ "permalink": true })));
        assert_eq!(
            md.render("## Setup").unwrap().html,
            "<h2 id=\"setup\"><a class=\"header-anchor\" href=\"#setup\">Setup</a></h2>\n"
        );
        assert_eq!(
            md.render("## [Docs](/docs)").unwrap().html,
            "<h2 id=\"docs\"><a href=\"/docs\">Docs</a></h2>\n"
        );
    }

    #[test]
    fn levels_limit_ids() {
        let md = renderer(Some(json!({ "levels": [2] })));
        let rendered = md.render("# One\n\n## Two").unwrap();
        assert_eq!(rendered.html, "<h1>One</h1>\n<h2 id=\"two\">Two</h2>\n");
        assert_eq!(rendered.headings.len(), 2);
    }

    #[test]
    fn out_of_range_levels_are_rejected() {
        let mut md = MarkdownRenderer::default();
        let err = md
            .use_plugin(&HeadingAnchors, Some(&json!({ "levels": [7] })))
            .unwrap_err();
        assert!(matches!(err, PluginError::InvalidOptions { .. }));
    }
}
