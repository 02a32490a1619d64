use super::{Plugin, PluginError};
use crate::renderer::{Context, MarkdownRenderer, RenderRule};
use markdown::mdast::Node;
use serde_json::Value as JsonValue;

const LAZY: &[(&str, &str)] = &[("loading", "lazy")];

/// Adds `loading="lazy"` to every image (`lazy-images`).
#[derive(Debug, Default, Clone, Copy)]
pub struct LazyImages;

impl Plugin for LazyImages {
    fn name(&self) -> &str {
        "lazy-images"
    }

    fn apply(&self, md: &mut MarkdownRenderer, _options: Option<&JsonValue>) -> Result<(), PluginError> {
        md.set_rule("image", LazyImage)?;
        md.set_rule("imageReference", LazyImage)?;
        Ok(())
    }
}

struct LazyImage;

impl RenderRule for LazyImage {
    fn render(&self, node: &Node, ctx: &mut Context<'_>) {
        match node {
            Node::Image(image) => ctx.push_image(&image.url, &image.alt, image.title.as_deref(), LAZY),
            Node::ImageReference(reference) => match ctx.definition(&reference.identifier) {
                Some(definition) => {
                    ctx.push_image(&definition.url, &reference.alt, definition.title.as_deref(), LAZY)
                }
                None => ctx.render_default(node),
            },
            _ => ctx.render_default(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_load_lazily() {
        let mut md = MarkdownRenderer::default();
        md.use_plugin(&LazyImages, None).unwrap();
        assert_eq!(
            md.render("![a](a.png) ![b][b]\n\n[b]: b.png").unwrap().html,
            "<p><img src=\"a.png\" alt=\"a\" loading=\"lazy\"> <img src=\"b.png\" alt=\"b\" loading=\"lazy\"></p>\n"
        );
    }
}
