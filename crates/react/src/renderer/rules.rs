//! Render rules: per node kind overrides of the default output.

use super::context::Context;
use markdown::mdast::{Image, Node};
use thiserror::Error;

/// Replaces the default rendering of one node kind.
///
/// A rule writes the node's full markup into the context. It can defer to
/// [`Context::render_default`] for nodes it does not want to handle.
pub trait RenderRule: Send + Sync {
    /// Renders `node`.
    fn render(&self, node: &Node, ctx: &mut Context<'_>);
}

impl<F> RenderRule for F
where
    F: Fn(&Node, &mut Context<'_>) + Send + Sync,
{
    fn render(&self, node: &Node, ctx: &mut Context<'_>) {
        (self)(node, ctx)
    }
}

/// Errors raised while installing a rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The rule name is neither an mdast type nor a markdown-it token name.
    #[error("'{0}' is not a renderable node kind")]
    UnknownKind(String),
}

/// Text without typographic replacements.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl RenderRule for PlainText {
    fn render(&self, node: &Node, ctx: &mut Context<'_>) {
        match node {
            Node::Text(text) => ctx.render_plain_text(&text.value),
            _ => ctx.render_default(node),
        }
    }
}

/// Fenced code without the configured highlighter.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainCodeBlock;

impl RenderRule for PlainCodeBlock {
    fn render(&self, node: &Node, ctx: &mut Context<'_>) {
        match node {
            Node::Code(code) => {
                ctx.push_code_block(&code.value, code.lang.as_deref().unwrap_or(""), false)
            }
            _ => ctx.render_default(node),
        }
    }
}

/// Turns a paragraph holding nothing but a titled image into
/// `<figure>` with the title as `<figcaption>`.
///
/// Install it on `paragraph`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFigure;

impl RenderRule for ImageFigure {
    fn render(&self, node: &Node, ctx: &mut Context<'_>) {
        let Node::Paragraph(paragraph) = node else {
            return ctx.render_default(node);
        };
        let [Node::Image(image)] = paragraph.children.as_slice() else {
            return ctx.render_default(node);
        };
        let Some(title) = image.title.as_deref() else {
            return ctx.render_default(node);
        };

        // The title moves to the caption; the image itself still goes
        // through any `image` rule.
        let untitled = Node::Image(Image {
            title: None,
            ..image.clone()
        });
        ctx.push_raw("<figure>");
        ctx.render_node(&untitled);
        ctx.push_raw("<figcaption>");
        ctx.push_text(title);
        ctx.push_raw("</figcaption></figure>\n");
    }
}
