//! Markdown parsing utilities and extension hooks.

use crate::{MdjsxError, SourceLocation};
use markdown::mdast::Node;
use markdown::message::{Message, Place};
use std::borrow::Cow;

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown constructs (tables, strikethrough, task lists, footnotes).
    pub gfm: bool,
    /// Allow raw HTML nodes in the AST.
    pub html: bool,
    /// Turn bare URLs into links.
    pub linkify: bool,
    /// Enable math constructs ($inline$ and $$block$$).
    pub math: bool,
    /// Enable indented code blocks.
    pub code_indented: bool,
}

impl ParseOptions {
    /// CommonMark defaults with GFM tables and strikethrough.
    pub const fn markdown() -> Self {
        Self {
            gfm: true,
            html: false,
            linkify: false,
            math: false,
            code_indented: true,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    ///
    /// Front-matter constructs stay off: the body handed to the parser has
    /// already been split from its metadata.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: false,
            code_indented: self.code_indented,
            html_flow: self.html,
            html_text: self.html,
            gfm_autolink_literal: self.linkify,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.math {
            constructs.math_flow = true;
            constructs.math_text = true;
        }

        markdown::ParseOptions {
            constructs,
            math_text_single_dollar: self.math,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::markdown()
    }
}

/// Trait for preprocessing raw markdown text before parsing.
pub trait TextTransform: Send + Sync {
    /// Transform the input markdown text, returning an owned or borrowed string.
    fn transform<'a>(&self, input: &'a str) -> Cow<'a, str>;
}

impl<F> TextTransform for F
where
    F: for<'a> Fn(&'a str) -> Cow<'a, str> + Send + Sync,
{
    fn transform<'a>(&self, input: &'a str) -> Cow<'a, str> {
        (self)(input)
    }
}

/// Trait for mutating the parsed MDAST after parsing.
pub trait AstTransform: Send + Sync {
    /// Mutate the parsed markdown AST in place.
    fn transform(&self, root: &mut Node);
}

impl<F> AstTransform for F
where
    F: Fn(&mut Node) + Send + Sync,
{
    fn transform(&self, root: &mut Node) {
        (self)(root)
    }
}

/// Configurable parsing pipeline with optional transforms.
pub struct ParserPipeline {
    options: markdown::ParseOptions,
    text_transforms: Vec<Box<dyn TextTransform>>,
    ast_transforms: Vec<Box<dyn AstTransform>>,
}

impl ParserPipeline {
    /// Create a new pipeline from core parse options.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options: options.to_markdown(),
            text_transforms: Vec::new(),
            ast_transforms: Vec::new(),
        }
    }

    /// Replaces the parse options, keeping registered transforms.
    pub fn set_options(&mut self, options: ParseOptions) {
        self.options = options.to_markdown();
    }

    /// Add a text preprocessor transform.
    pub fn add_text_transform<T: TextTransform + 'static>(&mut self, transform: T) {
        self.text_transforms.push(Box::new(transform));
    }

    /// Add an AST transform.
    pub fn add_ast_transform<T: AstTransform + 'static>(&mut self, transform: T) {
        self.ast_transforms.push(Box::new(transform));
    }

    /// Parse markdown into MDAST using the configured pipeline.
    pub fn parse(&self, input: &str) -> Result<Node, MdjsxError> {
        let mut current = Cow::Borrowed(input);
        for transform in &self.text_transforms {
            let next = transform.transform(current.as_ref());
            current = Cow::Owned(next.into_owned());
        }

        let mut root = to_mdast(&current, &self.options)?;
        for transform in &self.ast_transforms {
            transform.transform(&mut root);
        }

        Ok(root)
    }
}

impl Default for ParserPipeline {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

fn to_mdast(input: &str, options: &markdown::ParseOptions) -> Result<Node, MdjsxError> {
    markdown::to_mdast(input, options).map_err(|err| MdjsxError::Markdown {
        message: err.to_string(),
        location: message_location(&err),
    })
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str, options: ParseOptions) -> Node {
        ParserPipeline::new(options).parse(input).unwrap()
    }

    fn first_block(root: &Node) -> &Node {
        &root.children().expect("root has children")[0]
    }

    #[test]
    fn html_flag_controls_raw_html_nodes() {
        let with_html = ParseOptions {
            html: true,
            ..ParseOptions::default()
        };
        let root = parse("<div>hi</div>", with_html);
        assert!(matches!(first_block(&root), Node::Html(_)));

        let root = parse("<div>hi</div>", ParseOptions::default());
        assert!(matches!(first_block(&root), Node::Paragraph(_)));
    }

    #[test]
    fn gfm_enables_tables() {
        let input = "| a | b |\n| - | - |\n| 1 | 2 |";
        let root = parse(input, ParseOptions::default());
        assert!(matches!(first_block(&root), Node::Table(_)));

        let plain = ParseOptions {
            gfm: false,
            ..ParseOptions::default()
        };
        let root = parse(input, plain);
        assert!(matches!(first_block(&root), Node::Paragraph(_)));
    }

    #[test]
    fn frontmatter_fence_is_not_special_in_body() {
        let root = parse("---\n", ParseOptions::default());
        assert!(matches!(first_block(&root), Node::ThematicBreak(_)));
    }

    fn foo_to_bar(input: &str) -> Cow<'_, str> {
        Cow::Owned(input.replace("foo", "bar"))
    }

    #[test]
    fn pipeline_runs_text_then_ast_transforms() {
        let mut pipeline = ParserPipeline::default();
        pipeline.add_text_transform(foo_to_bar);
        pipeline.add_ast_transform(|root: &mut Node| {
            if let Node::Root(root) = root {
                root.children.truncate(1);
            }
        });

        let root = pipeline.parse("foo\n\nsecond").unwrap();
        let children = root.children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(root.to_string(), "bar");
    }
}
