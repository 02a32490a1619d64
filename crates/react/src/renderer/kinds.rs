use markdown::mdast::Node;
use std::fmt;

/// Node kinds a render rule can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `> quote`
    Blockquote,
    /// Hard line break.
    Break,
    /// Fenced or indented code block.
    Code,
    /// `~~struck~~`
    Delete,
    /// `*em*`
    Emphasis,
    /// `[^note]`
    FootnoteReference,
    /// `# Heading`
    Heading,
    /// Raw HTML, block or inline.
    Html,
    /// `![alt](src)`
    Image,
    /// `![alt][ref]`
    ImageReference,
    /// `` `code` ``
    InlineCode,
    /// `$math$`
    InlineMath,
    /// `[text](href)`
    Link,
    /// `[text][ref]`
    LinkReference,
    /// Ordered or bullet list.
    List,
    /// One list item.
    ListItem,
    /// `$$ math $$`
    Math,
    /// Paragraph.
    Paragraph,
    /// `**strong**`
    Strong,
    /// GFM table.
    Table,
    /// Text.
    Text,
    /// `---`
    ThematicBreak,
}

impl NodeKind {
    /// Every kind, in declaration order.
    pub const ALL: [NodeKind; 22] = [
        NodeKind::Blockquote,
        NodeKind::Break,
        NodeKind::Code,
        NodeKind::Delete,
        NodeKind::Emphasis,
        NodeKind::FootnoteReference,
        NodeKind::Heading,
        NodeKind::Html,
        NodeKind::Image,
        NodeKind::ImageReference,
        NodeKind::InlineCode,
        NodeKind::InlineMath,
        NodeKind::Link,
        NodeKind::LinkReference,
        NodeKind::List,
        NodeKind::ListItem,
        NodeKind::Math,
        NodeKind::Paragraph,
        NodeKind::Strong,
        NodeKind::Table,
        NodeKind::Text,
        NodeKind::ThematicBreak,
    ];

    /// The mdast type name.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Blockquote => "blockquote",
            NodeKind::Break => "break",
            NodeKind::Code => "code",
            NodeKind::Delete => "delete",
            NodeKind::Emphasis => "emphasis",
            NodeKind::FootnoteReference => "footnoteReference",
            NodeKind::Heading => "heading",
            NodeKind::Html => "html",
            NodeKind::Image => "image",
            NodeKind::ImageReference => "imageReference",
            NodeKind::InlineCode => "inlineCode",
            NodeKind::InlineMath => "inlineMath",
            NodeKind::Link => "link",
            NodeKind::LinkReference => "linkReference",
            NodeKind::List => "list",
            NodeKind::ListItem => "listItem",
            NodeKind::Math => "math",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Strong => "strong",
            NodeKind::Table => "table",
            NodeKind::Text => "text",
            NodeKind::ThematicBreak => "thematicBreak",
        }
    }

    /// Resolves an mdast type name or a markdown-it token name.
    pub fn from_name(name: &str) -> Option<NodeKind> {
        if let Some(kind) = NodeKind::ALL.into_iter().find(|kind| kind.name() == name) {
            return Some(kind);
        }

        let kind = match name {
            "code_inline" => NodeKind::InlineCode,
            "fence" | "code_block" => NodeKind::Code,
            "hr" => NodeKind::ThematicBreak,
            "hardbreak" => NodeKind::Break,
            "html_block" | "html_inline" => NodeKind::Html,
            "em" => NodeKind::Emphasis,
            "s" | "strikethrough" => NodeKind::Delete,
            "footnote_ref" => NodeKind::FootnoteReference,
            "math_block" => NodeKind::Math,
            "math_inline" => NodeKind::InlineMath,
            "list_item" => NodeKind::ListItem,
            "bullet_list" | "ordered_list" => NodeKind::List,
            _ => return None,
        };
        Some(kind)
    }

    /// Kind of `node`, or `None` for nodes rules cannot target.
    pub fn of(node: &Node) -> Option<NodeKind> {
        let kind = match node {
            Node::Blockquote(_) => NodeKind::Blockquote,
            Node::Break(_) => NodeKind::Break,
            Node::Code(_) => NodeKind::Code,
            Node::Delete(_) => NodeKind::Delete,
            Node::Emphasis(_) => NodeKind::Emphasis,
            Node::FootnoteReference(_) => NodeKind::FootnoteReference,
            Node::Heading(_) => NodeKind::Heading,
            Node::Html(_) => NodeKind::Html,
            Node::Image(_) => NodeKind::Image,
            Node::ImageReference(_) => NodeKind::ImageReference,
            Node::InlineCode(_) => NodeKind::InlineCode,
            Node::InlineMath(_) => NodeKind::InlineMath,
            Node::Link(_) => NodeKind::Link,
            Node::LinkReference(_) => NodeKind::LinkReference,
            Node::List(_) => NodeKind::List,
            Node::ListItem(_) => NodeKind::ListItem,
            Node::Math(_) => NodeKind::Math,
            Node::Paragraph(_) => NodeKind::Paragraph,
            Node::Strong(_) => NodeKind::Strong,
            Node::Table(_) => NodeKind::Table,
            Node::Text(_) => NodeKind::Text,
            Node::ThematicBreak(_) => NodeKind::ThematicBreak,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn markdown_it_aliases() {
        assert_eq!(NodeKind::from_name("code_inline"), Some(NodeKind::InlineCode));
        assert_eq!(NodeKind::from_name("fence"), Some(NodeKind::Code));
        assert_eq!(NodeKind::from_name("hr"), Some(NodeKind::ThematicBreak));
        assert_eq!(NodeKind::from_name("html_inline"), Some(NodeKind::Html));
    }

    #[test]
    fn soft_breaks_and_unknown_names_are_rejected() {
        assert_eq!(NodeKind::from_name("softbreak"), None);
        assert_eq!(NodeKind::from_name("paragrph"), None);
        assert_eq!(NodeKind::from_name("Text"), None);
    }
}
