//! Default rendering, markdown-it flavored.

use super::context::Context;
use super::types::Scope;
use markdown::mdast::{self, AlignKind, Node};

/// Renders `node` without consulting rules for it (children still go
/// through their rules).
pub(crate) fn render_default(node: &Node, ctx: &mut Context<'_>) {
    match node {
        Node::Root(root) => ctx.render_children(&root.children),
        Node::Paragraph(paragraph) => render_paragraph(paragraph, ctx),
        Node::Heading(heading) => render_heading(heading, ctx),
        Node::ThematicBreak(_) => {
            ctx.push_raw("<hr");
            ctx.push_void_end();
            ctx.push_raw("\n");
        }
        Node::Blockquote(quote) => {
            ctx.push_raw("<blockquote>\n");
            ctx.render_children_in(Scope::Blockquote, &quote.children);
            ctx.push_raw("</blockquote>\n");
        }
        Node::List(list) => render_list(list, ctx),
        Node::ListItem(item) => render_list_item(item, ctx),
        Node::Code(code) => {
            write_code_block(ctx, &code.value, code.lang.as_deref().unwrap_or(""), true)
        }
        Node::Html(html) => {
            if ctx.options().html {
                ctx.push_raw(&html.value);
            } else {
                ctx.push_text(&html.value);
            }
            if !ctx.is_inline() {
                ctx.push_raw("\n");
            }
        }
        Node::Text(text) => ctx.render_text(&text.value, ctx.options().breaks),
        Node::Emphasis(emphasis) => wrap("em", &emphasis.children, ctx),
        Node::Strong(strong) => wrap("strong", &strong.children, ctx),
        Node::Delete(delete) => wrap("s", &delete.children, ctx),
        Node::InlineCode(code) => {
            ctx.push_raw("<code>");
            ctx.push_text(&code.value);
            ctx.push_raw("</code>");
        }
        Node::Break(_) => {
            ctx.push_raw("<br");
            ctx.push_void_end();
            ctx.push_raw("\n");
        }
        Node::Link(link) => ctx.push_link(&link.url, link.title.as_deref(), &link.children, &[]),
        Node::Image(image) => ctx.push_image(&image.url, &image.alt, image.title.as_deref(), &[]),
        Node::LinkReference(reference) => match ctx.definition(&reference.identifier) {
            Some(definition) => ctx.push_link(
                &definition.url,
                definition.title.as_deref(),
                &reference.children,
                &[],
            ),
            None => {
                ctx.push_text("[");
                ctx.render_children(&reference.children);
                ctx.push_text("]");
            }
        },
        Node::ImageReference(reference) => match ctx.definition(&reference.identifier) {
            Some(definition) => {
                ctx.push_image(&definition.url, &reference.alt, definition.title.as_deref(), &[])
            }
            None => ctx.push_text(&format!("![{}]", reference.alt)),
        },
        Node::Table(table) => render_table(table, ctx),
        Node::FootnoteReference(reference) => render_footnote_reference(reference, ctx),
        Node::Math(math) => {
            ctx.push_raw("<div class=\"math math-display\">");
            ctx.push_text(&math.value);
            ctx.push_raw("</div>\n");
        }
        Node::InlineMath(math) => {
            ctx.push_raw("<span class=\"math math-inline\">");
            ctx.push_text(&math.value);
            ctx.push_raw("</span>");
        }
        // Definitions only feed lookups; footnotes are emitted at the end.
        Node::Definition(_) | Node::FootnoteDefinition(_) | Node::Yaml(_) | Node::Toml(_) => {}
        _ => log::warn!("Unhandled markdown node type: {:?}", node),
    }
}

fn wrap(tag: &str, children: &[Node], ctx: &mut Context<'_>) {
    ctx.push_raw("<");
    ctx.push_raw(tag);
    ctx.push_raw(">");
    ctx.render_children(children);
    ctx.push_raw("</");
    ctx.push_raw(tag);
    ctx.push_raw(">");
}

/// Paragraphs directly inside a tight list item lose their `<p>`.
fn render_paragraph(paragraph: &mdast::Paragraph, ctx: &mut Context<'_>) {
    let hidden = ctx.current_scope() == Scope::ListItem && ctx.is_in_tight_list();
    if hidden {
        ctx.render_children_in(Scope::Paragraph, &paragraph.children);
        return;
    }

    ctx.push_raw("<p>");
    ctx.render_children_in(Scope::Paragraph, &paragraph.children);
    ctx.push_raw("</p>\n");
}

fn render_heading(heading: &mdast::Heading, ctx: &mut Context<'_>) {
    ctx.record_heading(heading);
    let tag = format!("h{}", heading.depth);
    ctx.push_raw(&format!("<{}>", tag));
    ctx.render_children_in(Scope::Heading, &heading.children);
    ctx.push_raw(&format!("</{}>\n", tag));
}

fn render_list(list: &mdast::List, ctx: &mut Context<'_>) {
    let tight = !list.spread
        && list
            .children
            .iter()
            .all(|child| !matches!(child, Node::ListItem(item) if item.spread));

    if list.ordered {
        match list.start {
            Some(start) if start != 1 => ctx.push_raw(&format!("<ol start=\"{}\">\n", start)),
            _ => ctx.push_raw("<ol>\n"),
        }
    } else {
        ctx.push_raw("<ul>\n");
    }

    ctx.render_children_in(Scope::List { tight }, &list.children);

    ctx.push_raw(if list.ordered { "</ol>\n" } else { "</ul>\n" });
}

fn render_list_item(item: &mdast::ListItem, ctx: &mut Context<'_>) {
    let tight = ctx.is_in_tight_list();

    if item.checked.is_some() {
        ctx.push_raw("<li class=\"task-list-item\">");
        ctx.push_raw("<input class=\"task-list-item-checkbox\" type=\"checkbox\" disabled");
        if item.checked == Some(true) {
            ctx.push_raw(" checked");
        }
        ctx.push_void_end();
    } else {
        ctx.push_raw("<li>");
    }

    // markdown-it breaks the line after <li> unless a hidden paragraph follows.
    let starts_inline = tight && matches!(item.children.first(), Some(Node::Paragraph(_)));
    if !item.children.is_empty() && !starts_inline {
        ctx.push_raw("\n");
    } else if item.checked.is_some() && starts_inline {
        ctx.push_raw(" ");
    }

    ctx.enter(Scope::ListItem);
    let last = item.children.len().saturating_sub(1);
    for (index, child) in item.children.iter().enumerate() {
        ctx.render_node(child);
        if tight && index < last && matches!(child, Node::Paragraph(_)) {
            ctx.push_raw("\n");
        }
    }
    ctx.exit();

    ctx.push_raw("</li>\n");
}

/// Writes `<pre><code>` for a code block.
pub(crate) fn write_code_block(ctx: &mut Context<'_>, value: &str, lang: &str, highlight: bool) {
    let content = if value.is_empty() {
        String::new()
    } else {
        format!("{}\n", value)
    };

    let highlighted = if highlight {
        ctx.options()
            .highlight
            .as_ref()
            .and_then(|highlighter| highlighter.highlight(&content, lang))
    } else {
        None
    };

    if let Some(markup) = &highlighted {
        if markup.starts_with("<pre") {
            ctx.push_raw(markup);
            ctx.push_raw("\n");
            return;
        }
    }

    ctx.push_raw("<pre><code");
    if !lang.is_empty() {
        let class = format!("{}{}", ctx.options().lang_prefix, lang);
        ctx.push_attr("class", &class);
    }
    ctx.push_raw(">");
    match &highlighted {
        Some(markup) => ctx.push_raw(markup),
        None => ctx.push_text(&content),
    }
    ctx.push_raw("</code></pre>\n");
}

fn render_table(table: &mdast::Table, ctx: &mut Context<'_>) {
    ctx.push_raw("<table>\n");
    ctx.enter(Scope::Table);

    for (index, row) in table.children.iter().enumerate() {
        let Node::TableRow(row) = row else {
            continue;
        };
        match index {
            0 => ctx.push_raw("<thead>\n"),
            1 => ctx.push_raw("<tbody>\n"),
            _ => {}
        }
        render_table_row(row, index == 0, &table.align, ctx);
        if index == 0 {
            ctx.push_raw("</thead>\n");
        }
    }
    if table.children.len() > 1 {
        ctx.push_raw("</tbody>\n");
    }

    ctx.exit();
    ctx.push_raw("</table>\n");
}

fn render_table_row(
    row: &mdast::TableRow,
    is_header: bool,
    aligns: &[AlignKind],
    ctx: &mut Context<'_>,
) {
    let tag = if is_header { "th" } else { "td" };
    ctx.push_raw("<tr>\n");

    for (index, cell) in row.children.iter().enumerate() {
        let Node::TableCell(cell) = cell else {
            continue;
        };
        ctx.push_raw("<");
        ctx.push_raw(tag);
        match aligns.get(index) {
            Some(AlignKind::Left) => ctx.push_raw(" style=\"text-align:left\""),
            Some(AlignKind::Right) => ctx.push_raw(" style=\"text-align:right\""),
            Some(AlignKind::Center) => ctx.push_raw(" style=\"text-align:center\""),
            Some(AlignKind::None) | None => {}
        }
        ctx.push_raw(">");
        ctx.render_children_in(Scope::TableCell, &cell.children);
        ctx.push_raw("</");
        ctx.push_raw(tag);
        ctx.push_raw(">\n");
    }

    ctx.push_raw("</tr>\n");
}

fn footnote_ref_id(number: usize, index: usize) -> String {
    if index == 0 {
        format!("fnref{}", number)
    } else {
        format!("fnref{}:{}", number, index)
    }
}

fn render_footnote_reference(reference: &mdast::FootnoteReference, ctx: &mut Context<'_>) {
    let Some((number, index)) = ctx.reference_footnote(&reference.identifier) else {
        let label = reference.label.as_deref().unwrap_or(&reference.identifier);
        ctx.push_text(&format!("[^{}]", label));
        return;
    };

    ctx.push_raw(&format!(
        "<sup class=\"footnote-ref\"><a href=\"#fn{}\" id=\"{}\">[{}]</a></sup>",
        number,
        footnote_ref_id(number, index),
        number
    ));
}

/// Appends the footnote section for every referenced footnote.
pub(crate) fn render_footnotes(ctx: &mut Context<'_>) {
    if ctx.referenced_footnote(0).is_none() {
        return;
    }

    ctx.push_raw("<hr class=\"footnotes-sep\"");
    ctx.push_void_end();
    ctx.push_raw("\n<section class=\"footnotes\">\n<ol class=\"footnotes-list\">\n");

    // Footnote bodies may reference further footnotes, so the list can grow.
    let mut index = 0;
    while let Some((definition, references)) = ctx.referenced_footnote(index) {
        let number = index + 1;
        let body = ctx.capture(|ctx| {
            ctx.render_children_in(Scope::Footnote, &definition.children);
        });

        let backrefs: String = (0..references)
            .map(|reference| {
                format!(
                    " <a href=\"#{}\" class=\"footnote-backref\">\u{21a9}\u{fe0e}</a>",
                    footnote_ref_id(number, reference)
                )
            })
            .collect();

        ctx.push_raw(&format!("<li id=\"fn{}\" class=\"footnote-item\">", number));
        match body.trim_end().strip_suffix("</p>") {
            Some(before) => {
                ctx.push_raw(before);
                ctx.push_raw(&backrefs);
                ctx.push_raw("</p>\n");
            }
            None => {
                ctx.push_raw(&body);
                ctx.push_raw(&backrefs);
                ctx.push_raw("\n");
            }
        }
        ctx.push_raw("</li>\n");
        index += 1;
    }

    ctx.push_raw("</ol>\n</section>\n");
}

/// Extracts plain text from nodes (for heading text and slugs).
pub(crate) fn plain_text(nodes: &[Node]) -> String {
    let mut text = String::new();
    for node in nodes {
        collect_text(node, &mut text);
    }
    text.trim().to_string()
}

fn collect_text(node: &Node, buffer: &mut String) {
    match node {
        Node::Text(text) => buffer.push_str(&text.value),
        Node::InlineCode(code) => buffer.push_str(&code.value),
        Node::InlineMath(math) => buffer.push_str(&math.value),
        Node::Image(image) => buffer.push_str(&image.alt),
        Node::Break(_) => buffer.push(' '),
        _ => {
            if let Some(children) = node.children() {
                for child in children {
                    collect_text(child, buffer);
                }
            }
        }
    }
}

/// markdown-it's link validation: script-capable schemes are refused,
/// `data:` only for common image types.
pub(crate) fn is_safe_url(url: &str) -> bool {
    let normalized: String = url
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(32)
        .collect::<String>()
        .to_ascii_lowercase();

    if normalized.starts_with("javascript:")
        || normalized.starts_with("vbscript:")
        || normalized.starts_with("file:")
    {
        return false;
    }
    if normalized.starts_with("data:") {
        return ["data:image/gif;", "data:image/png;", "data:image/jpeg;", "data:image/webp;"]
            .iter()
            .any(|prefix| normalized.starts_with(prefix));
    }
    true
}
