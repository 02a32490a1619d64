//! Rewrites rendered HTML into markup that is valid inside a JSX expression.
//!
//! HTML produced by the renderer (and raw HTML passed through it) is mostly
//! JSX already. The differences handled here:
//!
//! - void elements must be self-closed (`<br>` becomes `<br />`);
//! - attribute names follow React (`class` becomes `className`);
//! - `style` takes an object, not a string;
//! - `{` and `}` in text open expressions and must be quoted;
//! - JSX collapses whitespace, so preformatted text is emitted as string
//!   expressions and newlines inside inline text become spaces;
//! - comments are not markup in JSX.

use crate::codegen::js_string_literal;
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
        "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// Elements whose surrounding whitespace never matters for rendering.
static BLOCK_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "address", "article", "aside", "blockquote", "body", "caption", "col", "colgroup", "dd",
        "details", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1",
        "h2", "h3", "h4", "h5", "h6", "head", "header", "hr", "html", "li", "main", "nav", "ol",
        "p", "pre", "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
        "ul",
    ]
    .into_iter()
    .collect()
});

/// HTML attribute names (lowercase) and their React spelling.
static ATTRIBUTE_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("class", "className"),
        ("for", "htmlFor"),
        ("accept-charset", "acceptCharset"),
        ("accesskey", "accessKey"),
        ("allowfullscreen", "allowFullScreen"),
        ("autocomplete", "autoComplete"),
        ("autofocus", "autoFocus"),
        ("autoplay", "autoPlay"),
        ("cellpadding", "cellPadding"),
        ("cellspacing", "cellSpacing"),
        ("charset", "charSet"),
        ("colspan", "colSpan"),
        ("contenteditable", "contentEditable"),
        ("crossorigin", "crossOrigin"),
        ("datetime", "dateTime"),
        ("enctype", "encType"),
        ("formaction", "formAction"),
        ("frameborder", "frameBorder"),
        ("hreflang", "hrefLang"),
        ("http-equiv", "httpEquiv"),
        ("inputmode", "inputMode"),
        ("itemprop", "itemProp"),
        ("marginheight", "marginHeight"),
        ("marginwidth", "marginWidth"),
        ("maxlength", "maxLength"),
        ("minlength", "minLength"),
        ("nomodule", "noModule"),
        ("novalidate", "noValidate"),
        ("playsinline", "playsInline"),
        ("readonly", "readOnly"),
        ("referrerpolicy", "referrerPolicy"),
        ("rowspan", "rowSpan"),
        ("spellcheck", "spellCheck"),
        ("srcdoc", "srcDoc"),
        ("srclang", "srcLang"),
        ("srcset", "srcSet"),
        ("tabindex", "tabIndex"),
        ("usemap", "useMap"),
        ("clip-path", "clipPath"),
        ("clip-rule", "clipRule"),
        ("fill-opacity", "fillOpacity"),
        ("fill-rule", "fillRule"),
        ("font-family", "fontFamily"),
        ("font-size", "fontSize"),
        ("stop-color", "stopColor"),
        ("stroke-dasharray", "strokeDasharray"),
        ("stroke-linecap", "strokeLinecap"),
        ("stroke-linejoin", "strokeLinejoin"),
        ("stroke-opacity", "strokeOpacity"),
        ("stroke-width", "strokeWidth"),
        ("text-anchor", "textAnchor"),
        ("viewbox", "viewBox"),
        ("xlink:href", "xlinkHref"),
        ("xml:lang", "xmlLang"),
        ("xmlns:xlink", "xmlnsXlink"),
    ]
    .into_iter()
    .collect()
});

/// Converts HTML markup into JSX children.
///
/// ```
/// use mdjsx_react::html_to_jsx;
///
/// assert_eq!(html_to_jsx("<hr>"), "<hr />");
/// assert_eq!(html_to_jsx(r#"<p class="x">{a}</p>"#), r#"<p className="x">{"{"}a{"}"}</p>"#);
/// ```
pub fn html_to_jsx(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + html.len() / 8);
    let mut pre_depth = 0usize;
    // Whether the last tag was a block boundary (document start counts).
    let mut after_block = true;
    let mut cursor = 0;

    while cursor < html.len() {
        let rest = &html[cursor..];

        if let Some(comment) = rest.strip_prefix("<!--") {
            let (body, consumed) = match comment.find("-->") {
                Some(end) => (&comment[..end], 4 + end + 3),
                None => (comment, rest.len()),
            };
            write_comment(body, &mut out);
            cursor += consumed;
            continue;
        }

        if rest.starts_with('<') {
            if let Some(tag) = Tag::parse(rest) {
                tag.write_jsx(&mut out);
                cursor += tag.len;
                after_block = is_block(tag.name);

                let name = tag.name.to_ascii_lowercase();
                if tag.closing {
                    if name == "pre" {
                        pre_depth = pre_depth.saturating_sub(1);
                    }
                } else if !tag.self_closing {
                    match name.as_str() {
                        "pre" => pre_depth += 1,
                        "textarea" | "script" | "style" => {
                            let body_len = raw_text_len(&html[cursor..], &name);
                            let body = &html[cursor..cursor + body_len];
                            write_preformatted(body, name == "textarea", &mut out);
                            cursor += body_len;
                        }
                        _ => {}
                    }
                }
                continue;
            }
        }

        let end = if rest.starts_with('<') {
            rest[1..].find('<').map_or(rest.len(), |pos| pos + 1)
        } else {
            rest.find('<').unwrap_or(rest.len())
        };
        let text = &rest[..end];
        cursor += end;

        if pre_depth > 0 {
            write_preformatted(text, true, &mut out);
        } else {
            let before_block = next_tag_is_block(&html[cursor..]);
            write_text(text, after_block || before_block, &mut out);
        }
    }

    out
}

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(name.to_ascii_lowercase().as_str())
}

fn next_tag_is_block(rest: &str) -> bool {
    let Some(tag) = rest.strip_prefix('<') else {
        return rest.is_empty();
    };
    let tag = tag.strip_prefix('/').unwrap_or(tag);
    let name_len = tag
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(tag.len());
    is_block(&tag[..name_len])
}

/// Length of a raw text element's content up to its closing tag.
fn raw_text_len(rest: &str, name: &str) -> usize {
    let closing = format!("</{}", name);
    rest.to_ascii_lowercase()
        .find(&closing)
        .unwrap_or(rest.len())
}

/// Writes a text run outside preformatted content.
///
/// `at_block_boundary` is set when the run sits next to a block tag, where
/// whitespace-only runs can be left for JSX to drop.
fn write_text(text: &str, at_block_boundary: bool, out: &mut String) {
    if text.chars().all(is_jsx_whitespace) {
        if text.contains('\n') && !at_block_boundary {
            // JSX drops whitespace containing a newline; between inline
            // elements it still separates words.
            out.push_str("{\" \"}");
        } else {
            out.push_str(text);
        }
        return;
    }

    let mut whitespace = String::new();
    for c in text.chars() {
        if is_jsx_whitespace(c) {
            whitespace.push(c);
            continue;
        }
        flush_whitespace(&mut whitespace, out);
        push_text_char(c, out);
    }
    flush_whitespace(&mut whitespace, out);
}

/// Whitespace JSX collapses; `&nbsp;` and other Unicode spaces are content.
fn is_jsx_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// A whitespace run containing a newline would be trimmed away by JSX, so it
/// becomes a single space. Other runs are kept as they are.
fn flush_whitespace(whitespace: &mut String, out: &mut String) {
    if whitespace.contains('\n') {
        out.push(' ');
    } else {
        out.push_str(whitespace);
    }
    whitespace.clear();
}

fn push_text_char(c: char, out: &mut String) {
    match c {
        '{' => out.push_str("{\"{\"}"),
        '}' => out.push_str("{\"}\"}"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(c),
    }
}

/// Writes preformatted text, as a JS string expression when JSX would
/// otherwise alter it.
fn write_preformatted(text: &str, decode_entities: bool, out: &mut String) {
    if text.is_empty() {
        return;
    }
    if !text.contains(['\n', '{', '}', '<', '>']) {
        out.push_str(text);
        return;
    }

    let value = if decode_entities {
        html_escape::decode_html_entities(text)
    } else {
        Cow::Borrowed(text)
    };
    out.push('{');
    out.push_str(&js_string_literal(&value));
    out.push('}');
}

fn write_comment(body: &str, out: &mut String) {
    out.push_str("{/*");
    out.push_str(&body.replace("*/", "* /"));
    out.push_str("*/}");
}

/// A parsed start or end tag.
#[derive(Debug, PartialEq, Eq)]
struct Tag<'a> {
    name: &'a str,
    closing: bool,
    self_closing: bool,
    attrs: Vec<Attr<'a>>,
    /// Bytes consumed from the input.
    len: usize,
}

#[derive(Debug, PartialEq, Eq)]
struct Attr<'a> {
    name: &'a str,
    value: Option<AttrValue<'a>>,
}

#[derive(Debug, PartialEq, Eq)]
struct AttrValue<'a> {
    raw: &'a str,
    quote: Option<char>,
    /// A `{...}` expression, written back without quotes.
    expression: bool,
}

impl<'a> Tag<'a> {
    /// Parses a tag at the start of `input`. Anything that is not a well
    /// formed tag yields `None` and is treated as text.
    fn parse(input: &'a str) -> Option<Tag<'a>> {
        let bytes = input.as_bytes();
        let mut pos = 1;
        let closing = bytes.get(pos) == Some(&b'/');
        if closing {
            pos += 1;
        }

        let name_start = pos;
        if !bytes.get(pos)?.is_ascii_alphabetic() {
            return None;
        }
        while pos < bytes.len()
            && (bytes[pos].is_ascii_alphanumeric() || matches!(bytes[pos], b'-' | b':' | b'.'))
        {
            pos += 1;
        }
        let name = &input[name_start..pos];

        let mut attrs = Vec::new();
        loop {
            let after_space = skip_whitespace(bytes, pos);
            let had_space = after_space > pos;
            pos = after_space;

            match *bytes.get(pos)? {
                b'>' => {
                    return Some(Tag {
                        name,
                        closing,
                        self_closing: false,
                        attrs,
                        len: pos + 1,
                    });
                }
                b'/' if bytes.get(pos + 1) == Some(&b'>') => {
                    return Some(Tag {
                        name,
                        closing,
                        self_closing: true,
                        attrs,
                        len: pos + 2,
                    });
                }
                _ if closing => return None,
                _ if attrs.is_empty() && !had_space => return None,
                _ => {}
            }

            let attr_start = pos;
            while pos < bytes.len()
                && !bytes[pos].is_ascii_whitespace()
                && !matches!(bytes[pos], b'"' | b'\'' | b'>' | b'/' | b'=' | b'<')
            {
                pos += 1;
            }
            if pos == attr_start {
                return None;
            }
            let attr_name = &input[attr_start..pos];

            let after_name = skip_whitespace(bytes, pos);
            if bytes.get(after_name) != Some(&b'=') {
                attrs.push(Attr {
                    name: attr_name,
                    value: None,
                });
                continue;
            }

            pos = skip_whitespace(bytes, after_name + 1);
            let value = match *bytes.get(pos)? {
                quote @ (b'"' | b'\'') => {
                    let end = pos + 1 + input[pos + 1..].find(quote as char)?;
                    let raw = &input[pos + 1..end];
                    pos = end + 1;
                    AttrValue {
                        raw,
                        quote: Some(quote as char),
                        expression: false,
                    }
                }
                b'{' => {
                    let end = pos + expression_len(&input[pos..])?;
                    let raw = &input[pos..end];
                    pos = end;
                    AttrValue {
                        raw,
                        quote: None,
                        expression: true,
                    }
                }
                _ => {
                    let value_start = pos;
                    while pos < bytes.len()
                        && !bytes[pos].is_ascii_whitespace()
                        && !matches!(bytes[pos], b'>' | b'"' | b'\'' | b'<' | b'`')
                    {
                        pos += 1;
                    }
                    if pos == value_start {
                        return None;
                    }
                    AttrValue {
                        raw: &input[value_start..pos],
                        quote: None,
                        expression: false,
                    }
                }
            };
            attrs.push(Attr {
                name: attr_name,
                value: Some(value),
            });
        }
    }

    fn write_jsx(&self, out: &mut String) {
        let void = VOID_ELEMENTS.contains(self.name.to_ascii_lowercase().as_str());

        if self.closing {
            // `</br>` and friends have no JSX counterpart.
            if !void {
                out.push_str("</");
                out.push_str(self.name);
                out.push('>');
            }
            return;
        }

        out.push('<');
        out.push_str(self.name);
        for attr in &self.attrs {
            write_attr(attr, out);
        }
        if self.self_closing || void {
            out.push_str(" />");
        } else {
            out.push('>');
        }
    }
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Length of the balanced `{...}` expression at the start of `input`,
/// skipping braces inside string literals. `None` when it never closes.
fn expression_len(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escape = false;

    for (index, c) in input.char_indices() {
        if let Some(open) = quote {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == open {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn write_attr(attr: &Attr<'_>, out: &mut String) {
    let lower = attr.name.to_ascii_lowercase();
    out.push(' ');
    out.push_str(jsx_attribute_name(attr.name, &lower));

    let Some(value) = &attr.value else {
        return;
    };
    out.push('=');
    if value.expression {
        out.push_str(value.raw);
        return;
    }
    if lower == "style" {
        out.push_str(&style_object(&html_escape::decode_html_entities(value.raw)));
        return;
    }
    let quote = value.quote.unwrap_or('"');
    out.push(quote);
    out.push_str(value.raw);
    out.push(quote);
}

fn jsx_attribute_name<'a>(name: &'a str, lower: &str) -> &'a str {
    match ATTRIBUTE_NAMES.get(lower) {
        Some(renamed) => *renamed,
        None => name,
    }
}

/// Converts a CSS declaration list into a JSX style object literal.
fn style_object(css: &str) -> String {
    let mut object = String::from("{{");
    let mut first = true;
    for declaration in css.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let (property, value) = (property.trim(), value.trim());
        if property.is_empty() || value.is_empty() {
            continue;
        }
        if !first {
            object.push(',');
        }
        first = false;
        object.push_str(&js_string_literal(&style_property_name(property)));
        object.push(':');
        object.push_str(&js_string_literal(value));
    }
    object.push_str("}}");
    object
}

/// `text-align` to `textAlign`; vendor prefixes follow React (`-webkit-x`
/// to `WebkitX`, `-ms-x` to `msX`). Custom properties are kept.
fn style_property_name(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }
    let lower = property.to_ascii_lowercase();
    let property = lower.strip_prefix('-').filter(|rest| rest.starts_with("ms-")).unwrap_or(&lower);

    let mut name = String::with_capacity(property.len());
    let mut upper = false;
    for c in property.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            name.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_elements_self_close() {
        assert_eq!(html_to_jsx("<hr>\n"), "<hr />\n");
        assert_eq!(html_to_jsx("a<br>\nb"), "a<br /> b");
        assert_eq!(html_to_jsx("<br />"), "<br />");
        assert_eq!(
            html_to_jsx(r#"<img src="a.png" alt="A">"#),
            r#"<img src="a.png" alt="A" />"#
        );
        assert_eq!(html_to_jsx("<input disabled checked>"), "<input disabled checked />");
    }

    #[test]
    fn attributes_are_renamed() {
        assert_eq!(
            html_to_jsx(r#"<label for="x" class="c" tabindex=1 data-id="d" aria-hidden="true">"#),
            r#"<label htmlFor="x" className="c" tabIndex="1" data-id="d" aria-hidden="true">"#
        );
        assert_eq!(html_to_jsx("<svg viewBox='0 0 1 1'>"), "<svg viewBox='0 0 1 1'>");
    }

    #[test]
    fn style_strings_become_objects() {
        assert_eq!(
            html_to_jsx(r#"<th style="text-align:right">a</th>"#),
            r#"<th style={{"textAlign":"right"}}>a</th>"#
        );
        assert_eq!(
            style_object("-webkit-transition: none; -ms-transform: x; --gap: 1px; color:red;"),
            r#"{{"WebkitTransition":"none","msTransform":"x","--gap":"1px","color":"red"}}"#
        );
    }

    #[test]
    fn braces_in_text_are_quoted() {
        assert_eq!(
            html_to_jsx("<p>use {x} here</p>"),
            r#"<p>use {"{"}x{"}"} here</p>"#
        );
    }

    #[test]
    fn preformatted_text_becomes_string_expression() {
        assert_eq!(
            html_to_jsx("<pre><code class=\"language-js\">if (a &lt; b) {\n  go();\n}\n</code></pre>\n"),
            "<pre><code className=\"language-js\">{\"if (a < b) {\\n  go();\\n}\\n\"}</code></pre>\n"
        );
        assert_eq!(html_to_jsx("<pre><code>x</code></pre>"), "<pre><code>x</code></pre>");
    }

    #[test]
    fn script_and_style_bodies_are_not_parsed() {
        assert_eq!(
            html_to_jsx("<style>a > b { color: red }</style>"),
            r#"<style>{"a > b { color: red }"}</style>"#
        );
        assert_eq!(
            html_to_jsx("<script>if (a<b) x()</script>"),
            r#"<script>{"if (a<b) x()"}</script>"#
        );
    }

    #[test]
    fn comments_become_expressions() {
        assert_eq!(html_to_jsx("<!-- note -->\n"), "{/* note */}\n");
        assert_eq!(html_to_jsx("<!-- a */ b -->"), "{/* a * / b */}");
    }

    #[test]
    fn newlines_inside_inline_text_keep_word_spacing() {
        assert_eq!(html_to_jsx("<p>foo\n<strong>bar</strong></p>"), "<p>foo <strong>bar</strong></p>");
        assert_eq!(
            html_to_jsx("<p><em>a</em>\n<em>b</em></p>"),
            r#"<p><em>a</em>{" "}<em>b</em></p>"#
        );
        assert_eq!(html_to_jsx("<ul>\n<li>a</li>\n</ul>\n"), "<ul>\n<li>a</li>\n</ul>\n");
    }

    #[test]
    fn stray_angle_brackets_are_escaped() {
        assert_eq!(html_to_jsx("<p>1 < 2 > 0</p>"), "<p>1 &lt; 2 &gt; 0</p>");
    }

    #[test]
    fn components_keep_their_names() {
        assert_eq!(
            html_to_jsx(r#"<Chart data="x" class="wide"></Chart>"#),
            r#"<Chart data="x" className="wide"></Chart>"#
        );
        assert_eq!(html_to_jsx("<Chart/>"), "<Chart />");
    }

    #[test]
    fn closing_void_tags_are_dropped() {
        assert_eq!(html_to_jsx("<br></br>"), "<br />");
    }

    #[test]
    fn expression_props_pass_through() {
        assert_eq!(html_to_jsx("<Chart data={points} />"), "<Chart data={points} />");
        assert_eq!(
            html_to_jsx("<Chart data={[1, 2]} label={\"a } b\"} class=\"c\" />"),
            "<Chart data={[1, 2]} label={\"a } b\"} className=\"c\" />"
        );
        assert_eq!(
            html_to_jsx("<Box style={{ gap: 1 }}>x</Box>"),
            "<Box style={{ gap: 1 }}>x</Box>"
        );
    }

    #[test]
    fn unclosed_expression_is_text() {
        assert_eq!(html_to_jsx("<Chart data={points />"), "&lt;Chart data={\"{\"}points /&gt;");
    }

    #[test]
    fn non_breaking_spaces_survive() {
        assert_eq!(html_to_jsx("<p>a\u{a0}\n</p>"), "<p>a\u{a0} </p>");
        assert_eq!(html_to_jsx("<p><em>a</em>\u{a0}<em>b</em></p>"), "<p><em>a</em>\u{a0}<em>b</em></p>");
    }
}
