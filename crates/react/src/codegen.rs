//! Component module emission.

use crate::options::ModuleOptions;
use serde_json::Value as JsonValue;
use std::fmt::Write;

/// Indentation of markup lines inside the wrapper `<div>`.
const MARKUP_INDENT: &str = "            ";

/// Inputs of [`render_module`].
#[derive(Debug, Clone, Copy)]
pub struct ModuleParts<'a> {
    /// Import statements, one per entry, in output order.
    pub imports: &'a [String],
    /// JSX markup placed inside the wrapper.
    pub markup: &'a str,
    /// Front-matter attributes.
    pub attributes: &'a JsonValue,
    /// Module shape.
    pub options: &'a ModuleOptions,
}

/// Converts a Rust string to a JavaScript string literal.
///
/// Uses JSON serialization which is a subset of JavaScript string syntax.
///
/// # Examples
///
/// ```
/// use mdjsx_react::js_string_literal;
///
/// assert_eq!(js_string_literal("hello"), "\"hello\"");
/// assert_eq!(js_string_literal("a\nb"), "\"a\\nb\"");
/// ```
pub fn js_string_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Emits the module: imports, optional attributes export, the component
/// function and its default export.
pub fn render_module(parts: &ModuleParts<'_>) -> String {
    let mut code = String::with_capacity(parts.markup.len() + 256);
    let options = parts.options;

    for import in parts.imports {
        let _ = writeln!(code, "{}", import);
    }
    code.push('\n');

    if options.export_attributes {
        let attributes =
            serde_json::to_string(parts.attributes).unwrap_or_else(|_| "{}".to_string());
        let _ = writeln!(code, "export const attributes = {};", attributes);
        code.push('\n');
    }

    let _ = writeln!(code, "function {}() {{", options.component_name);
    let _ = writeln!(code, "    return (");
    let _ = writeln!(
        code,
        "        <div className=\"{}\">",
        html_escape::encode_double_quoted_attribute(&options.wrapper_class)
    );
    write_markup(&mut code, parts.markup);
    let _ = writeln!(code, "        </div>");
    let _ = writeln!(code, "    )");
    let _ = writeln!(code, "}}");
    code.push('\n');
    let _ = writeln!(code, "export default {}", options.component_name);

    code
}

fn write_markup(code: &mut String, markup: &str) {
    for line in markup.lines() {
        if line.trim().is_empty() {
            continue;
        }
        code.push_str(MARKUP_INDENT);
        code.push_str(line);
        code.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_markup_lines_are_skipped() {
        let mut code = String::new();
        write_markup(&mut code, "<p>a</p>\n\n  \n<hr />\n");
        assert_eq!(code, "            <p>a</p>\n            <hr />\n");
    }

    #[test]
    fn attributes_export_is_optional() {
        let imports = vec!["import React from 'react'".to_string()];
        let attributes = json!({ "title": "Hi" });
        let mut options = ModuleOptions::default();
        let parts = ModuleParts {
            imports: &imports,
            markup: "",
            attributes: &attributes,
            options: &options,
        };
        assert!(!render_module(&parts).contains("export const attributes"));

        options.export_attributes = true;
        let parts = ModuleParts {
            imports: &imports,
            markup: "",
            attributes: &attributes,
            options: &options,
        };
        assert!(render_module(&parts).contains("export const attributes = {\"title\":\"Hi\"};\n"));
    }

    #[test]
    fn wrapper_class_is_escaped() {
        let options = ModuleOptions {
            wrapper_class: "a\"b".to_string(),
            ..ModuleOptions::default()
        };
        let parts = ModuleParts {
            imports: &[],
            markup: "",
            attributes: &JsonValue::Null,
            options: &options,
        };
        assert!(render_module(&parts).contains("<div className=\"a&quot;b\">"));
    }
}
