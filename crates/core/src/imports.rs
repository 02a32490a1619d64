//! Import declarations carried by the `imports` front-matter attribute.

use crate::error::{Diagnostics, Warning};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// Front-matter key holding extra import statements.
pub const IMPORTS_ATTRIBUTE: &str = "imports";

/// Reads the import statements a document declares in its front-matter.
///
/// A string is split into lines, an array contributes one statement per
/// string entry. Anything else is reported and ignored.
pub fn declared_imports(attributes: &JsonValue, diagnostics: &mut Diagnostics) -> Vec<String> {
    match attributes.get(IMPORTS_ATTRIBUTE) {
        None | Some(JsonValue::Null) => Vec::new(),
        Some(JsonValue::String(block)) => statement_lines(block),
        Some(JsonValue::Array(entries)) => {
            let mut statements = Vec::with_capacity(entries.len());
            for (index, entry) in entries.iter().enumerate() {
                match entry {
                    JsonValue::String(block) => statements.extend(statement_lines(block)),
                    other => diagnostics.warn(Warning::Import {
                        message: format!(
                            "entry {} must be a string, found {}",
                            index,
                            json_type_name(other)
                        ),
                    }),
                }
            }
            statements
        }
        Some(other) => {
            diagnostics.warn(Warning::Import {
                message: format!(
                    "expected a string or a list of strings, found {}",
                    json_type_name(other)
                ),
            });
            Vec::new()
        }
    }
}

/// Puts the configured statements first and appends declared ones,
/// dropping duplicates (first occurrence wins).
pub fn merge_imports(base: &str, declared: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    statement_lines(base)
        .into_iter()
        .chain(declared.iter().cloned())
        .filter(|statement| seen.insert(import_key(statement)))
        .collect()
}

fn statement_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comparison key: whitespace outside string literals is dropped, quote
/// style is unified and a trailing semicolon is ignored.
fn import_key(statement: &str) -> String {
    let mut key = String::with_capacity(statement.len());
    let mut quote: Option<char> = None;
    let mut escape = false;

    for ch in statement.trim_end_matches(';').chars() {
        if escape {
            key.push(ch);
            escape = false;
            continue;
        }
        match (quote, ch) {
            (Some(_), '\\') => {
                key.push(ch);
                escape = true;
            }
            (Some(open), c) if c == open => {
                key.push('"');
                quote = None;
            }
            (None, '\'' | '"' | '`') => {
                key.push('"');
                quote = Some(ch);
            }
            (None, c) if c.is_whitespace() => {}
            _ => key.push(ch),
        }
    }

    key
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn declared(attributes: JsonValue) -> (Vec<String>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let statements = declared_imports(&attributes, &mut diagnostics);
        (statements, diagnostics)
    }

    #[test]
    fn missing_attribute_declares_nothing() {
        let (statements, diagnostics) = declared(json!({ "title": "x" }));
        assert!(statements.is_empty());
        assert!(!diagnostics.has_warnings());
    }

    #[test]
    fn string_attribute_splits_lines() {
        let (statements, _) = declared(json!({
            "imports": "import A from './A'\n\n  import { b } from 'b'  "
        }));
        assert_eq!(statements, vec!["import A from './A'", "import { b } from 'b'"]);
    }

    #[test]
    fn list_attribute_skips_non_strings() {
        let (statements, diagnostics) = declared(json!({
            "imports": ["import A from './A'", 3, "import B from './B'"]
        }));
        assert_eq!(statements, vec!["import A from './A'", "import B from './B'"]);
        assert_eq!(diagnostics.count(), 1);
        assert!(diagnostics.warnings[0].to_string().contains("entry 1"));
    }

    #[test]
    fn mapping_attribute_is_reported() {
        let (statements, diagnostics) = declared(json!({ "imports": { "a": 1 } }));
        assert!(statements.is_empty());
        assert_eq!(diagnostics.warnings[0].kind(), "import");
    }

    #[test]
    fn merge_keeps_base_first_and_dedupes() {
        let merged = merge_imports(
            "import React from 'react'",
            &[
                "import React from \"react\";".to_string(),
                "import Chart from './Chart'".to_string(),
                "import  Chart  from './Chart'".to_string(),
            ],
        );
        assert_eq!(
            merged,
            vec!["import React from 'react'", "import Chart from './Chart'"]
        );
    }

    #[test]
    fn whitespace_inside_strings_is_significant() {
        let merged = merge_imports(
            "",
            &[
                "import a from 'a b'".to_string(),
                "import a from 'ab'".to_string(),
            ],
        );
        assert_eq!(merged.len(), 2);
    }
}
