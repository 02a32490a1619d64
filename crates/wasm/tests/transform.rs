use mdjsx_wasm::{parse_frontmatter, transform};
use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[derive(Deserialize, Debug)]
struct TransformResult {
    code: String,
    jsx: String,
    attributes: serde_json::Value,
    imports: Vec<String>,
    headings: Vec<HeadingEntry>,
    warnings: Vec<WarningEntry>,
}

#[derive(Deserialize, Debug)]
struct HeadingEntry {
    depth: u8,
    slug: String,
}

#[derive(Deserialize, Debug)]
struct WarningEntry {
    kind: String,
}

fn run(source: &str, config: JsValue) -> TransformResult {
    let result = transform(source, config)
        .map_err(JsValue::from)
        .expect("transform should succeed");
    serde_wasm_bindgen::from_value(result).expect("deserialize result")
}

fn config_object(entries: &[(&str, JsValue)]) -> JsValue {
    let object = js_sys::Object::new();
    for (key, value) in entries {
        js_sys::Reflect::set(&object, &JsValue::from_str(key), value).expect("set config key");
    }
    object.into()
}

#[wasm_bindgen_test]
fn transform_basic_markdown() {
    let result = run("# Hello World\n\nThis is **bold** text.", JsValue::UNDEFINED);

    assert!(result.code.starts_with("import React from 'react'\n"));
    assert!(result.code.contains("function MarkdownLoader() {"));
    assert!(result.code.ends_with("export default MarkdownLoader\n"));
    assert_eq!(
        result.jsx,
        "<h1>Hello World</h1>\n<p>This is <strong>bold</strong> text.</p>\n"
    );

    assert_eq!(result.headings.len(), 1);
    assert_eq!(result.headings[0].depth, 1);
    assert_eq!(result.headings[0].slug, "hello-world");
    assert!(result.warnings.is_empty());
}

#[wasm_bindgen_test]
fn transform_with_frontmatter_imports() {
    let source = "---\ntitle: My Page\nimports: import Card from './Card'\n---\n\n# Content";
    let result = run(source, JsValue::UNDEFINED);

    assert_eq!(result.attributes["title"], "My Page");
    assert_eq!(
        result.imports,
        vec!["import React from 'react'", "import Card from './Card'"]
    );
    assert!(result.code.contains("import Card from './Card'\n"));
}

#[wasm_bindgen_test]
fn hooks_are_called_with_text() {
    let pre = js_sys::Function::new_with_args("s", "return s.replace('World', 'Wasm')");
    let post = js_sys::Function::new_with_args("s", "return s.toUpperCase()");
    let config = config_object(&[("preProcess", pre.into()), ("postProcess", post.into())]);

    let result = run("Hello World", config);
    assert_eq!(result.jsx, "<P>HELLO WASM</P>\n");
}

#[wasm_bindgen_test]
fn throwing_hook_fails_the_transform() {
    let post = js_sys::Function::new_with_args("s", "throw new Error('nope')");
    let config = config_object(&[("postProcess", post.into())]);
    assert!(transform("a", config).is_err());
}

#[wasm_bindgen_test]
fn unknown_plugins_are_reported() {
    let plugins = js_sys::Array::of2(&JsValue::from_str("lazy-images"), &JsValue::from_str("nope"));
    let config = config_object(&[("plugins", plugins.into())]);

    let result = run("![a](a.png)", config);
    assert_eq!(result.jsx, "<p><img src=\"a.png\" alt=\"a\" loading=\"lazy\" /></p>\n");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, "plugin_skipped");
}

#[wasm_bindgen_test]
fn frontmatter_only() {
    let result = parse_frontmatter("---\ndraft: true\n---\nBody")
        .map_err(JsValue::from)
        .expect("parse should succeed");
    let result: serde_json::Value = serde_wasm_bindgen::from_value(result).expect("deserialize");
    assert_eq!(result["frontmatter"]["draft"], true);
    assert_eq!(result["body"], "Body");
}
