use mdjsx_core::{Warning, split_document};
use mdjsx_react::{Hook, Hooks, HeadingEntry, LoaderConfig, LoaderOptions, transform_with_hooks};
use serde::Serialize;
use serde_json::Value as JsonValue;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Loader Config
// ============================================================================

const PRE_PROCESS_KEY: &str = "preProcess";
const POST_PROCESS_KEY: &str = "postProcess";

/// A JavaScript function used as a pre/post hook.
///
/// The function receives the text and must return a string.
struct JsHook {
    function: js_sys::Function,
}

impl Hook for JsHook {
    fn run(&self, input: &str) -> Result<String, String> {
        let value = self
            .function
            .call1(&JsValue::NULL, &JsValue::from_str(input))
            .map_err(|err| js_error_message(&err))?;
        value
            .as_string()
            .ok_or_else(|| "hook must return a string".to_string())
    }
}

fn js_error_message(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

fn hook_from(config: &JsValue, key: &str) -> Result<Option<JsHook>, JsError> {
    let value = js_sys::Reflect::get(config, &JsValue::from_str(key))
        .map_err(|err| JsError::new(&js_error_message(&err)))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    match value.dyn_into::<js_sys::Function>() {
        Ok(function) => Ok(Some(JsHook { function })),
        Err(_) => Err(JsError::new(&format!("{} must be a function", key))),
    }
}

/// Splits a JS config object into serializable loader options and hooks.
fn parse_config(config: JsValue) -> Result<(LoaderConfig, Option<JsHook>, Option<JsHook>), JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok((LoaderConfig::default(), None, None));
    }
    if !config.is_object() {
        return Err(JsError::new("config must be an object"));
    }

    let pre_process = hook_from(&config, PRE_PROCESS_KEY)?;
    let post_process = hook_from(&config, POST_PROCESS_KEY)?;

    // Functions do not deserialize, so the hooks are removed from a copy.
    let data = js_sys::Object::assign(&js_sys::Object::new(), config.unchecked_ref());
    for key in [PRE_PROCESS_KEY, POST_PROCESS_KEY] {
        js_sys::Reflect::delete_property(&data, &JsValue::from_str(key))
            .map_err(|err| JsError::new(&js_error_message(&err)))?;
    }
    let json: JsonValue = serde_wasm_bindgen::from_value(data.into())
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    let config = LoaderConfig::from_json(json).map_err(|e| JsError::new(&e.to_string()))?;

    Ok((config, pre_process, post_process))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

// ============================================================================
// Transform API
// ============================================================================

/// A non-fatal problem reported by a transform.
#[derive(Debug, Clone, Serialize)]
pub struct WarningEntry {
    /// Machine readable category.
    pub kind: String,
    /// Human readable description.
    pub message: String,
}

impl From<&Warning> for WarningEntry {
    fn from(warning: &Warning) -> Self {
        Self {
            kind: warning.kind().to_string(),
            message: warning.to_string(),
        }
    }
}

/// Result of transforming one document.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResult {
    /// Complete component module.
    pub code: String,
    /// JSX markup placed inside the component.
    pub jsx: String,
    /// Front-matter attributes.
    pub attributes: JsonValue,
    /// Import statements at the top of the module.
    pub imports: Vec<String>,
    /// Headings in document order.
    pub headings: Vec<HeadingEntry>,
    /// Config and transform warnings.
    pub warnings: Vec<WarningEntry>,
}

/// Transforms Markdown into a React component module.
///
/// `config` takes the same keys as the Node binding plus optional
/// `preProcess` and `postProcess` functions.
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { transform } from './mdjsx_wasm';
///
/// const { code } = transform(source, {
///   mdOptions: { typographer: true },
///   postProcess: (jsx) => jsx.replaceAll('<table>', '<table className="table">'),
/// });
/// ```
#[wasm_bindgen]
pub fn transform(source: &str, config: JsValue) -> Result<JsValue, JsError> {
    let (config, pre_process, post_process) = parse_config(config)?;
    let (overrides, config_warnings) = config.resolve();
    let options = LoaderOptions::with_overrides(overrides);

    let hooks = Hooks {
        pre_process: pre_process.as_ref().map(|hook| hook as &dyn Hook),
        post_process: post_process.as_ref().map(|hook| hook as &dyn Hook),
    };
    let output =
        transform_with_hooks(source, &options, hooks).map_err(|e| JsError::new(&e.to_string()))?;

    let warnings = config_warnings
        .warnings
        .iter()
        .chain(output.diagnostics.warnings.iter())
        .map(WarningEntry::from)
        .collect();

    to_js(&TransformResult {
        code: output.code,
        jsx: output.jsx,
        attributes: output.attributes,
        imports: output.imports,
        headings: output.headings,
        warnings,
    })
}

// ============================================================================
// Helpers
// ============================================================================

#[derive(Serialize)]
struct FrontmatterResult<'a> {
    frontmatter: JsonValue,
    body: &'a str,
}

/// Splits YAML front-matter from the Markdown body.
#[wasm_bindgen(js_name = parseFrontmatter)]
pub fn parse_frontmatter(content: &str) -> Result<JsValue, JsError> {
    let document = split_document(content).map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&FrontmatterResult {
        frontmatter: document.attributes,
        body: document.body,
    })
}

/// Rewrites an HTML fragment so it can be embedded in JSX.
#[wasm_bindgen(js_name = htmlToJsx)]
pub fn html_to_jsx(html: &str) -> String {
    mdjsx_react::html_to_jsx(html)
}
