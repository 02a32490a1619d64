//! Loader configuration: defaults, caller overrides and the serializable
//! form used by the bindings.

use crate::plugins::PluginEntry;
use crate::registry;
use crate::renderer::RenderRule;
use mdjsx_core::{Diagnostics, MdjsxError, ParseOptions, Warning};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Import statement every module starts with unless overridden.
pub const DEFAULT_IMPORTS: &str = "import React from 'react'";

/// Syntax highlighting hook for fenced code.
///
/// Receives the code (with its trailing newline) and the info-string
/// language. Returning `None` falls back to escaped plain text. Output that
/// starts with `<pre` is used verbatim, anything else is wrapped in
/// `<pre><code>`.
pub trait Highlighter: Send + Sync {
    /// Highlights `code` written in `lang`.
    fn highlight(&self, code: &str, lang: &str) -> Option<String>;
}

impl<F> Highlighter for F
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync,
{
    fn highlight(&self, code: &str, lang: &str) -> Option<String> {
        (self)(code, lang)
    }
}

/// Caller-supplied text hook run before parsing or after rendering.
///
/// An `Err` aborts the transform with [`MdjsxError::Hook`].
pub trait Hook {
    /// Rewrites `input`.
    fn run(&self, input: &str) -> Result<String, String>;
}

impl<F> Hook for F
where
    F: Fn(&str) -> String,
{
    fn run(&self, input: &str) -> Result<String, String> {
        Ok((self)(input))
    }
}

/// A hook that can live inside [`LoaderOptions`].
pub type SharedHook = Arc<dyn Hook + Send + Sync>;

/// Renderer options, named after their markdown-it counterparts.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkdownOptions {
    /// Pass raw HTML in the source through to the output.
    pub html: bool,
    /// Close void tags XHTML style (`<br />`).
    pub xhtml_out: bool,
    /// Render soft line breaks as `<br>`.
    pub breaks: bool,
    /// Class prefix for fenced code languages.
    pub lang_prefix: String,
    /// Autolink bare URLs.
    pub linkify: bool,
    /// Smart quotes, dashes and symbol replacements.
    pub typographer: bool,
    /// Tables, strikethrough, task lists and footnotes.
    pub gfm: bool,
    /// `$inline$` and `$$block$$` math.
    pub math: bool,
    /// Optional highlighter for fenced code.
    #[serde(skip)]
    pub highlight: Option<Arc<dyn Highlighter>>,
}

impl MarkdownOptions {
    /// Parser constructs implied by these options.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            gfm: self.gfm,
            html: self.html,
            linkify: self.linkify,
            math: self.math,
            code_indented: true,
        }
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            html: false,
            xhtml_out: false,
            breaks: false,
            lang_prefix: "language-".to_string(),
            linkify: false,
            typographer: false,
            gfm: true,
            math: false,
            highlight: None,
        }
    }
}

impl fmt::Debug for MarkdownOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownOptions")
            .field("html", &self.html)
            .field("xhtml_out", &self.xhtml_out)
            .field("breaks", &self.breaks)
            .field("lang_prefix", &self.lang_prefix)
            .field("linkify", &self.linkify)
            .field("typographer", &self.typographer)
            .field("gfm", &self.gfm)
            .field("math", &self.math)
            .field("highlight", &self.highlight.is_some())
            .finish()
    }
}

/// Shape of the emitted module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleOptions {
    /// Name of the generated component function.
    pub component_name: String,
    /// Class of the wrapping `<div>`.
    pub wrapper_class: String,
    /// Also emit `export const attributes = {...}` with the front-matter.
    pub export_attributes: bool,
}

impl ModuleOptions {
    /// Checks that the component name can be emitted as a function name.
    pub fn validate(&self) -> Result<(), MdjsxError> {
        if is_js_identifier(&self.component_name) {
            Ok(())
        } else {
            Err(MdjsxError::Config(format!(
                "component name '{}' is not a valid JavaScript identifier",
                self.component_name
            )))
        }
    }
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            component_name: "MarkdownLoader".to_string(),
            wrapper_class: "doc".to_string(),
            export_attributes: false,
        }
    }
}

/// Words that cannot name a function declaration in a module.
static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
        "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
        "function", "if", "implements", "import", "in", "instanceof", "interface", "let", "new",
        "null", "package", "private", "protected", "public", "return", "static", "super",
        "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with",
        "yield", "arguments", "eval",
    ]
    .into_iter()
    .collect()
});

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(name)
}

/// Fully resolved configuration for one transform.
#[derive(Clone)]
pub struct LoaderOptions {
    /// Import statement(s) placed at the top of every module.
    pub imports: String,
    /// Renderer options.
    pub md_options: MarkdownOptions,
    /// Rule overrides keyed by node kind name, installed in order.
    pub rules: Vec<(String, Arc<dyn RenderRule>)>,
    /// Plugins applied in order after the rules.
    pub plugins: Vec<PluginEntry>,
    /// Runs over the whole source before front-matter is split off.
    pub pre_process: Option<SharedHook>,
    /// Runs over the JSX markup before the module is emitted.
    pub post_process: Option<SharedHook>,
    /// Module shape.
    pub module: ModuleOptions,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            imports: DEFAULT_IMPORTS.to_string(),
            md_options: MarkdownOptions::default(),
            rules: Vec::new(),
            plugins: Vec::new(),
            pre_process: None,
            post_process: None,
            module: ModuleOptions::default(),
        }
    }
}

impl LoaderOptions {
    /// Defaults with `overrides` applied.
    pub fn with_overrides(overrides: LoaderOverrides) -> Self {
        Self::default().merge(overrides)
    }

    /// Applies `overrides` field by field.
    ///
    /// A provided field replaces the current one wholesale: markdown options
    /// are not merged key by key and a rule list replaces the existing list.
    pub fn merge(mut self, overrides: LoaderOverrides) -> Self {
        if let Some(imports) = overrides.imports {
            self.imports = imports;
        }
        if let Some(md_options) = overrides.md_options {
            self.md_options = md_options;
        }
        if let Some(rules) = overrides.rules {
            self.rules = rules;
        }
        if let Some(plugins) = overrides.plugins {
            self.plugins = plugins;
        }
        if let Some(hook) = overrides.pre_process {
            self.pre_process = Some(hook);
        }
        if let Some(hook) = overrides.post_process {
            self.post_process = Some(hook);
        }
        if let Some(module) = overrides.module {
            self.module = module;
        }
        self
    }

    /// Appends a rule override for the node kind `name`.
    pub fn with_rule(mut self, name: impl Into<String>, rule: impl RenderRule + 'static) -> Self {
        self.rules.push((name.into(), Arc::new(rule)));
        self
    }

    /// Appends a plugin.
    pub fn with_plugin(mut self, entry: PluginEntry) -> Self {
        self.plugins.push(entry);
        self
    }

    /// Sets the pre-processing hook.
    pub fn with_pre_process(mut self, hook: impl Hook + Send + Sync + 'static) -> Self {
        self.pre_process = Some(Arc::new(hook));
        self
    }

    /// Sets the post-processing hook.
    pub fn with_post_process(mut self, hook: impl Hook + Send + Sync + 'static) -> Self {
        self.post_process = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for LoaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<&str> = self.rules.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("LoaderOptions")
            .field("imports", &self.imports)
            .field("md_options", &self.md_options)
            .field("rules", &rules)
            .field("plugins", &self.plugins)
            .field("pre_process", &self.pre_process.is_some())
            .field("post_process", &self.post_process.is_some())
            .field("module", &self.module)
            .finish()
    }
}

/// Caller-provided values; `None` keeps the default.
#[derive(Clone, Default)]
pub struct LoaderOverrides {
    /// Replaces the import statement(s).
    pub imports: Option<String>,
    /// Replaces the markdown options.
    pub md_options: Option<MarkdownOptions>,
    /// Replaces the rule overrides.
    pub rules: Option<Vec<(String, Arc<dyn RenderRule>)>>,
    /// Replaces the plugin list.
    pub plugins: Option<Vec<PluginEntry>>,
    /// Sets the pre-processing hook.
    pub pre_process: Option<SharedHook>,
    /// Sets the post-processing hook.
    pub post_process: Option<SharedHook>,
    /// Replaces the module shape.
    pub module: Option<ModuleOptions>,
}

/// A plugin reference in serialized configuration.
///
/// Accepts `"name"`, `["name", options]` and `{ "name": ..., "options": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginConfig {
    /// Plugin without options.
    Name(String),
    /// Plugin with options, array form.
    WithOptions(String, JsonValue),
    /// Plugin with options, object form.
    Detailed {
        /// Registered plugin name.
        name: String,
        /// Options handed to the plugin.
        #[serde(default)]
        options: Option<JsonValue>,
    },
}

impl PluginConfig {
    /// Registered plugin name.
    pub fn name(&self) -> &str {
        match self {
            PluginConfig::Name(name)
            | PluginConfig::WithOptions(name, _)
            | PluginConfig::Detailed { name, .. } => name,
        }
    }

    /// Options handed to the plugin, if any.
    pub fn options(&self) -> Option<&JsonValue> {
        match self {
            PluginConfig::Name(_) => None,
            PluginConfig::WithOptions(_, options) => Some(options),
            PluginConfig::Detailed { options, .. } => options.as_ref(),
        }
    }
}

/// Serializable configuration as received from JavaScript callers.
///
/// Rules and plugins are referenced by their built-in registry names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoaderConfig {
    /// Replaces the import statement(s).
    pub imports: Option<String>,
    /// Replaces the markdown options.
    pub md_options: Option<MarkdownOptions>,
    /// Node kind name to built-in rule name.
    pub rules: BTreeMap<String, String>,
    /// Built-in plugins in application order.
    pub plugins: Vec<PluginConfig>,
    /// Replaces the module shape.
    pub module: Option<ModuleOptions>,
}

impl LoaderConfig {
    /// Reads a configuration from a JSON value.
    pub fn from_json(value: JsonValue) -> Result<Self, MdjsxError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|err| MdjsxError::Config(err.to_string()))
    }

    /// Looks up every referenced rule and plugin in the registry.
    ///
    /// Unknown names are reported and left out; they never fail the call.
    pub fn resolve(self) -> (LoaderOverrides, Diagnostics) {
        let mut diagnostics = Diagnostics::new();

        let mut rules = Vec::with_capacity(self.rules.len());
        for (kind, name) in self.rules {
            match registry::rule(&name) {
                Some(rule) => rules.push((kind, rule)),
                None => diagnostics.warn(Warning::RuleSkipped {
                    rule: kind,
                    reason: format!("'{}' is not a built-in rule", name),
                }),
            }
        }

        let mut plugins = Vec::with_capacity(self.plugins.len());
        for config in &self.plugins {
            match registry::plugin(config.name()) {
                Some(plugin) => plugins.push(PluginEntry {
                    plugin,
                    options: config.options().cloned(),
                }),
                None => diagnostics.warn(Warning::PluginSkipped {
                    plugin: config.name().to_string(),
                    reason: "no built-in plugin is registered under this name".to_string(),
                }),
            }
        }

        let overrides = LoaderOverrides {
            imports: self.imports,
            md_options: self.md_options,
            rules: (!rules.is_empty()).then_some(rules),
            plugins: (!plugins.is_empty()).then_some(plugins),
            pre_process: None,
            post_process: None,
            module: self.module,
        };
        (overrides, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_markdown_it() {
        let options = LoaderOptions::default();
        assert_eq!(options.imports, "import React from 'react'");
        assert!(!options.md_options.html);
        assert!(!options.md_options.xhtml_out);
        assert_eq!(options.md_options.lang_prefix, "language-");
        assert!(options.rules.is_empty());
        assert!(options.plugins.is_empty());
        assert!(options.pre_process.is_none());
        assert!(options.post_process.is_none());
        assert_eq!(options.module.component_name, "MarkdownLoader");
    }

    #[test]
    fn merge_replaces_md_options_wholesale() {
        let base = LoaderOptions::default().merge(LoaderOverrides {
            md_options: Some(MarkdownOptions {
                typographer: true,
                ..MarkdownOptions::default()
            }),
            ..LoaderOverrides::default()
        });
        assert!(base.md_options.typographer);

        let merged = base.merge(LoaderOverrides {
            md_options: Some(MarkdownOptions {
                html: true,
                ..MarkdownOptions::default()
            }),
            ..LoaderOverrides::default()
        });
        assert!(merged.md_options.html);
        assert!(!merged.md_options.typographer);
        assert_eq!(merged.imports, DEFAULT_IMPORTS);
    }

    #[test]
    fn partial_md_options_take_markdown_defaults() {
        let config: LoaderConfig =
            serde_json::from_value(json!({ "mdOptions": { "xhtmlOut": true } })).unwrap();
        let options = config.md_options.unwrap();
        assert!(options.xhtml_out);
        assert!(options.gfm);
        assert_eq!(options.lang_prefix, "language-");
    }

    #[test]
    fn plugin_config_accepts_three_shapes() {
        let config = LoaderConfig::from_json(json!({
            "plugins": [
                "lazy-images",
                ["heading-anchors", { "permalink": true }],
                { "name": "external-links", "options": { "rel": "nofollow" } }
            ]
        }))
        .unwrap();

        let names: Vec<&str> = config.plugins.iter().map(PluginConfig::name).collect();
        assert_eq!(names, ["lazy-images", "heading-anchors", "external-links"]);
        assert_eq!(config.plugins[0].options(), None);
        assert_eq!(
            config.plugins[1].options(),
            Some(&json!({ "permalink": true }))
        );
        assert_eq!(config.plugins[2].options(), Some(&json!({ "rel": "nofollow" })));
    }

    #[test]
    fn resolve_skips_unknown_names() {
        let config = LoaderConfig::from_json(json!({
            "rules": { "code": "code-block-plain", "text": "shout" },
            "plugins": ["lazy-images", "emoji"]
        }))
        .unwrap();

        let (overrides, diagnostics) = config.resolve();
        let rules = overrides.rules.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].0, "code");
        assert_eq!(overrides.plugins.unwrap().len(), 1);

        let kinds: Vec<&str> = diagnostics.warnings.iter().map(Warning::kind).collect();
        assert_eq!(kinds, ["rule_skipped", "plugin_skipped"]);
    }

    #[test]
    fn null_config_is_default() {
        let config = LoaderConfig::from_json(JsonValue::Null).unwrap();
        assert!(config.imports.is_none());
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn malformed_config_is_a_config_error() {
        let err = LoaderConfig::from_json(json!({ "plugins": 3 })).unwrap_err();
        assert!(matches!(err, MdjsxError::Config(_)));
    }

    #[test]
    fn component_name_must_be_identifier() {
        let mut module = ModuleOptions::default();
        assert!(module.validate().is_ok());
        module.component_name = "my-doc".to_string();
        assert!(module.validate().is_err());
        module.component_name = "$Doc_2".to_string();
        assert!(module.validate().is_ok());
        for reserved in ["class", "function", "default", "export", "return"] {
            module.component_name = reserved.to_string();
            assert!(
                matches!(module.validate(), Err(MdjsxError::Config(_))),
                "{} accepted",
                reserved
            );
        }
        module.component_name = "Classy".to_string();
        assert!(module.validate().is_ok());
    }

    #[test]
    fn closures_are_hooks() {
        let hook = |input: &str| input.to_uppercase();
        assert_eq!(hook.run("abc"), Ok("ABC".to_string()));
    }
}
