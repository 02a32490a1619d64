//! Markdown source to React component module.

use crate::codegen::{ModuleParts, render_module};
use crate::options::{Hook, LoaderOptions, LoaderOverrides};
use crate::renderer::{HeadingEntry, MarkdownRenderer};
use crate::transform::html_to_jsx;
use mdjsx_core::{
    Diagnostics, HookStage, MdjsxError, Warning, declared_imports, merge_imports, split_document,
};
use serde_json::Value as JsonValue;

/// Everything a transform produces.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// The emitted module.
    pub code: String,
    /// JSX markup placed inside the component, after `post_process`.
    pub jsx: String,
    /// Front-matter attributes (an empty object when absent).
    pub attributes: JsonValue,
    /// Import statements at the top of `code`.
    pub imports: Vec<String>,
    /// Headings in document order.
    pub headings: Vec<HeadingEntry>,
    /// Non-fatal problems.
    pub diagnostics: Diagnostics,
}

/// Borrowed pre/post hooks.
///
/// Unlike the hooks stored in [`LoaderOptions`] these need not be `Send`,
/// so callers holding thread-bound callbacks can still pass them.
#[derive(Clone, Copy, Default)]
pub struct Hooks<'h> {
    /// Runs over the whole source.
    pub pre_process: Option<&'h dyn Hook>,
    /// Runs over the JSX markup.
    pub post_process: Option<&'h dyn Hook>,
}

/// Builds a renderer with the configured rules and plugins installed.
///
/// Rules naming an unknown node kind are skipped with a warning. A failing
/// plugin aborts the build.
pub fn build_renderer(
    options: &LoaderOptions,
    diagnostics: &mut Diagnostics,
) -> Result<MarkdownRenderer, MdjsxError> {
    let mut renderer = MarkdownRenderer::new(options.md_options.clone());

    for (name, rule) in &options.rules {
        if let Err(err) = renderer.set_shared_rule(name, rule.clone()) {
            diagnostics.warn(Warning::RuleSkipped {
                rule: name.clone(),
                reason: err.to_string(),
            });
        }
    }

    for entry in &options.plugins {
        let name = entry.plugin.name().to_string();
        renderer
            .use_plugin(entry.plugin.as_ref(), entry.options.as_ref())
            .map_err(|err| MdjsxError::plugin(&name, err.to_string()))?;
        log::debug!("applied plugin {}", name);
    }

    Ok(renderer)
}

/// Transforms `source` with the hooks stored in `options`.
///
/// # Examples
///
/// ```
/// use mdjsx_react::{LoaderOptions, transform};
///
/// let output = transform("---\ntitle: Hi\n---\nSome *text*", &LoaderOptions::default()).unwrap();
/// assert_eq!(output.attributes["title"], "Hi");
/// assert_eq!(output.jsx, "<p>Some <em>text</em></p>\n");
/// ```
pub fn transform(source: &str, options: &LoaderOptions) -> Result<TransformOutput, MdjsxError> {
    let hooks = Hooks {
        pre_process: options.pre_process.as_deref().map(|hook| hook as &dyn Hook),
        post_process: options.post_process.as_deref().map(|hook| hook as &dyn Hook),
    };
    transform_with_hooks(source, options, hooks)
}

/// Transforms `source` using `hooks` in place of the hooks in `options`.
pub fn transform_with_hooks(
    source: &str,
    options: &LoaderOptions,
    hooks: Hooks<'_>,
) -> Result<TransformOutput, MdjsxError> {
    options.module.validate()?;

    let mut diagnostics = Diagnostics::new();
    let renderer = build_renderer(options, &mut diagnostics)?;

    let source = match hooks.pre_process {
        Some(hook) => hook
            .run(source)
            .map_err(|message| MdjsxError::hook(HookStage::PreProcess, message))?,
        None => source.to_string(),
    };

    let document = split_document(&source)?;
    let declared = declared_imports(&document.attributes, &mut diagnostics);
    let imports = merge_imports(&options.imports, &declared);

    let rendered = renderer.render(document.body)?;
    let markup = html_to_jsx(&rendered.html);

    let jsx = match hooks.post_process {
        Some(hook) => hook
            .run(&markup)
            .map_err(|message| MdjsxError::hook(HookStage::PostProcess, message))?,
        None => markup,
    };

    let code = render_module(&ModuleParts {
        imports: &imports,
        markup: &jsx,
        attributes: &document.attributes,
        options: &options.module,
    });

    if diagnostics.has_warnings() {
        log::debug!("transform finished with {} warning(s)", diagnostics.count());
    }

    Ok(TransformOutput {
        code,
        jsx,
        attributes: document.attributes,
        imports,
        headings: rendered.headings,
        diagnostics,
    })
}

/// Merged options kept for repeated transforms.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: LoaderOptions,
}

impl Loader {
    /// Defaults with `overrides` applied.
    pub fn new(overrides: LoaderOverrides) -> Self {
        Self::from_options(LoaderOptions::with_overrides(overrides))
    }

    /// Uses `options` as is.
    pub fn from_options(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// The options every transform uses.
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Transforms one document.
    pub fn transform(&self, source: &str) -> Result<TransformOutput, MdjsxError> {
        transform(source, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ModuleOptions;
    use crate::plugins::{LazyImages, PluginEntry, PluginError};
    use crate::renderer::{Context, PlainText};
    use markdown::mdast::Node;

    fn upper(input: &str) -> String {
        input.to_uppercase()
    }

    fn failing_plugin(_: &mut MarkdownRenderer, _: Option<&JsonValue>) -> Result<(), PluginError> {
        Err(PluginError::Failed("boom".to_string()))
    }

    fn noop_rule(_: &Node, _: &mut Context<'_>) {}

    #[test]
    fn unknown_rule_is_a_warning() {
        let options = LoaderOptions::default().with_rule("sparkles", noop_rule);
        let output = transform("hi", &options).unwrap();
        assert_eq!(output.jsx, "<p>hi</p>\n");
        assert_eq!(output.diagnostics.count(), 1);
        assert_eq!(output.diagnostics.warnings[0].kind(), "rule_skipped");
    }

    #[test]
    fn failing_plugin_is_fatal() {
        let options = LoaderOptions::default().with_plugin(PluginEntry::new(failing_plugin));
        let err = transform("hi", &options).unwrap_err();
        assert!(matches!(err, MdjsxError::Plugin { .. }));
    }

    #[test]
    fn rules_and_plugins_combine() {
        let options = LoaderOptions::default()
            .with_rule("text", PlainText)
            .with_plugin(PluginEntry::new(LazyImages));
        let output = transform("![a](a.png)", &options).unwrap();
        assert_eq!(output.jsx, "<p><img src=\"a.png\" alt=\"a\" loading=\"lazy\" /></p>\n");
    }

    #[test]
    fn pre_hook_sees_front_matter() {
        let options = LoaderOptions::default().with_pre_process(upper);
        let output = transform("---\na: b\n---\nx", &options).unwrap();
        assert_eq!(output.attributes["A"], "B");
        assert_eq!(output.jsx, "<p>X</p>\n");
    }

    #[test]
    fn post_hook_sees_jsx() {
        let options = LoaderOptions::default().with_post_process(upper);
        let output = transform("a\n\n---", &options).unwrap();
        assert_eq!(output.jsx, "<P>A</P>\n<HR />\n");
    }

    #[test]
    fn borrowed_hooks_replace_stored_ones() {
        let options = LoaderOptions::default().with_post_process(upper);
        let suffix = std::rc::Rc::new("!".to_string());
        let exclaim = move |input: &str| format!("{}{}", input.trim_end(), suffix);
        let hooks = Hooks {
            pre_process: None,
            post_process: Some(&exclaim),
        };
        let output = transform_with_hooks("a", &options, hooks).unwrap();
        assert_eq!(output.jsx, "<p>a</p>!");
    }

    #[test]
    fn invalid_component_name_fails_early() {
        let loader = Loader::new(LoaderOverrides {
            module: Some(ModuleOptions {
                component_name: "not valid".to_string(),
                ..ModuleOptions::default()
            }),
            ..LoaderOverrides::default()
        });
        assert!(matches!(loader.transform("a"), Err(MdjsxError::Config(_))));
    }

    #[test]
    fn malformed_front_matter_is_an_error() {
        let err = transform("---\na: [b\n---\nx", &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, MdjsxError::Frontmatter(_)));
    }

    #[test]
    fn unterminated_front_matter_renders_as_markdown() {
        let output = transform("---\na: b\n", &LoaderOptions::default()).unwrap();
        assert_eq!(output.attributes, serde_json::json!({}));
        assert_eq!(output.jsx, "<hr />\n<p>a: b</p>\n");
    }

    #[test]
    fn front_matter_imports_follow_configured_ones() {
        let source = "---\nimports: |\n  import Chart from './Chart'\n  import React from 'react'\n---\n<Chart />";
        let output = transform(source, &LoaderOptions::default()).unwrap();
        assert_eq!(
            output.imports,
            vec!["import React from 'react'", "import Chart from './Chart'"]
        );
    }
}
