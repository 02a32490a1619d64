//! Markdown to React component modules.
//!
//! The entry point is [`transform`]: it splits front-matter, renders the body
//! with a [`MarkdownRenderer`] configured from [`LoaderOptions`], rewrites the
//! markup so it is valid JSX and wraps it in a small component module.
//!
//! ```
//! use mdjsx_react::{transform, LoaderOptions};
//!
//! let output = transform("# Hello", &LoaderOptions::default()).unwrap();
//! assert!(output.code.contains("<h1>Hello</h1>"));
//! assert!(output.code.contains("export default MarkdownLoader"));
//! ```

#![deny(missing_docs)]

pub mod codegen;
pub mod loader;
pub mod options;
pub mod plugins;
pub mod registry;
pub mod renderer;
pub mod transform;

pub use codegen::{ModuleParts, js_string_literal, render_module};
pub use loader::{Hooks, Loader, TransformOutput, build_renderer, transform, transform_with_hooks};
pub use options::{
    DEFAULT_IMPORTS, Highlighter, Hook, LoaderConfig, LoaderOptions, LoaderOverrides,
    MarkdownOptions, ModuleOptions, PluginConfig, SharedHook,
};
pub use plugins::{Plugin, PluginEntry, PluginError};
pub use renderer::{
    Context, HeadingEntry, MarkdownRenderer, NodeKind, RenderRule, Rendered, RuleError, Scope,
};
pub use transform::{html_to_jsx, smarten};

pub use mdjsx_core::{Diagnostics, MdjsxError, Warning};
