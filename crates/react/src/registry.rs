//! Built-in rules and plugins, addressable by name from serialized
//! configuration.

use crate::plugins::{ExternalLinks, HeadingAnchors, LazyImages, Plugin};
use crate::renderer::{ImageFigure, PlainCodeBlock, PlainText, RenderRule};
use std::sync::Arc;

/// Names accepted by [`rule`].
pub const RULE_NAMES: &[&str] = &["plain-text", "code-block-plain", "image-figure"];

/// Names accepted by [`plugin`].
pub const PLUGIN_NAMES: &[&str] = &["heading-anchors", "lazy-images", "external-links"];

/// Looks up a built-in rule.
///
/// ```
/// use mdjsx_react::registry;
///
/// assert!(registry::rule("plain-text").is_some());
/// assert!(registry::rule("fancy").is_none());
/// ```
pub fn rule(name: &str) -> Option<Arc<dyn RenderRule>> {
    let rule: Arc<dyn RenderRule> = match name {
        "plain-text" => Arc::new(PlainText),
        "code-block-plain" => Arc::new(PlainCodeBlock),
        "image-figure" => Arc::new(ImageFigure),
        _ => return None,
    };
    Some(rule)
}

/// Looks up a built-in plugin.
pub fn plugin(name: &str) -> Option<Arc<dyn Plugin>> {
    let plugin: Arc<dyn Plugin> = match name {
        "heading-anchors" => Arc::new(HeadingAnchors),
        "lazy-images" => Arc::new(LazyImages),
        "external-links" => Arc::new(ExternalLinks),
        _ => return None,
    };
    Some(plugin)
}
