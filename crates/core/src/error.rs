use crate::frontmatter::FrontmatterError;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Pipeline stage a hook runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    /// Runs over the raw source before front-matter is split off.
    PreProcess,
    /// Runs over the rendered JSX markup before codegen.
    PostProcess,
}

impl std::fmt::Display for HookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookStage::PreProcess => f.write_str("preProcess"),
            HookStage::PostProcess => f.write_str("postProcess"),
        }
    }
}

/// Errors that can occur while turning Markdown into a component module.
#[derive(Debug, Error)]
pub enum MdjsxError {
    /// Front-matter block could not be parsed.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    /// markdown-rs parser error surfaced through the adapter.
    #[error("Parse error at {location}: {message}")]
    Markdown {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// A renderer plugin refused its options.
    #[error("Plugin '{name}' failed: {message}")]
    Plugin {
        /// Plugin name
        name: String,
        /// Error message
        message: String,
    },
    /// A caller-supplied hook failed.
    #[error("{stage} hook failed: {message}")]
    Hook {
        /// Stage the hook ran in
        stage: HookStage,
        /// Error message
        message: String,
    },
    /// Invalid loader configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl MdjsxError {
    /// Create a plugin error
    pub fn plugin(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Plugin {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a hook error
    pub fn hook(stage: HookStage, message: impl Into<String>) -> Self {
        Self::Hook {
            stage,
            message: message.into(),
        }
    }
}

/// Non-fatal warnings that don't prevent rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A render rule could not be installed and was skipped.
    RuleSkipped {
        /// Rule key as configured
        rule: String,
        /// Why it was skipped
        reason: String,
    },
    /// A configured plugin could not be resolved and was skipped.
    PluginSkipped {
        /// Plugin name as configured
        plugin: String,
        /// Why it was skipped
        reason: String,
    },
    /// The `imports` front-matter attribute had an unusable shape.
    Import {
        /// Warning message
        message: String,
    },
}

impl Warning {
    /// Short machine-readable category used by the bindings.
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::RuleSkipped { .. } => "rule_skipped",
            Warning::PluginSkipped { .. } => "plugin_skipped",
            Warning::Import { .. } => "import",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::RuleSkipped { rule, reason } => {
                write!(f, "the rule '{}' was skipped: {}", rule, reason)
            }
            Warning::PluginSkipped { plugin, reason } => {
                write!(f, "the plugin '{}' was skipped: {}", plugin, reason)
            }
            Warning::Import { message } => write!(f, "imports: {}", message),
        }
    }
}

/// Warnings collected over one transform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs the warning and records it.
    pub fn warn(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display() {
        assert_eq!(SourceLocation::new(3, 7).to_string(), "3:7");
    }

    #[test]
    fn warning_messages_name_the_offender() {
        let warning = Warning::RuleSkipped {
            rule: "paragrph".into(),
            reason: "unknown node kind".into(),
        };
        assert_eq!(
            warning.to_string(),
            "the rule 'paragrph' was skipped: unknown node kind"
        );
        assert_eq!(warning.kind(), "rule_skipped");
    }

    #[test]
    fn diagnostics_collect_warnings() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_warnings());
        diagnostics.warn(Warning::Import {
            message: "expected a string".into(),
        });
        diagnostics.warn(Warning::PluginSkipped {
            plugin: "nope".into(),
            reason: "not registered".into(),
        });
        assert!(diagnostics.has_warnings());
        assert_eq!(diagnostics.count(), 2);
    }

    #[test]
    fn hook_error_names_stage() {
        let err = MdjsxError::hook(HookStage::PostProcess, "boom");
        assert_eq!(err.to_string(), "postProcess hook failed: boom");
    }
}
