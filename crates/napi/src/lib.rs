#![deny(missing_docs)]
//! Node.js bindings for the mdjsx Markdown to React transform.

use mdjsx_core::{Diagnostics, MdjsxError, split_document};
use mdjsx_react::{LoaderConfig, LoaderOptions};
use napi::bindgen_prelude::*;
use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Batch processing types.
pub mod batch;
/// NAPI-exposed data structures.
pub mod types;
pub use batch::*;
pub use types::*;

fn to_napi_error(err: MdjsxError) -> Error {
    Error::from_reason(err.to_string())
}

/// Resolves a JSON configuration into loader options.
///
/// Unknown rule and plugin names end up in the returned diagnostics.
fn resolve_config(config: Option<JsonValue>) -> napi::Result<(LoaderOptions, Diagnostics)> {
    let config = LoaderConfig::from_json(config.unwrap_or(JsonValue::Null)).map_err(to_napi_error)?;
    let (overrides, diagnostics) = config.resolve();
    Ok((LoaderOptions::with_overrides(overrides), diagnostics))
}

/// Extracts YAML front-matter without rendering the document.
#[napi]
pub fn parse_frontmatter(content: String) -> napi::Result<FrontmatterResult> {
    match split_document(&content) {
        Ok(document) => Ok(FrontmatterResult {
            frontmatter: document.attributes,
            body: document.body.to_string(),
            errors: Vec::new(),
        }),
        Err(err) => Ok(FrontmatterResult {
            frontmatter: JsonValue::Object(Default::default()),
            body: content.clone(),
            errors: vec![err.to_string()],
        }),
    }
}

/// Rewrites an HTML fragment so it can be embedded in JSX.
#[napi(js_name = "htmlToJsx")]
pub fn html_to_jsx(html: String) -> String {
    mdjsx_react::html_to_jsx(&html)
}

/// Transforms one Markdown document into a React component module.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const { transform } = require('mdjsx-napi');
///
/// const { code, attributes } = transform(source, {
///   mdOptions: { html: true, typographer: true },
///   plugins: [['heading-anchors', { permalink: true }]],
/// });
/// ```
#[napi]
pub fn transform(source: String, config: Option<JsonValue>) -> napi::Result<TransformResult> {
    let (options, config_warnings) = resolve_config(config)?;
    let output = mdjsx_react::transform(&source, &options).map_err(to_napi_error)?;
    Ok(TransformResult::from_output(output, &config_warnings))
}

/// Transforms multiple documents in parallel using Rayon.
///
/// All documents share one configuration. Configuration errors fail the
/// whole call; transform errors are reported per document.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const { transformBatch } = require('mdjsx-napi');
///
/// const inputs = [
///   { id: 'intro.md', source: '# Hello\nWorld' },
///   { id: 'outro.md', source: '# Goodbye\nWorld' },
/// ];
///
/// const result = transformBatch(inputs, { continueOnError: true });
/// console.log(`Processed ${result.stats.total} files in ${result.stats.processingTimeMs}ms`);
/// ```
#[napi(js_name = "transformBatch")]
pub fn transform_batch(
    inputs: Vec<BatchInput>,
    options: Option<BatchOptions>,
) -> napi::Result<BatchProcessingResult> {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    let start = Instant::now();
    let opts = options.unwrap_or_default();
    let continue_on_error = opts.continue_on_error.unwrap_or(true);
    let (loader_options, config_warnings) = resolve_config(opts.config)?;

    // Configure thread pool if max_threads is specified
    let pool = if let Some(max_threads) = opts.max_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(max_threads as usize)
            .build()
            .ok()
    } else {
        None
    };

    let total = inputs.len() as u32;
    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        match mdjsx_react::transform(&input.source, &loader_options) {
            Ok(output) => {
                succeeded.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    result: Some(TransformResult::from_output(output, &config_warnings)),
                    error: None,
                }
            }
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    result: None,
                    error: Some(e.to_string()),
                }
            }
        }
    };

    let results: Vec<BatchResult> = if continue_on_error {
        if let Some(pool) = pool {
            pool.install(|| inputs.into_par_iter().map(process_input).collect())
        } else {
            inputs.into_par_iter().map(process_input).collect()
        }
    } else {
        // Stop on first error, so documents run in order
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let result = process_input(input);
            let had_error = result.error.is_some();
            results.push(result);
            if had_error {
                break;
            }
        }
        results
    };

    let elapsed = start.elapsed();

    Ok(BatchProcessingResult {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_yaml_frontmatter_block() {
        let result = parse_frontmatter("---\ntitle: Test\n---\nBody".to_string()).unwrap();
        assert!(result.errors.is_empty());
        assert_eq!(result.frontmatter["title"], "Test");
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn reports_malformed_frontmatter() {
        let result = parse_frontmatter("---\ntitle: [Test\n---\nBody".to_string()).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.frontmatter, json!({}));
    }

    #[test]
    fn transform_reports_config_warnings() {
        let result = transform(
            "# Hi".to_string(),
            Some(json!({ "plugins": ["heading-anchors", "missing"] })),
        )
        .unwrap();
        assert!(result.jsx.starts_with("<h1 id=\"hi\">Hi</h1>"));
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, "plugin_skipped");
        assert_eq!(result.headings[0].slug, "hi");
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(transform("a".to_string(), Some(json!({ "imports": 3 }))).is_err());
    }

    #[test]
    fn batch_counts_failures() {
        let inputs = vec![
            BatchInput {
                id: "ok.md".to_string(),
                source: "# Ok".to_string(),
            },
            BatchInput {
                id: "broken.md".to_string(),
                source: "---\ntitle: [x\n---\n".to_string(),
            },
            BatchInput {
                id: "also-ok.md".to_string(),
                source: "text".to_string(),
            },
        ];

        let result = transform_batch(inputs.clone(), None).unwrap();
        assert_eq!(result.stats.total, 3);
        assert_eq!(result.stats.succeeded, 2);
        assert_eq!(result.stats.failed, 1);
        let ids: Vec<&str> = result.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["ok.md", "broken.md", "also-ok.md"]);

        let options = BatchOptions {
            continue_on_error: Some(false),
            ..BatchOptions::default()
        };
        let result = transform_batch(inputs, Some(options)).unwrap();
        assert_eq!(result.results.len(), 2);
        assert!(result.results[1].error.is_some());
    }
}
