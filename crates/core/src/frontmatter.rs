use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result returned after extracting front-matter from a Markdown document.
#[derive(Debug)]
pub struct FrontmatterExtraction {
    /// Parsed front-matter as a JSON value (always an object).
    pub value: JsonValue,
    /// Byte offset inside the original document where Markdown content begins.
    pub body_start: usize,
}

impl FrontmatterExtraction {
    fn empty() -> Self {
        Self {
            value: JsonValue::Object(Default::default()),
            body_start: 0,
        }
    }
}

/// A document split into its metadata and Markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    /// Front-matter attributes; an empty object when the document has none.
    pub attributes: JsonValue,
    /// Markdown body following the front-matter block.
    pub body: &'a str,
}

/// Errors emitted while parsing or extracting front-matter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Unclosed YAML fence (e.g., missing terminating `---`).
    #[error("Unterminated YAML front-matter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Front-matter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Front-matter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// Extracts YAML front-matter from an input document.
pub fn extract_frontmatter(input: &str) -> Result<FrontmatterExtraction, FrontmatterError> {
    match find_yaml_block(input)? {
        Some((block, body_start)) => {
            let value = parse_yaml_block(block)?;
            Ok(FrontmatterExtraction { value, body_start })
        }
        None => Ok(FrontmatterExtraction::empty()),
    }
}

/// Splits `input` into attributes and body.
///
/// An opening fence without a closing one is treated as ordinary Markdown:
/// the whole input becomes the body. Malformed YAML inside a closed block is
/// still reported.
pub fn split_document(input: &str) -> Result<Document<'_>, FrontmatterError> {
    let extraction = match extract_frontmatter(input) {
        Ok(extraction) => extraction,
        Err(FrontmatterError::Unterminated) => {
            log::debug!("front-matter fence is never closed, rendering it as markdown");
            FrontmatterExtraction::empty()
        }
        Err(err) => return Err(err),
    };

    Ok(Document {
        attributes: extraction.value,
        body: &input[extraction.body_start..],
    })
}

fn parse_yaml_block(block: &str) -> Result<JsonValue, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    let json_value =
        serde_json::to_value(yaml_value).map_err(|err| FrontmatterError::Parse(err.to_string()))?;

    match json_value {
        JsonValue::Null => Ok(JsonValue::Object(Default::default())),
        JsonValue::Object(_) => Ok(json_value),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

fn find_yaml_block(input: &str) -> Result<Option<(&str, usize)>, FrontmatterError> {
    let (without_bom, bom_len) = strip_bom(input);

    // The opening fence must be the very first line.
    let Some((first, block_start)) = next_line(without_bom, 0) else {
        return Ok(None);
    };
    if !is_yaml_fence(first) {
        return Ok(None);
    }

    let mut cursor = block_start;
    while let Some((line, next_cursor)) = next_line(without_bom, cursor) {
        if is_closing_fence(line) {
            let raw_block = &without_bom[block_start..cursor];
            let trimmed = raw_block.trim_end_matches(['\r', '\n']);
            return Ok(Some((trimmed, bom_len + next_cursor)));
        }
        cursor = next_cursor;
    }
    Err(FrontmatterError::Unterminated)
}

fn strip_bom(input: &str) -> (&str, usize) {
    match input.strip_prefix('\u{feff}') {
        Some(stripped) => (stripped, '\u{feff}'.len_utf8()),
        None => (input, 0),
    }
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    match input[start..].find('\n') {
        Some(pos) => Some((&input[start..start + pos], start + pos + 1)),
        None => Some((&input[start..], input.len())),
    }
}

fn is_yaml_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == "---"
}

/// `---` or the YAML document end marker `...`, trailing whitespace allowed.
fn is_closing_fence(line: &str) -> bool {
    matches!(line.trim_end(), "---" | "...")
}
