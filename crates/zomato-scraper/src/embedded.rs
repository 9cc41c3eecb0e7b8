//! Extraction of the state payload the provider embeds in its HTML pages.
//!
//! Restaurant pages are server-rendered and carry their data in a script
//! block that assigns to [`PRELOADED_STATE_MARKER`], in one of two forms:
//!
//! ```text
//! window.__PRELOADED_STATE__ = JSON.parse("{\"pages\":{...}}");
//! window.__PRELOADED_STATE__ = {"pages":{...}};
//! ```
//!
//! The first form wraps the JSON document in a JavaScript string literal
//! using JSON escapes; the second is an inline object literal.

use serde_json::Value;
use thiserror::Error;

pub const PRELOADED_STATE_MARKER: &str = "window.__PRELOADED_STATE__";

const JSON_PARSE_CALL: &str = "JSON.parse(";

#[derive(Debug, Error)]
pub enum EmbeddedPayloadError {
    #[error("page does not contain window.__PRELOADED_STATE__")]
    MarkerNotFound,

    #[error("unsupported assignment after window.__PRELOADED_STATE__")]
    UnsupportedForm,

    #[error("embedded payload is not terminated")]
    Unterminated,

    #[error("embedded payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Locates and deserializes the embedded state payload in `page`.
///
/// # Errors
///
/// Returns [`EmbeddedPayloadError`] when the marker is missing, the value
/// assigned to it is neither `JSON.parse("...")` nor an object literal, the
/// literal is cut off, or its content does not parse.
pub fn extract_embedded_payload(page: &str) -> Result<Value, EmbeddedPayloadError> {
    let rest = assigned_value(page)?;

    if let Some(call) = rest.strip_prefix(JSON_PARSE_CALL) {
        let literal = extract_string_literal(call.trim_start())?;
        let decoded: String = serde_json::from_str(literal)?;
        return Ok(serde_json::from_str(&decoded)?);
    }

    if rest.starts_with('{') {
        let object = extract_balanced_object(rest).ok_or(EmbeddedPayloadError::Unterminated)?;
        return Ok(serde_json::from_str(object)?);
    }

    Err(EmbeddedPayloadError::UnsupportedForm)
}

/// Returns the text after the first `=` assignment to the marker. Reads and
/// comparisons of the marker earlier in the page are skipped.
fn assigned_value(page: &str) -> Result<&str, EmbeddedPayloadError> {
    let mut found = false;
    for (start, _) in page.match_indices(PRELOADED_STATE_MARKER) {
        found = true;
        let rest = page[start + PRELOADED_STATE_MARKER.len()..].trim_start();
        if let Some(value) = rest.strip_prefix('=') {
            if !value.starts_with('=') {
                return Ok(value.trim_start());
            }
        }
    }
    Err(if found {
        EmbeddedPayloadError::UnsupportedForm
    } else {
        EmbeddedPayloadError::MarkerNotFound
    })
}

/// Returns the double-quoted string literal at the start of `s`, quotes
/// included.
fn extract_string_literal(s: &str) -> Result<&str, EmbeddedPayloadError> {
    if !s.starts_with('"') {
        return Err(EmbeddedPayloadError::UnsupportedForm);
    }
    let mut escape = false;
    for (i, c) in s.char_indices().skip(1) {
        if escape {
            escape = false;
            continue;
        }
        match c {
            '\\' => escape = true,
            '"' => return Ok(&s[..=i]),
            _ => {}
        }
    }
    Err(EmbeddedPayloadError::Unterminated)
}

/// Returns the shortest prefix of `s` that forms a balanced `{…}` object,
/// skipping brackets inside string literals.
fn extract_balanced_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' => depth -= 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
