//! Response decoder
//!
//! The rewrite service is asked for JSON but its output is never trusted:
//! it may be wrapped in markdown fences or prose, contain raw newlines
//! inside strings, or use non-standard numeric literals. Decoding runs in
//! four steps:
//!
//! 1. strip leading/trailing fence markers
//! 2. locate the first balanced `{...}` (or `[...]`) span, string-aware
//! 3. sanitize the span and parse it
//! 4. validate the shape for the calling context

use contract_types::{Document, Section};
use serde_json::{Map, Value};

use crate::error::SimplifyError;

const TITLE_KEY: &str = "section_title";
const BODY_KEY: &str = "simplified_text";
const RATIONALE_KEY: &str = "justification";
const SECTIONS_KEY: &str = "sections";

/// Which bracket a payload is expected to start with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opener {
    Object,
    Array,
}

impl Opener {
    fn open(self) -> char {
        match self {
            Opener::Object => '{',
            Opener::Array => '[',
        }
    }

    fn other(self) -> Opener {
        match self {
            Opener::Object => Opener::Array,
            Opener::Array => Opener::Object,
        }
    }
}

/// Decode a full-document payload: `{"sections": [...]}`
pub fn decode_document(text: &str) -> Result<Document, SimplifyError> {
    let (value, raw) = parse_payload(text, Opener::Object)?;

    let sections = value
        .as_object()
        .ok_or_else(|| "expected a JSON object".to_string())
        .and_then(|obj| match obj.get(SECTIONS_KEY) {
            None => Err(format!("missing '{}'", SECTIONS_KEY)),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    section_from_value(item).map_err(|e| format!("section {}: {}", i + 1, e))
                })
                .collect::<Result<Vec<_>, _>>(),
            Some(_) => Err(format!("'{}' is not a list", SECTIONS_KEY)),
        })
        .map_err(|detail| validation(detail, &raw))?;

    tracing::debug!("Decoded document payload with {} sections", sections.len());
    Ok(Document::new(sections))
}

/// Decode a single-section payload: `{section_title, simplified_text, justification}`
pub fn decode_section(text: &str) -> Result<Section, SimplifyError> {
    let (value, raw) = parse_payload(text, Opener::Object)?;
    section_from_value(&value).map_err(|detail| validation(detail, &raw))
}

/// Steps 1-3: clean, locate and parse, without shape validation.
///
/// Returns the parsed value together with the cleaned text, which is what
/// errors report as `raw`.
pub fn parse_payload(text: &str, prefer: Opener) -> Result<(Value, String), SimplifyError> {
    let cleaned = strip_fences(text).to_string();

    let span = locate_span(&cleaned, prefer).map_err(|detail| decode(detail, &cleaned))?;
    let sanitized = sanitize(span);

    match serde_json::from_str::<Value>(&sanitized) {
        Ok(value) => Ok((value, cleaned)),
        Err(e) => Err(decode(format!("invalid JSON: {}", e), &cleaned)),
    }
}

/// Remove markdown code fence markers at either end of the text
pub fn strip_fences(text: &str) -> &str {
    let mut text = text.trim();

    if text.starts_with("```") {
        text = match text.find('\n') {
            Some(newline) => &text[newline + 1..],
            None => text.trim_start_matches('`').trim_start_matches("json"),
        };
    }

    if let Some(stripped) = text.trim_end().strip_suffix("```") {
        text = stripped;
    }

    text.trim()
}

/// Find the first balanced span starting at the preferred opener.
///
/// Brackets inside string literals (and escaped quotes) are skipped. If the
/// preferred opener never occurs the other kind is tried.
pub fn locate_span(text: &str, prefer: Opener) -> Result<&str, String> {
    let start = text
        .find(prefer.open())
        .or_else(|| text.find(prefer.other().open()))
        .ok_or_else(|| "no JSON object or array found".to_string())?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    Err("unterminated JSON value".to_string())
}

/// Make a located span acceptable to a strict JSON parser.
///
/// Raw control characters inside strings are escaped, and the bare
/// literals `NaN`, `Infinity` and `-Infinity` become `null`.
fn sanitize(span: &str) -> String {
    let mut out = String::with_capacity(span.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = span;

    while let Some(c) = rest.chars().next() {
        let mut advance = c.len_utf8();

        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    out.push(c);
                }
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() && (c as u32) < 0x20 => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if let Some(literal) = ["-Infinity", "Infinity", "NaN"]
            .into_iter()
            .find(|lit| rest.starts_with(lit))
        {
            out.push_str("null");
            advance = literal.len();
        } else {
            out.push(c);
        }

        rest = &rest[advance..];
    }

    out
}

fn section_from_value(value: &Value) -> Result<Section, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "expected a JSON object".to_string())?;

    let title = string_field(obj, TITLE_KEY)?;
    if title.trim().is_empty() {
        return Err(format!("'{}' is blank", TITLE_KEY));
    }

    Ok(Section::new(
        title,
        string_field(obj, BODY_KEY)?,
        string_field(obj, RATIONALE_KEY)?,
    ))
}

fn string_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, String> {
    match obj.get(key) {
        None => Err(format!("missing '{}'", key)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(format!("'{}' is not a string", key)),
    }
}

fn decode(detail: String, raw: &str) -> SimplifyError {
    tracing::warn!("Response decode failed: {}", detail);
    SimplifyError::Decode {
        detail,
        raw: raw.to_string(),
    }
}

fn validation(detail: String, raw: &str) -> SimplifyError {
    tracing::warn!("Response validation failed: {}", detail);
    SimplifyError::Validation {
        detail,
        raw: raw.to_string(),
    }
}
