//! Extraction of an [`EnhancedIdea`] from raw model output.
//!
//! Model output is untrusted: it may be wrapped in markdown fences, carry a
//! stray sentence around the JSON, or deviate from the requested schema. Each
//! field is checked on its own and falls back to an empty value.

use serde_json::{Map, Value};
use thiserror::Error;

use super::enhanced_idea::EnhancedIdea;
use super::errors::DEFAULT_REJECTION_MESSAGE;

/// Errors that can occur while extracting an enhanced idea.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The model flagged the input as not being a usable idea.
    #[error("Idea rejected: {0}")]
    Rejected(String),
}

/// Turns raw model text into an [`EnhancedIdea`].
#[derive(Debug, Clone, Copy)]
pub struct IdeaExtractor {
    validity_gate: bool,
}

impl Default for IdeaExtractor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl IdeaExtractor {
    /// Creates an extractor. With `validity_gate` off, `isValid` is ignored.
    pub fn new(validity_gate: bool) -> Self {
        Self { validity_gate }
    }

    /// Whether `isValid: false` rejects the idea.
    pub fn validity_gate(&self) -> bool {
        self.validity_gate
    }

    /// Extracts an enhanced idea from a model response.
    ///
    /// # Steps
    /// 1. Strip code fences
    /// 2. Locate the JSON object
    /// 3. Parse
    /// 4. Apply the validity gate
    /// 5. Coerce the five fields
    pub fn extract(&self, response: &str) -> Result<EnhancedIdea, ExtractionError> {
        let cleaned = strip_code_fences(response);
        let json = locate_json_object(&cleaned);

        let value: Value =
            serde_json::from_str(json).map_err(|e| ExtractionError::ParseError(e.to_string()))?;

        let object = match &value {
            Value::Object(map) => map,
            other => return Err(ExtractionError::NotAnObject(json_type_name(other))),
        };

        if self.validity_gate && object.get("isValid") == Some(&Value::Bool(false)) {
            let message = object
                .get("errorMessage")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_REJECTION_MESSAGE);
            return Err(ExtractionError::Rejected(message.to_string()));
        }

        Ok(EnhancedIdea::new(
            text_field(object, "problemStatement"),
            text_field(object, "targetAudience"),
            list_field(object, "coreFeatures"),
            list_field(object, "technicalSuggestions"),
            list_field(object, "nextSteps"),
        ))
    }
}

/// Removes markdown code fences (```` ```json ```` and ```` ``` ````) anywhere
/// in the text, then trims.
pub fn strip_code_fences(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find("```") {
        result.push_str(&rest[..idx]);
        rest = &rest[idx + 3..];
        if rest.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            rest = &rest[4..];
        }
    }
    result.push_str(rest);

    result.trim().to_string()
}

/// Returns the first balanced `{...}` object in `text`, or `text` itself when
/// it already starts with `{` or holds no object.
fn locate_json_object(text: &str) -> &str {
    if text.starts_with('{') {
        return text;
    }

    let Some(start) = text.find('{') else {
        return text;
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &text[start..start + offset + 1];
                }
            }
            _ => {}
        }
    }

    text
}

fn text_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn list_field(object: &Map<String, Value>, key: &str) -> Vec<String> {
    match object.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
