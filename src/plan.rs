//! The search plan — the four-field record handed to the find engine.
//!
//! Constructed from a model reply, defaulted field-by-field when absent,
//! consumed by one search run, then discarded. Wire names are the JSON keys
//! the model is instructed to emit (`query`, `caseSensitive`, `useRegex`,
//! `matchWholeWord`).

use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;

/// A structured search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPlan {
    pub query: String,
    #[serde(rename = "caseSensitive")]
    pub case_sensitive: bool,
    #[serde(rename = "useRegex")]
    pub use_regex: bool,
    #[serde(rename = "matchWholeWord")]
    pub match_whole_word: bool,
}

impl SearchPlan {
    /// One-line human summary, e.g. for the post-generation confirmation.
    pub fn summary(&self) -> String {
        format!(
            "\"{}\" (case-sensitive: {}, regex: {}, whole-word: {})",
            self.query, self.case_sensitive, self.use_regex, self.match_whole_word
        )
    }
}

/// Parse a raw model reply into a [`SearchPlan`].
///
/// Tolerates the usual chat-model framing: surrounding whitespace, a
/// markdown code fence, or prose around the JSON object. Each field is
/// coerced to its expected type with a safe default; only a reply with no
/// JSON object at all is an error.
pub fn parse_reply(reply: &str) -> Result<SearchPlan, AppError> {
    let body = strip_code_fence(reply.trim());

    let value: Value = match serde_json::from_str(body) {
        Ok(v @ Value::Object(_)) => v,
        _ => {
            let span = extract_object(body).ok_or_else(|| {
                AppError::Translate(format!("no JSON object in model reply: {reply:?}"))
            })?;
            serde_json::from_str(span).map_err(|e| {
                AppError::Translate(format!("malformed JSON in model reply: {e}"))
            })?
        }
    };

    Ok(SearchPlan {
        query: value
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        case_sensitive: coerce_bool(value.get("caseSensitive")),
        use_regex: coerce_bool(value.get("useRegex")),
        match_whole_word: coerce_bool(value.get("matchWholeWord")),
    })
}

/// JS-style truthiness with one extension: the strings `"true"`/`"false"`
/// map to their boolean meaning, since models emit quoted booleans.
fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" => true,
            "false" | "" => false,
            _ => true,
        },
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

/// Remove a surrounding markdown fence (``` or ```json) when present.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the language tag on the opening fence line.
    match inner.split_once('\n') {
        Some((first, body)) if !first.trim_start().starts_with('{') => body.trim(),
        _ => inner.trim(),
    }
}

/// Locate the first balanced `{`…`}` span. Brace counting is enough here —
/// search queries rarely contain braces inside strings, and a false span
/// fails JSON parsing with a clear error anyway.
fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (i, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
