//! Tolerant parsing of the classifier's free-form response.
//!
//! The workflow answers in one of two observed shapes: a bare JSON object,
//! or a JSON object wrapped in a fenced code block inside an explanatory
//! markdown response. Parsing is an ordered sequence of strategies; the
//! first that yields a result wins, and the terminal fallback keeps the raw
//! text so no provider output is ever dropped.

use serde_json::Value;

/// Structured classification extracted from a provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Short label; empty string when unclassified.
    pub category: String,
    /// Suggested reply text; empty string when unavailable.
    pub auto_response: String,
    /// Pretty-printed JSON on success, the raw input otherwise.
    pub canonical_text: String,
}

/// Parse a provider response. Never fails: when no JSON object can be
/// extracted, the result carries empty classification fields and the raw
/// input unchanged.
pub fn parse_classification(raw: &str) -> Classification {
    from_json_str(raw)
        .or_else(|| fenced_object(raw).and_then(from_json_str))
        .unwrap_or_else(|| Classification {
            category: String::new(),
            auto_response: String::new(),
            canonical_text: raw.to_string(),
        })
}

/// Strategy 1 and the shared tail of strategy 2: parse `candidate` as a JSON
/// object and re-serialize it canonically.
fn from_json_str(candidate: &str) -> Option<Classification> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    let object = value.as_object()?;

    let field = |name: &str| {
        object
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    // to_string_pretty uses 2-space indentation and leaves non-ASCII
    // characters unescaped.
    let canonical_text = serde_json::to_string_pretty(&value).ok()?;

    Some(Classification {
        category: field("category"),
        auto_response: field("auto_response"),
        canonical_text,
    })
}

/// Strategy 2: locate the first fenced code block (optionally tagged `json`)
/// that wraps a brace-delimited object, and return the object text.
fn fenced_object(raw: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(offset) = raw[search_from..].find("```") {
        let after_fence = search_from + offset + 3;
        let mut body = &raw[after_fence..];
        if let Some(rest) = body.strip_prefix("json") {
            body = rest;
        }
        let body = body.trim_start();
        if body.starts_with('{') {
            if let Some(end) = body.find("```") {
                let candidate = body[..end].trim_end();
                if candidate.ends_with('}') {
                    return Some(candidate);
                }
            }
        }
        search_from = after_fence;
    }
    None
}
