//! Locates and decodes the JSON report inside free-form model output.
//!
//! The model is asked for bare JSON but often wraps it in prose or code
//! fences. We scan for balanced top-level `{...}` spans (string literals and
//! escapes respected) and decode the first one that looks like a report.

use serde_json::Value;

use crate::analysis::report::AnalysisReport;
use crate::errors::{AppError, NO_JSON_OBJECT_MESSAGE};

/// Top-level keys of the report schema.
const REPORT_KEYS: &[&str] = &[
    "skills",
    "experience_years",
    "education",
    "job_recommendations",
    "strengths",
    "improvements",
];

/// End offset of the balanced `{...}` span opening at `start`, if it closes.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Returns the first balanced top-level `{...}` span starting at or after `from`.
/// An opening brace that never closes is passed over and the scan resumes at
/// the next one.
fn next_object_span(text: &str, from: usize) -> Option<(usize, usize)> {
    let mut cursor = from;
    while let Some(pos) = text[cursor..].find('{') {
        let start = cursor + pos;
        if let Some(end) = balanced_end(text, start) {
            return Some((start, end));
        }
        cursor = start + 1;
    }
    None
}

/// Returns the first balanced JSON-object-looking substring, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    next_object_span(text, 0).map(|(start, end)| &text[start..end])
}

fn has_report_key(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|fields| REPORT_KEYS.iter().any(|key| fields.contains_key(*key)))
}

/// Parses the analysis report out of raw model output.
///
/// Candidate spans are tried in order; a span that fails to parse is skipped
/// whole, so objects nested inside a broken outer object are never mistaken
/// for the report. The first object carrying a report key wins. Objects with
/// none of them (`{}` in prose, say) are only used when nothing better
/// follows. No span at all, or no span that parses, is `MalformedResponse`.
pub fn parse_report(text: &str) -> Result<AnalysisReport, AppError> {
    let mut cursor = 0;
    let mut first_error: Option<serde_json::Error> = None;
    let mut keyless: Option<AnalysisReport> = None;

    while let Some((start, end)) = next_object_span(text, cursor) {
        cursor = end;
        let value: Value = match serde_json::from_str(&text[start..end]) {
            Ok(value) => value,
            Err(e) => {
                first_error.get_or_insert(e);
                continue;
            }
        };
        let keyed = has_report_key(&value);
        match serde_json::from_value::<AnalysisReport>(value) {
            Ok(report) if keyed => return Ok(report),
            Ok(report) => {
                keyless.get_or_insert(report);
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(report) = keyless {
        return Ok(report);
    }
    match first_error {
        Some(e) => Err(AppError::MalformedResponse(format!(
            "Failed to parse AI response: {e}"
        ))),
        None => Err(AppError::MalformedResponse(NO_JSON_OBJECT_MESSAGE.to_string())),
    }
}
