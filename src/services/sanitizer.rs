//! Model response sanitation
//!
//! Vision models wrap JSON replies in markdown code fences often enough
//! that we strip them unconditionally before parsing. There is deliberately
//! no repair of malformed output: a payload that does not parse and
//! validate against the canonical schema terminates the task.

use crate::error::{AppResult, AuditError, PayloadError};
use crate::model::{AuditResult, CATEGORY_MAX};
use crate::services::grading;

/// Strip surrounding markdown code fences
///
/// Trims whitespace; while the text starts with a fence marker (with or
/// without a language tag), drops the opening fence line and a matching
/// closing fence, re-trimming each round. Idempotent: already-clean input
/// passes through untouched.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    while s.starts_with("```") {
        // opening fence line, language tag included
        s = match s.find('\n') {
            Some(i) => &s[i + 1..],
            // single-line fence: skip the marker and any glued language tag
            None => {
                let rest = &s[3..];
                let tag_end = rest
                    .char_indices()
                    .find(|(_, c)| !c.is_ascii_alphanumeric())
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                &rest[tag_end..]
            }
        };
        let end_trimmed = s.trim_end();
        s = end_trimmed.strip_suffix("```").unwrap_or(end_trimmed);
        s = s.trim();
    }
    s
}

/// Sanitize raw model text and validate it into a canonical `AuditResult`
///
/// Normalization applied after parsing:
/// - recommendations are capped at 3 entries;
/// - `overall_score` is recomputed as the category sum;
/// - `grade` is recomputed from the banding table.
/// Category scores outside `0..=25` are a schema violation.
pub fn sanitize_and_validate(raw: &str) -> AppResult<AuditResult> {
    let clean = strip_code_fences(raw);

    let mut result: AuditResult =
        serde_json::from_str(clean).map_err(|e| PayloadError::JsonParse { source: e })?;

    for (name, category) in result.categories.iter() {
        if category.score > CATEGORY_MAX {
            return Err(AuditError::schema_violation(format!(
                "category '{}' scored {} (max {})",
                name, category.score, CATEGORY_MAX
            )));
        }
    }

    result.recommendations.truncate(3);
    result.overall_score = result.categories.total();
    result.grade = grading::grade_letter(result.overall_score).to_string();

    Ok(result)
}
