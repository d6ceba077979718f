//! Helpers for reading text answers produced by the model.

/// Removes a surrounding markdown code fence, with or without a `json`
/// language tag. Text without a fence is returned trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("```").and_then(|s| s.strip_suffix("```")) {
        Some(inner) => inner.trim_start_matches("json").trim(),
        None => trimmed,
    }
}
