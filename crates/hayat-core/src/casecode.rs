//! Case code formatting. Allocation of the underlying sequence is the
//! storage layer's job and happens atomically inside the insert
//! transaction; this module only formats and parses.

pub const PREFIX: &str = "HR-";

pub fn format_code(seq: u32) -> String {
    format!("{PREFIX}{seq:04}")
}

/// Accepts `HR-0007`, `hr-7`, or a bare `7`; re-emits the canonical
/// zero-padded form.
pub fn normalize_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix(PREFIX)
        .or_else(|| trimmed.strip_prefix("hr-"))
        .or_else(|| trimmed.strip_prefix("Hr-"))
        .unwrap_or(trimmed);
    let seq: u32 = digits.parse().ok()?;
    Some(format_code(seq))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_code(1), "HR-0001");
        assert_eq!(format_code(42), "HR-0042");
        assert_eq!(format_code(12345), "HR-12345");
    }

    #[test]
    fn normalizes_bare_and_prefixed() {
        assert_eq!(normalize_code("7").as_deref(), Some("HR-0007"));
        assert_eq!(normalize_code("HR-0007").as_deref(), Some("HR-0007"));
        assert_eq!(normalize_code("hr-7").as_deref(), Some("HR-0007"));
        assert_eq!(normalize_code("  HR-12  ").as_deref(), Some("HR-0012"));
        assert_eq!(normalize_code("case seven"), None);
    }
}
