//! Phone number validation and masking. Every log line that carries a
//! phone number must pass it through [`mask`] first.

/// Accepts E.164-like numbers: optional `+`, then 7 to 15 digits.
pub fn is_valid(phone: &str) -> bool {
    let trimmed = phone.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Canonical storage form: trimmed, spaces and dashes stripped.
pub fn canonicalize(phone: &str) -> String {
    phone
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

/// Keeps everything but the last four characters, then appends `****`.
/// Counts chars, not bytes: the webhook feeds raw `From` values in
/// here and those are not guaranteed to be ASCII.
pub fn mask(phone: &str) -> String {
    let total = phone.chars().count();
    if total <= 4 {
        return "****".to_string();
    }
    let kept: String = phone.chars().take(total - 4).collect();
    format!("{kept}****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_numbers() {
        assert!(is_valid("+8801712345678"));
        assert!(is_valid("01712345678"));
        assert!(!is_valid("12345"));
        assert!(!is_valid("+880 17 abc"));
        assert!(!is_valid(""));
    }

    #[test]
    fn canonicalize_strips_separators() {
        assert_eq!(canonicalize(" +880 171-234-5678 "), "+8801712345678");
    }

    #[test]
    fn mask_keeps_all_but_last_four() {
        assert_eq!(mask("+8801712345678"), "+880171234****");
        assert_eq!(mask("1234"), "****");
        assert_eq!(mask(""), "****");
    }

    #[test]
    fn mask_handles_non_ascii_senders() {
        // Raw webhook From values are not guaranteed to be numbers.
        assert_eq!(mask(&canonicalize("xدxxx")), "x****");
        assert_eq!(mask("٠١٢٣٤٥٦٧"), "٠١٢٣****");
        assert_eq!(mask("دد"), "****");
    }
}
