/// Parse a displayed count such as "12 345" or "8,100" into a number.
///
/// Grouping separators (spaces, no-break spaces, commas, dots) are dropped.
/// Returns `None` if anything else remains or nothing is left.
pub fn parse_count(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}' | ',' | '.'))
        .collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Remove parentheses from a nested value like "(Polska)" and trim it.
pub fn strip_parens(text: &str) -> String {
    text.replace(['(', ')'], "").trim().to_string()
}

/// `Some(trimmed)` for non-blank text, `None` otherwise.
pub fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_count_handles_grouping() {
        assert_eq!(parse_count("12 345"), Some(12345));
        assert_eq!(parse_count("8\u{a0}100"), Some(8100));
        assert_eq!(parse_count("15,000"), Some(15000));
        assert_eq!(parse_count("0"), Some(0));
    }

    #[test]
    fn parse_count_rejects_text() {
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count("brak danych"), None);
    }

    #[test]
    fn strip_parens_trims() {
        assert_eq!(strip_parens(" (Polska) "), "Polska");
        assert_eq!(strip_parens("Zabrze"), "Zabrze");
    }

    #[test]
    fn non_empty_filters_blank() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" Legia "), Some("Legia".to_string()));
    }
}
